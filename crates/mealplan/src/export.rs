use mealplanner_shared::mealplan::{Day, WeeklyPlan};
use mealplanner_shared::recipe::{MealType, Recipe};
use serde::Serialize;
use strum::VariantArray;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PlanRow {
    pub day: Day,
    /// Comma-joined recipe names per meal type, `-` for an empty slot.
    pub meals: Vec<(MealType, String)>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ShoppingDay {
    pub day: Day,
    pub recipes: Vec<ShoppingRecipe>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ShoppingRecipe {
    pub name: String,
    pub ingredients: Vec<String>,
}

/// Printable page of a personal recipe. Zero calories or prep time read as
/// unknown.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CookbookEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub meal_type: MealType,
    pub calories: Option<u32>,
    pub prep_time: Option<u32>,
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
}

/// One row per planned day, in week order.
pub fn plan_table(plan: &WeeklyPlan) -> Vec<PlanRow> {
    Day::VARIANTS
        .iter()
        .filter(|day| plan.day(**day).is_some())
        .map(|day| PlanRow {
            day: *day,
            meals: MealType::VARIANTS
                .iter()
                .map(|meal_type| {
                    let names = plan
                        .slot(*day, *meal_type)
                        .iter()
                        .map(|recipe| recipe.name.as_str())
                        .collect::<Vec<_>>();

                    let cell = if names.is_empty() {
                        "-".to_owned()
                    } else {
                        names.join(", ")
                    };

                    (*meal_type, cell)
                })
                .collect(),
        })
        .collect()
}

/// Ingredients to buy per planned day, grouped by recipe. A recipe planned
/// twice on the same day is listed once.
pub fn shopping_list(plan: &WeeklyPlan) -> Vec<ShoppingDay> {
    Day::VARIANTS
        .iter()
        .filter_map(|day| {
            let slots = plan.day(*day)?;
            let mut recipes: Vec<ShoppingRecipe> = vec![];

            for recipe in slots.values().flatten() {
                if recipes.iter().any(|r| r.name == recipe.name) {
                    continue;
                }

                recipes.push(ShoppingRecipe {
                    name: recipe.name.to_owned(),
                    ingredients: recipe.ingredients.to_vec(),
                });
            }

            Some(ShoppingDay { day: *day, recipes })
        })
        .collect()
}

/// Personal recipes sorted by name, case-insensitively. Empty when the user
/// has none.
pub fn cookbook(personal: &[Recipe]) -> Vec<CookbookEntry> {
    let mut entries = personal
        .iter()
        .map(|recipe| CookbookEntry {
            name: recipe.name.to_owned(),
            meal_type: recipe.meal_type,
            calories: (recipe.calories > 0).then_some(recipe.calories),
            prep_time: (recipe.prep_time > 0).then_some(recipe.prep_time),
            description: recipe.description.to_owned(),
            ingredients: recipe.ingredients.to_vec(),
            steps: recipe.steps.to_vec(),
        })
        .collect::<Vec<_>>();

    entries.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: &str, meal_type: MealType, ingredients: &[&str]) -> Recipe {
        Recipe {
            id: id.to_owned(),
            name: format!("Recipe {id}"),
            description: None,
            meal_type,
            prep_time: 0,
            cook_time: 0,
            servings: 1,
            calories: 0,
            ingredients: ingredients.iter().map(|i| i.to_string()).collect(),
            steps: vec![],
            is_default: false,
        }
    }

    fn sample_plan() -> WeeklyPlan {
        let mut plan = WeeklyPlan::new();
        plan.insert(Day::Wednesday, MealType::Dinner, recipe("3", MealType::Dinner, &["rice"]));
        plan.insert(Day::Monday, MealType::Lunch, recipe("1", MealType::Lunch, &["2 eggs"]));
        plan.insert(Day::Monday, MealType::Lunch, recipe("2", MealType::Lunch, &["bread", "salt"]));
        plan
    }

    #[test]
    fn test_plan_table() {
        let rows = plan_table(&sample_plan());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].day, Day::Monday);
        assert_eq!(
            rows[0].meals,
            vec![
                (MealType::Breakfast, "-".to_owned()),
                (MealType::Lunch, "Recipe 1, Recipe 2".to_owned()),
                (MealType::Dinner, "-".to_owned()),
            ]
        );
        assert_eq!(rows[1].day, Day::Wednesday);
    }

    #[test]
    fn test_shopping_list() {
        let list = shopping_list(&sample_plan());

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].recipes.len(), 2);
        assert_eq!(list[0].recipes[1].ingredients, vec!["bread", "salt"]);
        assert_eq!(list[1].recipes[0].name, "Recipe 3");
        assert!(shopping_list(&WeeklyPlan::new()).is_empty());
    }

    #[test]
    fn test_cookbook_sorted_by_name() {
        let mut soup = recipe("1", MealType::Lunch, &["lentils"]);
        soup.name = "soup".to_owned();
        soup.calories = 230;
        let mut apple = recipe("2", MealType::Breakfast, &[]);
        apple.name = "Apple pie".to_owned();
        apple.prep_time = 20;
        let mut bread = recipe("3", MealType::Dinner, &[]);
        bread.name = "Bread".to_owned();

        let entries = cookbook(&[soup, apple, bread]);

        assert_eq!(
            entries.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
            vec!["Apple pie", "Bread", "soup"]
        );
        assert_eq!(entries[0].prep_time, Some(20));
        assert_eq!(entries[0].calories, None);
        assert_eq!(entries[2].calories, Some(230));
        assert_eq!(entries[2].ingredients, vec!["lentils"]);
    }

    #[test]
    fn test_cookbook_empty() {
        assert!(cookbook(&[]).is_empty());
    }

    #[test]
    fn test_views_serialize_as_json() -> anyhow::Result<()> {
        let plan = sample_plan();

        let table = serde_json::to_value(plan_table(&plan))?;
        assert_eq!(table[0]["day"], "monday");
        assert_eq!(table[0]["meals"][1][0], "lunch");
        assert_eq!(table[0]["meals"][1][1], "Recipe 1, Recipe 2");

        let list = serde_json::to_value(shopping_list(&plan))?;
        assert_eq!(list[1]["recipes"][0]["ingredients"][0], "rice");

        let mut soup = recipe("1", MealType::Lunch, &[]);
        soup.prep_time = 5;
        let book = serde_json::to_value(cookbook(&[soup]))?;
        assert_eq!(book[0]["type"], "lunch");
        assert_eq!(book[0]["prepTime"], 5);
        assert!(book[0]["calories"].is_null());

        Ok(())
    }
}
