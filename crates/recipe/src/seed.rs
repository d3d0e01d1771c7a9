use std::collections::HashSet;

use mealplanner_shared::recipe::{RawRecipe, Recipe};
use mealplanner_shared::{DEFAULT_MEALS_KEY, Storage, load_json, save_json};

const BUILTIN_CATALOG: &str = include_str!("../data/default_recipes.json");

/// Seed catalog shipped with the application.
pub fn builtin_catalog() -> anyhow::Result<Vec<RawRecipe>> {
    parse_catalog(BUILTIN_CATALOG)
}

pub fn parse_catalog(raw: &str) -> anyhow::Result<Vec<RawRecipe>> {
    Ok(serde_json::from_str(raw)?)
}

/// Normalizes raw seed records into default recipes.
///
/// Records without an id get one derived from their position, so the same
/// input always yields the same set. Later records repeating an id are dropped.
pub fn seed_defaults(raw: &[RawRecipe]) -> Vec<Recipe> {
    let mut seen = HashSet::new();
    let mut recipes = Vec::with_capacity(raw.len());

    for (index, record) in raw.iter().enumerate() {
        let mut record = record.clone();

        if record.id.as_deref().is_none_or(|id| id.trim().is_empty()) {
            record.id = Some(format!("default-{}", index + 1));
        }

        let recipe = record.normalize(true);

        if !seen.insert(recipe.id.to_owned()) {
            tracing::warn!(id = %recipe.id, "duplicate id in seed catalog, skipped");
            continue;
        }

        recipes.push(recipe);
    }

    recipes
}

/// Returns the persisted default catalog, seeding and persisting it from
/// `raw` on first use only.
pub async fn load_defaults(
    storage: &(impl Storage + ?Sized),
    raw: &[RawRecipe],
) -> mealplanner_shared::Result<Vec<Recipe>> {
    if let Some(recipes) = load_json::<Vec<Recipe>>(storage, DEFAULT_MEALS_KEY).await? {
        tracing::debug!(count = recipes.len(), "default catalog loaded");

        return Ok(recipes);
    }

    let recipes = seed_defaults(raw);
    save_json(storage, DEFAULT_MEALS_KEY, &recipes).await?;

    tracing::info!(count = recipes.len(), "default catalog seeded");

    Ok(recipes)
}

#[cfg(test)]
mod tests {
    use mealplanner_shared::recipe::MealType;

    use super::*;

    #[test]
    fn test_builtin_catalog_covers_every_meal_type() -> anyhow::Result<()> {
        let recipes = seed_defaults(&builtin_catalog()?);

        for meal_type in [MealType::Breakfast, MealType::Lunch, MealType::Dinner] {
            let count = recipes.iter().filter(|r| r.meal_type == meal_type).count();
            assert!(count >= 7, "{meal_type} has only {count} recipes");
        }

        assert!(recipes.iter().all(|r| r.is_default));

        Ok(())
    }

    #[test]
    fn test_seed_is_deterministic() -> anyhow::Result<()> {
        let raw = builtin_catalog()?;

        assert_eq!(seed_defaults(&raw), seed_defaults(&raw));

        Ok(())
    }

    #[test]
    fn test_seed_drops_repeated_ids() {
        let mut first = RawRecipe::new("First", MealType::Lunch);
        first.id = Some("same".to_owned());
        let mut second = RawRecipe::new("Second", MealType::Dinner);
        second.id = Some("same".to_owned());

        let recipes = seed_defaults(&[first, second]);

        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].name, "First");
    }
}
