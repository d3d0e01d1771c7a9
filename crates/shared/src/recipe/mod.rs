use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use validator::Validate;

#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum MealType {
    #[strum(to_string = "breakfast", serialize = "kahvaltı")]
    #[serde(alias = "kahvaltı")]
    Breakfast,
    #[strum(to_string = "lunch", serialize = "öğle")]
    #[serde(alias = "öğle")]
    Lunch,
    #[strum(to_string = "dinner", serialize = "akşam")]
    #[serde(alias = "akşam")]
    Dinner,
}

fn one() -> u32 {
    1
}

/// Canonical recipe record shared by the catalog, the plan and the query layer.
#[derive(Validate, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    #[validate(length(min = 1, max = 200, message = "Recipe name is required"))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub meal_type: MealType,
    #[serde(default)]
    pub prep_time: u32,
    #[serde(default)]
    pub cook_time: u32,
    #[serde(default = "one")]
    #[validate(range(min = 1))]
    pub servings: u32,
    #[serde(default)]
    pub calories: u32,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl Recipe {
    pub fn total_time(&self) -> u32 {
        self.prep_time.saturating_add(self.cook_time)
    }
}

/// Ingredient as found in raw records: either a pre-composed line or the
/// `{amount, unit, name}` rows produced by recipe forms.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum RawIngredient {
    Text(String),
    Structured {
        #[serde(default)]
        amount: Option<serde_json::Value>,
        #[serde(default)]
        unit: Option<String>,
        #[serde(default)]
        name: String,
    },
}

impl RawIngredient {
    /// Renders the ingredient as `"amount unit name"`, `None` when it has no name.
    pub fn render(&self) -> Option<String> {
        match self {
            RawIngredient::Text(text) => {
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_owned())
            }
            RawIngredient::Structured { amount, unit, name } => {
                if name.trim().is_empty() {
                    return None;
                }

                let amount = match amount {
                    Some(serde_json::Value::String(v)) => v.trim().to_owned(),
                    Some(serde_json::Value::Number(v)) => v.to_string(),
                    _ => String::new(),
                };
                let unit = unit.as_deref().unwrap_or_default().trim();

                let parts = [amount.as_str(), unit, name.trim()]
                    .into_iter()
                    .filter(|p| !p.is_empty())
                    .collect::<Vec<_>>();

                Some(parts.join(" "))
            }
        }
    }
}

/// Loosely shaped recipe record, as found in seed catalogs, legacy stores and
/// user input. Converted to [`Recipe`] with [`RawRecipe::normalize`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawRecipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub meal_type: MealType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<RawIngredient>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Vec<String>>,
}

impl RawRecipe {
    pub fn new(name: impl Into<String>, meal_type: MealType) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            meal_type,
            prep_time: None,
            cook_time: None,
            duration: None,
            servings: None,
            calories: None,
            ingredients: None,
            steps: None,
            instructions: None,
        }
    }

    /// Builds the canonical record. A missing id gets a fresh one, zero or
    /// missing prep/cook times fall back to the legacy `duration`, and
    /// `steps` wins over `instructions` when both are present.
    pub fn normalize(self, is_default: bool) -> Recipe {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(new_id);

        let prep_time = self
            .prep_time
            .filter(|t| *t > 0)
            .or(self.duration)
            .unwrap_or_default();

        let cook_time = self
            .cook_time
            .filter(|t| *t > 0)
            .or(self.duration)
            .unwrap_or_default();

        let ingredients = self
            .ingredients
            .unwrap_or_default()
            .iter()
            .filter_map(RawIngredient::render)
            .collect();

        let steps = self
            .steps
            .or(self.instructions)
            .unwrap_or_default()
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .collect();

        Recipe {
            id,
            name: self.name.trim().to_owned(),
            description: self.description.filter(|d| !d.trim().is_empty()),
            meal_type: self.meal_type,
            prep_time,
            cook_time,
            servings: self.servings.filter(|s| *s > 0).unwrap_or(1),
            calories: self.calories.unwrap_or_default(),
            ingredients,
            steps,
            is_default,
        }
    }
}

/// Fresh opaque recipe identifier.
pub fn new_id() -> String {
    ulid::Ulid::new().to_string()
}
