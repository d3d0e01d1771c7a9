use std::str::FromStr;

use mealplanner_shared::recipe::{MealType, Recipe};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

/// Which recipe set a view is built from.
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
    Default,
    PartialEq,
    Eq,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SourceFilter {
    #[default]
    All,
    Default,
    Personal,
}

/// Meal type restriction, `All` being the "all types" sentinel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    Only(MealType),
}

impl TypeFilter {
    pub fn matches(&self, meal_type: MealType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(expected) => *expected == meal_type,
        }
    }
}

impl From<MealType> for TypeFilter {
    fn from(value: MealType) -> Self {
        TypeFilter::Only(value)
    }
}

impl FromStr for TypeFilter {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(TypeFilter::All);
        }

        MealType::from_str(s).map(TypeFilter::Only)
    }
}

/// `defaults ++ personal`, `defaults` or `personal`, each keeping its own order.
pub fn merged_view(defaults: &[Recipe], personal: &[Recipe], filter: SourceFilter) -> Vec<Recipe> {
    match filter {
        SourceFilter::All => defaults.iter().chain(personal.iter()).cloned().collect(),
        SourceFilter::Default => defaults.to_vec(),
        SourceFilter::Personal => personal.to_vec(),
    }
}

/// Effective recipe list for a source, a meal type and a free-text search on
/// the name (case-insensitive substring).
pub fn query(
    defaults: &[Recipe],
    personal: &[Recipe],
    source: SourceFilter,
    type_filter: TypeFilter,
    search: &str,
) -> Vec<Recipe> {
    let needle = search.to_lowercase();

    merged_view(defaults, personal, source)
        .into_iter()
        .filter(|recipe| type_filter.matches(recipe.meal_type))
        .filter(|recipe| needle.is_empty() || recipe.name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: &str, name: &str, meal_type: MealType, is_default: bool) -> Recipe {
        Recipe {
            id: id.to_owned(),
            name: name.to_owned(),
            description: None,
            meal_type,
            prep_time: 0,
            cook_time: 0,
            servings: 1,
            calories: 0,
            ingredients: vec![],
            steps: vec![],
            is_default,
        }
    }

    fn fixtures() -> (Vec<Recipe>, Vec<Recipe>) {
        (
            vec![recipe("1", "Oatmeal", MealType::Breakfast, true)],
            vec![recipe("2", "Omelette", MealType::Breakfast, false)],
        )
    }

    fn names(recipes: &[Recipe]) -> Vec<&str> {
        recipes.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_query_by_type() {
        let (defaults, personal) = fixtures();
        let result = query(
            &defaults,
            &personal,
            SourceFilter::All,
            MealType::Breakfast.into(),
            "",
        );

        assert_eq!(names(&result), vec!["Oatmeal", "Omelette"]);
    }

    #[test]
    fn test_query_by_source() {
        let (defaults, personal) = fixtures();
        let result = query(&defaults, &personal, SourceFilter::Default, TypeFilter::All, "");

        assert_eq!(names(&result), vec!["Oatmeal"]);
    }

    #[test]
    fn test_query_by_search_text() {
        let (defaults, personal) = fixtures();
        let result = query(&defaults, &personal, SourceFilter::All, TypeFilter::All, "ome");

        assert_eq!(names(&result), vec!["Omelette"]);

        let result = query(&defaults, &personal, SourceFilter::All, TypeFilter::All, "OAT");
        assert_eq!(names(&result), vec!["Oatmeal"]);
    }

    #[test]
    fn test_query_other_type_is_empty() {
        let (defaults, personal) = fixtures();
        let result = query(
            &defaults,
            &personal,
            SourceFilter::All,
            MealType::Dinner.into(),
            "",
        );

        assert!(result.is_empty());
    }

    #[test]
    fn test_merged_view_order() {
        let defaults = vec![
            recipe("d1", "A", MealType::Lunch, true),
            recipe("d2", "B", MealType::Dinner, true),
        ];
        let personal = vec![
            recipe("p1", "C", MealType::Lunch, false),
            recipe("p2", "D", MealType::Breakfast, false),
            recipe("p3", "E", MealType::Dinner, false),
        ];

        let all = merged_view(&defaults, &personal, SourceFilter::All);
        assert_eq!(all.len(), defaults.len() + personal.len());
        assert_eq!(
            all.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            vec!["d1", "d2", "p1", "p2", "p3"]
        );

        assert_eq!(merged_view(&defaults, &personal, SourceFilter::Default), defaults);
        assert_eq!(merged_view(&defaults, &personal, SourceFilter::Personal), personal);
    }

    #[test]
    fn test_filter_tokens() -> anyhow::Result<()> {
        assert_eq!(SourceFilter::from_str("personal")?, SourceFilter::Personal);
        assert_eq!(SourceFilter::Default.to_string(), "default");
        assert_eq!(TypeFilter::from_str("all")?, TypeFilter::All);
        assert_eq!(
            TypeFilter::from_str("lunch")?,
            TypeFilter::Only(MealType::Lunch)
        );
        assert!(TypeFilter::from_str("brunch").is_err());

        Ok(())
    }
}
