use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

use crate::recipe::{MealType, Recipe};

/// Day of the weekly plan, ordered Monday first.
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
pub enum Day {
    #[strum(to_string = "monday", serialize = "Pazartesi")]
    #[serde(alias = "Pazartesi")]
    Monday,
    #[strum(to_string = "tuesday", serialize = "Salı")]
    #[serde(alias = "Salı")]
    Tuesday,
    #[strum(to_string = "wednesday", serialize = "Çarşamba")]
    #[serde(alias = "Çarşamba")]
    Wednesday,
    #[strum(to_string = "thursday", serialize = "Perşembe")]
    #[serde(alias = "Perşembe")]
    Thursday,
    #[strum(to_string = "friday", serialize = "Cuma")]
    #[serde(alias = "Cuma")]
    Friday,
    #[strum(to_string = "saturday", serialize = "Cumartesi")]
    #[serde(alias = "Cumartesi")]
    Saturday,
    #[strum(to_string = "sunday", serialize = "Pazar")]
    #[serde(alias = "Pazar")]
    Sunday,
}

pub type Slots = BTreeMap<MealType, Vec<Recipe>>;
pub type Days = BTreeMap<Day, Slots>;

/// Slot content as persisted by older clients, which stored a bare recipe
/// object instead of a list.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSlot {
    Many(Vec<Recipe>),
    One(Box<Recipe>),
}

#[derive(Deserialize)]
#[serde(transparent)]
struct StoredPlan(BTreeMap<Day, BTreeMap<MealType, StoredSlot>>);

impl From<StoredPlan> for WeeklyPlan {
    fn from(value: StoredPlan) -> Self {
        let mut plan = WeeklyPlan::default();

        for (day, slots) in value.0 {
            for (meal_type, slot) in slots {
                let recipes = match slot {
                    StoredSlot::Many(recipes) => recipes,
                    StoredSlot::One(recipe) => vec![*recipe],
                };

                for recipe in recipes {
                    plan.insert(day, meal_type, recipe);
                }
            }
        }

        plan
    }
}

impl From<WeeklyPlan> for Days {
    fn from(value: WeeklyPlan) -> Self {
        value.days
    }
}

/// Day x meal type grid of recipe copies.
///
/// Slot lists and day maps are never kept empty: every removal prunes the
/// containers it leaves behind.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(from = "StoredPlan", into = "Days")]
pub struct WeeklyPlan {
    days: Days,
}

impl WeeklyPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Number of recipe entries across every slot.
    pub fn len(&self) -> usize {
        self.days
            .values()
            .flat_map(|slots| slots.values())
            .map(Vec::len)
            .sum()
    }

    pub fn days(&self) -> &Days {
        &self.days
    }

    pub fn day(&self, day: Day) -> Option<&Slots> {
        self.days.get(&day)
    }

    pub fn slot(&self, day: Day, meal_type: MealType) -> &[Recipe] {
        self.days
            .get(&day)
            .and_then(|slots| slots.get(&meal_type))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains(&self, recipe_id: &str) -> bool {
        self.days
            .values()
            .flat_map(|slots| slots.values())
            .flatten()
            .any(|recipe| recipe.id == recipe_id)
    }

    /// Appends a copy of the recipe unless the slot already holds that id.
    pub fn insert(&mut self, day: Day, meal_type: MealType, recipe: Recipe) -> bool {
        let slot = self
            .days
            .entry(day)
            .or_default()
            .entry(meal_type)
            .or_default();

        if slot.iter().any(|r| r.id == recipe.id) {
            return false;
        }

        slot.push(recipe);
        true
    }

    /// Replaces the whole slot; an empty list removes it.
    pub fn set_slot(&mut self, day: Day, meal_type: MealType, recipes: Vec<Recipe>) {
        if recipes.is_empty() {
            if let Some(slots) = self.days.get_mut(&day) {
                slots.remove(&meal_type);
            }
        } else {
            self.days.entry(day).or_default().insert(meal_type, recipes);
        }

        self.prune();
    }

    /// Removes one recipe from a slot, or the whole slot when `recipe_id` is
    /// `None`. Returns whether anything was removed.
    pub fn remove(
        &mut self,
        day: Day,
        meal_type: MealType,
        recipe_id: Option<&str>,
    ) -> crate::Result<bool> {
        let Some(slots) = self.days.get_mut(&day) else {
            return Err(crate::Error::DayNotFound(day));
        };

        let removed = match recipe_id {
            Some(id) => match slots.get_mut(&meal_type) {
                Some(slot) => {
                    let before = slot.len();
                    slot.retain(|recipe| recipe.id != id);
                    slot.len() != before
                }
                None => false,
            },
            None => slots.remove(&meal_type).is_some(),
        };

        self.prune();

        Ok(removed)
    }

    /// Drops every occurrence of a recipe id from every slot.
    pub fn remove_recipe(&mut self, recipe_id: &str) -> bool {
        let mut removed = false;

        for slot in self.days.values_mut().flat_map(|slots| slots.values_mut()) {
            let before = slot.len();
            slot.retain(|recipe| recipe.id != recipe_id);
            removed |= slot.len() != before;
        }

        self.prune();

        removed
    }

    pub fn clear(&mut self) {
        self.days.clear();
    }

    fn prune(&mut self) {
        for slots in self.days.values_mut() {
            slots.retain(|_, recipes| !recipes.is_empty());
        }

        self.days.retain(|_, slots| !slots.is_empty());
    }
}
