use std::collections::HashSet;

use mealplanner_shared::Storage;
use mealplanner_shared::mealplan::{Day, WeeklyPlan};
use mealplanner_shared::recipe::{MealType, Recipe};
use rand::Rng;
use rand::seq::IndexedRandom;
use strum::VariantArray;

use crate::PlanStore;

/// Builds a full week from `pool`, one recipe per day and meal type.
///
/// Each meal type draws from its own part of the pool without repeating a
/// recipe until that part is exhausted. A meal type with no recipes stays
/// empty for the whole week. Fails with `EmptyPool` only when no meal type
/// has any recipe.
pub fn generate_plan(pool: &[Recipe], rng: &mut impl Rng) -> mealplanner_shared::Result<WeeklyPlan> {
    let mut plan = WeeklyPlan::new();

    for meal_type in MealType::VARIANTS {
        let candidates = pool
            .iter()
            .filter(|recipe| recipe.meal_type == *meal_type)
            .collect::<Vec<_>>();

        if candidates.is_empty() {
            tracing::debug!(%meal_type, "no recipes to pick from");

            continue;
        }

        let all_ids = candidates
            .iter()
            .map(|recipe| recipe.id.as_str())
            .collect::<HashSet<_>>();
        let mut used = HashSet::new();

        for day in Day::VARIANTS {
            let exhausted = all_ids.is_subset(&used);
            let fresh = candidates
                .iter()
                .filter(|recipe| exhausted || !used.contains(recipe.id.as_str()))
                .copied()
                .collect::<Vec<_>>();

            let Some(recipe) = fresh.choose(rng).copied() else {
                continue;
            };

            used.insert(recipe.id.as_str());
            plan.set_slot(*day, *meal_type, vec![recipe.clone()]);
        }
    }

    if plan.is_empty() {
        return Err(mealplanner_shared::Error::EmptyPool);
    }

    Ok(plan)
}

impl<S: Storage> PlanStore<S> {
    /// Regenerates the whole week from `pool` and persists it once. The
    /// current plan is kept when the pool has nothing to offer.
    pub async fn generate(
        &mut self,
        pool: &[Recipe],
        rng: &mut impl Rng,
    ) -> mealplanner_shared::Result<()> {
        let plan = match generate_plan(pool, rng) {
            Ok(plan) => plan,
            Err(err) => {
                tracing::warn!(
                    user = self.identity.user_id(),
                    pool = pool.len(),
                    error = %err,
                    "meal plan generation skipped"
                );

                return Err(err);
            }
        };

        self.replace(plan).await?;

        tracing::info!(
            user = self.identity.user_id(),
            pool = pool.len(),
            entries = self.plan.len(),
            "meal plan generated"
        );

        Ok(())
    }
}
