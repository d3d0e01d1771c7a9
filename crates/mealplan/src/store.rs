use mealplanner_shared::mealplan::{Day, WeeklyPlan};
use mealplanner_shared::recipe::{MealType, Recipe};
use mealplanner_shared::{Identity, Storage, load_json, save_json};

/// Returns the persisted weekly plan of a user, empty when none exists yet.
pub async fn load_plan(
    storage: &(impl Storage + ?Sized),
    identity: &Identity,
) -> mealplanner_shared::Result<WeeklyPlan> {
    Ok(load_json(storage, &identity.plan_key())
        .await?
        .unwrap_or_default())
}

/// Weekly plan of one user, persisted whole after every change.
pub struct PlanStore<S: Storage> {
    pub(crate) storage: S,
    pub(crate) identity: Identity,
    pub(crate) plan: WeeklyPlan,
}

impl<S: Storage> PlanStore<S> {
    pub async fn load(storage: S, identity: Identity) -> mealplanner_shared::Result<Self> {
        let plan = load_plan(&storage, &identity).await?;

        tracing::debug!(
            user = identity.user_id(),
            entries = plan.len(),
            "meal plan loaded"
        );

        Ok(Self {
            storage,
            identity,
            plan,
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn plan(&self) -> &WeeklyPlan {
        &self.plan
    }

    pub fn snapshot(&self) -> WeeklyPlan {
        self.plan.clone()
    }

    /// Appends a copy of `recipe` to the slot. Assigning an id the slot
    /// already holds changes nothing and returns `false`.
    pub async fn assign(
        &mut self,
        day: Day,
        meal_type: MealType,
        recipe: &Recipe,
    ) -> mealplanner_shared::Result<bool> {
        if !self.plan.insert(day, meal_type, recipe.clone()) {
            tracing::debug!(
                user = self.identity.user_id(),
                %day,
                %meal_type,
                id = %recipe.id,
                "recipe already in slot"
            );

            return Ok(false);
        }

        self.save().await?;

        tracing::info!(
            user = self.identity.user_id(),
            %day,
            %meal_type,
            id = %recipe.id,
            "recipe assigned"
        );

        Ok(true)
    }

    /// Removes one recipe from the slot, or the whole slot when `recipe_id`
    /// is `None`. Fails with `DayNotFound` when the day holds nothing.
    pub async fn unassign(
        &mut self,
        day: Day,
        meal_type: MealType,
        recipe_id: Option<&str>,
    ) -> mealplanner_shared::Result<bool> {
        let removed = self.plan.remove(day, meal_type, recipe_id)?;

        if removed {
            self.save().await?;

            tracing::info!(
                user = self.identity.user_id(),
                %day,
                %meal_type,
                id = recipe_id,
                "recipe unassigned"
            );
        }

        Ok(removed)
    }

    /// Drops a recipe id from every slot of the week.
    pub async fn cascade_delete_recipe(&mut self, recipe_id: &str) -> mealplanner_shared::Result<bool> {
        if !self.plan.remove_recipe(recipe_id) {
            return Ok(false);
        }

        self.save().await?;

        tracing::info!(
            user = self.identity.user_id(),
            id = recipe_id,
            "recipe removed from meal plan"
        );

        Ok(true)
    }

    pub async fn clear(&mut self) -> mealplanner_shared::Result<()> {
        self.plan.clear();
        self.save().await?;

        tracing::info!(user = self.identity.user_id(), "meal plan cleared");

        Ok(())
    }

    /// Swaps in a whole new plan and persists it in one write.
    pub async fn replace(&mut self, plan: WeeklyPlan) -> mealplanner_shared::Result<()> {
        self.plan = plan;
        self.save().await
    }

    async fn save(&self) -> mealplanner_shared::Result<()> {
        save_json(&self.storage, &self.identity.plan_key(), &self.plan).await
    }
}
