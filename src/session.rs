use std::sync::Arc;

use mealplanner_mealplan::{CookbookEntry, PlanStore};
use mealplanner_recipe::{Catalog, SourceFilter, TypeFilter, load_defaults};
use mealplanner_shared::mealplan::{Day, WeeklyPlan};
use mealplanner_shared::recipe::{MealType, RawRecipe, Recipe};
use mealplanner_shared::{
    Error, Identity, PREMIUM_KEY, Result, Storage, TUTORIAL_SHOWN_KEY, USER_KEY, UserRecord,
    load_json, remove_key, save_json,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

struct ActiveUser<S: Storage> {
    record: UserRecord,
    catalog: Catalog<S>,
    plan: PlanStore<S>,
}

/// Everything one signed-in user works with: the shared default catalog,
/// their personal recipes and their weekly plan.
///
/// Identity scoped operations fail with `InvalidIdentity` until `login`
/// succeeds and again after `logout`.
pub struct Session<S: Storage + Clone> {
    storage: S,
    defaults: Arc<[Recipe]>,
    active: Option<ActiveUser<S>>,
    meal_filter: SourceFilter,
    rng: StdRng,
}

impl<S: Storage + Clone> Session<S> {
    /// Loads (or seeds) the default catalog and restores the last user.
    pub async fn open(storage: S, raw_seed: &[RawRecipe]) -> Result<Self> {
        let defaults = load_defaults(&storage, raw_seed).await?;

        let mut session = Self {
            storage,
            defaults: defaults.into(),
            active: None,
            meal_filter: SourceFilter::default(),
            rng: StdRng::from_os_rng(),
        };

        if let Some(record) = load_json::<UserRecord>(&session.storage, USER_KEY).await? {
            match record.identity() {
                Ok(identity) => session.activate(record, identity).await?,
                Err(_) => tracing::warn!(id = %record.id, "ignoring stored user without a name"),
            }
        }

        Ok(session)
    }

    /// Uses a fixed seed for random plan generation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn defaults(&self) -> &[Recipe] {
        &self.defaults
    }

    pub fn current_user(&self) -> Option<&UserRecord> {
        self.active.as_ref().map(|active| &active.record)
    }

    pub async fn login(&mut self, username: &str) -> Result<&UserRecord> {
        let username = username.trim();
        let identity = Identity::resolve(username)?;

        let created_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|err| Error::Server(err.to_string()))?;
        let record = UserRecord {
            id: username.to_owned(),
            username: username.to_owned(),
            created_at,
        };

        save_json(&self.storage, USER_KEY, &record).await?;
        self.activate(record, identity).await?;

        tracing::info!(user = username, "user logged in");

        self.current_user().ok_or(Error::InvalidIdentity)
    }

    /// Drops the in-memory user state. Persisted recipes and plan stay.
    pub async fn logout(&mut self) -> Result<()> {
        let Some(active) = self.active.take() else {
            return Ok(());
        };

        remove_key(&self.storage, USER_KEY).await?;

        tracing::info!(user = %active.record.username, "user logged out");

        Ok(())
    }

    pub fn meal_filter(&self) -> SourceFilter {
        self.meal_filter
    }

    pub fn set_meal_filter(&mut self, filter: SourceFilter) {
        self.meal_filter = filter;
    }

    /// Merged recipe view, using the session filter when `filter` is `None`.
    /// Without a user only the default catalog is visible.
    pub fn get_all_meals(&self, filter: Option<SourceFilter>) -> Vec<Recipe> {
        let filter = filter.unwrap_or(self.meal_filter);

        match &self.active {
            Some(active) => active.catalog.merged_view(filter),
            None => mealplanner_recipe::merged_view(&self.defaults, &[], filter),
        }
    }

    pub fn query(&self, source: SourceFilter, type_filter: TypeFilter, search: &str) -> Vec<Recipe> {
        match &self.active {
            Some(active) => active.catalog.query(source, type_filter, search),
            None => mealplanner_recipe::query(&self.defaults, &[], source, type_filter, search),
        }
    }

    pub fn find_meal(&self, id: &str) -> Option<&Recipe> {
        match &self.active {
            Some(active) => active.catalog.find(id),
            None => self.defaults.iter().find(|recipe| recipe.id == id),
        }
    }

    pub async fn add_meal(&mut self, input: RawRecipe) -> Result<Recipe> {
        self.active_mut()?.catalog.add(input).await
    }

    /// Replaces a personal recipe. `None` when the id is not personal.
    pub async fn update_meal(&mut self, recipe: Recipe) -> Result<Option<Recipe>> {
        self.active_mut()?.catalog.update(recipe).await
    }

    /// Saves an edited default recipe as a new personal one.
    pub async fn customize_meal(&mut self, recipe: Recipe) -> Result<Option<Recipe>> {
        self.active_mut()?.catalog.fork_default(recipe).await
    }

    /// Deletes a personal recipe and every plan entry with its id.
    pub async fn delete_meal(&mut self, id: &str) -> Result<bool> {
        let active = self.active_mut()?;

        let deleted = active.catalog.delete(id).await?;
        active.plan.cascade_delete_recipe(id).await?;

        Ok(deleted)
    }

    /// Puts a catalog recipe into a plan slot. The id must exist in the
    /// default or personal set of the current user.
    pub async fn update_meal_plan(
        &mut self,
        day: Day,
        meal_type: MealType,
        recipe_id: &str,
    ) -> Result<bool> {
        let active = self.active_mut()?;

        let Some(recipe) = active.catalog.find(recipe_id).cloned() else {
            mealplanner_shared::bail!("recipe {recipe_id} not found");
        };

        active.plan.assign(day, meal_type, &recipe).await
    }

    pub async fn remove_meal_from_plan(
        &mut self,
        day: Day,
        meal_type: MealType,
        recipe_id: Option<&str>,
    ) -> Result<bool> {
        self.active_mut()?
            .plan
            .unassign(day, meal_type, recipe_id)
            .await
    }

    /// Regenerates the whole week from the recipes of `source`.
    pub async fn generate_random_plan(&mut self, source: SourceFilter) -> Result<WeeklyPlan> {
        let Some(active) = self.active.as_mut() else {
            mealplanner_shared::invalid_identity!();
        };

        let pool = active.catalog.merged_view(source);
        active.plan.generate(&pool, &mut self.rng).await?;

        Ok(active.plan.snapshot())
    }

    pub async fn clear_plan(&mut self) -> Result<()> {
        self.active_mut()?.plan.clear().await
    }

    pub fn plan_snapshot(&self) -> Result<WeeklyPlan> {
        self.active
            .as_ref()
            .map(|active| active.plan.snapshot())
            .ok_or(Error::InvalidIdentity)
    }

    /// Personal recipes of the current user as cookbook pages.
    pub fn cookbook(&self) -> Result<Vec<CookbookEntry>> {
        self.active
            .as_ref()
            .map(|active| mealplanner_mealplan::cookbook(active.catalog.personal()))
            .ok_or(Error::InvalidIdentity)
    }

    pub async fn tutorial_shown(&self) -> Result<bool> {
        Ok(load_json(&self.storage, TUTORIAL_SHOWN_KEY)
            .await?
            .unwrap_or_default())
    }

    pub async fn mark_tutorial_shown(&self) -> Result<()> {
        save_json(&self.storage, TUTORIAL_SHOWN_KEY, &true).await
    }

    /// Process wide flag, shared by every user of this storage.
    pub async fn premium(&self) -> Result<bool> {
        Ok(load_json(&self.storage, PREMIUM_KEY)
            .await?
            .unwrap_or_default())
    }

    pub async fn set_premium(&self, premium: bool) -> Result<()> {
        save_json(&self.storage, PREMIUM_KEY, &premium).await?;

        tracing::info!(premium, "premium state changed");

        Ok(())
    }

    pub async fn clear_premium(&self) -> Result<()> {
        remove_key(&self.storage, PREMIUM_KEY).await
    }

    async fn activate(&mut self, record: UserRecord, identity: Identity) -> Result<()> {
        let catalog =
            Catalog::load(self.storage.clone(), identity.clone(), self.defaults.clone()).await?;
        let plan = PlanStore::load(self.storage.clone(), identity).await?;

        self.active = Some(ActiveUser {
            record,
            catalog,
            plan,
        });

        Ok(())
    }

    fn active_mut(&mut self) -> Result<&mut ActiveUser<S>> {
        self.active.as_mut().ok_or(Error::InvalidIdentity)
    }
}
