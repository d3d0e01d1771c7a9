use std::sync::Arc;

use mealplanner_recipe::{Catalog, builtin_catalog, load_defaults};
use mealplanner_shared::recipe::{MealType, RawRecipe, Recipe};
use mealplanner_shared::{Identity, MemoryStorage, Storage};

pub struct TestState {
    pub storage: MemoryStorage,
    pub defaults: Arc<[Recipe]>,
}

pub async fn setup_test_state() -> anyhow::Result<TestState> {
    let storage = MemoryStorage::new();
    let defaults = load_defaults(&storage, &builtin_catalog()?).await?;

    Ok(TestState {
        storage,
        defaults: defaults.into(),
    })
}

pub async fn catalog(
    state: &TestState,
    user: &str,
) -> anyhow::Result<Catalog<MemoryStorage>> {
    Ok(Catalog::load(
        state.storage.clone(),
        Identity::resolve(user)?,
        state.defaults.clone(),
    )
    .await?)
}

#[allow(dead_code)]
pub fn raw_recipe(name: &str, meal_type: MealType) -> RawRecipe {
    let mut raw = RawRecipe::new(name, meal_type);
    raw.prep_time = Some(10);
    raw.cook_time = Some(20);
    raw.servings = Some(2);
    raw.calories = Some(400);
    raw
}

/// Storage that reads fine but refuses every write.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct ReadOnlyStorage(pub MemoryStorage);

#[async_trait::async_trait]
impl Storage for ReadOnlyStorage {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.0.get(key).await
    }

    async fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
        anyhow::bail!("storage is read-only")
    }

    async fn remove(&self, _key: &str) -> anyhow::Result<()> {
        anyhow::bail!("storage is read-only")
    }
}
