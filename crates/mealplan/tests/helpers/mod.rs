use mealplanner_mealplan::PlanStore;
use mealplanner_recipe::{builtin_catalog, load_defaults};
use mealplanner_shared::recipe::Recipe;
use mealplanner_shared::{Identity, MemoryStorage, Storage};

pub struct TestState {
    pub storage: MemoryStorage,
    pub defaults: Vec<Recipe>,
}

pub async fn setup_test_state() -> anyhow::Result<TestState> {
    let storage = MemoryStorage::new();
    let defaults = load_defaults(&storage, &builtin_catalog()?).await?;

    Ok(TestState { storage, defaults })
}

pub async fn plan_store(state: &TestState, user: &str) -> anyhow::Result<PlanStore<MemoryStorage>> {
    Ok(PlanStore::load(state.storage.clone(), Identity::resolve(user)?).await?)
}

#[allow(dead_code)]
pub fn find<'a>(state: &'a TestState, name: &str) -> anyhow::Result<&'a Recipe> {
    state
        .defaults
        .iter()
        .find(|recipe| recipe.name == name)
        .ok_or_else(|| anyhow::anyhow!("recipe {name} not in default catalog"))
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
