use mealplanner::Session;
use mealplanner_recipe::builtin_catalog;
use mealplanner_shared::MemoryStorage;
use mealplanner_shared::recipe::{MealType, RawRecipe};

pub async fn setup_session(storage: &MemoryStorage) -> anyhow::Result<Session<MemoryStorage>> {
    Ok(Session::open(storage.clone(), &builtin_catalog()?)
        .await?
        .with_seed(42))
}

pub async fn logged_in(storage: &MemoryStorage, user: &str) -> anyhow::Result<Session<MemoryStorage>> {
    let mut session = setup_session(storage).await?;
    session.login(user).await?;

    Ok(session)
}

#[allow(dead_code)]
pub fn raw_recipe(name: &str, meal_type: MealType) -> RawRecipe {
    let mut raw = RawRecipe::new(name, meal_type);
    raw.prep_time = Some(5);
    raw.servings = Some(2);
    raw.ingredients = Some(vec![]);
    raw
}
