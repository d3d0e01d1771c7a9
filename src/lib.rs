pub mod config;
pub mod db;
pub mod observability;
pub mod session;

use mealplanner_db::SqliteStorage;
use mealplanner_shared::recipe::RawRecipe;

pub use session::Session;

/// Raw default recipes from the configured seed file, or the built-in list.
pub fn raw_seed(catalog: &config::CatalogConfig) -> anyhow::Result<Vec<RawRecipe>> {
    match catalog.seed_path.as_deref() {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            mealplanner_recipe::parse_catalog(&raw)
        }
        None => mealplanner_recipe::builtin_catalog(),
    }
}

/// Opens the database, applies pending migrations and restores the session.
pub async fn open_session(config: &config::Config) -> anyhow::Result<Session<SqliteStorage>> {
    let pool = db::create_pool(&config.database.url, config.database.max_connections).await?;
    mealplanner_db::migrate(&pool).await?;

    let seed = raw_seed(&config.catalog)?;
    let session = Session::open(SqliteStorage::new(pool), &seed).await?;

    Ok(match config.generator.seed {
        Some(seed) => session.with_seed(seed),
        None => session,
    })
}
