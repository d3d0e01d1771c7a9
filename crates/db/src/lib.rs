use sqlx::SqlitePool;
use sqlx_migrator::migrator::{Info, Migrate, Migrator, Plan};

mod m0_1;
mod storage;
pub mod table;

pub use storage::SqliteStorage;

pub fn migrator() -> Result<Migrator<sqlx::Sqlite>, sqlx_migrator::Error> {
    let mut migrator = Migrator::default();
    migrator.add_migrations(vec![Box::new(m0_1::Migration)])?;

    Ok(migrator)
}

/// Applies every pending migration on one pooled connection.
pub async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    let mut conn = pool.acquire().await?;
    migrator()?.run(&mut *conn, &Plan::apply_all()).await?;

    Ok(())
}
