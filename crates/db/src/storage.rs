use mealplanner_shared::Storage;
use sea_query::{Expr, ExprTrait, OnConflict, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqlitePool;
use time::OffsetDateTime;

use crate::table::KvStore;

/// Key/value documents kept in the `kv_store` table.
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl Storage for SqliteStorage {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let statement = Query::select()
            .column(KvStore::Value)
            .from(KvStore::Table)
            .and_where(Expr::col(KvStore::Key).eq(key))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        let row = sqlx::query_as_with::<_, (String,), _>(&sql, values)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(value,)| value))
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let statement = Query::insert()
            .into_table(KvStore::Table)
            .columns([KvStore::Key, KvStore::Value, KvStore::UpdatedAt])
            .values_panic([
                key.into(),
                value.into(),
                OffsetDateTime::now_utc().unix_timestamp().into(),
            ])
            .on_conflict(
                OnConflict::column(KvStore::Key)
                    .update_columns([KvStore::Value, KvStore::UpdatedAt])
                    .to_owned(),
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.pool).await?;

        tracing::debug!(key, "document written");

        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        let statement = Query::delete()
            .from_table(KvStore::Table)
            .and_where(Expr::col(KvStore::Key).eq(key))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.pool).await?;

        Ok(())
    }
}
