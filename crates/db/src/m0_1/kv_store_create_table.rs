use sea_query::{ColumnDef, Table, TableCreateStatement, TableDropStatement};

use crate::table::KvStore;

pub struct Operation;

fn up_statement() -> TableCreateStatement {
    Table::create()
        .table(KvStore::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(KvStore::Key)
                .string()
                .not_null()
                .primary_key(),
        )
        .col(ColumnDef::new(KvStore::Value).text().not_null())
        .col(
            ColumnDef::new(KvStore::UpdatedAt)
                .big_integer()
                .not_null()
                .default(0),
        )
        .to_owned()
}

fn down_statement() -> TableDropStatement {
    Table::drop().table(KvStore::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for Operation {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = up_statement().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = down_statement().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
