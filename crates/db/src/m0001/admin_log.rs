use sea_query::{
    ColumnDef, Index, IndexCreateStatement, IndexDropStatement, Table, TableCreateStatement,
    TableDropStatement,
};

use crate::table::AdminLog;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(AdminLog::Table)
        .col(
            ColumnDef::new(AdminLog::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(AdminLog::AdminId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(AdminLog::Action)
                .string()
                .not_null()
                .string_len(20),
        )
        .col(
            ColumnDef::new(AdminLog::TargetType)
                .string()
                .not_null()
                .string_len(20),
        )
        .col(
            ColumnDef::new(AdminLog::TargetId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(ColumnDef::new(AdminLog::Reason).string().string_len(500))
        .col(ColumnDef::new(AdminLog::CreatedAt).big_integer().not_null())
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(AdminLog::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateTable {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}

pub struct CreateIdx1;

fn create_idx_1() -> IndexCreateStatement {
    Index::create()
        .name("idx_admin_log_Fs9dKo")
        .table(AdminLog::Table)
        .col(AdminLog::TargetType)
        .col(AdminLog::TargetId)
        .to_owned()
}

fn drop_idx_1() -> IndexDropStatement {
    Index::drop()
        .name("idx_admin_log_Fs9dKo")
        .table(AdminLog::Table)
        .to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateIdx1 {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_idx_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_idx_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
