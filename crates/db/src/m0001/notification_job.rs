use sea_query::{
    ColumnDef, Index, IndexCreateStatement, IndexDropStatement, Table, TableCreateStatement,
    TableDropStatement,
};

use crate::table::NotificationJob;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(NotificationJob::Table)
        .col(
            ColumnDef::new(NotificationJob::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(NotificationJob::Kind)
                .string()
                .not_null()
                .string_len(50),
        )
        .col(ColumnDef::new(NotificationJob::Payload).text().not_null())
        .col(ColumnDef::new(NotificationJob::DedupKey).string().string_len(120))
        .col(
            ColumnDef::new(NotificationJob::Status)
                .string()
                .not_null()
                .string_len(15),
        )
        .col(
            ColumnDef::new(NotificationJob::AttemptCount)
                .integer()
                .not_null()
                .default(0),
        )
        .col(ColumnDef::new(NotificationJob::LastError).text())
        .col(
            ColumnDef::new(NotificationJob::EnqueuedAt)
                .big_integer()
                .not_null(),
        )
        .col(ColumnDef::new(NotificationJob::RunAt).big_integer().not_null())
        .col(ColumnDef::new(NotificationJob::StartedAt).big_integer())
        .col(ColumnDef::new(NotificationJob::FinishedAt).big_integer())
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(NotificationJob::Table).to_owned()
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
        .name("idx_notification_job_Rm2xVa")
        .table(NotificationJob::Table)
        .col(NotificationJob::Status)
        .col(NotificationJob::RunAt)
        .to_owned()
}

fn drop_idx_1() -> IndexDropStatement {
    Index::drop()
        .name("idx_notification_job_Rm2xVa")
        .table(NotificationJob::Table)
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

pub struct CreateIdx2;

fn create_idx_2() -> IndexCreateStatement {
    Index::create()
        .name("idx_notification_job_Ey8uJb")
        .table(NotificationJob::Table)
        .col(NotificationJob::DedupKey)
        .to_owned()
}

fn drop_idx_2() -> IndexDropStatement {
    Index::drop()
        .name("idx_notification_job_Ey8uJb")
        .table(NotificationJob::Table)
        .to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateIdx2 {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_idx_2().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_idx_2().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
