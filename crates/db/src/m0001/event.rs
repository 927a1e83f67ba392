use sea_query::{
    ColumnDef, Index, IndexCreateStatement, IndexDropStatement, Table, TableCreateStatement,
    TableDropStatement,
};

use crate::table::Event;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(Event::Table)
        .col(
            ColumnDef::new(Event::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(Event::HostId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(Event::Title)
                .string()
                .not_null()
                .string_len(150),
        )
        .col(ColumnDef::new(Event::Description).string().string_len(5000))
        .col(ColumnDef::new(Event::Location).string().not_null().string_len(255))
        .col(ColumnDef::new(Event::PosterPath).string().string_len(255))
        .col(ColumnDef::new(Event::StartDate).big_integer().not_null())
        .col(ColumnDef::new(Event::EndDate).big_integer())
        .col(
            ColumnDef::new(Event::Status)
                .string()
                .not_null()
                .string_len(15),
        )
        .col(
            ColumnDef::new(Event::Visibility)
                .string()
                .not_null()
                .string_len(15),
        )
        .col(ColumnDef::new(Event::Capacity).integer())
        .col(ColumnDef::new(Event::BannedAt).big_integer())
        .col(ColumnDef::new(Event::BannedBy).string().string_len(26))
        .col(ColumnDef::new(Event::BanReason).string().string_len(500))
        .col(ColumnDef::new(Event::ModeratedAt).big_integer())
        .col(ColumnDef::new(Event::ModeratedBy).string().string_len(26))
        .col(ColumnDef::new(Event::DeletedAt).big_integer())
        .col(ColumnDef::new(Event::CreatedAt).big_integer().not_null())
        .col(ColumnDef::new(Event::UpdatedAt).big_integer().not_null())
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(Event::Table).to_owned()
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
        .name("idx_event_k8WmZt")
        .table(Event::Table)
        .col(Event::Status)
        .col(Event::StartDate)
        .to_owned()
}

fn drop_idx_1() -> IndexDropStatement {
    Index::drop()
        .name("idx_event_k8WmZt")
        .table(Event::Table)
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
        .name("idx_event_Jd4nQe")
        .table(Event::Table)
        .col(Event::HostId)
        .to_owned()
}

fn drop_idx_2() -> IndexDropStatement {
    Index::drop()
        .name("idx_event_Jd4nQe")
        .table(Event::Table)
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
