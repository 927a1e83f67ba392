use colloquium_db::table::Registration as RegistrationTable;
use colloquium_shared::event::RegistrationStatus;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::{SqliteExecutor, prelude::FromRow};

#[derive(FromRow)]
pub(crate) struct RegistrationRow {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub status: sqlx::types::Text<RegistrationStatus>,
    pub notes: Option<String>,
    pub registered_at: i64,
}

#[derive(Clone, Debug, Serialize)]
pub struct Registration {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub status: RegistrationStatus,
    pub notes: Option<String>,
    pub registered_at: i64,
}

impl From<RegistrationRow> for Registration {
    fn from(row: RegistrationRow) -> Self {
        Self {
            id: row.id,
            event_id: row.event_id,
            user_id: row.user_id,
            status: row.status.0,
            notes: row.notes,
            registered_at: row.registered_at,
        }
    }
}

pub(crate) async fn find<'e>(
    executor: impl SqliteExecutor<'e>,
    event_id: &str,
    user_id: &str,
) -> colloquium_shared::Result<Option<Registration>> {
    let statement = Query::select()
        .columns([
            RegistrationTable::Id,
            RegistrationTable::EventId,
            RegistrationTable::UserId,
            RegistrationTable::Status,
            RegistrationTable::Notes,
            RegistrationTable::RegisteredAt,
        ])
        .from(RegistrationTable::Table)
        .and_where(Expr::col(RegistrationTable::EventId).eq(event_id))
        .and_where(Expr::col(RegistrationTable::UserId).eq(user_id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, RegistrationRow, _>(&sql, values)
        .fetch_optional(executor)
        .await?
        .map(Registration::from))
}

pub(crate) async fn count_registered<'e>(
    executor: impl SqliteExecutor<'e>,
    event_id: &str,
) -> colloquium_shared::Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"SELECT COUNT(*) FROM "registration" WHERE "event_id" = ? AND "status" = ?"#,
    )
    .bind(event_id)
    .bind(RegistrationStatus::Registered.as_ref())
    .fetch_one(executor)
    .await?;

    Ok(count)
}

pub(crate) async fn create<'e>(
    executor: impl SqliteExecutor<'e>,
    registration: &Registration,
) -> colloquium_shared::Result<()> {
    let statement = Query::insert()
        .into_table(RegistrationTable::Table)
        .columns([
            RegistrationTable::Id,
            RegistrationTable::EventId,
            RegistrationTable::UserId,
            RegistrationTable::Status,
            RegistrationTable::Notes,
            RegistrationTable::RegisteredAt,
        ])
        .values_panic([
            registration.id.to_owned().into(),
            registration.event_id.to_owned().into(),
            registration.user_id.to_owned().into(),
            registration.status.to_string().into(),
            registration.notes.to_owned().into(),
            registration.registered_at.into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(executor).await?;

    Ok(())
}

/// Deletes the row whatever its status. Returns whether a row was removed.
pub(crate) async fn delete<'e>(
    executor: impl SqliteExecutor<'e>,
    event_id: &str,
    user_id: &str,
    status: Option<RegistrationStatus>,
) -> colloquium_shared::Result<bool> {
    let mut statement = Query::delete()
        .from_table(RegistrationTable::Table)
        .and_where(Expr::col(RegistrationTable::EventId).eq(event_id))
        .and_where(Expr::col(RegistrationTable::UserId).eq(user_id))
        .to_owned();

    if let Some(status) = status {
        statement.and_where(Expr::col(RegistrationTable::Status).eq(status.as_ref()));
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(executor).await?;

    Ok(result.rows_affected() > 0)
}
