use colloquium_db::table::{Event, Registration, User};
use colloquium_shared::event::{EventStatus, RegistrationStatus};
use colloquium_shared::user::Role;
use sea_query::{Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow};

#[derive(Clone, Debug, FromRow)]
pub struct Recipient {
    pub id: String,
    pub email: String,
    pub name: String,
    pub verification_token: Option<String>,
}

#[derive(Clone, Debug, FromRow)]
pub struct EventRow {
    pub id: String,
    pub host_id: String,
    pub title: String,
    pub location: String,
    pub poster_path: Option<String>,
    pub start_date: i64,
    pub status: sqlx::types::Text<EventStatus>,
    pub deleted_at: Option<i64>,
}

impl EventRow {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none() && self.status.0.is_active()
    }
}

pub(crate) async fn find_recipient(
    pool: &SqlitePool,
    id: &str,
) -> colloquium_shared::Result<Option<Recipient>> {
    let statement = Query::select()
        .columns([User::Id, User::Email, User::Name, User::VerificationToken])
        .from(User::Table)
        .and_where(Expr::col(User::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, Recipient, _>(&sql, values)
        .fetch_optional(pool)
        .await?)
}

pub(crate) async fn admins(pool: &SqlitePool) -> colloquium_shared::Result<Vec<Recipient>> {
    let statement = Query::select()
        .columns([User::Id, User::Email, User::Name, User::VerificationToken])
        .from(User::Table)
        .and_where(Expr::col(User::Role).eq(Role::Admin.as_ref()))
        .and_where(Expr::col(User::IsBanned).eq(false))
        .order_by(User::CreatedAt, Order::Asc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, Recipient, _>(&sql, values)
        .fetch_all(pool)
        .await?)
}

pub(crate) async fn has_admin(pool: &SqlitePool) -> colloquium_shared::Result<bool> {
    let statement = Query::select()
        .column(User::Id)
        .from(User::Table)
        .and_where(Expr::col(User::Role).eq(Role::Admin.as_ref()))
        .and_where(Expr::col(User::IsBanned).eq(false))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, (String,), _>(&sql, values)
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}

fn event_columns() -> [Event; 8] {
    [
        Event::Id,
        Event::HostId,
        Event::Title,
        Event::Location,
        Event::PosterPath,
        Event::StartDate,
        Event::Status,
        Event::DeletedAt,
    ]
}

pub(crate) async fn find_event(
    pool: &SqlitePool,
    id: &str,
) -> colloquium_shared::Result<Option<EventRow>> {
    let statement = Query::select()
        .columns(event_columns())
        .from(Event::Table)
        .and_where(Expr::col(Event::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, EventRow, _>(&sql, values)
        .fetch_optional(pool)
        .await?)
}

/// Published, non-deleted events whose start falls in `[from, to]`.
pub(crate) async fn published_starting_between(
    pool: &SqlitePool,
    from: i64,
    to: i64,
) -> colloquium_shared::Result<Vec<EventRow>> {
    let statement = Query::select()
        .columns(event_columns())
        .from(Event::Table)
        .and_where(Expr::col(Event::Status).eq(EventStatus::Published.as_ref()))
        .and_where(Expr::col(Event::DeletedAt).is_null())
        .and_where(Expr::col(Event::StartDate).gte(from))
        .and_where(Expr::col(Event::StartDate).lte(to))
        .order_by(Event::StartDate, Order::Asc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, EventRow, _>(&sql, values)
        .fetch_all(pool)
        .await?)
}

pub(crate) async fn registered_user_ids(
    pool: &SqlitePool,
    event_id: &str,
) -> colloquium_shared::Result<Vec<String>> {
    let statement = Query::select()
        .column(Registration::UserId)
        .from(Registration::Table)
        .and_where(Expr::col(Registration::EventId).eq(event_id))
        .and_where(Expr::col(Registration::Status).eq(RegistrationStatus::Registered.as_ref()))
        .order_by(Registration::RegisteredAt, Order::Asc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_scalar_with::<_, String, _>(&sql, values)
        .fetch_all(pool)
        .await?)
}

pub(crate) async fn registration_status(
    pool: &SqlitePool,
    event_id: &str,
    user_id: &str,
) -> colloquium_shared::Result<Option<RegistrationStatus>> {
    let statement = Query::select()
        .column(Registration::Status)
        .from(Registration::Table)
        .and_where(Expr::col(Registration::EventId).eq(event_id))
        .and_where(Expr::col(Registration::UserId).eq(user_id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, (sqlx::types::Text<RegistrationStatus>,), _>(&sql, values)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|(status,)| status.0))
}
