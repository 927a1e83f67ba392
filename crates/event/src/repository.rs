use colloquium_db::table::Event as EventTable;
use colloquium_shared::event::{EventStatus, Visibility};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::{SqliteExecutor, prelude::FromRow};

#[derive(FromRow)]
pub(crate) struct EventRow {
    pub id: String,
    pub host_id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub poster_path: Option<String>,
    pub start_date: i64,
    pub end_date: Option<i64>,
    pub status: sqlx::types::Text<EventStatus>,
    pub visibility: sqlx::types::Text<Visibility>,
    pub capacity: Option<i64>,
    pub banned_at: Option<i64>,
    pub banned_by: Option<String>,
    pub ban_reason: Option<String>,
    pub moderated_at: Option<i64>,
    pub moderated_by: Option<String>,
    pub deleted_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Clone, Debug, Serialize)]
pub struct Event {
    pub id: String,
    pub host_id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub poster_path: Option<String>,
    pub start_date: i64,
    pub end_date: Option<i64>,
    pub status: EventStatus,
    pub visibility: Visibility,
    pub capacity: Option<i64>,
    pub banned_at: Option<i64>,
    pub banned_by: Option<String>,
    pub ban_reason: Option<String>,
    pub moderated_at: Option<i64>,
    pub moderated_by: Option<String>,
    pub deleted_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Event {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            host_id: row.host_id,
            title: row.title,
            description: row.description,
            location: row.location,
            poster_path: row.poster_path,
            start_date: row.start_date,
            end_date: row.end_date,
            status: row.status.0,
            visibility: row.visibility.0,
            capacity: row.capacity,
            banned_at: row.banned_at,
            banned_by: row.banned_by,
            ban_reason: row.ban_reason,
            moderated_at: row.moderated_at,
            moderated_by: row.moderated_by,
            deleted_at: row.deleted_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn columns() -> [EventTable; 19] {
    [
        EventTable::Id,
        EventTable::HostId,
        EventTable::Title,
        EventTable::Description,
        EventTable::Location,
        EventTable::PosterPath,
        EventTable::StartDate,
        EventTable::EndDate,
        EventTable::Status,
        EventTable::Visibility,
        EventTable::Capacity,
        EventTable::BannedAt,
        EventTable::BannedBy,
        EventTable::BanReason,
        EventTable::ModeratedAt,
        EventTable::ModeratedBy,
        EventTable::DeletedAt,
        EventTable::CreatedAt,
        EventTable::UpdatedAt,
    ]
}

/// Loads an event, soft-deleted ones included, inside or outside a
/// transaction.
pub async fn find_event<'e>(
    executor: impl SqliteExecutor<'e>,
    id: impl Into<String>,
) -> colloquium_shared::Result<Option<Event>> {
    let id: String = id.into();
    let statement = Query::select()
        .columns(columns())
        .from(EventTable::Table)
        .and_where(Expr::col(EventTable::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, EventRow, _>(&sql, values)
        .fetch_optional(executor)
        .await?
        .map(Event::from))
}

pub(crate) async fn create<'e>(
    executor: impl SqliteExecutor<'e>,
    event: &Event,
) -> colloquium_shared::Result<()> {
    let statement = Query::insert()
        .into_table(EventTable::Table)
        .columns([
            EventTable::Id,
            EventTable::HostId,
            EventTable::Title,
            EventTable::Description,
            EventTable::Location,
            EventTable::PosterPath,
            EventTable::StartDate,
            EventTable::EndDate,
            EventTable::Status,
            EventTable::Visibility,
            EventTable::Capacity,
            EventTable::CreatedAt,
            EventTable::UpdatedAt,
        ])
        .values_panic([
            event.id.to_owned().into(),
            event.host_id.to_owned().into(),
            event.title.to_owned().into(),
            event.description.to_owned().into(),
            event.location.to_owned().into(),
            event.poster_path.to_owned().into(),
            event.start_date.into(),
            event.end_date.into(),
            event.status.to_string().into(),
            event.visibility.to_string().into(),
            event.capacity.into(),
            event.created_at.into(),
            event.updated_at.into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(executor).await?;

    Ok(())
}

#[derive(Default)]
pub(crate) struct UpdateInput {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub poster_path: Option<String>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub visibility: Option<Visibility>,
    pub capacity: Option<i64>,
    pub status: Option<EventStatus>,
    pub deleted_at: Option<i64>,
    pub now: i64,
}

pub(crate) async fn update<'e>(
    executor: impl SqliteExecutor<'e>,
    input: UpdateInput,
) -> colloquium_shared::Result<()> {
    let mut statement = Query::update()
        .table(EventTable::Table)
        .value(EventTable::UpdatedAt, input.now)
        .and_where(Expr::col(EventTable::Id).eq(input.id))
        .to_owned();

    if let Some(title) = input.title {
        statement.value(EventTable::Title, title);
    }

    if let Some(description) = input.description {
        statement.value(EventTable::Description, description);
    }

    if let Some(location) = input.location {
        statement.value(EventTable::Location, location);
    }

    if let Some(poster_path) = input.poster_path {
        statement.value(EventTable::PosterPath, poster_path);
    }

    if let Some(start_date) = input.start_date {
        statement.value(EventTable::StartDate, start_date);
    }

    if let Some(end_date) = input.end_date {
        statement.value(EventTable::EndDate, end_date);
    }

    if let Some(visibility) = input.visibility {
        statement.value(EventTable::Visibility, visibility.as_ref());
    }

    if let Some(capacity) = input.capacity {
        statement.value(EventTable::Capacity, capacity);
    }

    if let Some(status) = input.status {
        statement.value(EventTable::Status, status.as_ref());
    }

    if let Some(deleted_at) = input.deleted_at {
        statement.value(EventTable::DeletedAt, deleted_at);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(executor).await?;

    Ok(())
}
