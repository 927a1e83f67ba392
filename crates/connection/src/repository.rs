use colloquium_db::table::Connection as ConnectionTable;
use colloquium_shared::connection::ConnectionStatus;
use sea_query::{Cond, Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::{SqliteExecutor, prelude::FromRow};

#[derive(FromRow)]
pub(crate) struct ConnectionRow {
    pub id: String,
    pub requester_id: String,
    pub addressee_id: String,
    pub status: sqlx::types::Text<ConnectionStatus>,
    pub message: Option<String>,
    pub responded_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Clone, Debug, Serialize)]
pub struct Connection {
    pub id: String,
    pub requester_id: String,
    pub addressee_id: String,
    pub status: ConnectionStatus,
    pub message: Option<String>,
    pub responded_at: Option<i64>,
    pub created_at: i64,
}

impl From<ConnectionRow> for Connection {
    fn from(row: ConnectionRow) -> Self {
        Self {
            id: row.id,
            requester_id: row.requester_id,
            addressee_id: row.addressee_id,
            status: row.status.0,
            message: row.message,
            responded_at: row.responded_at,
            created_at: row.created_at,
        }
    }
}

fn columns() -> [ConnectionTable; 7] {
    [
        ConnectionTable::Id,
        ConnectionTable::RequesterId,
        ConnectionTable::AddresseeId,
        ConnectionTable::Status,
        ConnectionTable::Message,
        ConnectionTable::RespondedAt,
        ConnectionTable::CreatedAt,
    ]
}

pub(crate) async fn find<'e>(
    executor: impl SqliteExecutor<'e>,
    id: &str,
) -> colloquium_shared::Result<Option<Connection>> {
    let statement = Query::select()
        .columns(columns())
        .from(ConnectionTable::Table)
        .and_where(Expr::col(ConnectionTable::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, ConnectionRow, _>(&sql, values)
        .fetch_optional(executor)
        .await?
        .map(Connection::from))
}

/// Pending or accepted connection between two users, in either direction.
pub(crate) async fn find_live_between<'e>(
    executor: impl SqliteExecutor<'e>,
    a: &str,
    b: &str,
) -> colloquium_shared::Result<Option<Connection>> {
    let statement = Query::select()
        .columns(columns())
        .from(ConnectionTable::Table)
        .cond_where(
            Cond::any()
                .add(
                    Cond::all()
                        .add(Expr::col(ConnectionTable::RequesterId).eq(a))
                        .add(Expr::col(ConnectionTable::AddresseeId).eq(b)),
                )
                .add(
                    Cond::all()
                        .add(Expr::col(ConnectionTable::RequesterId).eq(b))
                        .add(Expr::col(ConnectionTable::AddresseeId).eq(a)),
                ),
        )
        .and_where(Expr::col(ConnectionTable::Status).is_in([
            ConnectionStatus::Pending.to_string(),
            ConnectionStatus::Accepted.to_string(),
        ]))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, ConnectionRow, _>(&sql, values)
        .fetch_optional(executor)
        .await?
        .map(Connection::from))
}

pub(crate) async fn list_for<'e>(
    executor: impl SqliteExecutor<'e>,
    user_id: &str,
    status: Option<ConnectionStatus>,
) -> colloquium_shared::Result<Vec<Connection>> {
    let mut statement = Query::select()
        .columns(columns())
        .from(ConnectionTable::Table)
        .cond_where(
            Cond::any()
                .add(Expr::col(ConnectionTable::RequesterId).eq(user_id))
                .add(Expr::col(ConnectionTable::AddresseeId).eq(user_id)),
        )
        .order_by(ConnectionTable::CreatedAt, Order::Desc)
        .order_by(ConnectionTable::Id, Order::Desc)
        .to_owned();

    if let Some(status) = status {
        statement.and_where(Expr::col(ConnectionTable::Status).eq(status.as_ref()));
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, ConnectionRow, _>(&sql, values)
        .fetch_all(executor)
        .await?
        .into_iter()
        .map(Connection::from)
        .collect())
}

pub(crate) async fn create<'e>(
    executor: impl SqliteExecutor<'e>,
    connection: &Connection,
) -> colloquium_shared::Result<()> {
    let statement = Query::insert()
        .into_table(ConnectionTable::Table)
        .columns(columns())
        .values_panic([
            connection.id.to_owned().into(),
            connection.requester_id.to_owned().into(),
            connection.addressee_id.to_owned().into(),
            connection.status.to_string().into(),
            connection.message.to_owned().into(),
            connection.responded_at.into(),
            connection.created_at.into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(executor).await?;

    Ok(())
}

pub(crate) async fn respond<'e>(
    executor: impl SqliteExecutor<'e>,
    id: &str,
    status: ConnectionStatus,
    responded_at: i64,
) -> colloquium_shared::Result<bool> {
    let statement = Query::update()
        .table(ConnectionTable::Table)
        .value(ConnectionTable::Status, status.as_ref())
        .value(ConnectionTable::RespondedAt, responded_at)
        .and_where(Expr::col(ConnectionTable::Id).eq(id))
        .and_where(Expr::col(ConnectionTable::Status).eq(ConnectionStatus::Pending.as_ref()))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(executor).await?;

    Ok(result.rows_affected() > 0)
}
