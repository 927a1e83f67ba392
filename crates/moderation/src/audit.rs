use colloquium_db::table::AdminLog as AdminLogTable;
use colloquium_shared::{
    Actor,
    moderation::{AdminAction, TargetType},
    now,
};
use sea_query::{Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::{SqliteExecutor, prelude::FromRow};
use ulid::Ulid;

#[derive(FromRow)]
struct AdminLogRow {
    id: String,
    admin_id: String,
    action: sqlx::types::Text<AdminAction>,
    target_type: sqlx::types::Text<TargetType>,
    target_id: String,
    reason: Option<String>,
    created_at: i64,
}

#[derive(Clone, Debug, Serialize)]
pub struct AdminLog {
    pub id: String,
    pub admin_id: String,
    pub action: AdminAction,
    pub target_type: TargetType,
    pub target_id: String,
    pub reason: Option<String>,
    pub created_at: i64,
}

impl From<AdminLogRow> for AdminLog {
    fn from(row: AdminLogRow) -> Self {
        Self {
            id: row.id,
            admin_id: row.admin_id,
            action: row.action.0,
            target_type: row.target_type.0,
            target_id: row.target_id,
            reason: row.reason,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct LogFilter {
    pub target_type: Option<TargetType>,
    pub target_id: Option<String>,
    pub limit: Option<u64>,
}

/// Appends one entry. Entries are never updated or deleted.
pub(crate) async fn append<'e>(
    executor: impl SqliteExecutor<'e>,
    actor: &Actor,
    action: AdminAction,
    target_type: TargetType,
    target_id: &str,
    reason: Option<String>,
) -> colloquium_shared::Result<()> {
    let statement = Query::insert()
        .into_table(AdminLogTable::Table)
        .columns([
            AdminLogTable::Id,
            AdminLogTable::AdminId,
            AdminLogTable::Action,
            AdminLogTable::TargetType,
            AdminLogTable::TargetId,
            AdminLogTable::Reason,
            AdminLogTable::CreatedAt,
        ])
        .values_panic([
            Ulid::new().to_string().into(),
            actor.user_id.to_owned().into(),
            action.to_string().into(),
            target_type.to_string().into(),
            target_id.into(),
            reason.into(),
            now().into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(executor).await?;

    tracing::info!(
        admin_id = %actor.user_id,
        action = %action,
        target_type = %target_type,
        target_id = %target_id,
        "moderation action recorded"
    );

    Ok(())
}

impl super::Command {
    /// Audit entries, newest first.
    pub async fn list_logs(
        &self,
        actor: &Actor,
        filter: LogFilter,
    ) -> colloquium_shared::Result<Vec<AdminLog>> {
        actor.ensure_admin()?;

        let mut statement = Query::select()
            .columns([
                AdminLogTable::Id,
                AdminLogTable::AdminId,
                AdminLogTable::Action,
                AdminLogTable::TargetType,
                AdminLogTable::TargetId,
                AdminLogTable::Reason,
                AdminLogTable::CreatedAt,
            ])
            .from(AdminLogTable::Table)
            .order_by(AdminLogTable::CreatedAt, Order::Desc)
            .order_by(AdminLogTable::Id, Order::Desc)
            .limit(Ord::min(filter.limit.unwrap_or(100), 500))
            .to_owned();

        if let Some(target_type) = filter.target_type {
            statement.and_where(Expr::col(AdminLogTable::TargetType).eq(target_type.as_ref()));
        }

        if let Some(target_id) = filter.target_id {
            statement.and_where(Expr::col(AdminLogTable::TargetId).eq(target_id));
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, AdminLogRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?
            .into_iter()
            .map(AdminLog::from)
            .collect())
    }
}
