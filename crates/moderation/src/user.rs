use colloquium_db::table::User as UserTable;
use colloquium_shared::{
    Actor,
    moderation::{AdminAction, TargetType},
};
use colloquium_user::User;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

use crate::audit;

impl super::Command {
    /// Flips the ban state of a user: bans with `reason` when unbanned,
    /// unbans and clears the reason otherwise. Logged on every call.
    pub async fn ban_user(
        &self,
        actor: &Actor,
        user_id: impl Into<String>,
        reason: Option<String>,
    ) -> colloquium_shared::Result<User> {
        actor.ensure_admin()?;

        let mut tx = self.write_db.begin().await?;

        let Some(mut user) = colloquium_user::find_user(&mut *tx, user_id).await? else {
            colloquium_shared::not_found!("user");
        };

        let is_banned = !user.is_banned;
        let ban_reason = if is_banned { reason } else { None };

        let statement = Query::update()
            .table(UserTable::Table)
            .value(UserTable::IsBanned, is_banned)
            .value(UserTable::BanReason, ban_reason.to_owned())
            .and_where(Expr::col(UserTable::Id).eq(user.id.to_owned()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        audit::append(
            &mut *tx,
            actor,
            AdminAction::UserBan,
            TargetType::User,
            &user.id,
            ban_reason.to_owned(),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(user_id = %user.id, is_banned, "user ban toggled");

        user.is_banned = is_banned;
        user.ban_reason = ban_reason;

        Ok(user)
    }
}
