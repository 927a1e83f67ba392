use colloquium_db::table::ForumPost;
use colloquium_shared::{
    Actor,
    moderation::{AdminAction, TargetType},
};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

use crate::audit;

impl super::Command {
    pub async fn delete_forum_post(
        &self,
        actor: &Actor,
        post_id: impl Into<String>,
        reason: Option<String>,
    ) -> colloquium_shared::Result<()> {
        actor.ensure_admin()?;

        let post_id = post_id.into();
        let mut tx = self.write_db.begin().await?;

        let statement = Query::delete()
            .from_table(ForumPost::Table)
            .and_where(Expr::col(ForumPost::Id).eq(post_id.to_owned()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        if result.rows_affected() == 0 {
            colloquium_shared::not_found!("forum post");
        }

        audit::append(
            &mut *tx,
            actor,
            AdminAction::PostDelete,
            TargetType::ForumPost,
            &post_id,
            reason,
        )
        .await?;

        tx.commit().await?;

        Ok(())
    }
}
