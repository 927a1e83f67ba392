use crate::repository::{self, FindType, UpdateInput};

impl super::Command {
    /// Bans an account outside of moderation, e.g. from the command line.
    /// Moderators go through the audited toggle instead.
    pub async fn suspend(
        &self,
        id: impl Into<String>,
        reason: Option<String>,
    ) -> colloquium_shared::Result<()> {
        let Some(user) = repository::find(&self.write_db, FindType::Id(id.into())).await? else {
            colloquium_shared::not_found!("user");
        };

        if user.is_banned {
            return Ok(());
        }

        repository::update(
            &self.write_db,
            UpdateInput {
                id: user.id.to_owned(),
                ban: Some((true, reason)),
                ..Default::default()
            },
        )
        .await?;

        tracing::info!(user_id = %user.id, "user suspended");

        Ok(())
    }

    pub async fn activate(&self, id: impl Into<String>) -> colloquium_shared::Result<()> {
        let Some(user) = repository::find(&self.write_db, FindType::Id(id.into())).await? else {
            colloquium_shared::not_found!("user");
        };

        if !user.is_banned {
            return Ok(());
        }

        repository::update(
            &self.write_db,
            UpdateInput {
                id: user.id.to_owned(),
                ban: Some((false, None)),
                ..Default::default()
            },
        )
        .await?;

        tracing::info!(user_id = %user.id, "user reactivated");

        Ok(())
    }
}
