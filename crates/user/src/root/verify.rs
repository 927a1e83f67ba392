use colloquium_shared::user::AccountStatus;

use crate::repository::{self, FindType, UpdateInput};

impl super::Command {
    /// Activates the account holding `token`. Tokens are single use.
    pub async fn verify(&self, token: impl Into<String>) -> colloquium_shared::Result<String> {
        let Some(user) =
            repository::find(&self.write_db, FindType::VerificationToken(token.into())).await?
        else {
            colloquium_shared::user!("Invalid or expired verification link");
        };

        repository::update(
            &self.write_db,
            UpdateInput {
                id: user.id.to_owned(),
                account_status: Some(AccountStatus::Active),
                clear_verification_token: true,
                ..Default::default()
            },
        )
        .await?;

        tracing::info!(user_id = %user.id, "email verified");

        Ok(user.id)
    }
}
