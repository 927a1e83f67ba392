use colloquium_shared::user::Role;

use crate::repository::{self, FindType, UpdateInput};

impl super::Command {
    pub async fn made_admin(&self, id: impl Into<String>) -> colloquium_shared::Result<()> {
        self.set_role(id, Role::Admin).await
    }

    pub async fn set_role(&self, id: impl Into<String>, role: Role) -> colloquium_shared::Result<()> {
        let Some(user) = repository::find(&self.write_db, FindType::Id(id.into())).await? else {
            colloquium_shared::not_found!("user");
        };

        if user.role.0 == role {
            return Ok(());
        }

        repository::update(
            &self.write_db,
            UpdateInput {
                id: user.id.to_owned(),
                role: Some(role),
                ..Default::default()
            },
        )
        .await?;

        tracing::info!(user_id = %user.id, role = %role, "user role changed");

        Ok(())
    }

    /// Makes sure the configured root account exists, is active and is an
    /// admin. Returns its id.
    pub async fn ensure_root(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> colloquium_shared::Result<String> {
        let email = email.into();

        let id = match self.find_by_email(&email).await? {
            Some(user) => user.id,
            None => {
                let id = self
                    .register(super::RegisterInput {
                        email: email.to_owned(),
                        password: password.into(),
                        name: "root".to_owned(),
                        institution: None,
                    })
                    .await?;

                repository::update(
                    &self.write_db,
                    UpdateInput {
                        id: id.to_owned(),
                        account_status: Some(colloquium_shared::user::AccountStatus::Active),
                        clear_verification_token: true,
                        ..Default::default()
                    },
                )
                .await?;

                id
            }
        };

        self.made_admin(&id).await?;

        Ok(id)
    }
}
