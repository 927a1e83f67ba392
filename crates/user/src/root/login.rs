use argon2::{Argon2, PasswordHash, PasswordVerifier};
use serde::Deserialize;
use validator::Validate;

use crate::repository::{self, FindType, User};

#[derive(Validate, Deserialize)]
pub struct LoginInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl super::Command {
    pub async fn login(&self, input: LoginInput) -> colloquium_shared::Result<User> {
        input.validate()?;

        let Some(user_row) =
            repository::find(&self.read_db, FindType::Email(input.email.trim().to_owned()))
                .await?
        else {
            colloquium_shared::user!("Invalid email or password. Please try again.");
        };

        let parsed_hash = PasswordHash::new(&user_row.password)?;
        let argon2 = Argon2::default();

        if argon2
            .verify_password(input.password.as_bytes(), &parsed_hash)
            .is_err()
        {
            colloquium_shared::user!("Invalid email or password. Please try again.");
        }

        if user_row.is_banned {
            tracing::warn!(user_id = %user_row.id, "banned user attempted to log in");
            colloquium_shared::user!("Account banned");
        }

        Ok(User::from(user_row))
    }
}
