use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use colloquium_shared::now;
use serde::Deserialize;
use ulid::Ulid;
use validator::Validate;

use crate::repository::{self, CreateInput, FindType};

#[derive(Validate, Deserialize)]
pub struct RegisterInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 64))]
    pub password: String,
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(length(max = 100))]
    pub institution: Option<String>,
}

impl super::Command {
    pub async fn register(&self, input: RegisterInput) -> colloquium_shared::Result<String> {
        input.validate()?;

        let email = input.email.trim().to_lowercase();
        if repository::find(&self.read_db, FindType::Email(email.to_owned()))
            .await?
            .is_some()
        {
            colloquium_shared::user!("Email already exists");
        }

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(input.password.as_bytes(), &salt)?
            .to_string();

        let id = Ulid::new().to_string();
        let created = repository::create(
            &self.write_db,
            CreateInput {
                id: id.to_owned(),
                email,
                name: input.name.trim().to_owned(),
                password: password_hash,
                verification_token: Ulid::new().to_string(),
                institution: input.institution,
                now: now(),
            },
        )
        .await;

        if let Err(colloquium_shared::Error::Persistence(err)) = &created
            && err
                .as_database_error()
                .is_some_and(|err| err.is_unique_violation())
        {
            colloquium_shared::user!("Email already exists");
        }
        created?;

        tracing::info!(user_id = %id, "user registered");

        if let Err(err) = self.dispatcher.email_verification(&id).await {
            tracing::error!(user_id = %id, err = %err, "failed to enqueue email verification");
        }

        Ok(id)
    }
}
