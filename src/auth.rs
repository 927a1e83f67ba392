use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::FromRequestParts,
    http::{Method, request::Parts},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use colloquium_shared::{Actor, Error};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::AuthConfig, error::AppError, routes::AppState};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    exp: u64,
    iat: u64,
    sub: String,
}

pub fn generate_token(config: &AuthConfig, sub: impl Into<String>) -> anyhow::Result<String> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let lifetime = u64::try_from(config.jwt_lifetime_seconds)?;
    let claims = Claims {
        exp: now + lifetime,
        iat: now,
        sub: sub.into(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?;

    Ok(token)
}

fn validate_token(config: &AuthConfig, token: &str) -> Option<String> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims.sub)
    .ok()
}

/// The authenticated caller. Resolved from the database on every request so
/// role changes and bans apply immediately. Banned users are refused on any
/// request that is not a read.
pub struct AuthUser(pub Actor);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError(Error::Unauthorized))?;

        let Some(user_id) = validate_token(&state.config.auth, bearer.token()) else {
            tracing::debug!("invalid or expired token");
            return Err(AppError(Error::Unauthorized));
        };

        let Some(actor) = state.user_command.actor(&user_id).await? else {
            tracing::warn!(user_id = %user_id, "token for unknown user");
            return Err(AppError(Error::Unauthorized));
        };

        if actor.is_banned && !matches!(parts.method, Method::GET | Method::HEAD) {
            tracing::warn!(user_id = %actor.user_id, method = %parts.method, "banned user refused");
            return Err(AppError(Error::Forbidden));
        }

        Ok(AuthUser(actor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test_secret_key_minimum_32_characters_long".to_owned(),
            jwt_lifetime_seconds: 3600,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let config = config();
        let token = generate_token(&config, "01JUSER").unwrap();

        assert_eq!(validate_token(&config, &token).as_deref(), Some("01JUSER"));
    }

    #[test]
    fn test_token_rejected_with_other_secret() {
        let token = generate_token(&config(), "01JUSER").unwrap();
        let other = AuthConfig {
            jwt_secret: "another_secret_key_minimum_32_characters".to_owned(),
            jwt_lifetime_seconds: 3600,
        };

        assert!(validate_token(&other, &token).is_none());
        assert!(validate_token(&config(), "not-a-token").is_none());
    }
}
