#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validate(#[from] validator::ValidationErrors),

    #[error("authentication required")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    User(String),

    #[error("You cannot register for your own event")]
    SelfRegistration,

    #[error("Event is full")]
    EventFull,

    #[error("You are already registered for this event")]
    DuplicateRegistration,

    #[error("Event is not open for registration")]
    EventNotActive,

    #[error("You are not registered for this event")]
    NotRegistered,

    #[error("Event is already banned.")]
    AlreadyBanned,

    #[error("Event is not banned.")]
    NotBanned,

    #[error("Event has been banned by a moderator")]
    EventBanned,

    #[error("persistence failure: {0}")]
    Persistence(#[from] sqlx::Error),

    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Unknown(#[from] anyhow::Error),
}

impl Error {
    /// Client errors carry a message meant for the caller; everything else
    /// stays server-side.
    pub fn is_client(&self) -> bool {
        !matches!(
            self,
            Error::Persistence(_) | Error::Server(_) | Error::Unknown(_)
        )
    }

    pub fn code(&self) -> &'static str {
        match self {
            Error::Validate(_) => "validation_failed",
            Error::Unauthorized => "unauthorized",
            Error::Forbidden => "forbidden",
            Error::NotFound(_) => "not_found",
            Error::User(_) => "bad_request",
            Error::SelfRegistration => "self_registration",
            Error::EventFull => "event_full",
            Error::DuplicateRegistration => "duplicate_registration",
            Error::EventNotActive => "event_not_active",
            Error::NotRegistered => "not_registered",
            Error::AlreadyBanned => "already_banned",
            Error::NotBanned => "not_banned",
            Error::EventBanned => "event_banned",
            Error::Persistence(_) => "persistence_error",
            Error::Server(_) | Error::Unknown(_) => "internal_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<argon2::password_hash::Error> for Error {
    fn from(value: argon2::password_hash::Error) -> Self {
        Self::Unknown(anyhow::anyhow!(value))
    }
}

impl From<std::time::SystemTimeError> for Error {
    fn from(value: std::time::SystemTimeError) -> Self {
        Self::Unknown(value.into())
    }
}

#[macro_export]
macro_rules! user {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::User(format!($msg)))
    };
    ($err:expr $(,)?) => {
        return Err($crate::Error::User(format!($err)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::Error::User(format!($fmt, $($arg)*)))
    };
}

#[macro_export]
macro_rules! not_found {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::NotFound(format!($msg)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::Error::NotFound(format!($fmt, $($arg)*)))
    };
}

#[macro_export]
macro_rules! server {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::Server(format!($msg)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::Error::Server(format!($fmt, $($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_not_server_errors() {
        assert!(Error::EventFull.is_client());
        assert!(Error::NotFound("event".to_owned()).is_client());
        assert!(!Error::Server("boom".to_owned()).is_client());
        assert!(!Error::Persistence(sqlx::Error::RowNotFound).is_client());
    }

    #[test]
    fn messages_match_api_contract() {
        assert_eq!(Error::EventFull.to_string(), "Event is full");
        assert_eq!(Error::AlreadyBanned.to_string(), "Event is already banned.");
        assert_eq!(
            Error::NotFound("event".to_owned()).to_string(),
            "event not found"
        );
    }
}
