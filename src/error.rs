use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// HTTP face of [`colloquium_shared::Error`].
#[derive(Debug)]
pub struct AppError(pub colloquium_shared::Error);

pub type AppResult<T> = Result<T, AppError>;

impl<E> From<E> for AppError
where
    E: Into<colloquium_shared::Error>,
{
    fn from(value: E) -> Self {
        Self(value.into())
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        use colloquium_shared::Error;

        match &self.0 {
            Error::Validate(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::User(_)
            | Error::SelfRegistration
            | Error::EventFull
            | Error::DuplicateRegistration
            | Error::EventNotActive
            | Error::NotRegistered
            | Error::AlreadyBanned
            | Error::NotBanned
            | Error::EventBanned => StatusCode::BAD_REQUEST,
            Error::Persistence(_) | Error::Server(_) | Error::Unknown(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if self.0.is_client() {
            self.0.to_string()
        } else {
            tracing::error!(err = %self.0, code = self.0.code(), "request failed");
            "Internal server error".to_owned()
        };

        let body = ErrorBody {
            error: self.0.code(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
