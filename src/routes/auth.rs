use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use colloquium_user::{LoginInput, RegisterInput, User};
use serde::Serialize;
use serde_json::json;

use super::AppState;
use crate::error::AppResult;

pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> AppResult<impl IntoResponse> {
    let id = state.user_command.register(input).await?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

#[derive(Serialize)]
pub struct LoginResponse {
    token: String,
    user: User,
}

pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<Json<LoginResponse>> {
    let user = state.user_command.login(input).await?;
    let token = crate::auth::generate_token(&state.config.auth, &user.id)?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(LoginResponse { token, user }))
}

pub async fn verify(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = state.user_command.verify(token).await?;

    Ok(Json(json!({ "id": id })))
}
