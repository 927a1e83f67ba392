use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use colloquium_forum::{ForumPost, PostInput};
use serde_json::json;

use super::AppState;
use crate::{auth::AuthUser, error::AppResult};

pub async fn list(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> AppResult<Json<Vec<ForumPost>>> {
    Ok(Json(state.forum_command.list(event_id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(event_id): Path<String>,
    Json(input): Json<PostInput>,
) -> AppResult<impl IntoResponse> {
    let post = state.forum_command.post(&actor, event_id, input).await?;

    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn delete(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.forum_command.delete(&actor, &id).await?;

    Ok(Json(json!({ "id": id })))
}
