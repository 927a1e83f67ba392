use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use colloquium_event::Event;
use colloquium_moderation::{AdminLog, LogFilter, Stats};
use colloquium_notification::Job;
use colloquium_user::User;
use serde::Deserialize;
use serde_json::json;

use super::AppState;
use crate::{auth::AuthUser, error::AppResult};

#[derive(Deserialize, Default)]
pub struct ReasonInput {
    #[serde(default)]
    reason: Option<String>,
}

pub async fn ban_event(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
    body: Option<Json<ReasonInput>>,
) -> AppResult<Json<Event>> {
    let body = body.map(|Json(body)| body).unwrap_or_default();

    Ok(Json(
        state
            .moderation_command
            .ban_event(&actor, id, body.reason)
            .await?,
    ))
}

pub async fn unban_event(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Event>> {
    Ok(Json(state.moderation_command.unban_event(&actor, id).await?))
}

pub async fn force_delete_event(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
    Query(query): Query<ReasonInput>,
) -> AppResult<impl IntoResponse> {
    state
        .moderation_command
        .force_delete_event(&actor, &id, query.reason)
        .await?;

    Ok(Json(json!({ "id": id })))
}

pub async fn ban_user(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
    body: Option<Json<ReasonInput>>,
) -> AppResult<impl IntoResponse> {
    let body = body.map(|Json(body)| body).unwrap_or_default();
    let user: User = state
        .moderation_command
        .ban_user(&actor, id, body.reason)
        .await?;

    Ok(Json(json!({ "user": user })))
}

pub async fn delete_forum_post(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
    Query(query): Query<ReasonInput>,
) -> AppResult<impl IntoResponse> {
    state
        .moderation_command
        .delete_forum_post(&actor, &id, query.reason)
        .await?;

    Ok(Json(json!({ "id": id })))
}

pub async fn logs(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Query(filter): Query<LogFilter>,
) -> AppResult<Json<Vec<AdminLog>>> {
    Ok(Json(
        state.moderation_command.list_logs(&actor, filter).await?,
    ))
}

pub async fn stats(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
) -> AppResult<Json<Stats>> {
    Ok(Json(state.moderation_command.stats(&actor).await?))
}

#[derive(Deserialize)]
pub struct FailedQuery {
    limit: Option<u64>,
}

/// Jobs that exhausted their attempts, newest first.
pub async fn failed_jobs(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Query(query): Query<FailedQuery>,
) -> AppResult<Json<Vec<Job>>> {
    actor.ensure_admin()?;

    Ok(Json(
        state
            .queue
            .failed(query.limit.unwrap_or(100).min(500))
            .await?,
    ))
}
