use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use colloquium_event::{CreateInput, Event, UpdateInput, registration::Attendee};
use colloquium_shared::Error;
use serde::Deserialize;
use serde_json::json;

use super::AppState;
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
};

pub async fn create(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(input): Json<CreateInput>,
) -> AppResult<impl IntoResponse> {
    let event = state.event_command.create(&actor, input).await?;

    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn find(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Event>> {
    let Some(event) = state.event_command.find(id).await? else {
        return Err(AppError(Error::NotFound("event".to_owned())));
    };

    Ok(Json(event))
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
    Json(input): Json<UpdateInput>,
) -> AppResult<Json<Event>> {
    Ok(Json(state.event_command.update(&actor, id, input).await?))
}

pub async fn complete(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Event>> {
    Ok(Json(state.event_command.complete(&actor, id).await?))
}

pub async fn cancel(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Event>> {
    Ok(Json(state.event_command.cancel(&actor, id).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.event_command.delete(&actor, &id).await?;

    Ok(Json(json!({ "id": id })))
}

/// Attendee lists expose emails, only the host and admins may read them.
pub async fn attendees(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Attendee>>> {
    let Some(event) = state.event_command.find(&id).await? else {
        return Err(AppError(Error::NotFound("event".to_owned())));
    };

    if event.host_id != actor.user_id && !actor.is_admin {
        return Err(AppError(Error::Forbidden));
    }

    Ok(Json(
        state.event_command.registration.list_attendees(id).await?,
    ))
}

#[derive(Deserialize, Default)]
pub struct RegisterBody {
    #[serde(default)]
    notes: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
    body: Option<Json<RegisterBody>>,
) -> AppResult<impl IntoResponse> {
    let body = body.map(|Json(body)| body).unwrap_or_default();
    let registration = state
        .event_command
        .registration
        .register(id, &actor.user_id, body.notes)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "registration": registration })),
    ))
}

pub async fn unregister(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state
        .event_command
        .registration
        .unregister(&id, &actor.user_id)
        .await?;

    Ok(Json(json!({ "event_id": id, "user_id": actor.user_id })))
}
