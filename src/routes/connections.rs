use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use colloquium_connection::{Connection, RequestInput};
use colloquium_shared::connection::ConnectionStatus;
use serde::Deserialize;

use super::AppState;
use crate::{auth::AuthUser, error::AppResult};

pub async fn request(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(input): Json<RequestInput>,
) -> AppResult<impl IntoResponse> {
    let connection = state.connection_command.request(&actor, input).await?;

    Ok((StatusCode::CREATED, Json(connection)))
}

pub async fn accept(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Connection>> {
    Ok(Json(state.connection_command.accept(&actor, id).await?))
}

pub async fn decline(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Connection>> {
    Ok(Json(state.connection_command.decline(&actor, id).await?))
}

#[derive(Deserialize)]
pub struct ListQuery {
    status: Option<ConnectionStatus>,
}

pub async fn list(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Connection>>> {
    Ok(Json(
        state.connection_command.list(&actor, query.status).await?,
    ))
}
