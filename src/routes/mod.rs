use axum::{
    Router,
    routing::{delete, get, post, put},
};
use colloquium_notification::{Dispatcher, Queue};
use sqlx::SqlitePool;

mod admin;
mod auth;
mod connections;
mod events;
mod forum;
mod health;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub user_command: colloquium_user::Command,
    pub event_command: colloquium_event::Command,
    pub moderation_command: colloquium_moderation::Command,
    pub connection_command: colloquium_connection::Command,
    pub forum_command: colloquium_forum::Command,
    pub queue: Queue,
    pub pool: SqlitePool,
}

impl AppState {
    pub fn new(config: crate::config::Config, state: colloquium_shared::State) -> Self {
        let queue = Queue::new(state.write_db.clone());
        let dispatcher = Dispatcher::new(queue.clone(), state.read_db.clone());

        Self {
            config,
            user_command: colloquium_user::Command::new(state.clone(), dispatcher.clone()),
            event_command: colloquium_event::Command::new(state.clone(), dispatcher),
            moderation_command: colloquium_moderation::Command(state.clone()),
            connection_command: colloquium_connection::Command(state.clone()),
            forum_command: colloquium_forum::Command(state.clone()),
            queue,
            pool: state.read_db,
        }
    }
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/verify/{token}", get(auth::verify))
        .route("/events", post(events::create))
        .route(
            "/events/{id}",
            get(events::find).put(events::update).delete(events::delete),
        )
        .route("/events/{id}/complete", post(events::complete))
        .route("/events/{id}/cancel", post(events::cancel))
        .route("/events/{id}/attendees", get(events::attendees))
        .route("/events/{id}/register", post(events::register))
        .route("/events/{id}/unregister", delete(events::unregister))
        .route("/events/{id}/posts", get(forum::list).post(forum::create))
        .route("/posts/{id}", delete(forum::delete))
        .route(
            "/connections",
            get(connections::list).post(connections::request),
        )
        .route("/connections/{id}/accept", post(connections::accept))
        .route("/connections/{id}/decline", post(connections::decline))
        .route("/admin/events/{id}/ban", post(admin::ban_event))
        .route("/admin/events/{id}/unban", post(admin::unban_event))
        .route("/admin/events/{id}/force-delete", delete(admin::force_delete_event))
        .route("/admin/users/{id}/ban", put(admin::ban_user))
        .route("/admin/forum/posts/{id}", delete(admin::delete_forum_post))
        .route("/admin/logs", get(admin::logs))
        .route("/admin/stats", get(admin::stats))
        .route("/admin/jobs/failed", get(admin::failed_jobs))
        .with_state(app_state)
}
