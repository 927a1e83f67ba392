use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use colloquium::{
    AppState,
    config::{
        AuthConfig, Config, DatabaseConfig, EmailConfig, ObservabilityConfig, ReminderConfig,
        RootConfig, ServerConfig, StorageConfig, WorkerConfig,
    },
};
use colloquium_user::RegisterInput;
use http_body_util::BodyExt;
use serde_json::Value;
use temp_dir::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

fn config(url: String) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_owned(),
            port: 3000,
        },
        database: DatabaseConfig {
            url,
            max_connections: 4,
        },
        auth: AuthConfig {
            jwt_secret: "test_secret_key_minimum_32_characters_long".to_owned(),
            jwt_lifetime_seconds: 3600,
        },
        email: EmailConfig::default(),
        storage: StorageConfig::default(),
        worker: WorkerConfig::default(),
        reminder: ReminderConfig::default(),
        observability: ObservabilityConfig::default(),
        root: RootConfig::default(),
    }
}

pub async fn setup_test_app(dir: &TempDir) -> anyhow::Result<TestApp> {
    let url = format!("sqlite:{}", dir.child("db.sqlite3").to_str().unwrap());

    let write_db = colloquium::db::create_write_pool(&url).await?;
    colloquium::db::migrate(&write_db).await?;
    let read_db = colloquium::db::create_read_pool(&url, 4).await?;

    let state = AppState::new(
        config(url),
        colloquium_shared::State { read_db, write_db },
    );

    Ok(TestApp {
        router: colloquium::router(state.clone()),
        state,
    })
}

impl TestApp {
    /// Registers an account and returns its id with a bearer token.
    pub async fn signup(&self, name: &str, admin: bool) -> anyhow::Result<(String, String)> {
        let id = self
            .state
            .user_command
            .register(RegisterInput {
                email: format!("{name}@colloquium.localhost"),
                password: "my_password".to_owned(),
                name: name.to_owned(),
                institution: None,
            })
            .await?;

        if admin {
            self.state.user_command.made_admin(&id).await?;
        }

        let token = colloquium::auth::generate_token(&self.state.config.auth, &id)?;

        Ok((id, token))
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> anyhow::Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        Ok((status, value))
    }
}
