use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::{env, time::Duration};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub worker: WorkerConfig,
    #[serde(default)]
    pub reminder: ReminderConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub root: RootConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_lifetime_seconds: i64,
}

/// SMTP settings. An empty `smtp_host` keeps mail in memory, which is what
/// local runs and tests use.
#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    #[serde(default)]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_username: String,
    #[serde(default)]
    pub smtp_password: String,
    #[serde(default = "default_from_address")]
    pub from_address: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_address: default_from_address(),
            base_url: default_base_url(),
        }
    }
}

impl From<&EmailConfig> for colloquium_notification::EmailConfig {
    fn from(value: &EmailConfig) -> Self {
        Self {
            smtp_host: value.smtp_host.to_owned(),
            smtp_port: value.smtp_port,
            smtp_username: value.smtp_username.to_owned(),
            smtp_password: value.smtp_password.to_owned(),
            from_address: value.from_address.to_owned(),
            base_url: value.base_url.to_owned(),
        }
    }
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_address() -> String {
    "Colloquium <noreply@colloquium.localhost>".to_owned()
}

fn default_base_url() -> String {
    "http://localhost:3000".to_owned()
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_storage_root")]
    pub root: String,
    #[serde(default = "default_storage_base_url")]
    pub base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
            base_url: default_storage_base_url(),
        }
    }
}

fn default_storage_root() -> String {
    "uploads".to_owned()
}

fn default_storage_base_url() -> String {
    "http://localhost:3000/uploads".to_owned()
}

#[derive(Debug, Deserialize, Clone)]
pub struct WorkerConfig {
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_job_timeout_secs")]
    pub job_timeout_secs: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_backoff_base_secs")]
    pub backoff_base_secs: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            poll_interval_ms: default_poll_interval_ms(),
            job_timeout_secs: default_job_timeout_secs(),
            max_attempts: default_max_attempts(),
            backoff_base_secs: default_backoff_base_secs(),
        }
    }
}

fn default_concurrency() -> usize {
    2
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_job_timeout_secs() -> u64 {
    180
}

fn default_max_attempts() -> u32 {
    5
}

fn default_backoff_base_secs() -> u64 {
    30
}

impl Config {
    pub fn worker(&self) -> colloquium_notification::WorkerConfig {
        let retry = colloquium_notification::RetryPolicy {
            max_attempts: self.worker.max_attempts,
            base_delay: Duration::from_secs(self.worker.backoff_base_secs),
            ..Default::default()
        };

        colloquium_notification::WorkerConfig {
            concurrency: self.worker.concurrency,
            poll_interval: Duration::from_millis(self.worker.poll_interval_ms),
            job_timeout: Duration::from_secs(self.worker.job_timeout_secs),
            retry,
            base_url: self.email.base_url.to_owned(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReminderConfig {
    /// Six-field cron expression, seconds first.
    #[serde(default = "default_reminder_cron")]
    pub cron: String,
    #[serde(default)]
    pub dedup_guard: bool,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            cron: default_reminder_cron(),
            dedup_guard: false,
        }
    }
}

fn default_reminder_cron() -> String {
    "0 */5 * * * *".to_owned()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_owned()
}

/// Bootstrap admin created or promoted at `serve`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RootConfig {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (COLLOQUIUM__DATABASE__URL, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("database.url", "sqlite:colloquium.db")?
            .set_default("database.max_connections", 5)?
            .set_default("auth.jwt_lifetime_seconds", 7 * 24 * 60 * 60)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_owned());

        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("COLLOQUIUM")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }
        if let Ok(jwt_secret) = env::var("JWT_SECRET") {
            builder = builder.set_override("auth.jwt_secret", jwt_secret)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.auth.jwt_secret.len() < 32 {
            return Err("JWT secret must be at least 32 characters long".to_owned());
        }
        if self.auth.jwt_lifetime_seconds < 1 {
            return Err("JWT lifetime must be at least 1 second".to_owned());
        }
        if self.database.max_connections < 1 {
            return Err("Database max_connections must be at least 1".to_owned());
        }
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_owned());
        }
        if self.worker.concurrency < 1 {
            return Err("Worker concurrency must be at least 1".to_owned());
        }
        if self.worker.max_attempts < 1 {
            return Err("Worker max_attempts must be at least 1".to_owned());
        }
        if self.root.email.is_some() != self.root.password.is_some() {
            return Err("Root email and password must be set together".to_owned());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_owned(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: "sqlite:test.db".to_owned(),
                max_connections: 5,
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

    #[test]
    fn test_validation_valid_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_validation_short_secret() {
        let mut config = config();
        config.auth.jwt_secret = "short".to_owned();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_port() {
        let mut config = config();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_connections() {
        let mut config = config();
        config.database.max_connections = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_worker() {
        let mut config = config();
        config.worker.concurrency = 0;
        assert!(config.validate().is_err());

        let mut config = self::config();
        config.worker.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_root_pair() {
        let mut config = config();
        config.root.email = Some("root@colloquium.localhost".to_owned());
        assert!(config.validate().is_err());

        config.root.password = Some("rootpassword".to_owned());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_worker_settings() {
        let mut config = config();
        config.worker.max_attempts = 3;
        config.worker.job_timeout_secs = 10;

        let worker = config.worker();
        assert_eq!(worker.retry.max_attempts, 3);
        assert_eq!(worker.retry.base_delay, Duration::from_secs(30));
        assert_eq!(worker.job_timeout, Duration::from_secs(10));
    }
}
