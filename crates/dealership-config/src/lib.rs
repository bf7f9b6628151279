//! Environment-variable configuration, §6.2.
//!
//! Every reader goes through [`required_env`]/[`env_or`] so the set of
//! variable names stays centralized here rather than scattered across the
//! four service binaries. `Debug` on the credential-bearing structs redacts
//! passwords — error messages and logs reference variable *names*, never
//! values.

use anyhow::{Context, Result};
use dealership_broker::BrokerConfig;

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn required_env(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("missing required environment variable {name}"))
}

/// Load the broker configuration from `RABBITMQ_*`, falling back to the
/// defaults a local compose stack uses.
pub fn broker_config_from_env() -> BrokerConfig {
    BrokerConfig {
        host: env_or("RABBITMQ_HOST", "rabbitmq"),
        port: env_or("RABBITMQ_PORT", "5672")
            .parse()
            .unwrap_or(5672),
        username: env_or("RABBITMQ_USERNAME", "guest"),
        password: env_or("RABBITMQ_PASSWORD", "guest"),
    }
}

/// Relational store target plus both credential roles (spec §6.2: the
/// root role is used by reconcilers that write, the application role by
/// the service's own business logic).
#[derive(Clone)]
pub struct MySqlConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub application_username: String,
    pub application_password: String,
    pub root_username: String,
    pub root_password: String,
}

impl std::fmt::Debug for MySqlConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("application_username", &self.application_username)
            .field("application_password", &"<REDACTED>")
            .field("root_username", &self.root_username)
            .field("root_password", &"<REDACTED>")
            .finish()
    }
}

impl MySqlConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: required_env("MYSQL_DB_HOST")?,
            port: required_env("MYSQL_DB_PORT")?
                .parse()
                .context("MYSQL_DB_PORT is not a valid port number")?,
            name: required_env("MYSQL_DB_NAME")?,
            application_username: required_env("MYSQL_DB_APPLICATION_USERNAME")?,
            application_password: required_env("MYSQL_DB_APPLICATION_PASSWORD")?,
            root_username: required_env("MYSQL_DB_ROOT_USERNAME")?,
            root_password: required_env("MYSQL_DB_ROOT_PASSWORD")?,
        })
    }

    /// DSN for the reconciler's write path (spec §6.2: root-role creds).
    pub fn dsn_as_root(&self) -> String {
        format!(
            "mysql://{}:{}@{}:{}/{}",
            self.root_username, self.root_password, self.host, self.port, self.name
        )
    }

    pub fn dsn_as_application(&self) -> String {
        format!(
            "mysql://{}:{}@{}:{}/{}",
            self.application_username, self.application_password, self.host, self.port, self.name
        )
    }
}

/// Document store target plus both credential roles.
#[derive(Clone)]
pub struct MongoConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub application_username: String,
    pub application_password: String,
    pub root_username: String,
    pub root_password: String,
}

impl std::fmt::Debug for MongoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("application_username", &self.application_username)
            .field("application_password", &"<REDACTED>")
            .field("root_username", &self.root_username)
            .field("root_password", &"<REDACTED>")
            .finish()
    }
}

impl MongoConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env_or("MONGO_DB_HOST", "127.0.0.1"),
            port: env_or("MONGO_DB_PORT", "27017")
                .parse()
                .context("MONGO_DB_PORT is not a valid port number")?,
            name: required_env("MONGO_DB_NAME")?,
            application_username: required_env("MONGO_DB_APPLICATION_USERNAME")?,
            application_password: required_env("MONGO_DB_APPLICATION_PASSWORD")?,
            root_username: required_env("MONGO_DB_ROOT_USERNAME")?,
            root_password: required_env("MONGO_DB_ROOT_PASSWORD")?,
        })
    }

    /// URI for the reconciler's write path (spec §6.2: root-role creds).
    pub fn uri_as_root(&self) -> String {
        format!(
            "mongodb://{}:{}@{}:{}",
            self.root_username, self.root_password, self.host, self.port
        )
    }

    pub fn uri_as_application(&self) -> String {
        format!(
            "mongodb://{}:{}@{}:{}",
            self.application_username, self.application_password, self.host, self.port
        )
    }
}

/// Load a `.env` file if present (local development convenience); silently
/// no-ops in environments where variables are already injected.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Bounded retry loop for a fallible connect operation, mirroring the
/// broker client's own `Connect()` policy (spec §4.2/§4.4: "its own retry
/// loop" for the store connection too).
pub async fn retry_connect<T, Fut>(
    attempts: u32,
    delay: std::time::Duration,
    mut attempt: impl FnMut() -> Fut,
) -> Result<T>
where
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut last_err = None;
    for attempt_no in 1..=attempts {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                tracing::warn!(attempt_no, error = %err, "store connect attempt failed");
                last_err = Some(err);
                if attempt_no < attempts {
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
    Err(last_err.unwrap_or_else(|| anyhow::anyhow!("store connection exhausted its retry budget")))
}
