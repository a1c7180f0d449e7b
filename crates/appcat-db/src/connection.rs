//! SurrealDB connection management.

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

/// Configuration for connecting to SurrealDB.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// WebSocket URL (e.g., `127.0.0.1:8000`).
    pub url: String,
    /// SurrealDB namespace.
    pub namespace: String,
    /// SurrealDB database name.
    pub database: String,
    /// Root username for authentication.
    pub username: String,
    /// Root password for authentication.
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "appcat".into(),
            database: "catalog".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

impl DbConfig {
    /// Build a configuration from the environment.
    ///
    /// `APPCAT_DB_URL` is the store connection string; `APPCAT_DB_NS`,
    /// `APPCAT_DB_NAME`, `APPCAT_DB_USER` and `APPCAT_DB_PASS` override
    /// the remaining defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: std::env::var("APPCAT_DB_URL").unwrap_or(defaults.url),
            namespace: std::env::var("APPCAT_DB_NS").unwrap_or(defaults.namespace),
            database: std::env::var("APPCAT_DB_NAME").unwrap_or(defaults.database),
            username: std::env::var("APPCAT_DB_USER").unwrap_or(defaults.username),
            password: std::env::var("APPCAT_DB_PASS").unwrap_or(defaults.password),
        }
    }
}

/// Manages a connection to SurrealDB.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Client>,
}

impl DbManager {
    /// Connect to SurrealDB using the provided configuration.
    ///
    /// Authenticates as root, selects the configured namespace and
    /// database, and returns a ready-to-use manager.
    pub async fn connect(config: &DbConfig) -> Result<Self, surrealdb::Error> {
        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "Connecting to SurrealDB"
        );

        let db = Surreal::new::<Ws>(&config.url).await?;

        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await?;

        db.use_ns(&config.namespace).use_db(&config.database).await?;

        info!("SurrealDB connection established");

        Ok(Self { db })
    }

    /// The underlying client, for constructing repositories.
    pub fn db(&self) -> Surreal<Client> {
        self.db.clone()
    }
}
