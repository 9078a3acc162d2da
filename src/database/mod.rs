use secrecy::{ExposeSecret as _, SecretString};
use serde::Deserialize;
use snafu::{Location, ResultExt, Snafu};
use surrealdb::engine::any::Any;
use surrealdb::opt::auth;
use surrealdb::Surreal;
use url::Url;

/// Helper for executing arbitrary SurrealQL queries.
pub mod query;

/// Typed record ids.
pub mod record;

/// Macros for binding tables and queries to model types.
pub mod macros;

pub use query::{Bindings, DatabaseQueryError};
pub use record::{Record, Table};
pub use surrealdb::sql::Thing;

pub type Result<T, E = DatabaseError> = std::result::Result<T, E>;

const SETUP: &str = include_str!("../../schema.surrealql");

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum DatabaseError {
    #[snafu(display("cannot connect to the database `{url}` at {location}: {source}"))]
    Connection {
        url: String,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("cannot sign in to the database `{url}` as `{username}`: {source}"))]
    SignIn {
        url: String,
        username: String,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("cannot use namespace `{namespace}` and database `{database}`: {source}"))]
    Select {
        namespace: String,
        database: String,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to apply the database schema at {location}: {source}"))]
    Schema {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(rename = "surreal_url")]
    pub url: Url,
    #[serde(rename = "surreal_ns")]
    pub namespace: String,
    #[serde(rename = "surreal_db")]
    pub database: String,
    #[serde(rename = "surreal_username", default)]
    pub username: Option<String>,
    #[serde(rename = "surreal_password", default)]
    pub password: Option<SecretString>,
}

impl DatabaseConfig {
    /// A throwaway in-memory database, mostly useful for tests and local runs.
    pub fn memory(namespace: &str, database: &str) -> Self {
        Self {
            url: Url::parse("mem://").expect("mem:// is a valid url"),
            namespace: namespace.to_string(),
            database: database.to_string(),
            username: None,
            password: None,
        }
    }

    fn credentials(&self) -> Option<auth::Database<'_>> {
        let username = self.username.as_deref()?;
        let password = self
            .password
            .as_ref()
            .map(|password| password.expose_secret().as_str())
            .unwrap_or("");

        Some(auth::Database {
            namespace: &self.namespace,
            database: &self.database,
            username,
            password,
        })
    }
}

/// Handle to the SurrealDB instance. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Database {
    inner: Surreal<Any>,
}

impl Database {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let url = config.url.to_string();

        let inner = surrealdb::engine::any::connect(config.url.as_str())
            .await
            .context(ConnectionSnafu { url: url.clone() })?;

        if let Some(credentials) = config.credentials() {
            let username = credentials.username.to_string();
            inner
                .signin(credentials)
                .await
                .context(SignInSnafu { url, username })?;
        }

        inner
            .use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .context(SelectSnafu {
                namespace: config.namespace.clone(),
                database: config.database.clone(),
            })?;

        let database = Self { inner };
        database.setup().await?;

        tracing::info!(url = %config.url, namespace = %config.namespace, database = %config.database, "connected to the database");
        Ok(database)
    }

    pub async fn memory() -> Result<Self> {
        Self::connect(&DatabaseConfig::memory("tubelab", "tubelab")).await
    }

    async fn setup(&self) -> Result<()> {
        self.inner
            .query(SETUP)
            .await
            .context(SchemaSnafu)?
            .check()
            .context(SchemaSnafu)?;
        Ok(())
    }
}

impl std::ops::Deref for Database {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
