use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;
use snafu::ResultExt;

use crate::auth::AuthConfig;
use crate::database::DatabaseConfig;
use crate::error::{ApplicationError, ConfigLoadSnafu};
use crate::service::mail::MailConfig;
use crate::service::payment::PaymentConfig;

/// Application configuration, read from environment variables (and `.env`, see `main`).
///
/// Values of the flattened sections arrive as strings, so non-string fields in them are parsed with `DisplayFromStr`.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(rename = "host_address")]
    pub host: SocketAddr,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(flatten)]
    pub database: DatabaseConfig,
    #[serde(flatten)]
    pub auth: AuthConfig,
    #[serde(flatten)]
    pub payment: PaymentConfig,
    #[serde(flatten)]
    pub mail: MailConfig,
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

impl Config {
    pub fn from_env() -> Result<Config, ApplicationError> {
        envy::from_env::<Config>().context(ConfigLoadSnafu)
    }

    pub fn from_iter<I>(vars: I) -> Result<Config, ApplicationError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars).context(ConfigLoadSnafu)
    }
}
