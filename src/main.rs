use dotenvy::dotenv;
use snafu::ResultExt;
use tokio::net::TcpListener;

use tubelab::api::{create_router, App};
use tubelab::config::Config;
use tubelab::database::Database;
use tubelab::error::{ApplicationError, BindAddressSnafu, ConnectDatabaseSnafu, WebServerSnafu};
use tubelab::logger;

#[tokio::main]
async fn main() -> Result<(), ApplicationError> {
    dotenv().ok();

    let config = Config::from_env()?;

    let _guard = logger::init(&config)?;

    let database = Database::connect(&config.database)
        .await
        .context(ConnectDatabaseSnafu)?;
    let app = App::from_config(&config, database)?;

    let listener = TcpListener::bind(config.host)
        .await
        .context(BindAddressSnafu {
            address: config.host,
        })?;
    tracing::info!(address = %config.host, "listening");

    axum::serve(listener, create_router(app))
        .await
        .context(WebServerSnafu)
}
