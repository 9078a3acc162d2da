use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod auth;
mod headers;
mod partnership;
mod response;
mod state;
mod subscriber;
mod view;

pub use headers::{AmountHeader, JsonBody, VideoIdHeader, AMOUNT, VIDEO_ID};
pub use response::Reply;
pub use state::{create_app, App};
pub use view::*;

pub fn create_router(app: App) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth::routes())
        .nest("/subscriber", subscriber::routes())
        .nest("/partnership", partnership::routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(app)
}

async fn health() -> Reply<()> {
    Reply::done()
}
