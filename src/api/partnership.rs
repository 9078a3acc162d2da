use axum::extract::State;
use axum::routing::post;
use axum::Router;
use tracing::instrument;

use super::{AmountHeader, App, Reply};
use crate::auth::Subscriber;
use crate::status::Status;

pub fn routes() -> Router<App> {
    Router::new().route("/withdrawMoney", post(withdraw_money))
}

#[instrument(skip(app, subscriber))]
async fn withdraw_money(
    State(app): State<App>,
    Subscriber(subscriber): Subscriber,
    AmountHeader(amount): AmountHeader,
) -> Result<Reply<()>, Status> {
    let user = app.current_user(&subscriber).await?;

    match app.partnership.withdraw_money(amount, &user).await {
        Ok(withdrawal) => {
            tracing::info!(?withdrawal, "partnership money withdrawn");
            Ok(Reply::done())
        }
        Err(error) => {
            tracing::info!(%error, "partnership withdrawal failed");
            Err(Status::request_failed(error))
        }
    }
}
