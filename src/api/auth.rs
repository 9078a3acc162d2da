use axum::extract::State;
use axum::routing::post;
use axum::Router;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use tracing::instrument;

use super::{App, JsonBody, Reply, SessionView, SignInBody, SignUpBody};
use crate::auth::SESSION_COOKIE;
use crate::model::User;
use crate::status::Status;

pub fn routes() -> Router<App> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
}

fn start_session(
    app: &App,
    jar: CookieJar,
    user: User,
) -> Result<(CookieJar, Reply<SessionView>), Status> {
    let token = app.authenticator.issue(&user)?;

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    let view = SessionView {
        token,
        user: user.into(),
    };
    Ok((jar.add(cookie), Reply::ok(view)))
}

#[instrument(skip_all, fields(email = %body.email))]
async fn signup(
    State(app): State<App>,
    jar: CookieJar,
    JsonBody(body): JsonBody<SignUpBody>,
) -> Result<(CookieJar, Reply<SessionView>), Status> {
    let blank = [&body.nickname, &body.email, &body.password]
        .into_iter()
        .any(|field| field.trim().is_empty());
    if blank {
        return Err(Status::InvalidBody {
            reason: "nickname, email and password are required".into(),
        });
    }

    let user = app
        .authenticator
        .signup(body.nickname.trim(), body.email.trim(), &body.password)
        .await?;

    start_session(&app, jar, user)
}

#[instrument(skip_all, fields(email = %body.email))]
async fn signin(
    State(app): State<App>,
    jar: CookieJar,
    JsonBody(body): JsonBody<SignInBody>,
) -> Result<(CookieJar, Reply<SessionView>), Status> {
    let user = app
        .authenticator
        .signin(body.email.trim(), &body.password)
        .await?;

    start_session(&app, jar, user)
}
