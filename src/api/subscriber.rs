use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tracing::instrument;

use super::{App, CommentView, JsonBody, Reply, SubscriptionView, TextBody, VideoIdHeader};
use crate::auth::Subscriber;
use crate::database::Record;
use crate::model::{now, Comment, Like, UserSubscription, Video};
use crate::status::Status;

pub fn routes() -> Router<App> {
    Router::new()
        .route("/video/getComments", get(comments))
        .route("/video/:id", get(stream_video))
        .route("/addLike", post(add_like))
        .route("/revokeLike", post(revoke_like))
        .route("/addComment", post(add_comment))
        .route("/subscriptions", get(subscriptions))
}

/// The whole video in one response. Unknown and malformed ids get a bare 404.
#[instrument(skip(app, _subscriber))]
async fn stream_video(
    State(app): State<App>,
    _subscriber: Subscriber,
    Path(id): Path<String>,
) -> Result<Response, Status> {
    let Some(id) = Record::<Video>::parse(&id) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    let Some(video) = Video::get(&id, &app.database).await? else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    tracing::debug!(bytes = video.content.len(), "streaming video");

    let headers = [
        (CONTENT_TYPE, HeaderValue::from_static("video/mp4")),
        (
            CONTENT_DISPOSITION,
            HeaderValue::from_static("inline; filename=\"video.mp4\""),
        ),
        (CONTENT_LENGTH, HeaderValue::from(video.content.len())),
    ];

    Ok((headers, video.content).into_response())
}

#[instrument(skip(app, _subscriber))]
async fn comments(
    State(app): State<App>,
    _subscriber: Subscriber,
    VideoIdHeader(video_id): VideoIdHeader,
) -> Result<Reply<Vec<CommentView>>, Status> {
    let video = app.validator.require_video(&video_id).await?;

    let comments = Comment::for_video(&video, &app.database).await?;
    Ok(Reply::ok(comments.into_iter().map(CommentView::from).collect()))
}

#[instrument(skip(app, subscriber))]
async fn add_like(
    State(app): State<App>,
    Subscriber(subscriber): Subscriber,
    VideoIdHeader(video_id): VideoIdHeader,
) -> Result<Reply<()>, Status> {
    let user = app.current_user(&subscriber).await?;
    let video = app.validator.require_video(&video_id).await?;

    // a second like for the same pair is refused by the `likes_pair` index
    app.database.insert(&Like::new(user.id, video)).await?;
    Ok(Reply::done())
}

#[instrument(skip(app, subscriber))]
async fn revoke_like(
    State(app): State<App>,
    Subscriber(subscriber): Subscriber,
    VideoIdHeader(video_id): VideoIdHeader,
) -> Result<Reply<()>, Status> {
    let user = app.current_user(&subscriber).await?;
    let video = app.validator.require_video(&video_id).await?;

    let removed = Like::revoke(&user.id, &video, &app.database).await?;
    tracing::debug!(removed, "revoked like");
    Ok(Reply::done())
}

#[instrument(skip(app, subscriber, body))]
async fn add_comment(
    State(app): State<App>,
    Subscriber(subscriber): Subscriber,
    VideoIdHeader(video_id): VideoIdHeader,
    JsonBody(body): JsonBody<TextBody>,
) -> Result<Reply<()>, Status> {
    let user = app.current_user(&subscriber).await?;
    let video = app.validator.require_video(&video_id).await?;

    app.database
        .insert(&Comment::new(user.id, video, body.text))
        .await?;
    Ok(Reply::done())
}

#[instrument(skip(app, subscriber))]
async fn subscriptions(
    State(app): State<App>,
    Subscriber(subscriber): Subscriber,
) -> Result<Reply<Vec<SubscriptionView>>, Status> {
    let user = app.current_user(&subscriber).await?;

    let subscriptions = UserSubscription::active_for(&user.id, now(), &app.database).await?;
    Ok(Reply::ok(
        subscriptions.into_iter().map(SubscriptionView::from).collect(),
    ))
}
