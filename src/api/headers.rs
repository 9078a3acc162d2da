use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::request::Parts;

use crate::status::Status;

pub const VIDEO_ID: &str = "video-id";
pub const AMOUNT: &str = "amount";

fn required_header<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, Status> {
    let value = parts
        .headers
        .get(name)
        .ok_or_else(|| Status::invalid_header(name, "is missing"))?;

    let value = value
        .to_str()
        .map_err(|_| Status::invalid_header(name, "is not valid text"))?
        .trim();

    if value.is_empty() {
        return Err(Status::invalid_header(name, "is empty"));
    }

    Ok(value)
}

/// The raw `video-id` header. Checking that it names a video is left to [IdValidator](crate::service::validation::IdValidator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoIdHeader(pub String);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for VideoIdHeader {
    type Rejection = Status;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        required_header(parts, VIDEO_ID).map(|value| Self(value.to_string()))
    }
}

/// The `amount` header, a positive whole number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountHeader(pub u32);

impl AmountHeader {
    fn parse(value: &str) -> Result<Self, Status> {
        match value.parse::<u32>() {
            Ok(0) => Err(Status::invalid_header(AMOUNT, "must be greater than zero")),
            Ok(amount) => Ok(Self(amount)),
            Err(_) => Err(Status::invalid_header(AMOUNT, "must be a positive integer")),
        }
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AmountHeader {
    type Rejection = Status;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        Self::parse(required_header(parts, AMOUNT)?)
    }
}

/// [axum::Json] that answers malformed bodies with an `INVALID_BODY` envelope.
#[derive(Debug, Clone, FromRequest)]
#[from_request(via(axum::Json), rejection(Status))]
pub struct JsonBody<T>(pub T);

impl From<JsonRejection> for Status {
    fn from(rejection: JsonRejection) -> Self {
        Status::InvalidBody {
            reason: rejection.body_text(),
        }
    }
}
