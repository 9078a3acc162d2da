//! Status codes shared by every endpoint, and the envelope they travel in.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::database::DatabaseQueryError;

/// Outcome of a request. Every JSON response carries exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Ok,
    NoSuchUser,
    NoSuchVideo,
    InvalidId { id: String },
    InvalidHeader { header: String, reason: String },
    UserAlreadyExists,
    InvalidCredentials,
    Unauthorized,
    Forbidden,
    RequestFailed { message: String },
    InvalidBody { reason: String },
}

impl Status {
    pub fn request_failed(error: impl std::fmt::Display) -> Self {
        Self::RequestFailed {
            message: error.to_string(),
        }
    }

    pub fn invalid_header(header: &str, reason: impl Into<String>) -> Self {
        Self::InvalidHeader {
            header: header.to_string(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            Self::Ok => 0,
            Self::NoSuchUser => 1,
            Self::NoSuchVideo => 2,
            Self::InvalidId { .. } => 3,
            Self::InvalidHeader { .. } => 4,
            Self::UserAlreadyExists => 5,
            Self::InvalidCredentials => 6,
            Self::Unauthorized => 7,
            Self::Forbidden => 8,
            Self::RequestFailed { .. } => 9,
            Self::InvalidBody { .. } => 10,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::NoSuchUser => "THERE_IS_NO_SUCH_USER",
            Self::NoSuchVideo => "THERE_IS_NO_SUCH_VIDEO",
            Self::InvalidId { .. } => "INVALID_ID",
            Self::InvalidHeader { .. } => "INVALID_HEADER",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::RequestFailed { .. } => "REQUEST_FAILED",
            Self::InvalidBody { .. } => "INVALID_BODY",
        }
    }

    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Ok => StatusCode::OK,
            Self::NoSuchUser | Self::NoSuchVideo => StatusCode::NOT_FOUND,
            Self::InvalidId { .. } | Self::InvalidHeader { .. } | Self::InvalidBody { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::UserAlreadyExists => StatusCode::CONFLICT,
            Self::InvalidCredentials | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::RequestFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    pub fn body(&self) -> StatusBody {
        StatusBody {
            code: self.code(),
            name: self.name().to_string(),
            message: self.to_string(),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::NoSuchUser => write!(f, "there is no such user"),
            Self::NoSuchVideo => write!(f, "there is no such video"),
            Self::InvalidId { id } => write!(f, "`{id}` is not a valid id"),
            Self::InvalidHeader { header, reason } => write!(f, "header `{header}` {reason}"),
            Self::UserAlreadyExists => write!(f, "user already exists"),
            Self::InvalidCredentials => write!(f, "invalid email or password"),
            Self::Unauthorized => write!(f, "request is not authenticated"),
            Self::Forbidden => write!(f, "not allowed to access this resource"),
            Self::RequestFailed { message } => write!(f, "request failed: {message}"),
            Self::InvalidBody { reason } => write!(f, "invalid request body: {reason}"),
        }
    }
}

impl From<DatabaseQueryError> for Status {
    fn from(error: DatabaseQueryError) -> Self {
        tracing::warn!(%error, "database query failed");
        Self::request_failed(error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBody {
    pub code: u16,
    pub name: String,
    pub message: String,
}

/// The uniform response wrapper: a status and an optional payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: StatusBody,
    pub payload: Option<T>,
}

impl<T> Envelope<T> {
    pub fn new(status: &Status, payload: Option<T>) -> Self {
        Self {
            status: status.body(),
            payload,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status.code == Status::Ok.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_statuses_map_to_404() {
        assert_eq!(Status::NoSuchUser.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(Status::NoSuchVideo.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn request_failed_carries_the_message() {
        let status = Status::request_failed("payment service is down");
        let body = status.body();

        assert_eq!(body.name, "REQUEST_FAILED");
        assert_eq!(body.message, "request failed: payment service is down");
        assert_eq!(status.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn envelope_serializes_status_and_payload() {
        let envelope = Envelope::new(&Status::Ok, Some(vec![1, 2, 3]));
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "status": { "code": 0, "name": "OK", "message": "OK" },
                "payload": [1, 2, 3],
            })
        );
    }

    #[test]
    fn empty_envelope_has_null_payload() {
        let envelope = Envelope::<()>::new(&Status::NoSuchVideo, None);
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["payload"], serde_json::Value::Null);
        assert_eq!(json["status"]["name"], "THERE_IS_NO_SUCH_VIDEO");
        assert!(!envelope.is_ok());
    }
}
