use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::status::{Envelope, Status};

/// A successful reply: the `OK` status and an optional payload.
#[derive(Debug, Clone)]
pub struct Reply<T>(pub Option<T>);

impl<T> Reply<T> {
    pub fn ok(payload: T) -> Self {
        Self(Some(payload))
    }
}

impl Reply<()> {
    pub fn done() -> Self {
        Self(None)
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        Json(Envelope::new(&Status::Ok, self.0)).into_response()
    }
}

impl IntoResponse for Status {
    fn into_response(self) -> Response {
        let envelope = Envelope::<()>::new(&self, None);
        (self.http_status(), Json(envelope)).into_response()
    }
}
