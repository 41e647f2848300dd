//! Mapping from crate errors to HTTP responses.

use crate::Error;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

/// An error rendered as a plain-text HTTP response
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        let status = match &e {
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), error = %self.message, "Request failed");
        } else {
            warn!(status = self.status.as_u16(), error = %self.message, "Request rejected");
        }

        let mut response = (self.status, self.message).into_response();
        if self.status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                header::HeaderValue::from_static("Basic realm=\"remotecheck\""),
            );
        }
        response
    }
}
