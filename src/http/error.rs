//! Dispatch errors and their rendering.
//!
//! # Responsibilities
//! - Separate "nothing matched" from "a handler failed"
//! - Render routing outcomes and handler errors as responses
//!
//! # Design Decisions
//! - Handler errors are passed through untouched, never wrapped or retried
//! - The error handler is injectable; `StatusErrorHandler` is the default

use axum::{
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::http::handler::BoxError;
use crate::routing::MethodSet;

/// Why a request was not answered by a handler.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No pattern matched the path.
    #[error("no route matched")]
    NotFound,

    /// A pattern matched, but not for this method.
    #[error("method not allowed")]
    MethodNotAllowed { allow: MethodSet },

    /// The handler failed.
    #[error(transparent)]
    Handler(BoxError),
}

impl DispatchError {
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchError::NotFound => StatusCode::NOT_FOUND,
            DispatchError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            DispatchError::Handler(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Produces a response for a failed dispatch.
pub trait ErrorHandler: Send + Sync + 'static {
    fn handle_error(&self, method: &Method, uri: &Uri, err: DispatchError) -> Response;
}

impl<F> ErrorHandler for F
where
    F: Fn(&Method, &Uri, DispatchError) -> Response + Send + Sync + 'static,
{
    fn handle_error(&self, method: &Method, uri: &Uri, err: DispatchError) -> Response {
        (self)(method, uri, err)
    }
}

/// Answers with a bare status line. Handler errors are logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusErrorHandler;

impl ErrorHandler for StatusErrorHandler {
    fn handle_error(&self, method: &Method, uri: &Uri, err: DispatchError) -> Response {
        let status = err.status();
        let text = status.canonical_reason().unwrap_or_default();

        match err {
            DispatchError::NotFound => (status, text).into_response(),
            DispatchError::MethodNotAllowed { allow } => match allow.header_value() {
                Some(value) => (status, [(header::ALLOW, value)], text).into_response(),
                None => (status, text).into_response(),
            },
            DispatchError::Handler(err) => {
                tracing::error!(method = %method, path = %uri.path(), error = %err, "Handler error");
                (status, text).into_response()
            }
        }
    }
}
