//! Request handlers.
//!
//! A handler is like a tower service that may fail: it takes the request and
//! returns a response or an opaque error for the error handler to render.

use std::future::Future;
use std::sync::Arc;

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use futures_util::future::{BoxFuture, FutureExt};

/// Opaque error raised by a handler.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Future returned by [`Handler::call`].
pub type HandlerFuture = BoxFuture<'static, Result<Response, BoxError>>;

/// A shared, type-erased handler as stored in the routing tree.
pub type BoxHandler = Arc<dyn Handler>;

/// Responds to a routed request.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: Request<Body>) -> HandlerFuture;
}

impl<F, Fut> Handler for F
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, BoxError>> + Send + 'static,
{
    fn call(&self, req: Request<Body>) -> HandlerFuture {
        (self)(req).boxed()
    }
}

/// Adapter for handlers that cannot fail.
#[derive(Clone)]
pub struct Infallible<F>(F);

/// Wrap a handler returning any [`IntoResponse`] so it never errors.
pub fn infallible<F, Fut, R>(f: F) -> Infallible<F>
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    Infallible(f)
}

impl<F, Fut, R> Handler for Infallible<F>
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn call(&self, req: Request<Body>) -> HandlerFuture {
        let fut = (self.0)(req);
        async move { Ok(fut.await.into_response()) }.boxed()
    }
}
