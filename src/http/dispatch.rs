//! Request dispatch.
//!
//! # Responsibilities
//! - Register handlers by method and pattern
//! - Resolve a request to a handler, applying the HEAD and OPTIONS fallbacks
//! - Hand the route match to the handler through the request extensions
//! - Route failures to the error handler
//!
//! # Design Decisions
//! - `Mux` is built with `&mut self` at startup, then frozen into `MuxService`
//! - Resolution is a pure function of (method, path), kept apart from I/O
//! - The match lives in a private extension slot: only `from_request` reads it
//! - Paths are percent-decoded before lookup; handlers see decoded values

use std::borrow::Cow;
use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::{IntoResponse, Response},
};
use futures_util::future::{BoxFuture, FutureExt};
use percent_encoding::percent_decode_str;

use crate::http::error::{DispatchError, ErrorHandler, StatusErrorHandler};
use crate::http::handler::{BoxHandler, Handler};
use crate::http::request::RequestIdExt;
use crate::observability::metrics;
use crate::routing::{MethodSet, RouteError, RouteMatch, RouteTree};

/// A route match as seen by handlers.
pub type MuxMatch = RouteMatch<BoxHandler>;

/// Extension slot holding the match. Private so no other code can collide with it.
#[derive(Clone)]
struct MatchSlot(MuxMatch);

/// Returns the route match for a request dispatched by a [`Mux`].
///
/// Always `Some` inside a handler invoked by the mux.
pub fn from_request<B>(req: &Request<B>) -> Option<&MuxMatch> {
    req.extensions().get::<MatchSlot>().map(|slot| &slot.0)
}

/// What a (method, path) pair resolves to.
pub enum Resolution<H> {
    /// Call `handler`; `route` is the match it runs under.
    Handler { handler: H, route: RouteMatch<H> },
    /// OPTIONS with no handler of its own: answer with the allowed methods.
    Options { allow: MethodSet },
    /// The path matched, the method did not.
    MethodNotAllowed { allow: MethodSet },
    NotFound,
}

impl<H> Resolution<H> {
    /// The pattern of the route a handler was found on.
    pub fn pattern(&self) -> Option<&str> {
        match self {
            Resolution::Handler { route, .. } => Some(route.pattern()),
            _ => None,
        }
    }
}

impl<H: Clone> Resolution<H> {
    /// Resolve `method` and `path` against `tree`.
    pub fn resolve(tree: &RouteTree<H>, method: &Method, path: &str) -> Self {
        let Some(route) = tree.lookup(path) else {
            return Resolution::NotFound;
        };

        let handler = route.handler(method).or_else(|| {
            (*method == Method::HEAD)
                .then(|| route.handler(&Method::GET))
                .flatten()
        });

        match handler {
            Some(handler) => Resolution::Handler {
                handler: handler.clone(),
                route,
            },
            None if *method == Method::OPTIONS => Resolution::Options {
                allow: route.methods().clone(),
            },
            None => Resolution::MethodNotAllowed {
                allow: route.methods().clone(),
            },
        }
    }
}

/// HTTP request multiplexer.
///
/// Matches the method and path of each request against the registered
/// routes and calls the handler of the most specific pattern.
///
/// Pattern segments are literal text, `:name` (one segment) or `*name`
/// (the rest of the path, final segment only). `/users/new` wins over
/// `/users/:id`, and `/users/:id` wins over `/users` for `/users/1`.
pub struct Mux {
    tree: RouteTree<BoxHandler>,
    error_handler: Arc<dyn ErrorHandler>,
}

impl Default for Mux {
    fn default() -> Self {
        Self::new()
    }
}

impl Mux {
    pub fn new() -> Self {
        Self {
            tree: RouteTree::new(),
            error_handler: Arc::new(StatusErrorHandler),
        }
    }

    /// Register `handler` for `method` and `pattern`.
    pub fn handle<H: Handler>(
        &mut self,
        method: Method,
        pattern: &str,
        handler: H,
    ) -> Result<(), RouteError> {
        self.handle_methods(method.into(), pattern, handler)
    }

    /// Register `handler` for every method in `methods` and `pattern`.
    pub fn handle_methods<H: Handler>(
        &mut self,
        methods: MethodSet,
        pattern: &str,
        handler: H,
    ) -> Result<(), RouteError> {
        self.tree.register(&methods, pattern, Arc::new(handler))
    }

    /// Replace the error handler.
    pub fn handle_error<E: ErrorHandler>(&mut self, error_handler: E) {
        self.error_handler = Arc::new(error_handler);
    }

    pub fn routes(&self) -> &RouteTree<BoxHandler> {
        &self.tree
    }

    /// Find the route matching the decoded path of `req`.
    pub fn lookup<B>(&self, req: &Request<B>) -> Option<MuxMatch> {
        let path = decode_path(req.uri().path())?;
        self.tree.lookup(&path)
    }

    /// Resolve `method` and the percent-encoded `path`.
    ///
    /// A path that does not decode to UTF-8 matches nothing.
    pub fn resolve(&self, method: &Method, path: &str) -> Resolution<BoxHandler> {
        match decode_path(path) {
            Some(path) => Resolution::resolve(&self.tree, method, &path),
            None => Resolution::NotFound,
        }
    }

    /// Dispatch `req` to its handler, returning routing failures and
    /// handler errors unrendered.
    pub async fn dispatch(&self, req: Request<Body>) -> Result<Response, DispatchError> {
        let resolution = self.resolve(req.method(), req.uri().path());
        run(resolution, req).await
    }

    /// Dispatch `req`, rendering any failure through the error handler.
    pub async fn serve(&self, req: Request<Body>) -> Response {
        let start = Instant::now();
        let method = req.method().clone();
        let uri = req.uri().clone();
        let request_id = req.request_id().unwrap_or("-").to_owned();

        let resolution = self.resolve(&method, uri.path());
        let pattern = resolution.pattern().unwrap_or("none").to_owned();

        let res = match run(resolution, req).await {
            Ok(res) => res,
            Err(err) => tracing::error_span!("dispatch", request_id = %request_id).in_scope(|| {
                if !matches!(err, DispatchError::Handler(_)) {
                    tracing::debug!(method = %method, path = %uri.path(), error = %err, "No handler");
                }
                self.error_handler.handle_error(&method, &uri, err)
            }),
        };

        metrics::record_request(method.as_str(), res.status().as_u16(), &pattern, start);
        res
    }

    /// Freeze the mux into a cloneable service.
    pub fn into_service(self) -> MuxService {
        tracing::info!(routes = self.tree.routes().len(), "Mux ready");
        MuxService {
            mux: Arc::new(self),
        }
    }
}

fn decode_path(path: &str) -> Option<Cow<'_, str>> {
    percent_decode_str(path).decode_utf8().ok()
}

async fn run(
    resolution: Resolution<BoxHandler>,
    mut req: Request<Body>,
) -> Result<Response, DispatchError> {
    match resolution {
        Resolution::Handler { handler, route } => {
            req.extensions_mut().insert(MatchSlot(route));
            handler.call(req).await.map_err(DispatchError::Handler)
        }
        Resolution::Options { allow } => {
            let mut res = StatusCode::NO_CONTENT.into_response();
            if let Some(value) = allow.header_value() {
                res.headers_mut().insert(header::ALLOW, value);
            }
            Ok(res)
        }
        Resolution::MethodNotAllowed { allow } => Err(DispatchError::MethodNotAllowed { allow }),
        Resolution::NotFound => Err(DispatchError::NotFound),
    }
}

/// A frozen [`Mux`] usable as a tower service.
#[derive(Clone)]
pub struct MuxService {
    mux: Arc<Mux>,
}

impl tower::Service<Request<Body>> for MuxService {
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let mux = Arc::clone(&self.mux);
        async move { Ok(mux.serve(req).await) }.boxed()
    }
}
