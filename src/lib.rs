//! pathmux: a segment-tree HTTP request dispatcher.
//!
//! Register handlers by method and path pattern on a [`Mux`], then serve it.
//! Each request goes to the handler of the most specific matching pattern;
//! handlers read captured path parameters through [`from_request`].
//!
//! ```no_run
//! use axum::{body::Body, http::{Method, Request}, response::IntoResponse};
//! use pathmux::{from_request, BoxError, Mux};
//!
//! # fn main() -> Result<(), pathmux::RouteError> {
//! let mut mux = Mux::new();
//! mux.handle(Method::GET, "/greet/:name", |req: Request<Body>| async move {
//!     let name = from_request(&req).map(|m| m.param("name").to_owned()).unwrap_or_default();
//!     Ok::<_, BoxError>(format!("Hello, {name}!").into_response())
//! })?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::ServerConfig;
pub use http::{from_request, BoxError, DispatchError, HttpServer, Mux, MuxMatch};
pub use lifecycle::Shutdown;
pub use routing::{MethodSet, RouteError, RouteMatch, RouteTree};
