//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, tower layers, request ID)
//!     → dispatch.rs (route lookup, HEAD/OPTIONS policy, handler call)
//!     → handler.rs (user handler, sees the match via from_request)
//!     → error.rs (not found / method not allowed / handler error → response)
//!     → Send to client
//! ```

pub mod dispatch;
pub mod error;
pub mod handler;
pub mod request;
pub mod server;

pub use dispatch::{from_request, Mux, MuxMatch, MuxService, Resolution};
pub use error::{DispatchError, ErrorHandler, StatusErrorHandler};
pub use handler::{infallible, BoxError, BoxHandler, Handler};
pub use request::{MakeRequestUuid, RequestIdExt, X_REQUEST_ID};
pub use server::HttpServer;
