//! pathmux demo server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request      ┌──────────┐    ┌──────────┐    ┌──────────────┐
//!     ───────────────────▶│ listener │───▶│  tower   │───▶│     mux      │
//!                         │  (axum)  │    │  layers  │    │  dispatch    │
//!                         └──────────┘    └──────────┘    └──────┬───────┘
//!                                                                │ lookup
//!                                                                ▼
//!                                                         ┌──────────────┐
//!                                                         │ routing tree │
//!                                                         └──────┬───────┘
//!     Client Response                                            │ handler / 404 / 405 / 204
//!     ◀──────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands:
//! - `serve` runs the demo routes over HTTP
//! - `resolve METHOD PATH` prints what a request would resolve to
//! - `routes` lists the registered routes

use std::path::PathBuf;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    response::IntoResponse,
};
use clap::{Parser, Subcommand};
use serde_json::json;
use tokio::net::TcpListener;

use pathmux::config::{load_config, ServerConfig};
use pathmux::http::{from_request, infallible, BoxError, HttpServer, Mux, Resolution};
use pathmux::lifecycle::{signals, Shutdown};
use pathmux::observability::{logging, metrics};
use pathmux::routing::{MethodSet, RouteError};

#[derive(Parser)]
#[command(name = "pathmux")]
#[command(about = "Segment-tree HTTP request dispatcher", long_about = None)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the demo routes
    Serve {
        /// Override listener.bind_address
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Show how a request would be dispatched
    Resolve { method: String, path: String },
    /// List registered routes
    Routes,
}

/// The demo route table.
fn build_mux() -> Result<Mux, RouteError> {
    let mut mux = Mux::new();

    mux.handle(
        Method::GET,
        "/health",
        infallible(|_req: Request<Body>| async { "ok" }),
    )?;

    mux.handle(Method::GET, "/greet/:name", |req: Request<Body>| async move {
        let name = from_request(&req)
            .map(|m| m.param("name").to_owned())
            .unwrap_or_default();
        Ok::<_, BoxError>(format!("Hello, {name}!").into_response())
    })?;

    mux.handle(Method::GET, "/files/*path", |req: Request<Body>| async move {
        let path = from_request(&req)
            .map(|m| m.param("path").to_owned())
            .unwrap_or_default();
        Ok::<_, BoxError>(axum::Json(json!({ "file": path })).into_response())
    })?;

    mux.handle(
        Method::GET,
        "/users",
        infallible(|_req: Request<Body>| async { axum::Json(json!([])) }),
    )?;
    mux.handle(
        Method::POST,
        "/users",
        infallible(|_req: Request<Body>| async { StatusCode::CREATED }),
    )?;
    mux.handle(
        Method::GET,
        "/users/new",
        infallible(|_req: Request<Body>| async { "new user form" }),
    )?;
    mux.handle_methods(
        MethodSet::new([Method::GET, Method::PUT, Method::DELETE]),
        "/users/:id",
        |req: Request<Body>| async move {
            let Some(route) = from_request(&req) else {
                return Err::<_, BoxError>("route match missing".into());
            };
            let id: u64 = route.param("id").parse()?;
            Ok(axum::Json(json!({ "method": req.method().as_str(), "id": id })).into_response())
        },
    )?;

    Ok(mux)
}

fn resolve(mux: &Mux, method: &str, path: &str) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())?;

    let value = match mux.resolve(&method, path) {
        Resolution::Handler { route, .. } => json!({
            "outcome": "handler",
            "pattern": route.pattern(),
            "params": route
                .params()
                .map(|(k, v)| (k.to_owned(), json!(v)))
                .collect::<serde_json::Map<_, _>>(),
            "allow": route.methods().to_string(),
        }),
        Resolution::Options { allow } => json!({
            "outcome": "options",
            "status": 204,
            "allow": allow.to_string(),
        }),
        Resolution::MethodNotAllowed { allow } => json!({
            "outcome": "method_not_allowed",
            "status": 405,
            "allow": allow.to_string(),
        }),
        Resolution::NotFound => json!({ "outcome": "not_found", "status": 404 }),
    };
    Ok(value)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    logging::init_logging(&config.observability);

    // Registration errors are programming errors: refuse to start.
    let mux = build_mux()?;

    match cli.command.unwrap_or(Commands::Serve { bind: None }) {
        Commands::Resolve { method, path } => {
            let value = resolve(&mux, &method, &path)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Commands::Routes => {
            for entry in mux.routes().routes() {
                println!("{:<24} {}", entry.pattern(), entry.methods());
            }
        }
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.listener.bind_address = bind;
            }

            tracing::info!("pathmux v{} starting", env!("CARGO_PKG_VERSION"));

            if config.observability.metrics_enabled {
                match config.observability.metrics_address.parse() {
                    Ok(addr) => metrics::init_metrics(addr),
                    Err(_) => tracing::error!(
                        metrics_address = %config.observability.metrics_address,
                        "Failed to parse metrics address"
                    ),
                }
            }

            let listener = TcpListener::bind(&config.listener.bind_address).await?;
            tracing::info!(address = %listener.local_addr()?, "Listening for connections");

            let shutdown = Shutdown::new();
            tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

            let server = HttpServer::new(config, mux);
            server.run(listener, shutdown.subscribe()).await?;

            tracing::info!("Shutdown complete");
        }
    }

    Ok(())
}
