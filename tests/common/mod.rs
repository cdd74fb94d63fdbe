//! Shared utilities for integration tests.

use std::net::SocketAddr;

use pathmux::config::ServerConfig;
use pathmux::http::{HttpServer, Mux};
use pathmux::lifecycle::Shutdown;
use tokio::net::TcpListener;

/// A server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: tokio::task::JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Serve `mux` on 127.0.0.1 with the default config.
pub async fn spawn_server(mux: Mux) -> TestServer {
    spawn_server_with(ServerConfig::default(), mux).await
}

/// Serve `mux` on 127.0.0.1 with `config`.
pub async fn spawn_server_with(config: ServerConfig, mux: Mux) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, mux);
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    TestServer {
        addr,
        shutdown,
        handle,
    }
}
