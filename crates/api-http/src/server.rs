//! HTTP Server
//!
//! Plain hyper http1 accept loop, one task per connection. The same server
//! type serves both surfaces; only the [`Router`] differs.

use crate::error::ServerError;
use crate::handler::Router;
use crate::response::{ApiRequest, ApiResponse};
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_API_PORT: u16 = 8080;
pub const DEFAULT_MANAGER_PORT: u16 = 3000;

/// Request bodies larger than this are rejected with 413
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// HTTP Server Configuration
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
}

impl HttpServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// HTTP Server
pub struct HttpServer {
    config: HttpServerConfig,
    router: Arc<dyn Router>,
}

/// Handle to a server accepting connections in the background
pub struct RunningServer {
    local_addr: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RunningServer {
    /// Bound address (useful with port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait for the accept loop to exit
    ///
    /// Connections already being served run to completion on their own tasks.
    pub async fn shutdown(self) -> Result<(), ServerError> {
        let _ = self.shutdown_tx.send(true);
        self.task
            .await
            .map_err(|_| ServerError::Join(self.local_addr))
    }
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, router: Arc<dyn Router>) -> Self {
        Self { config, router }
    }

    /// Bind the listener and start the accept loop
    pub async fn start(self) -> Result<RunningServer, ServerError> {
        let addr = self.config.addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener
            .local_addr()
            .map_err(|_| ServerError::InvalidAddress(addr.clone()))?;

        info!(
            surface = self.router.name(),
            addr = %local_addr,
            "HTTP server listening"
        );

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(accept_loop(listener, self.router, shutdown_rx));

        Ok(RunningServer {
            local_addr,
            shutdown_tx,
            task,
        })
    }
}

async fn accept_loop(
    listener: TcpListener,
    router: Arc<dyn Router>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    error!(surface = router.name(), error = %e, "Accept failed");
                    continue;
                }
            },
            _ = shutdown_rx.changed() => {
                info!(surface = router.name(), "HTTP server stopped");
                return;
            }
        };

        let io = TokioIo::new(stream);
        let router = router.clone();

        tokio::spawn(async move {
            let service = service_fn(move |req: Request<Incoming>| {
                let router = router.clone();
                async move { Ok::<_, Infallible>(handle_request(router.as_ref(), req).await) }
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                debug!(peer = %peer, error = %e, "Connection error");
            }
        });
    }
}

async fn handle_request(router: &dyn Router, req: Request<Incoming>) -> Response<Full<Bytes>> {
    let (parts, body) = req.into_parts();
    let method = parts.method;
    let path = parts.uri.path().to_string();
    let query = parts.uri.query().map(str::to_string);

    let response = if method == Method::OPTIONS {
        ApiResponse::no_content()
    } else {
        match Limited::new(body, MAX_BODY_BYTES).collect().await {
            Ok(collected) => {
                let request = ApiRequest {
                    method: method.clone(),
                    path: path.clone(),
                    query,
                    body: collected.to_bytes(),
                };
                router.route(&request).await
            }
            Err(e) => {
                debug!(error = %e, "Failed to read request body");
                ApiResponse::error(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
            }
        }
    };

    info!(
        surface = router.name(),
        method = %method,
        path = %path,
        status = response.status.as_u16(),
        "Request handled"
    );

    response.into_hyper()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    struct EchoRouter;

    #[async_trait]
    impl Router for EchoRouter {
        fn name(&self) -> &'static str {
            "echo"
        }

        async fn route(&self, req: &ApiRequest) -> ApiResponse {
            match req.path.as_str() {
                "/echo" => ApiResponse::json(&json!({
                    "method": req.method.as_str(),
                    "query": req.query,
                    "body": req.json_body(),
                })),
                _ => ApiResponse::not_found(),
            }
        }
    }

    async fn start() -> RunningServer {
        HttpServer::new(HttpServerConfig::new("127.0.0.1", 0), Arc::new(EchoRouter))
            .start()
            .await
            .unwrap()
    }

    async fn raw_request(addr: SocketAddr, request: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[tokio::test]
    async fn test_routes_request() {
        let server = start().await;
        let body = r#"{"a":1}"#;
        let request = format!(
            "POST /echo?x=1 HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );

        let response = raw_request(server.local_addr(), &request).await;

        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains(r#""query":"x=1""#));
        assert!(response.contains(r#""body":{"a":1}"#));
        assert!(response.to_lowercase().contains("access-control-allow-origin: *"));

        server.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_options_preflight() {
        let server = start().await;
        let response = raw_request(
            server.local_addr(),
            "OPTIONS /anything HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;

        assert!(response.starts_with("HTTP/1.1 204"));
        assert!(response
            .to_lowercase()
            .contains("access-control-allow-methods: get, post, options"));

        server.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_not_found() {
        let server = start().await;
        let response = raw_request(
            server.local_addr(),
            "GET /missing HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;

        assert!(response.starts_with("HTTP/1.1 404"));
        assert!(response.contains(r#"{"error":"Not found"}"#));

        server.shutdown().await.unwrap();
    }
}
