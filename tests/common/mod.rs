//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;

use prefix_proxy::config::ProxyConfig;
use prefix_proxy::lifecycle::Shutdown;
use prefix_proxy::store::{ConfigStore, StoreError};
use prefix_proxy::{HttpServer, RoutingConfig};

/// What a mock upstream observed for one request.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    pub path_and_query: String,
    pub host: Option<String>,
    pub body: Vec<u8>,
}

pub type Seen = Arc<Mutex<Vec<SeenRequest>>>;

/// Start an upstream that records requests and answers by path:
/// - `/redirect` → 302 to `/elsewhere`
/// - `/teapot`   → 418
/// - anything else → 200 `"{name} saw {path_and_query}"`
pub async fn start_upstream(name: &'static str) -> (SocketAddr, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();

    let app = Router::new().fallback(move |request: Request<Body>| {
        let recorder = recorder.clone();
        async move { upstream_reply(name, recorder, request).await }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (addr, seen)
}

async fn upstream_reply(name: &'static str, recorder: Seen, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_default();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();

    recorder.lock().unwrap().push(SeenRequest {
        method: parts.method.to_string(),
        path_and_query: path_and_query.clone(),
        host: parts
            .headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body: body.to_vec(),
    });

    match parts.uri.path() {
        "/redirect" => (StatusCode::FOUND, [(header::LOCATION, "/elsewhere")]).into_response(),
        "/teapot" => (StatusCode::IM_A_TEAPOT, [("x-upstream", name)], "short and stout").into_response(),
        _ => (
            StatusCode::OK,
            [("x-upstream", name)],
            format!("{name} saw {path_and_query}"),
        )
            .into_response(),
    }
}

/// Start the proxy on an ephemeral port over `store`.
pub async fn start_proxy(store: Arc<dyn ConfigStore>) -> (SocketAddr, Shutdown) {
    let config = ProxyConfig::default();
    let server = HttpServer::with_store(&config, store).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let stopped = shutdown.signalled();
    tokio::spawn(async move {
        let _ = server.run(listener, stopped).await;
    });
    (addr, shutdown)
}

/// An address nothing listens on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Client that neither follows redirects nor uses a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

/// A store whose every call fails.
pub struct FailingStore;

#[async_trait]
impl ConfigStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<RoutingConfig>, StoreError> {
        Err(StoreError::Unavailable("store offline".into()))
    }

    async fn set(&self, _key: &str, _config: &RoutingConfig) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("store offline".into()))
    }
}
