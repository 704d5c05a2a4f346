//! HTTP server setup and the proxy handler.
//!
//! # Responsibilities
//! - Create the Axum Router with admin, config API and proxy handlers
//! - Wire up middleware (request ID, tracing)
//! - Resolve each proxied request against the cached routes
//! - Forward to the matched target, or answer 404 / 502

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::admin;
use crate::config::ProxyConfig;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::http::response::{proxy_error, route_not_configured};
use crate::observability::metrics;
use crate::proxy::{ForwardError, RequestForwarder};
use crate::store::{self, ConfigCache, ConfigStore};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<ConfigCache>,
    pub forwarder: RequestForwarder,
    pub admin_password: Arc<str>,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a server using the store selected in `config`.
    pub fn new(config: &ProxyConfig) -> Result<Self, ForwardError> {
        Self::with_store(config, store::from_config(&config.store))
    }

    /// Create a server on top of an explicit store.
    pub fn with_store(config: &ProxyConfig, store: Arc<dyn ConfigStore>) -> Result<Self, ForwardError> {
        let cache = Arc::new(ConfigCache::new(
            store,
            config.store.key.clone(),
            config.cache.ttl(),
        ));
        let forwarder = RequestForwarder::new(&config.upstream)?;

        let state = AppState {
            cache,
            forwarder,
            admin_password: Arc::from(config.admin.password.as_str()),
        };

        let router = Self::build_router(state.clone());
        Ok(Self { router, state })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .merge(admin::setup_admin_router())
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = %request.request_id(),
                        )
                    }))
                    .layer(propagate_request_id_layer()),
            )
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve on `listener` until `shutdown` completes, then drain.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main proxy handler.
/// Looks up the route for the path and forwards the request to its target.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request.request_id().to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let table = state.cache.read().await;

    let Some(matched) = table.resolve(&path) else {
        tracing::warn!(request_id = %request_id, path = %path, "No route matched");
        metrics::record_request(method.as_str(), 404, "none", start_time);
        return route_not_configured();
    };

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        route = %matched.route.path,
        target = %matched.route.target,
        "Route matched"
    );

    match state
        .forwarder
        .forward(matched.route, matched.remaining, request)
        .await
    {
        Ok(response) => {
            metrics::record_request(
                method.as_str(),
                response.status().as_u16(),
                &matched.route.path,
                start_time,
            );
            response
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                route = %matched.route.path,
                target = %matched.route.target,
                error = %e,
                "Upstream error"
            );
            metrics::record_request(method.as_str(), 502, &matched.route.path, start_time);
            proxy_error(&e)
        }
    }
}
