//! HTTP server for the index page and Prometheus metrics endpoint.

use std::net::SocketAddr;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::scrape::SharedScraper;

/// Static landing page.
pub const INDEX_HTML: &str = r#"<!doctype html>
<html>
    <head>
        <meta charset="utf-8">
        <title>CoinMarketCap Exporter</title>
    </head>
    <body>
        <h1>CoinMarketCap Exporter</h1>
        <p><a href="/metrics">Metrics</a></p>
    </body>
</html>
"#;

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    scraper: SharedScraper,
}

/// Create the HTTP router.
pub fn create_router(scraper: SharedScraper, metrics_path: &str) -> Router {
    let state = AppState { scraper };

    Router::new()
        .route("/", get(index_handler))
        .route(metrics_path, get(metrics_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Handler for the index page.
async fn index_handler() -> Html<&'static str> {
    info!("Serving /index");
    Html(INDEX_HTML)
}

/// Handler for the metrics endpoint.
///
/// Always answers 200; upstream failures only show in `coinmarketcap_up`.
async fn metrics_handler(State(state): State<AppState>) -> Response {
    info!("Serving /metrics");
    let body = state.scraper.scrape().await.render();

    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}

/// HTTP server configuration.
pub struct HttpServer {
    scraper: SharedScraper,
    listen_addr: SocketAddr,
    metrics_path: String,
}

impl HttpServer {
    /// Create a new HTTP server.
    pub fn new(scraper: SharedScraper, listen_addr: SocketAddr, metrics_path: String) -> Self {
        Self {
            scraper,
            listen_addr,
            metrics_path,
        }
    }

    /// Run the HTTP server until the shutdown signal is received.
    pub async fn run(self, shutdown: watch::Receiver<bool>) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_addr)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", self.listen_addr, e))?;

        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until the shutdown signal is received.
    pub async fn serve(
        self,
        listener: tokio::net::TcpListener,
        mut shutdown: watch::Receiver<bool>,
    ) -> anyhow::Result<()> {
        let router = create_router(self.scraper, &self.metrics_path);
        let addr = listener.local_addr()?;

        info!(
            addr = %addr,
            path = %self.metrics_path,
            "HTTP server listening"
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                loop {
                    if shutdown.changed().await.is_err() {
                        break;
                    }
                    if *shutdown.borrow() {
                        break;
                    }
                }
                info!("HTTP server shutting down");
            })
            .await
            .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;

        info!("HTTP server stopped");
        Ok(())
    }
}
