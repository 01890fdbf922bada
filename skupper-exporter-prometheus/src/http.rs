//! HTTP server for the Prometheus metrics endpoint.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::collector::SkupperCollector;
use crate::controller::StatsSource;
use crate::metrics::render_families;
use crate::probe::LinkProbe;

/// Create the HTTP router.
fn create_router<S, P>(collector: Arc<SkupperCollector<S, P>>) -> Router
where
    S: StatsSource + Send + Sync + 'static,
    P: LinkProbe + Send + Sync + 'static,
{
    Router::new()
        .route("/metrics", get(metrics_handler::<S, P>))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .with_state(collector)
}

/// Handler for the /metrics endpoint.
///
/// Each request runs one full scrape cycle. A failed cycle surfaces as
/// 500 so the scraper records a failed scrape rather than reading stale
/// or partial data.
async fn metrics_handler<S, P>(
    State(collector): State<Arc<SkupperCollector<S, P>>>,
) -> Response
where
    S: StatsSource + Send + Sync + 'static,
    P: LinkProbe + Send + Sync + 'static,
{
    match collector.collect().await {
        Ok(families) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            render_families(&families),
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "scrape failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("scrape failed: {err}\n"),
            )
                .into_response()
        }
    }
}

/// Handler for the /health endpoint.
async fn health_handler() -> Response {
    (StatusCode::OK, "healthy\n").into_response()
}

/// HTTP server serving the compiled metrics.
pub struct HttpServer<S, P> {
    collector: Arc<SkupperCollector<S, P>>,
    listen_addr: SocketAddr,
}

impl<S, P> HttpServer<S, P>
where
    S: StatsSource + Send + Sync + 'static,
    P: LinkProbe + Send + Sync + 'static,
{
    /// Create a new HTTP server.
    pub fn new(collector: Arc<SkupperCollector<S, P>>, listen_addr: SocketAddr) -> Self {
        Self {
            collector,
            listen_addr,
        }
    }

    /// Run the HTTP server until the shutdown signal is received.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> anyhow::Result<()> {
        let router = create_router(self.collector);

        let listener = tokio::net::TcpListener::bind(self.listen_addr)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", self.listen_addr, e))?;

        info!(addr = %self.listen_addr, "HTTP server listening");

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ProbeError, ScrapeError};
    use crate::stats::{ControllerStats, Service};
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    struct StaticStats(ControllerStats);

    impl StatsSource for StaticStats {
        async fn fetch_stats(&self) -> Result<ControllerStats, ScrapeError> {
            Ok(self.0.clone())
        }
    }

    struct StaticReport(&'static str);

    impl LinkProbe for StaticReport {
        async fn fetch_status(&self) -> Result<String, ScrapeError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingProbe;

    impl LinkProbe for FailingProbe {
        async fn fetch_status(&self) -> Result<String, ScrapeError> {
            Err(ScrapeError::LinkProbeUnavailable(ProbeError::Timeout(
                std::time::Duration::from_secs(3),
            )))
        }
    }

    fn stats_with_one_service() -> ControllerStats {
        ControllerStats {
            sites: vec![],
            services: vec![Service {
                address: "payments".to_string(),
                protocol: "tcp".to_string(),
            }],
        }
    }

    const REPORT: &str = "\
Links created from this site:
-------------------------------
Link site-01 is active
";

    #[tokio::test]
    async fn test_metrics_endpoint_renders_scrape() {
        let collector = Arc::new(SkupperCollector::new(
            StaticStats(stats_with_one_service()),
            StaticReport(REPORT),
        ));
        let router = create_router(collector);

        let response = router
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get("content-type").unwrap();
        assert!(content_type.to_str().unwrap().contains("text/plain"));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("# TYPE skupper_service_count gauge"));
        assert!(body.contains("skupper_service_count 1"));
        assert!(body.contains("skupper_link_status{link_name=\"site-01\"} 1"));
    }

    #[tokio::test]
    async fn test_metrics_endpoint_fails_whole_scrape() {
        let collector = Arc::new(SkupperCollector::new(
            StaticStats(stats_with_one_service()),
            FailingProbe,
        ));
        let router = create_router(collector);

        let response = router
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        // No partial output: the body is an error message, not metrics.
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(!body.contains("skupper_service_count"));
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let collector = Arc::new(SkupperCollector::new(
            StaticStats(ControllerStats::default()),
            StaticReport(""),
        ));
        let router = create_router(collector);

        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
