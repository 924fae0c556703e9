//! Router construction and server host for the API.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{HeaderName, Method, Request, header::CONTENT_TYPE},
    routing::{get, post},
};
use reshelf_telemetry::build_sha;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{Span, info};

use crate::error::{ApiServerError, ApiServerResult};
use crate::http::constants::HEADER_REQUEST_ID;
use crate::http::handlers::acquire::download;
use crate::http::handlers::fsops::{
    delete_empty_folders, list_subfolders_body, list_subfolders_query, move_files, rename_files,
};
use crate::http::health::{health, metrics};
use crate::http::telemetry::HttpMetricsLayer;
use crate::state::ApiState;

/// Axum router wrapper that hosts the Reshelf API.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Wire routes and middleware around the shared state.
    #[must_use]
    pub fn new(state: ApiState) -> Self {
        let telemetry = state.telemetry.clone();
        let state = Arc::new(state);
        let cors_layer = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE, HeaderName::from_static(HEADER_REQUEST_ID)])
            .expose_headers([HeaderName::from_static(HEADER_REQUEST_ID)]);
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(HEADER_REQUEST_ID)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("")
                    .to_string();
                tracing::info_span!(
                    "http.request",
                    method = %request.method(),
                    route = %request.uri().path(),
                    request_id = %request_id,
                    build_sha = %build_sha(),
                    status_code = tracing::field::Empty,
                    latency_ms = tracing::field::Empty
                )
            })
            .on_request(|_request: &Request<_>, _span: &Span| {})
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &Span| {
                    span.record("status_code", response.status().as_u16());
                    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                    span.record("latency_ms", latency_ms);
                },
            );
        let route_layers = ServiceBuilder::new()
            .layer(trace_layer)
            .layer(HttpMetricsLayer::new(telemetry));
        let request_ids = ServiceBuilder::new()
            .layer(reshelf_telemetry::set_request_id_layer())
            .layer(reshelf_telemetry::propagate_request_id_layer());

        let router = Self::routes()
            .route_layer(route_layers)
            .layer(cors_layer)
            .layer(request_ids)
            .with_state(state);
        Self { router }
    }

    fn routes() -> Router<Arc<ApiState>> {
        Router::new()
            .route("/health", get(health))
            .route("/metrics", get(metrics))
            .route("/api/download", post(download))
            .route(
                "/api/list_subfolders",
                get(list_subfolders_query).post(list_subfolders_body),
            )
            .route("/api/move_files", post(move_files))
            .route("/api/rename_files", post(rename_files))
            .route("/api/delete_empty_folders", post(delete_empty_folders))
    }

    /// Consume the server and return the configured router.
    #[must_use]
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Serve until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns `Bind` when the listener cannot be opened and `Serve` when the
    /// server loop fails.
    pub async fn serve<F>(self, addr: SocketAddr, shutdown: F) -> ApiServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ApiServerError::Bind { addr, source })?;
        info!(addr = %addr, "api listening");
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|source| ApiServerError::Serve { source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::StatusCode;
    use reshelf_acquire::HttpAcquirer;
    use reshelf_config::AcquireSettings;
    use reshelf_fsops::FsOpsService;
    use reshelf_telemetry::Metrics;
    use reshelf_test_support::TempTree;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    type TestResult = anyhow::Result<()>;

    fn server(metrics: &Metrics) -> anyhow::Result<ApiServer> {
        let acquirer = HttpAcquirer::new(&AcquireSettings::default(), metrics.clone())?;
        Ok(ApiServer::new(ApiState::new(
            FsOpsService::new(metrics.clone()),
            Arc::new(acquirer),
            metrics.clone(),
        )))
    }

    async fn json_body(response: axum::response::Response) -> anyhow::Result<Value> {
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    #[tokio::test]
    async fn health_reports_ok_with_request_id() -> TestResult {
        let metrics = Metrics::new()?;
        let response = server(&metrics)?
            .into_router()
            .oneshot(Request::get("/health").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(HEADER_REQUEST_ID));
        let body = json_body(response).await?;
        assert_eq!(body["status"], "ok");
        assert_eq!(metrics.http_request_count("/health", 200), 1);
        Ok(())
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() -> TestResult {
        let metrics = Metrics::new()?;
        let request = Request::post("/api/move_files")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))?;
        let response = server(&metrics)?.into_router().oneshot(request).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await?;
        assert_eq!(body["success"], false);
        assert!(
            body["error"]
                .as_str()
                .is_some_and(|error| error.starts_with("invalid JSON body"))
        );
        Ok(())
    }

    #[tokio::test]
    async fn list_subfolders_query_round_trip() -> TestResult {
        let tree = TempTree::new()?;
        tree.dir("season_1")?;
        let uri = format!("/api/list_subfolders?root_folder={}", tree.path().display());
        let response = server(&Metrics::new()?)?
            .into_router()
            .oneshot(Request::get(uri).body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await?;
        assert_eq!(body, json!({ "success": true, "subfolders": ["season_1"] }));
        Ok(())
    }

    #[tokio::test]
    async fn invalid_server_address_is_bad_gateway() -> TestResult {
        let request = Request::post("/api/download")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "magnet_links": ["magnet:?xt=a"], "server_addr": "nas.local" })
                    .to_string(),
            ))?;
        let response = server(&Metrics::new()?)?
            .into_router()
            .oneshot(request)
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        Ok(())
    }

    #[tokio::test]
    async fn metrics_endpoint_renders_text() -> TestResult {
        let response = server(&Metrics::new()?)?
            .into_router()
            .oneshot(Request::get("/metrics").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        Ok(())
    }
}
