//! HTTP API layer for Stacksight
//!
//! A thin axum router over the analysis service. Endpoints:
//!
//! | Method | Path                 | Description                          |
//! |--------|----------------------|--------------------------------------|
//! | `POST` | `/api/analyze`       | Submit a URL for analysis            |
//! | `GET`  | `/api/analysis/{id}` | Fetch one analysis by id             |
//! | `GET`  | `/api/analyses`      | List analyses, newest first          |
//! | `GET`  | `/api/health`        | Liveness probe                       |
//!
//! Successful responses use the envelope `{"success": true, "data": ...}`;
//! errors use `{"error": "<message>", "code": "<CODE>"}` with a
//! machine-readable code (see [`crate::ApiError`]).
//!
//! CORS is wide open: the browser frontend is served from a different
//! origin and the API carries no credentials.

mod routes;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::analysis::AnalysisService;

/// Shared application state passed to all route handlers
#[derive(Clone)]
pub struct AppState {
    /// The analysis service handling submissions and reads
    pub service: AnalysisService,
}

/// Builds the API router around the given service
///
/// Split out from [`run_server`] so tests can serve the exact production
/// router on an ephemeral port.
pub fn router(service: AnalysisService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(routes::get_health))
        .route("/api/analyze", post(routes::start_analysis))
        .route("/api/analysis/{id}", get(routes::get_analysis))
        .route("/api/analyses", get(routes::list_analyses))
        .layer(cors)
        .with_state(AppState { service })
}

/// Starts the HTTP server and runs until the process is terminated
///
/// # Arguments
///
/// * `bind` - Address and port to listen on, e.g. `127.0.0.1:3001`
/// * `service` - The analysis service backing the API
pub async fn run_server(bind: &str, service: AnalysisService) -> crate::Result<()> {
    let app = router(service);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
