//! Route handlers for the analysis API
//!
//! Handlers validate input synchronously, before any job is created, and
//! report problems with a distinguishing code rather than coercing them.
//! The submit body is inspected as untyped JSON so that a missing `url` and
//! a non-string `url` produce different codes, matching the API contract.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use super::AppState;
use crate::analysis::{AnalysisJob, JobStats};
use crate::url::{is_valid_url, normalize_url};
use crate::ApiError;

/// Success envelope wrapping a single payload
#[derive(Serialize)]
struct DataResponse<T: Serialize> {
    success: bool,
    data: T,
}

impl<T: Serialize> DataResponse<T> {
    fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Error envelope with a machine-readable code
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::MissingUrl
            | ApiError::InvalidUrlType
            | ApiError::InvalidUrlFormat
            | ApiError::InvalidLimit
            | ApiError::InvalidOffset => StatusCode::BAD_REQUEST,
            ApiError::AnalysisNotFound => StatusCode::NOT_FOUND,
            ApiError::AnalysisCreationFailed | ApiError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorBody {
            error: self.to_string(),
            code: self.code(),
        };

        (status, Json(body)).into_response()
    }
}

// ===== GET /api/health =====

/// JSON response body for the liveness probe
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
    timestamp: String,
}

/// Handler for `GET /api/health`
pub async fn get_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "OK",
        message: "Stacksight backend is running",
        timestamp: Utc::now().to_rfc3339(),
    })
}

// ===== POST /api/analyze =====

/// Handler for `POST /api/analyze`
///
/// Accepts `{"url": "..."}`. The URL is normalized first and validated
/// second, so schemeless input like `example.com` is accepted. Returns
/// `201` with the freshly created job snapshot, whose status is always
/// `analyzing` - results arrive via polling.
pub async fn start_analysis(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let url = match body.get("url") {
        None | Some(Value::Null) => return Err(ApiError::MissingUrl),
        Some(Value::String(raw)) if raw.is_empty() => return Err(ApiError::MissingUrl),
        Some(Value::String(raw)) => raw.clone(),
        Some(_) => return Err(ApiError::InvalidUrlType),
    };

    let normalized = normalize_url(&url);
    if !is_valid_url(&normalized) {
        return Err(ApiError::InvalidUrlFormat);
    }

    let id = state.service.submit(&normalized);

    // The record was inserted synchronously during submit, so a miss here is
    // an internal inconsistency rather than a client error.
    let job = state
        .service
        .store()
        .get(&id)
        .ok_or(ApiError::AnalysisCreationFailed)?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(job))))
}

// ===== GET /api/analysis/{id} =====

/// Handler for `GET /api/analysis/{id}`
///
/// An unknown id is a normal outcome and maps to `404 ANALYSIS_NOT_FOUND`.
pub async fn get_analysis(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let job = state
        .service
        .store()
        .get(&id)
        .ok_or(ApiError::AnalysisNotFound)?;

    Ok(Json(DataResponse::new(job)))
}

// ===== GET /api/analyses =====

/// Pagination and stats metadata attached to list responses
#[derive(Serialize)]
struct ListMeta {
    total: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<usize>,

    stats: JobStats,
}

/// JSON response body for `GET /api/analyses`
#[derive(Serialize)]
struct ListResponse {
    success: bool,
    data: Vec<AnalysisJob>,
    meta: ListMeta,
}

/// Handler for `GET /api/analyses`
///
/// Optional `limit` (positive integer) and `offset` (non-negative integer)
/// query parameters page through the newest-first list. The parameters are
/// parsed by hand so each failure gets its own code instead of a generic
/// deserialization error.
pub async fn list_analyses(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = match params.get("limit") {
        Some(raw) => {
            let parsed = raw
                .parse::<usize>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or(ApiError::InvalidLimit)?;
            Some(parsed)
        }
        None => None,
    };

    let offset = match params.get("offset") {
        Some(raw) => Some(raw.parse::<usize>().map_err(|_| ApiError::InvalidOffset)?),
        None => None,
    };

    let store = state.service.store();
    let data = store.list_page(limit, offset);
    let meta = ListMeta {
        total: store.count(),
        limit,
        offset,
        stats: store.stats(),
    };

    Ok(Json(ListResponse {
        success: true,
        data,
        meta,
    }))
}
