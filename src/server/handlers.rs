//! HTTP request handlers for the directory API.
//!
//! # Endpoints
//!
//! - `GET /` - Liveness check that round-trips to the database
//! - `GET /health` - Process health, no database access
//! - `GET /getOrg` - Verified organizations, optionally searched (Basic auth)
//! - `GET /getQuaratineBuildingCount` - Total quarantine buildings
//! - `GET /getQuaratineBuildingList` - One page of quarantine buildings

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::directory::{BuildingPage, DirectoryService, QtBuilding};
use crate::error::{RequestError, StoreError};
use crate::store::DirectoryStore;

/// Content type used by every JSON endpoint. Existing clients expect it.
pub const JSON_CONTENT_TYPE: &str = "text/json";

/// Body of a successful `GET /`.
pub const INDEX_BODY: &str = "Databases:\nAPI Running";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the directory service.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<S: DirectoryStore> {
    pub directory: Arc<DirectoryService<S>>,
}

impl<S: DirectoryStore> AppState<S> {
    pub fn new(directory: DirectoryService<S>) -> Self {
        Self {
            directory: Arc::new(directory),
        }
    }
}

impl<S: DirectoryStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Query parameters for `GET /getOrg`.
///
/// Built from the raw pair list; when a key repeats, its first value is used.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OrganizationQueryParams {
    /// Column to search; must be allow-listed or it is ignored
    pub search_key: Option<String>,

    /// Value to search for; always bound, never interpolated
    pub search_val: Option<String>,
}

impl OrganizationQueryParams {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            search_key: first_value(pairs, "search_key"),
            search_val: first_value(pairs, "search_val"),
        }
    }

    /// The search pair, if both halves were supplied.
    pub fn search(&self) -> Option<(&str, &str)> {
        match (&self.search_key, &self.search_val) {
            (Some(key), Some(value)) => Some((key.as_str(), value.as_str())),
            _ => None,
        }
    }
}

/// Query parameters for `GET /getQuaratineBuildingList`.
///
/// Kept as raw strings so malformed values produce a JSON error instead of a
/// generic extractor rejection. Repeated keys use their first value.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildingListQueryParams {
    pub start: Option<String>,

    /// Page size
    pub count: Option<String>,

    pub district: Option<String>,
}

impl BuildingListQueryParams {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            start: first_value(pairs, "start"),
            count: first_value(pairs, "count"),
            district: first_value(pairs, "district"),
        }
    }

    pub fn page(&self) -> Result<BuildingPage, RequestError> {
        BuildingPage::from_params(
            self.start.as_deref(),
            self.count.as_deref(),
            self.district.as_deref(),
        )
    }
}

fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, value)| value.clone())
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "internal_error", "invalid_parameter")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Response from `GET /getQuaratineBuildingCount`.
#[derive(Debug, Serialize, Deserialize)]
pub struct BuildingCountResponse {
    pub count: i64,
}

/// Response from `GET /getQuaratineBuildingList`.
///
/// `count` is the number of rows in `data`, not the table total.
#[derive(Debug, Serialize, Deserialize)]
pub struct BuildingListResponse {
    pub data: Vec<QtBuilding>,
    pub count: usize,
}

impl From<Vec<QtBuilding>> for BuildingListResponse {
    fn from(data: Vec<QtBuilding>) -> Self {
        let count = data.len();
        Self { data, count }
    }
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Errors surfaced by handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Database failure; detail is logged, never returned
    Store(StoreError),

    /// Malformed request parameter
    Request(RequestError),

    /// Response body could not be encoded
    Serialization(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        ApiError::Request(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Request(RequestError::MalformedQuery(rejection.body_text()))
    }
}

/// Convert ApiError to HTTP response.
///
/// Server errors are logged at ERROR level with full detail and answered with
/// a generic message. Client errors are logged at WARN level and echoed back.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::Request(err) => (
                StatusCode::BAD_REQUEST,
                "invalid_parameter",
                err.to_string(),
            ),
            ApiError::Store(_) | ApiError::Serialization(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal Error".to_string(),
            ),
        };

        match &self {
            ApiError::Store(err) => {
                error!(
                    error_type = error_type,
                    status = status.as_u16(),
                    "Could not query db: {}",
                    err
                );
            }
            ApiError::Serialization(detail) => {
                error!(
                    error_type = error_type,
                    status = status.as_u16(),
                    "Could not encode response: {}",
                    detail
                );
            }
            ApiError::Request(_) => {
                warn!(
                    error_type = error_type,
                    status = status.as_u16(),
                    "Client error: {}",
                    message
                );
            }
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);
        (status, Json(error_response)).into_response()
    }
}

/// Serialize `value` as a `text/json` response.
fn text_json<T: Serialize>(value: &T) -> Result<Response, ApiError> {
    let body = serde_json::to_vec(value).map_err(|e| ApiError::Serialization(e.to_string()))?;
    Ok((
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static(JSON_CONTENT_TYPE),
        )],
        body,
    )
        .into_response())
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle liveness requests.
///
/// # Endpoint
///
/// `GET /`
///
/// # Response
///
/// `200 OK` with a short text body once the database answers a ping,
/// `500 Internal Server Error` otherwise.
pub async fn index_handler<S: DirectoryStore>(
    State(state): State<AppState<S>>,
) -> Result<Response, ApiError> {
    state.directory.ping().await?;

    Ok((
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static(JSON_CONTENT_TYPE),
        )],
        INDEX_BODY,
    )
        .into_response())
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle organization listing and search.
///
/// # Endpoint
///
/// `GET /getOrg`
///
/// # Query Parameters
///
/// - `search_key`: One of `name`, `type`, `district`, `address` (substring
///   match) or `id`, `verified` (exact match). Other values are ignored.
/// - `search_val`: Value to search for
///
/// Repeated keys use their first value.
///
/// # Response
///
/// `200 OK` with a bare JSON array of verified organizations ordered by id.
/// Organizations that hide their contact details are redacted.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid Basic credentials (middleware)
/// - `500 Internal Server Error`: Database error
pub async fn organizations_handler<S: DirectoryStore>(
    State(state): State<AppState<S>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(pairs) = query?;
    let params = OrganizationQueryParams::from_pairs(&pairs);
    let organizations = state.directory.organizations(params.search()).await?;
    text_json(&organizations)
}

/// Handle quarantine building count requests.
///
/// # Endpoint
///
/// `GET /getQuaratineBuildingCount`
///
/// # Response
///
/// ```json
/// { "count": 1234 }
/// ```
pub async fn building_count_handler<S: DirectoryStore>(
    State(state): State<AppState<S>>,
) -> Result<Response, ApiError> {
    let count = state.directory.quarantine_building_count().await?;
    text_json(&BuildingCountResponse { count })
}

/// Handle quarantine building list requests.
///
/// # Endpoint
///
/// `GET /getQuaratineBuildingList`
///
/// # Query Parameters
///
/// - `start`: Smallest id to return (default: 1)
/// - `count`: Page size (default: 200, max: 1000)
/// - `district`: Only return buildings in this district
///
/// Repeated keys use their first value.
///
/// # Response
///
/// ```json
/// { "data": [ { "id": 1, "chiAddr": "...", ... } ], "count": 1 }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: `start` or `count` is not a non-negative integer, or `count` is 0
/// - `500 Internal Server Error`: Database error
pub async fn building_list_handler<S: DirectoryStore>(
    State(state): State<AppState<S>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(pairs) = query?;
    let page = BuildingListQueryParams::from_pairs(&pairs).page()?;
    let buildings = state.directory.quarantine_buildings(&page).await?;
    text_json(&BuildingListResponse::from(buildings))
}

// =============================================================================
// Tests
// =============================================================================
