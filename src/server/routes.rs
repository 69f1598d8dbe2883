//! Router configuration for the directory API.
//!
//! # Route Structure
//!
//! ```text
//! /                              - Liveness with database ping (public)
//! /health                        - Process health (public)
//! /getOrg                        - Organization listing/search (Basic auth)
//! /getQuaratineBuildingCount     - Quarantine building total (public)
//! /getQuaratineBuildingList      - Quarantine building page (public)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use antivirus_api::server::routes::{create_router, RouterConfig};
//! use antivirus_api::server::auth::StaticCredentials;
//! use antivirus_api::directory::DirectoryService;
//!
//! let directory = DirectoryService::new(store);
//! let config = RouterConfig::new(StaticCredentials::new("admin", "secret"))
//!     .with_credentialed_origins(vec!["https://frontend.example.com".to_string()]);
//!
//! let router = create_router(directory, config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use http::header::AUTHORIZATION;
use http::{HeaderValue, Method};
use tower_http::cors::{AllowCredentials, AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::{basic_auth_middleware, BasicAuth, CredentialVerifier, DEFAULT_REALM};
use super::handlers::{
    building_count_handler, building_list_handler, health_handler, index_handler,
    organizations_handler, AppState,
};
use crate::directory::DirectoryService;
use crate::store::DirectoryStore;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone)]
pub struct RouterConfig {
    /// Verifier for the Basic-protected organization endpoint
    pub verifier: Arc<dyn CredentialVerifier>,

    /// Realm advertised in `WWW-Authenticate` challenges
    pub auth_realm: String,

    /// Origins that may send credentialed cross-origin requests.
    /// Every origin may send plain cross-origin requests.
    pub credentialed_origins: Vec<String>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a router configuration around a credential verifier.
    ///
    /// By default:
    /// - The realm is [`DEFAULT_REALM`]
    /// - No origin receives credentialed CORS responses
    /// - Tracing is enabled
    pub fn new(verifier: impl CredentialVerifier) -> Self {
        Self {
            verifier: Arc::new(verifier),
            auth_realm: DEFAULT_REALM.to_string(),
            credentialed_origins: Vec::new(),
            enable_tracing: true,
        }
    }

    pub fn with_auth_realm(mut self, realm: impl Into<String>) -> Self {
        self.auth_realm = realm.into();
        self
    }

    pub fn with_credentialed_origins(mut self, origins: Vec<String>) -> Self {
        self.credentialed_origins = origins;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// The organization endpoint sits behind Basic auth; everything else is
/// public. CORS applies to all routes.
pub fn create_router<S>(directory: DirectoryService<S>, config: RouterConfig) -> Router
where
    S: DirectoryStore,
{
    let app_state = AppState::new(directory);
    let auth = BasicAuth::new(Arc::clone(&config.verifier), &config.auth_realm);
    let cors = build_cors_layer(&config);

    let protected_routes = Router::new()
        .route("/getOrg", get(organizations_handler::<S>))
        .route_layer(middleware::from_fn_with_state(auth, basic_auth_middleware))
        .with_state(app_state.clone());

    let public_routes = Router::new()
        .route("/", get(index_handler::<S>))
        .route("/health", get(health_handler))
        .route("/getQuaratineBuildingCount", get(building_count_handler::<S>))
        .route("/getQuaratineBuildingList", get(building_list_handler::<S>))
        .with_state(app_state);

    let router = Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer.
///
/// Any origin may make plain requests. When credentialed origins are
/// configured the request origin is mirrored back, and only those origins get
/// `Access-Control-Allow-Credentials: true`.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION]);

    let credentialed: Vec<HeaderValue> = config
        .credentialed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    if credentialed.is_empty() {
        return cors.allow_origin(Any);
    }

    cors.allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(AllowCredentials::predicate(move |origin, _parts| {
            credentialed.iter().any(|allowed| allowed == origin)
        }))
}

// =============================================================================
// Tests
// =============================================================================
