//! HTTP server layer for the directory API.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │     GET /getOrg   GET /getQuaratineBuilding{Count,List}         │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐  │
//! │  │  handlers   │  │    auth     │  │        routes           │  │
//! │  │ (requests)  │  │ (basic auth)│  │  (router, CORS)         │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod handlers;
pub mod routes;

pub use auth::{
    basic_auth_middleware, parse_basic_credentials, AuthError, AuthRejection, BasicAuth,
    CredentialVerifier, StaticCredentials,
};
pub use handlers::{
    building_count_handler, building_list_handler, health_handler, index_handler,
    organizations_handler, ApiError, AppState, BuildingCountResponse, BuildingListQueryParams,
    BuildingListResponse, ErrorResponse, HealthResponse, OrganizationQueryParams,
};
pub use routes::{create_router, RouterConfig};
