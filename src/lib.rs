//! # Antivirus API
//!
//! HTTP API serving the organization directory and quarantine-building
//! records of a public-health information site from a Cloud SQL (MySQL)
//! database.
//!
//! ## Features
//!
//! - **Allow-listed search**: organizations can be filtered by a single
//!   allow-listed column; values are always bound parameters
//! - **Aggregated joins**: related resource and serving-target ids are
//!   collected by the database and returned as ordered lists
//! - **Visibility redaction**: organizations that hide their contact details
//!   have their address and coordinates cleared
//! - **Paged listings**: quarantine buildings are served in id-ordered pages
//! - **Basic authentication**: the organization endpoint is protected by a
//!   pluggable credential verifier
//!
//! ## Architecture
//!
//! - [`directory`] - Domain records, search filters, row mapping and redaction
//! - [`store`] - Storage trait, SQL builder and the MySQL implementation
//! - [`server`] - Axum handlers, Basic auth and router
//! - [`config`] - CLI and environment configuration
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use antivirus_api::{create_router, DirectoryService, MySqlStore, RouterConfig, StaticCredentials};
//!
//! #[tokio::main]
//! async fn main() {
//!     let options = MySqlStore::url_options("mysql://api@localhost/antivirus").unwrap();
//!     let store = MySqlStore::connect(options, 10, Duration::from_secs(10)).await.unwrap();
//!
//!     let router = create_router(
//!         DirectoryService::new(store),
//!         RouterConfig::new(StaticCredentials::new("admin", "secret")),
//!     );
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod directory;
pub mod error;
pub mod server;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use directory::{
    lookup_field, split_aggregate, BuildingPage, DirectoryService, FieldFilter, FieldLookup,
    MatchMode, Organization, OrganizationRow, QtBuilding, RedactField, RedactionPolicy,
};
pub use error::{RequestError, StoreError};
pub use server::{
    create_router, ApiError, AppState, BasicAuth, CredentialVerifier, ErrorResponse,
    RouterConfig, StaticCredentials,
};
pub use store::{
    organization_query, quarantine_page_query, DirectoryStore, MySqlStore, SqlParam,
    SqlStatement,
};
