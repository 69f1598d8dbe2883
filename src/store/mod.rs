//! Storage layer for directory records.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           DirectoryService              │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │         DirectoryStore Trait            │
//! │  (raw rows for the two fixed queries)   │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │  MySqlStore (sqlx pool + query builder) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! The trait is the seam used by tests: the HTTP layer only ever sees a
//! `DirectoryStore`, so an in-memory implementation can stand in for MySQL.

mod mysql;
mod query;

use async_trait::async_trait;

use crate::directory::{BuildingPage, FieldFilter, OrganizationRow, QtBuilding};
use crate::error::StoreError;

pub use mysql::{MySqlStore, DEFAULT_MAX_CONNECTIONS, DEFAULT_QUERY_TIMEOUT};
pub use query::{
    organization_query, quarantine_page_query, SqlParam, SqlStatement, PING_SQL,
    QUARANTINE_COUNT_SQL,
};

/// Read access to the directory tables.
#[async_trait]
pub trait DirectoryStore: Send + Sync + 'static {
    /// Verified organizations ordered by id, optionally narrowed by `filter`.
    ///
    /// Rows are returned unmapped; aggregate splitting and redaction happen
    /// in the service layer.
    async fn organizations(
        &self,
        filter: Option<&FieldFilter>,
    ) -> Result<Vec<OrganizationRow>, StoreError>;

    /// One page of quarantine buildings ordered by id.
    async fn quarantine_buildings(&self, page: &BuildingPage)
        -> Result<Vec<QtBuilding>, StoreError>;

    /// Total number of quarantine buildings.
    async fn quarantine_building_count(&self) -> Result<i64, StoreError>;

    /// Round-trip to the database to confirm it is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
