//! Directory service: the pipeline between HTTP handlers and the store.
//!
//! Each call is independent and holds no state between requests. The flow
//! for organization listings is:
//!
//! 1. Resolve the optional search key against the allow-lists
//! 2. Fetch raw rows from the store
//! 3. Map rows into [`Organization`] records
//! 4. Apply the [`RedactionPolicy`]

use std::sync::Arc;

use tracing::debug;

use super::filter::FieldFilter;
use super::model::{Organization, QtBuilding};
use super::page::BuildingPage;
use super::redact::RedactionPolicy;
use crate::error::StoreError;
use crate::store::DirectoryStore;

/// Read-only access to organizations and quarantine buildings.
pub struct DirectoryService<S: DirectoryStore> {
    store: Arc<S>,
    redaction: RedactionPolicy,
}

impl<S: DirectoryStore> DirectoryService<S> {
    /// Create a service with the default redaction policy.
    pub fn new(store: S) -> Self {
        Self::with_redaction(store, RedactionPolicy::default())
    }

    pub fn with_redaction(store: S, redaction: RedactionPolicy) -> Self {
        Self {
            store: Arc::new(store),
            redaction,
        }
    }

    /// List verified organizations, optionally narrowed by a search.
    ///
    /// `search` is the raw `(search_key, search_val)` pair. A key that is not
    /// allow-listed is ignored and the full listing is returned.
    pub async fn organizations(
        &self,
        search: Option<(&str, &str)>,
    ) -> Result<Vec<Organization>, StoreError> {
        let filter = search.and_then(|(key, value)| {
            let filter = FieldFilter::parse(key, value);
            if filter.is_none() {
                debug!(search_key = key, "Ignoring search on non allow-listed field");
            }
            filter
        });

        let rows = self.store.organizations(filter.as_ref()).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let mut org = Organization::from(row);
                self.redaction.apply(&mut org);
                org
            })
            .collect())
    }

    /// Fetch one page of quarantine buildings.
    pub async fn quarantine_buildings(
        &self,
        page: &BuildingPage,
    ) -> Result<Vec<QtBuilding>, StoreError> {
        self.store.quarantine_buildings(page).await
    }

    /// Total number of quarantine buildings.
    pub async fn quarantine_building_count(&self) -> Result<i64, StoreError> {
        self.store.quarantine_building_count().await
    }

    /// Confirm the store is reachable.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }
}
