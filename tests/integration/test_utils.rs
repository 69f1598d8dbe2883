//! Test utilities for integration tests.
//!
//! Provides an in-memory [`DirectoryStore`] that mimics the filtering and
//! paging the MySQL queries perform, plus helpers for building requests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use http_body_util::BodyExt;
use tower::ServiceExt;

use antivirus_api::directory::{
    BuildingPage, DirectoryService, FieldFilter, MatchMode, OrganizationRow, QtBuilding,
};
use antivirus_api::error::StoreError;
use antivirus_api::server::{create_router, RouterConfig, StaticCredentials};
use antivirus_api::store::DirectoryStore;

pub const TEST_USER: &str = "admin";
pub const TEST_PASSWORD: &str = "correct horse";

// =============================================================================
// Mock Directory Store
// =============================================================================

/// An in-memory store with request tracking and failure injection.
#[derive(Clone, Default)]
pub struct MockDirectoryStore {
    organizations: Vec<OrganizationRow>,
    buildings: Vec<QtBuilding>,
    query_count: Arc<AtomicUsize>,
    pages: Arc<Mutex<Vec<BuildingPage>>>,
    failing: Arc<AtomicBool>,
}

impl MockDirectoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_organization(mut self, row: OrganizationRow) -> Self {
        self.organizations.push(row);
        self
    }

    pub fn with_building(mut self, building: QtBuilding) -> Self {
        self.buildings.push(building);
        self
    }

    /// Make every subsequent call fail with a query error.
    pub fn failing(self) -> Self {
        self.failing.store(true, Ordering::SeqCst);
        self
    }

    /// Number of store calls made so far.
    pub fn query_count(&self) -> usize {
        self.query_count.load(Ordering::SeqCst)
    }

    /// Page requests received so far.
    pub fn pages(&self) -> Vec<BuildingPage> {
        self.pages.lock().unwrap().clone()
    }

    fn begin(&self) -> Result<(), StoreError> {
        self.query_count.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Query(
                "Table 'antivirus.organization' doesn't exist".to_string(),
            ));
        }
        Ok(())
    }
}

/// Column value as the database would compare it.
fn column_value(row: &OrganizationRow, column: &str) -> String {
    match column {
        "id" => row.id.to_string(),
        "verified" => row.verified.to_string(),
        "name" => row.name.clone(),
        "type" => row.org_type.clone(),
        "district" => row.district.clone(),
        "address" => row.address.clone(),
        other => panic!("column {} is not filterable", other),
    }
}

fn matches_filter(row: &OrganizationRow, filter: &FieldFilter) -> bool {
    let actual = column_value(row, filter.column());
    match filter.mode() {
        // Default MySQL collations compare case-insensitively
        MatchMode::Substring => actual
            .to_lowercase()
            .contains(&filter.value().to_lowercase()),
        MatchMode::Exact => actual == filter.value(),
    }
}

#[async_trait]
impl DirectoryStore for MockDirectoryStore {
    async fn organizations(
        &self,
        filter: Option<&FieldFilter>,
    ) -> Result<Vec<OrganizationRow>, StoreError> {
        self.begin()?;
        let mut rows: Vec<OrganizationRow> = self
            .organizations
            .iter()
            .filter(|row| row.verified == 1)
            .filter(|row| filter.map_or(true, |f| matches_filter(row, f)))
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }

    async fn quarantine_buildings(
        &self,
        page: &BuildingPage,
    ) -> Result<Vec<QtBuilding>, StoreError> {
        self.begin()?;
        self.pages.lock().unwrap().push(page.clone());
        let mut rows: Vec<QtBuilding> = self
            .buildings
            .iter()
            .filter(|b| b.id as u64 >= page.start)
            .filter(|b| page.district.as_ref().map_or(true, |d| &b.district == d))
            .cloned()
            .collect();
        rows.sort_by_key(|b| b.id);
        rows.truncate(page.limit as usize);
        Ok(rows)
    }

    async fn quarantine_building_count(&self) -> Result<i64, StoreError> {
        self.begin()?;
        Ok(self.buildings.len() as i64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.begin()
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// A verified organization that shows its contact details.
pub fn organization(id: i32, name: &str) -> OrganizationRow {
    OrganizationRow {
        id,
        name: name.to_string(),
        org_type: "ngo".to_string(),
        district: "Central and Western".to_string(),
        address: format!("{} Queen's Road", id),
        contact_person_name: "Wong".to_string(),
        email: format!("org{}@example.org", id),
        verified: 1,
        lat: 22.28,
        lng: 114.15,
        show_contact: 1,
        resources: Some("1, 2, 5".to_string()),
        serving_targets: Some("3".to_string()),
        ..Default::default()
    }
}

pub fn building(id: i32, district: &str) -> QtBuilding {
    QtBuilding {
        id,
        chi_addr: format!("大廈{}", id),
        eng_addr: format!("Building {}", id),
        district: district.to_string(),
        end_date: "2020-03-14".to_string(),
        lat: 22.3,
        lng: 114.2,
    }
}

/// A store with `n` buildings alternating between two districts.
pub fn store_with_buildings(n: i32) -> MockDirectoryStore {
    (1..=n).fold(MockDirectoryStore::new(), |store, id| {
        let district = if id % 2 == 0 { "Sha Tin" } else { "Kwun Tong" };
        store.with_building(building(id, district))
    })
}

// =============================================================================
// Router Helpers
// =============================================================================

pub fn test_router(store: MockDirectoryStore) -> Router {
    test_router_with(store, test_config())
}

pub fn test_router_with(store: MockDirectoryStore, config: RouterConfig) -> Router {
    create_router(DirectoryService::new(store), config)
}

pub fn test_config() -> RouterConfig {
    RouterConfig::new(StaticCredentials::new(TEST_USER, TEST_PASSWORD)).with_tracing(false)
}

pub fn basic_header(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", user, password)))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn authed_get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, basic_header(TEST_USER, TEST_PASSWORD))
        .body(Body::empty())
        .unwrap()
}

pub async fn send(router: Router, request: Request<Body>) -> Response<Body> {
    router.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
