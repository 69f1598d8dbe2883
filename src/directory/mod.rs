//! Directory domain: records, search filters, row mapping and redaction.
//!
//! # Components
//!
//! - [`Organization`] / [`QtBuilding`]: records as serialized to clients
//! - [`FieldFilter`]: a search validated against the static allow-lists
//! - [`OrganizationRow`]: one raw row of the organization query
//! - [`RedactionPolicy`]: fields cleared when an organization hides contact details
//! - [`BuildingPage`]: validated paging parameters for quarantine buildings
//! - [`DirectoryService`]: ties the above together on top of a store

mod filter;
mod mapper;
mod model;
mod page;
mod redact;
mod service;

pub use filter::{lookup_field, FieldFilter, FieldLookup, MatchMode, MATCH_FIELDS, SEARCH_FIELDS};
pub use mapper::{split_aggregate, OrganizationRow};
pub use model::{Organization, QtBuilding};
pub use page::{BuildingPage, DEFAULT_PAGE_SIZE, DEFAULT_START, MAX_PAGE_SIZE};
pub use redact::{RedactField, RedactionPolicy};
pub use service::DirectoryService;
