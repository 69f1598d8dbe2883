//! Conversion from raw organization rows into API records.
//!
//! The organization query returns one flat row per organization with the
//! related resource and serving-target ids already collapsed by the database
//! into comma-separated strings. This module turns those rows into
//! [`Organization`] values.

use super::model::Organization;

/// One row of the organization query, in select-list order.
///
/// The two custom text columns come from left joins and the two aggregate
/// columns from correlated sub-selects, so all four may be NULL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrganizationRow {
    pub id: i32,
    pub name: String,
    pub org_type: String,
    pub website: String,
    pub facebook: String,
    pub br_number: String,
    pub phone: String,
    pub district: String,
    pub address: String,
    pub contact_person_name: String,
    pub contact_person_phone: String,
    pub contact_person_role: String,
    pub email: String,
    pub tg_id: String,
    pub past_exp: String,
    pub verified: i32,
    pub lat: f32,
    pub lng: f32,
    pub show_contact: i32,
    pub custom_resources: Option<String>,
    pub custom_serving_target: Option<String>,
    pub resources: Option<String>,
    pub serving_targets: Option<String>,
}

/// Split a comma-joined aggregate into trimmed elements.
///
/// NULL and the empty string both produce a single empty element; clients
/// already tolerate `[""]` for organizations with no associations.
pub fn split_aggregate(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or("")
        .split(',')
        .map(|part| part.trim().to_string())
        .collect()
}

impl From<OrganizationRow> for Organization {
    fn from(row: OrganizationRow) -> Self {
        let resources = split_aggregate(row.resources.as_deref());
        let serving_targets = split_aggregate(row.serving_targets.as_deref());

        Organization {
            id: row.id,
            name: row.name,
            org_type: row.org_type,
            website: row.website,
            facebook: row.facebook,
            br_number: row.br_number,
            phone: row.phone,
            district: row.district,
            address: row.address,
            contact_person_name: row.contact_person_name,
            contact_person_phone: row.contact_person_phone,
            contact_person_role: row.contact_person_role,
            email: row.email,
            tg_id: row.tg_id,
            past_exp: row.past_exp,
            verified: row.verified,
            lat: row.lat,
            lng: row.lng,
            show_contact: row.show_contact,
            custom_resources: row.custom_resources.unwrap_or_default(),
            custom_serving_target: row.custom_serving_target.unwrap_or_default(),
            resources,
            serving_targets,
        }
    }
}
