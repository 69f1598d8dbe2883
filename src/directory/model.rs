//! Domain records as they are serialized to API clients.

use serde::{Deserialize, Serialize};

/// An organization directory entry.
///
/// Field names follow the JSON contract consumed by the public site, so the
/// serde renames below are part of the wire format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: i32,
    pub name: String,
    #[serde(rename = "orgType")]
    pub org_type: String,
    pub website: String,
    pub facebook: String,
    #[serde(rename = "brNumber")]
    pub br_number: String,
    pub phone: String,
    pub district: String,
    pub address: String,
    #[serde(rename = "contactPersonName")]
    pub contact_person_name: String,
    #[serde(rename = "contactPersonPhone")]
    pub contact_person_phone: String,
    #[serde(rename = "contactPersonRole")]
    pub contact_person_role: String,
    pub email: String,
    #[serde(rename = "tgId")]
    pub tg_id: String,
    #[serde(rename = "pastExp")]
    pub past_exp: String,
    pub verified: i32,
    pub lat: f32,
    pub lng: f32,
    #[serde(rename = "showContact")]
    pub show_contact: i32,
    #[serde(rename = "customResources")]
    pub custom_resources: String,
    #[serde(rename = "customServingTarget")]
    pub custom_serving_target: String,
    pub resources: Vec<String>,
    #[serde(rename = "servingTargets")]
    pub serving_targets: Vec<String>,
}

impl Organization {
    /// Whether the organization allows its contact location to be displayed.
    pub fn shows_contact(&self) -> bool {
        self.show_contact >= 1
    }
}

/// A building under compulsory quarantine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QtBuilding {
    pub id: i32,
    #[serde(rename = "chiAddr")]
    pub chi_addr: String,
    #[serde(rename = "engAddr")]
    pub eng_addr: String,
    pub district: String,
    #[serde(rename = "endDate")]
    pub end_date: String,
    pub lat: f32,
    pub lng: f32,
}
