//! Visibility redaction for organization records.
//!
//! Organizations that have not opted in to showing their contact details
//! (`showContact < 1`) still appear in listings, but with a configurable set of
//! fields blanked out. The default set is the street address and the map
//! coordinates.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::model::Organization;

/// A group of organization fields that can be redacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RedactField {
    /// `address`
    Address,
    /// `lat` and `lng`
    Coordinates,
    /// `contactPersonName`, `contactPersonPhone` and `contactPersonRole`
    ContactPerson,
    /// `email`
    Email,
}

impl RedactField {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedactField::Address => "address",
            RedactField::Coordinates => "coordinates",
            RedactField::ContactPerson => "contact-person",
            RedactField::Email => "email",
        }
    }

    fn clear(&self, org: &mut Organization) {
        match self {
            RedactField::Address => org.address.clear(),
            RedactField::Coordinates => {
                org.lat = 0.0;
                org.lng = 0.0;
            }
            RedactField::ContactPerson => {
                org.contact_person_name.clear();
                org.contact_person_phone.clear();
                org.contact_person_role.clear();
            }
            RedactField::Email => org.email.clear(),
        }
    }
}

impl fmt::Display for RedactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RedactField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "address" => Ok(RedactField::Address),
            "coordinates" => Ok(RedactField::Coordinates),
            "contact-person" => Ok(RedactField::ContactPerson),
            "email" => Ok(RedactField::Email),
            other => Err(format!(
                "unknown redaction field '{}' (expected address, coordinates, contact-person or email)",
                other
            )),
        }
    }
}

/// The set of fields cleared on organizations that hide their contact details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactionPolicy {
    fields: BTreeSet<RedactField>,
}

impl RedactionPolicy {
    pub fn new(fields: impl IntoIterator<Item = RedactField>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    /// A policy that never clears anything.
    pub fn none() -> Self {
        Self {
            fields: BTreeSet::new(),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = RedactField> + '_ {
        self.fields.iter().copied()
    }

    pub fn contains(&self, field: RedactField) -> bool {
        self.fields.contains(&field)
    }

    /// Apply the policy to one record. Records that show contact details are
    /// left untouched.
    pub fn apply(&self, org: &mut Organization) {
        if org.shows_contact() {
            return;
        }
        for field in &self.fields {
            field.clear(org);
        }
    }
}

impl Default for RedactionPolicy {
    fn default() -> Self {
        Self::new([RedactField::Address, RedactField::Coordinates])
    }
}
