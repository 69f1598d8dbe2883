//! SQL text and bound parameters for the two supported read queries.
//!
//! Statements are built as plain data ([`SqlStatement`]) so their shape can be
//! checked without a database. Only allow-listed column names and fixed
//! operators are ever written into the SQL text; every caller-supplied value
//! is carried in [`SqlStatement::params`] and bound by the driver.

use crate::directory::{BuildingPage, FieldFilter, MatchMode};

/// A value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    UInt(u64),
}

/// A parameterized SQL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlStatement {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl SqlStatement {
    fn new(sql: String) -> Self {
        Self {
            sql,
            params: Vec::new(),
        }
    }

    fn bind(mut self, param: SqlParam) -> Self {
        self.params.push(param);
        self
    }

    /// Number of `?` placeholders in the SQL text.
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }
}

/// Select list and joins shared by every organization query.
///
/// Column order here is the order the row decoder reads them in.
const ORGANIZATION_SELECT: &str = "SELECT \
    organization.id, \
    name, \
    type, \
    website, \
    facebook, \
    br_number, \
    phone, \
    district, \
    address, \
    contact_person_name, \
    contact_person_phone, \
    contact_person_role, \
    email, \
    tg_id, \
    past_exp, \
    verified, \
    lat, \
    lng, \
    show_contact, \
    other_resource_type.type_content AS custom_res, \
    other_serving_target.target_name AS custom_target, \
    (SELECT GROUP_CONCAT(DISTINCT org_resource_type.res_id ORDER BY org_resource_type.res_id SEPARATOR ', ') \
        FROM org_resource_type WHERE org_resource_type.org_id = organization.id) AS resources, \
    (SELECT GROUP_CONCAT(DISTINCT org_serving_target.serving_target_id ORDER BY org_serving_target.serving_target_id SEPARATOR ', ') \
        FROM org_serving_target WHERE org_serving_target.org_id = organization.id) AS serving_targets \
    FROM organization \
    LEFT JOIN other_resource_type ON organization.id = other_resource_type.org_id \
    LEFT JOIN other_serving_target ON organization.id = other_serving_target.org_id";

/// Number of columns in [`ORGANIZATION_SELECT`].
pub(crate) const ORGANIZATION_COLUMNS: usize = 23;

/// Column names follow the deployed `compulsory_quarantine` table; the order
/// is the order the row decoder reads them in.
const QUARANTINE_SELECT: &str = "SELECT id, chi_addr, eng_addr, district, \
    CAST(end_date AS CHAR) AS end_date, lat, lng FROM compulsory_quarantine";

/// Total row count of the quarantine table.
pub const QUARANTINE_COUNT_SQL: &str = "SELECT COUNT(*) FROM compulsory_quarantine";

/// Cheap round trip used for liveness checks.
pub const PING_SQL: &str = "SELECT 1";

/// Build the verified-organization listing, optionally narrowed by one filter.
pub fn organization_query(filter: Option<&FieldFilter>) -> SqlStatement {
    match filter {
        None => SqlStatement::new(format!(
            "{} WHERE verified = 1 ORDER BY organization.id",
            ORGANIZATION_SELECT
        )),
        Some(filter) => {
            let operator = match filter.mode() {
                MatchMode::Substring => "LIKE",
                MatchMode::Exact => "=",
            };
            SqlStatement::new(format!(
                "{} WHERE organization.{} {} ? AND verified = 1 ORDER BY organization.id",
                ORGANIZATION_SELECT,
                filter.column(),
                operator
            ))
            .bind(SqlParam::Text(filter.bound_value()))
        }
    }
}

/// Build one page of the quarantine-building listing.
pub fn quarantine_page_query(page: &BuildingPage) -> SqlStatement {
    match page.district.as_deref() {
        None => SqlStatement::new(format!(
            "{} WHERE id >= ? ORDER BY id LIMIT ?",
            QUARANTINE_SELECT
        ))
        .bind(SqlParam::UInt(page.start))
        .bind(SqlParam::UInt(u64::from(page.limit))),
        Some(district) => SqlStatement::new(format!(
            "{} WHERE id >= ? AND district = ? ORDER BY id LIMIT ?",
            QUARANTINE_SELECT
        ))
        .bind(SqlParam::UInt(page.start))
        .bind(SqlParam::Text(district.to_string()))
        .bind(SqlParam::UInt(u64::from(page.limit))),
    }
}
