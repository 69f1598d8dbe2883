//! Allow-listed search fields for the organization directory.
//!
//! Callers may filter organizations by a single column. The column name comes
//! straight from the query string, so it is only ever interpolated into SQL
//! after it has been matched against one of the two static lists below. The
//! search value itself is always a bound parameter.

/// Columns that support substring search (`LIKE '%value%'`).
pub const SEARCH_FIELDS: &[&str] = &["name", "type", "district", "address"];

/// Columns that support exact matching (`= value`).
pub const MATCH_FIELDS: &[&str] = &["id", "verified"];

/// How a filter value is compared against its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// `column LIKE '%value%'`
    Substring,
    /// `column = value`
    Exact,
}

/// Result of looking a field name up in both allow-lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldLookup {
    /// Position in [`SEARCH_FIELDS`], if present
    pub search_index: Option<usize>,
    /// Position in [`MATCH_FIELDS`], if present
    pub match_index: Option<usize>,
}

impl FieldLookup {
    /// Resolve the column and comparison mode.
    ///
    /// The exact-match list is consulted last and wins when a name appears in
    /// both lists.
    pub fn resolve(&self) -> Option<(&'static str, MatchMode)> {
        let mut resolved = None;
        if let Some(i) = self.search_index {
            resolved = Some((SEARCH_FIELDS[i], MatchMode::Substring));
        }
        if let Some(i) = self.match_index {
            resolved = Some((MATCH_FIELDS[i], MatchMode::Exact));
        }
        resolved
    }
}

/// Look a caller-supplied field name up in both allow-lists.
pub fn lookup_field(name: &str) -> FieldLookup {
    FieldLookup {
        search_index: SEARCH_FIELDS.iter().position(|f| *f == name),
        match_index: MATCH_FIELDS.iter().position(|f| *f == name),
    }
}

/// A validated single-column filter over the organization table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    column: &'static str,
    mode: MatchMode,
    value: String,
}

impl FieldFilter {
    /// Build a filter from raw request parameters.
    ///
    /// Returns `None` when the field is not allow-listed; the caller then
    /// serves the unfiltered listing.
    pub fn parse(field: &str, value: impl Into<String>) -> Option<Self> {
        let (column, mode) = lookup_field(field).resolve()?;
        Some(Self {
            column,
            mode,
            value: value.into(),
        })
    }

    /// The allow-listed column name. Always one of the static list entries.
    pub fn column(&self) -> &'static str {
        self.column
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// The raw value supplied by the caller.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The value to bind for this filter's comparison.
    pub fn bound_value(&self) -> String {
        match self.mode {
            MatchMode::Substring => format!("%{}%", self.value),
            MatchMode::Exact => self.value.clone(),
        }
    }
}
