//! Vantage Directory Query
//!
//! Search text, structured filters and the UI-facing list parameters.
//!
//! @version 0.1.0
//! @author Vantage Development Team

use crate::types::DirectoryRecord;
use serde::{Deserialize, Serialize};
use vantage_common::utils::{non_blank, normalize_text};

// =============================================================================
// Directory Filters
// =============================================================================

/// Structured predicates applied after text matching. Every filter that is
/// set must hold; an unset (or blank) filter does not restrict anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryFilters {
    pub role: Option<String>,
    pub org: Option<String>,
    pub business_unit: Option<String>,
    pub is_active: Option<bool>,
}

impl DirectoryFilters {
    /// Check if a record satisfies every active filter.
    pub fn matches(&self, record: &DirectoryRecord) -> bool {
        if let Some(role) = non_blank(self.role.as_deref()) {
            if !record.has_role(role) {
                return false;
            }
        }

        if let Some(org) = non_blank(self.org.as_deref()) {
            if record.org.as_deref() != Some(org) {
                return false;
            }
        }

        if let Some(unit) = non_blank(self.business_unit.as_deref()) {
            if record.business_unit.as_deref() != Some(unit) {
                return false;
            }
        }

        match self.is_active {
            Some(active) => record.is_active == active,
            None => true,
        }
    }

    /// True when no filter would restrict the result.
    pub fn is_empty(&self) -> bool {
        non_blank(self.role.as_deref()).is_none()
            && non_blank(self.org.as_deref()).is_none()
            && non_blank(self.business_unit.as_deref()).is_none()
            && self.is_active.is_none()
    }
}

// =============================================================================
// Search Query
// =============================================================================

/// Free-text search plus structured filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    pub filters: DirectoryFilters,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            filters: DirectoryFilters::default(),
        }
    }

    /// A query that matches every record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.filters.role = Some(role.into());
        self
    }

    pub fn with_org(mut self, org: impl Into<String>) -> Self {
        self.filters.org = Some(org.into());
        self
    }

    pub fn with_business_unit(mut self, unit: impl Into<String>) -> Self {
        self.filters.business_unit = Some(unit.into());
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.filters.is_active = Some(is_active);
        self
    }

    /// Trimmed, lower-cased search text. Empty means "no text filter".
    pub fn normalized_text(&self) -> String {
        normalize_text(&self.text)
    }
}

// =============================================================================
// List Parameters
// =============================================================================

/// Filters as sent by the users table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilters {
    pub search: Option<String>,
    pub role: Option<String>,
    pub org: Option<String>,
    pub business_unit: Option<String>,
    pub is_active: Option<bool>,
}

/// `{page, limit, filters}` request issued by the users table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListParams {
    pub page: usize,
    pub limit: Option<usize>,
    pub filters: ListFilters,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: None,
            filters: ListFilters::default(),
        }
    }
}

impl ListParams {
    pub fn page(page: usize) -> Self {
        Self {
            page,
            ..Default::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_filters(mut self, filters: ListFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Split the request into the search query it describes.
    pub fn to_search_query(&self) -> SearchQuery {
        SearchQuery {
            text: self.filters.search.clone().unwrap_or_default(),
            filters: DirectoryFilters {
                role: self.filters.role.clone(),
                org: self.filters.org.clone(),
                business_unit: self.filters.business_unit.clone(),
                is_active: self.filters.is_active,
            },
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
