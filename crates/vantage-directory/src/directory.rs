//! Vantage Directory
//!
//! In-memory facade over the records returned by the directory source:
//! ranked listing, lookup by id and the facets that feed the filter menus.
//!
//! @version 0.1.0
//! @author Vantage Development Team

use crate::matcher::RecordMatcher;
use crate::page::{paginate, Page};
use crate::query::ListParams;
use crate::types::DirectoryRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use vantage_common::config::PaginationConfig;
use vantage_common::{Result, VantageError};

// =============================================================================
// Facets
// =============================================================================

/// Distinct filter values present in the directory, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    pub roles: Vec<String>,
    pub orgs: Vec<String>,
    pub business_units: Vec<String>,
}

// =============================================================================
// Directory
// =============================================================================

/// A loaded user directory.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    records: Vec<DirectoryRecord>,
    pagination: PaginationConfig,
}

impl Directory {
    pub fn new(records: Vec<DirectoryRecord>) -> Self {
        Self::with_pagination(records, PaginationConfig::default())
    }

    pub fn with_pagination(records: Vec<DirectoryRecord>, pagination: PaginationConfig) -> Self {
        Self {
            records,
            pagination,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[DirectoryRecord] {
        &self.records
    }

    /// Swap in a freshly fetched record set.
    pub fn replace(&mut self, records: Vec<DirectoryRecord>) {
        self.records = records;
    }

    /// Rank, filter and paginate the directory for a table request.
    pub fn list(&self, params: &ListParams) -> Page<DirectoryRecord> {
        let query = params.to_search_query();
        let limit = self.pagination.clamp_limit(params.limit);

        let ranked = RecordMatcher::new(&query).run(&self.records).into_ranked();
        let page = paginate(ranked, params.page, limit).map(Clone::clone);

        tracing::debug!(
            page = page.page_number,
            limit,
            total = page.total_count,
            returned = page.items.len(),
            "listed directory records"
        );

        page
    }

    /// Look up a single record by id.
    pub fn get(&self, id: &str) -> Result<&DirectoryRecord> {
        self.records
            .iter()
            .find(|record| record.id == id)
            .ok_or_else(|| VantageError::NotFound(format!("directory record '{}'", id)))
    }

    /// Distinct roles, organizations and business units.
    pub fn facets(&self) -> Facets {
        let mut roles = BTreeSet::new();
        let mut orgs = BTreeSet::new();
        let mut units = BTreeSet::new();

        for record in &self.records {
            roles.extend(record.roles.iter().cloned());
            if let Some(org) = record.org.as_ref().filter(|o| !o.is_empty()) {
                orgs.insert(org.clone());
            }
            if let Some(unit) = record.business_unit.as_ref().filter(|u| !u.is_empty()) {
                units.insert(unit.clone());
            }
        }

        Facets {
            roles: roles.into_iter().collect(),
            orgs: orgs.into_iter().collect(),
            business_units: units.into_iter().collect(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
