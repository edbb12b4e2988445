//! Vantage Record Matcher
//!
//! Two-tier ranking of directory records against free text. A record whose
//! id, email or display name equals the query is an exact match and never
//! enters the partial tier. Every other record is a partial match when each
//! whitespace separated query term appears in one of its searchable fields.
//! Tiers are stable partitions of the input, never sorted.
//!
//! @version 0.1.0
//! @author Vantage Development Team

use crate::query::{DirectoryFilters, SearchQuery};
use crate::types::DirectoryRecord;
use serde::{Deserialize, Serialize};
use vantage_common::utils::{contains_folded, eq_folded};

// =============================================================================
// Match Tier
// =============================================================================

/// Ranking bucket of a matched record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    Exact,
    Partial,
}

// =============================================================================
// Match Result
// =============================================================================

/// Matched records, exact tier first. Without search text every record that
/// passes the filters is placed in the partial tier in input order.
#[derive(Debug, Clone, Default)]
pub struct MatchResult<'a> {
    pub exact: Vec<&'a DirectoryRecord>,
    pub partial: Vec<&'a DirectoryRecord>,
}

impl<'a> MatchResult<'a> {
    pub fn len(&self) -> usize {
        self.exact.len() + self.partial.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.partial.is_empty()
    }

    /// Iterate the ranked result, exact tier first.
    pub fn iter(&self) -> impl Iterator<Item = &'a DirectoryRecord> + '_ {
        self.exact.iter().chain(self.partial.iter()).copied()
    }

    /// Tier a record landed in, if it matched at all.
    pub fn tier_of(&self, id: &str) -> Option<MatchTier> {
        if self.exact.iter().any(|r| r.id == id) {
            Some(MatchTier::Exact)
        } else if self.partial.iter().any(|r| r.id == id) {
            Some(MatchTier::Partial)
        } else {
            None
        }
    }

    /// Flatten into the ranked sequence.
    pub fn into_ranked(self) -> Vec<&'a DirectoryRecord> {
        let mut ranked = self.exact;
        ranked.extend(self.partial);
        ranked
    }
}

// =============================================================================
// Record Matcher
// =============================================================================

/// A compiled search query.
#[derive(Debug, Clone)]
pub struct RecordMatcher {
    text: String,
    terms: Vec<String>,
    filters: DirectoryFilters,
}

impl RecordMatcher {
    pub fn new(query: &SearchQuery) -> Self {
        let text = query.normalized_text();
        let terms = text.split_whitespace().map(str::to_string).collect();
        Self {
            text,
            terms,
            filters: query.filters.clone(),
        }
    }

    /// Check if the query carries any search text.
    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    /// Rank a single record against the search text, ignoring filters.
    pub fn classify(&self, record: &DirectoryRecord) -> Option<MatchTier> {
        if !self.has_text() {
            return Some(MatchTier::Partial);
        }

        if record
            .identifier_fields()
            .iter()
            .any(|field| eq_folded(field, &self.text))
        {
            return Some(MatchTier::Exact);
        }

        let all_terms_found = self.terms.iter().all(|term| {
            record
                .searchable_fields()
                .any(|field| contains_folded(field, term))
        });

        if all_terms_found {
            Some(MatchTier::Partial)
        } else {
            None
        }
    }

    /// Rank and filter a directory.
    pub fn run<'a>(&self, records: &'a [DirectoryRecord]) -> MatchResult<'a> {
        let mut result = MatchResult::default();

        for record in records {
            let Some(tier) = self.classify(record) else {
                continue;
            };
            if !self.filters.matches(record) {
                continue;
            }
            match tier {
                MatchTier::Exact => result.exact.push(record),
                MatchTier::Partial => result.partial.push(record),
            }
        }

        tracing::trace!(
            query = %self.text,
            scanned = records.len(),
            exact = result.exact.len(),
            partial = result.partial.len(),
            "directory match complete"
        );

        result
    }
}

/// Rank and filter `records` against `query`.
pub fn match_records<'a>(records: &'a [DirectoryRecord], query: &SearchQuery) -> MatchResult<'a> {
    RecordMatcher::new(query).run(records)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(records: &[&DirectoryRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    fn directory() -> Vec<DirectoryRecord> {
        vec![
            DirectoryRecord::new("u1", "Alice A", "a@x.com")
                .with_org("Infra")
                .with_roles(["admin", "user"]),
            DirectoryRecord::new("u2", "Alice B", "b@x.com").with_org("Infra"),
            DirectoryRecord::new("u3", "Bob C", "bob@x.com")
                .with_manager("alice a")
                .with_org("Storage")
                .with_active(false),
            DirectoryRecord::new("u4", "Carol D", "carol@x.com")
                .with_slack_handle("@caroline")
                .with_business_unit("Networking"),
        ]
    }

    #[test]
    fn test_exact_name_before_partial() {
        let records = vec![
            DirectoryRecord::new("u1", "Alice A", "a@x.com"),
            DirectoryRecord::new("u2", "Alice B", "b@x.com"),
        ];

        let result = match_records(&records, &SearchQuery::new("alice a"));
        assert_eq!(ids(&result.exact), vec!["u1"]);
        assert_eq!(ids(&result.partial), vec!["u2"]);
    }

    #[test]
    fn test_exact_tier_ordered_first_regardless_of_input_order() {
        let records = directory();
        let result = match_records(&records, &SearchQuery::new("  ALICE A "));

        // u3 matches through its manager field only, u1 by exact name.
        let ranked = ids(&result.clone().into_ranked());
        assert_eq!(ranked, vec!["u1", "u2", "u3"]);
        assert_eq!(result.tier_of("u1"), Some(MatchTier::Exact));
        assert_eq!(result.tier_of("u3"), Some(MatchTier::Partial));
        assert_eq!(result.tier_of("u4"), None);
    }

    #[test]
    fn test_exact_match_on_id_and_email() {
        let records = directory();

        let by_id = match_records(&records, &SearchQuery::new("U4"));
        assert_eq!(ids(&by_id.exact), vec!["u4"]);

        let by_email = match_records(&records, &SearchQuery::new("bob@x.com"));
        assert_eq!(ids(&by_email.exact), vec!["u3"]);
        assert!(by_email.partial.is_empty());
    }

    #[test]
    fn test_partial_on_optional_fields() {
        let records = directory();

        let slack = match_records(&records, &SearchQuery::new("caroline"));
        assert_eq!(ids(&slack.partial), vec!["u4"]);

        let unit = match_records(&records, &SearchQuery::new("network"));
        assert_eq!(ids(&unit.partial), vec!["u4"]);
    }

    #[test]
    fn test_empty_text_passes_everything_in_order() {
        let records = directory();
        let result = match_records(&records, &SearchQuery::new("   "));

        assert!(result.exact.is_empty());
        assert_eq!(ids(&result.partial), vec!["u1", "u2", "u3", "u4"]);
    }

    #[test]
    fn test_filters_apply_after_text() {
        let records = directory();

        let admins = match_records(&records, &SearchQuery::new("alice").with_role("admin"));
        assert_eq!(ids(&admins.clone().into_ranked()), vec!["u1"]);

        let inactive = match_records(&records, &SearchQuery::all().with_active(false));
        assert_eq!(ids(&inactive.into_ranked()), vec!["u3"]);

        let storage = match_records(&records, &SearchQuery::new("alice").with_org("Storage"));
        assert_eq!(ids(&storage.into_ranked()), vec!["u3"]);
    }

    #[test]
    fn test_no_matching_role_is_empty_not_error() {
        let records = vec![DirectoryRecord::new("u1", "Alice A", "a@x.com")];
        let result = match_records(&records, &SearchQuery::all().with_role("admin"));
        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_directory() {
        let result = match_records(&[], &SearchQuery::new("alice"));
        assert!(result.is_empty());
    }

    #[test]
    fn test_output_bounded_unique_and_filtered() {
        let records = directory();
        let queries = [
            SearchQuery::new("a"),
            SearchQuery::new("x.com").with_org("Infra"),
            SearchQuery::new("alice").with_active(true),
            SearchQuery::new("").with_role("user"),
            SearchQuery::new("nobody"),
        ];

        for query in &queries {
            let result = match_records(&records, query);
            let ranked = result.clone().into_ranked();
            assert!(ranked.len() <= records.len());

            let mut seen = ids(&ranked);
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), ranked.len());

            for record in &ranked {
                assert!(query.filters.matches(record));
            }
            for record in &result.exact {
                assert!(!result.partial.iter().any(|p| p.id == record.id));
            }
        }
    }

    #[test]
    fn test_exact_records_also_satisfy_substring_test() {
        let records = directory();
        let query = SearchQuery::new("Carol D");
        let matcher = RecordMatcher::new(&query);
        let result = matcher.run(&records);

        for record in &result.exact {
            let text = query.normalized_text();
            assert!(record
                .searchable_fields()
                .any(|field| field.to_lowercase().contains(&text)));
        }
        assert_eq!(ids(&result.exact), vec!["u4"]);
    }

    #[test]
    fn test_deterministic_order() {
        let records = directory();
        let query = SearchQuery::new("x.com");
        let first = ids(&match_records(&records, &query).into_ranked());
        let second = ids(&match_records(&records, &query).into_ranked());
        assert_eq!(first, second);
        assert_eq!(first, vec!["u1", "u2", "u3", "u4"]);
    }
}
