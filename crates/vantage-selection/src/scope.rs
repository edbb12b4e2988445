//! Vantage Selection Scope
//!
//! @version 0.1.0
//! @author Vantage Development Team

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use vantage_common::QueryKey;

// =============================================================================
// Selection Scope
// =============================================================================

/// The current vCenter / cluster / tag selection. A cluster id only has
/// meaning relative to the vCenter it was chosen under.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionScope {
    pub v_center_id: Option<String>,
    pub cluster_id: Option<String>,
    pub tag_ids: BTreeSet<String>,
}

impl SelectionScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vcenter(mut self, id: impl Into<String>) -> Self {
        self.v_center_id = Some(id.into());
        self
    }

    pub fn with_cluster(mut self, id: impl Into<String>) -> Self {
        self.cluster_id = Some(id.into());
        self
    }

    pub fn with_tag(mut self, id: impl Into<String>) -> Self {
        self.tag_ids.insert(id.into());
        self
    }

    /// Key for a query parameterized by this scope, e.g. `metrics/cpu`.
    pub fn query_key(&self, prefix: &str) -> QueryKey {
        QueryKey::new(prefix)
            .with_value(self.v_center_id.as_deref())
            .with_value(self.cluster_id.as_deref())
            .with_set(&self.tag_ids)
    }
}

// =============================================================================
// Cluster Request
// =============================================================================

/// Parameters of the cluster list query for the current vCenter and tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRequest {
    pub v_center_id: String,
    pub tag_ids: BTreeSet<String>,
}

impl ClusterRequest {
    pub fn key(&self) -> QueryKey {
        QueryKey::new("clusters")
            .with_value(Some(self.v_center_id.as_str()))
            .with_set(&self.tag_ids)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_key_tracks_every_field() {
        let base = SelectionScope::new().with_vcenter("vc-1").with_cluster("cl-1");
        let tagged = base.clone().with_tag("gold");

        assert_ne!(base.query_key("metrics"), tagged.query_key("metrics"));
        assert_ne!(base.query_key("metrics"), base.clone().with_cluster("cl-2").query_key("metrics"));
        assert_ne!(base.query_key("metrics/cpu"), base.query_key("metrics/memory"));
        assert_eq!(tagged.query_key("metrics"), tagged.clone().query_key("metrics"));
    }

    #[test]
    fn test_cluster_request_key_is_order_independent() {
        let a = ClusterRequest {
            v_center_id: "vc-1".to_string(),
            tag_ids: ["b".to_string(), "a".to_string()].into_iter().collect(),
        };
        let b = ClusterRequest {
            v_center_id: "vc-1".to_string(),
            tag_ids: ["a".to_string(), "b".to_string()].into_iter().collect(),
        };
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_tag_ids_with_separators_get_distinct_keys() {
        let split = ClusterRequest {
            v_center_id: "vc-1".to_string(),
            tag_ids: ["a".to_string(), "b".to_string()].into_iter().collect(),
        };
        let joined = ClusterRequest {
            v_center_id: "vc-1".to_string(),
            tag_ids: ["a,b".to_string()].into_iter().collect(),
        };
        assert_ne!(split.key(), joined.key());

        let scope_split = SelectionScope::new().with_vcenter("vc-1").with_tag("a").with_tag("b");
        let scope_joined = SelectionScope::new().with_vcenter("vc-1").with_tag("a,b");
        assert_ne!(scope_split.query_key("metrics/combined"), scope_joined.query_key("metrics/combined"));

        let slash_vcenter = SelectionScope::new().with_vcenter("vc/1");
        let slash_cluster = SelectionScope::new().with_vcenter("vc").with_cluster("1");
        assert_ne!(slash_vcenter.query_key("metrics"), slash_cluster.query_key("metrics"));
    }

    #[test]
    fn test_scope_json_field_names() {
        let scope = SelectionScope::new().with_vcenter("vc-1");
        let json = serde_json::to_value(&scope).unwrap();
        assert_eq!(json["vCenterId"], "vc-1");
        assert!(json["clusterId"].is_null());
    }
}
