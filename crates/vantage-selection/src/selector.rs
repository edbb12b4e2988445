//! Vantage Cascading Selector
//!
//! Pure state machine over `{vCenter, cluster, tags}`. Every upstream data
//! arrival and user action is an event; `reduce` returns the next state and
//! the side effects the caller must perform (re-requesting the cluster list,
//! notifying listeners). Nothing here performs I/O.
//!
//! @version 0.1.0
//! @author Vantage Development Team

use crate::scope::{ClusterRequest, SelectionScope};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use vantage_common::SelectionOption;

// =============================================================================
// Events and Effects
// =============================================================================

/// Input to the selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    /// The vCenter list arrived (initial load or poll).
    VCentersLoaded(Vec<SelectionOption>),
    /// The cluster list for `v_center_id` arrived.
    ClustersLoaded {
        v_center_id: String,
        options: Vec<SelectionOption>,
    },
    /// The tag list arrived.
    TagsLoaded(Vec<SelectionOption>),
    SelectVCenter(String),
    SelectCluster(String),
    ToggleTag(String),
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionEffect {
    VCenterChanged(Option<String>),
    ClusterChanged(Option<String>),
    TagsChanged(BTreeSet<String>),
    RequestClusters(ClusterRequest),
}

/// Coarse position in the selection cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionStage {
    NoVCenter,
    VCenterSelected,
    VCenterAndClusterSelected,
}

// =============================================================================
// Selection State
// =============================================================================

/// Selected scope plus the option lists last delivered by each source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub scope: SelectionScope,
    pub vcenters: Vec<SelectionOption>,
    pub clusters: Vec<SelectionOption>,
    pub tags: Vec<SelectionOption>,
}

impl SelectionState {
    pub fn stage(&self) -> SelectionStage {
        match (&self.scope.v_center_id, &self.scope.cluster_id) {
            (None, _) => SelectionStage::NoVCenter,
            (Some(_), None) => SelectionStage::VCenterSelected,
            (Some(_), Some(_)) => SelectionStage::VCenterAndClusterSelected,
        }
    }

    /// Cluster query for the current vCenter, if one is selected.
    pub fn cluster_request(&self) -> Option<ClusterRequest> {
        self.scope.v_center_id.as_ref().map(|id| ClusterRequest {
            v_center_id: id.clone(),
            tag_ids: self.scope.tag_ids.clone(),
        })
    }
}

/// Result of a single reduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: SelectionState,
    pub effects: Vec<SelectionEffect>,
}

// =============================================================================
// Reducer
// =============================================================================

/// Apply `event` to `state`.
pub fn reduce(state: SelectionState, event: SelectionEvent) -> Transition {
    let mut state = state;
    let mut effects = Vec::new();

    match event {
        SelectionEvent::VCentersLoaded(options) => {
            let first = options.first().map(|option| option.id.clone());
            state.vcenters = options;
            if state.scope.v_center_id.is_none() {
                if let Some(id) = first {
                    change_vcenter(&mut state, id, &mut effects);
                }
            }
        }

        SelectionEvent::ClustersLoaded {
            v_center_id,
            options,
        } => {
            if state.scope.v_center_id.as_deref() != Some(v_center_id.as_str()) {
                tracing::debug!(
                    stale = %v_center_id,
                    current = ?state.scope.v_center_id,
                    "ignoring cluster list for a previous vCenter"
                );
                return Transition { state, effects };
            }

            let first = options.first().map(|option| option.id.clone());
            state.clusters = options;

            match first {
                None => {
                    if state.scope.cluster_id.take().is_some() {
                        effects.push(SelectionEffect::ClusterChanged(None));
                    }
                }
                Some(id) => {
                    if state.scope.cluster_id.is_none() {
                        state.scope.cluster_id = Some(id.clone());
                        effects.push(SelectionEffect::ClusterChanged(Some(id)));
                    }
                }
            }
        }

        SelectionEvent::TagsLoaded(options) => {
            state.tags = options;
        }

        SelectionEvent::SelectVCenter(id) => {
            if state.scope.v_center_id.as_deref() != Some(id.as_str()) {
                change_vcenter(&mut state, id, &mut effects);
            }
        }

        SelectionEvent::SelectCluster(id) => {
            if state.scope.v_center_id.is_some()
                && state.scope.cluster_id.as_deref() != Some(id.as_str())
            {
                state.scope.cluster_id = Some(id.clone());
                effects.push(SelectionEffect::ClusterChanged(Some(id)));
            }
        }

        SelectionEvent::ToggleTag(id) => {
            if !state.scope.tag_ids.remove(&id) {
                state.scope.tag_ids.insert(id);
            }
            effects.push(SelectionEffect::TagsChanged(state.scope.tag_ids.clone()));
            if let Some(request) = state.cluster_request() {
                effects.push(SelectionEffect::RequestClusters(request));
            }
        }
    }

    Transition { state, effects }
}

// The cluster is cleared before the new cluster list is requested, so no
// observer ever sees a cluster paired with the wrong vCenter.
fn change_vcenter(state: &mut SelectionState, id: String, effects: &mut Vec<SelectionEffect>) {
    state.scope.v_center_id = Some(id.clone());
    state.scope.cluster_id = None;
    state.clusters.clear();

    effects.push(SelectionEffect::VCenterChanged(Some(id.clone())));
    effects.push(SelectionEffect::ClusterChanged(None));
    effects.push(SelectionEffect::RequestClusters(ClusterRequest {
        v_center_id: id,
        tag_ids: state.scope.tag_ids.clone(),
    }));
}

// =============================================================================
// Cascading Selector
// =============================================================================

/// Owning wrapper around the reducer.
#[derive(Debug, Clone, Default)]
pub struct CascadingSelector {
    state: SelectionState,
}

impl CascadingSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn scope(&self) -> &SelectionScope {
        &self.state.scope
    }

    /// Apply an event and return the effects it produced.
    pub fn dispatch(&mut self, event: SelectionEvent) -> Vec<SelectionEffect> {
        let state = std::mem::take(&mut self.state);
        let transition = reduce(state, event);
        self.state = transition.state;
        transition.effects
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn options(ids: &[&str]) -> Vec<SelectionOption> {
        ids.iter()
            .map(|id| SelectionOption::new(*id, format!("{} name", id)))
            .collect()
    }

    fn clusters_for(vcenter: &str, ids: &[&str]) -> SelectionEvent {
        SelectionEvent::ClustersLoaded {
            v_center_id: vcenter.to_string(),
            options: options(ids),
        }
    }

    #[test]
    fn test_auto_selects_first_vcenter() {
        let mut selector = CascadingSelector::new();
        assert_eq!(selector.state().stage(), SelectionStage::NoVCenter);

        let effects = selector.dispatch(SelectionEvent::VCentersLoaded(options(&["vc-1", "vc-2"])));

        assert_eq!(selector.scope().v_center_id.as_deref(), Some("vc-1"));
        assert_eq!(selector.state().stage(), SelectionStage::VCenterSelected);
        assert_eq!(
            effects,
            vec![
                SelectionEffect::VCenterChanged(Some("vc-1".to_string())),
                SelectionEffect::ClusterChanged(None),
                SelectionEffect::RequestClusters(ClusterRequest {
                    v_center_id: "vc-1".to_string(),
                    tag_ids: BTreeSet::new(),
                }),
            ]
        );
    }

    #[test]
    fn test_empty_vcenter_list_selects_nothing() {
        let mut selector = CascadingSelector::new();
        let effects = selector.dispatch(SelectionEvent::VCentersLoaded(Vec::new()));
        assert!(effects.is_empty());
        assert_eq!(selector.state().stage(), SelectionStage::NoVCenter);
    }

    #[test]
    fn test_auto_selects_first_cluster() {
        let mut selector = CascadingSelector::new();
        selector.dispatch(SelectionEvent::VCentersLoaded(options(&["vc-1"])));

        let effects = selector.dispatch(clusters_for("vc-1", &["cl-a", "cl-b"]));
        assert_eq!(selector.scope().cluster_id.as_deref(), Some("cl-a"));
        assert_eq!(effects, vec![SelectionEffect::ClusterChanged(Some("cl-a".to_string()))]);
        assert_eq!(
            selector.state().stage(),
            SelectionStage::VCenterAndClusterSelected
        );
    }

    #[test]
    fn test_repeated_lists_do_not_reselect() {
        let mut selector = CascadingSelector::new();
        selector.dispatch(SelectionEvent::VCentersLoaded(options(&["vc-1", "vc-2"])));
        selector.dispatch(clusters_for("vc-1", &["cl-a", "cl-b"]));
        selector.dispatch(SelectionEvent::SelectCluster("cl-b".to_string()));

        let again = selector.dispatch(SelectionEvent::VCentersLoaded(options(&["vc-1", "vc-2"])));
        assert!(again.is_empty());

        let again = selector.dispatch(clusters_for("vc-1", &["cl-a", "cl-b"]));
        assert!(again.is_empty());
        assert_eq!(selector.scope().cluster_id.as_deref(), Some("cl-b"));
    }

    #[test]
    fn test_vcenter_change_clears_cluster_immediately() {
        let mut selector = CascadingSelector::new();
        selector.dispatch(SelectionEvent::VCentersLoaded(options(&["vc-1", "vc-2"])));
        selector.dispatch(clusters_for("vc-1", &["cl-a"]));
        selector.dispatch(SelectionEvent::ToggleTag("gold".to_string()));

        let effects = selector.dispatch(SelectionEvent::SelectVCenter("vc-2".to_string()));

        assert_eq!(selector.scope().v_center_id.as_deref(), Some("vc-2"));
        assert!(selector.scope().cluster_id.is_none());
        assert!(selector.state().clusters.is_empty());
        assert_eq!(
            effects,
            vec![
                SelectionEffect::VCenterChanged(Some("vc-2".to_string())),
                SelectionEffect::ClusterChanged(None),
                SelectionEffect::RequestClusters(ClusterRequest {
                    v_center_id: "vc-2".to_string(),
                    tag_ids: BTreeSet::from(["gold".to_string()]),
                }),
            ]
        );
    }

    #[test]
    fn test_reselecting_same_vcenter_is_not_a_change() {
        let mut selector = CascadingSelector::new();
        selector.dispatch(SelectionEvent::VCentersLoaded(options(&["vc-1"])));
        selector.dispatch(clusters_for("vc-1", &["cl-a"]));

        let effects = selector.dispatch(SelectionEvent::SelectVCenter("vc-1".to_string()));
        assert!(effects.is_empty());
        assert_eq!(selector.scope().cluster_id.as_deref(), Some("cl-a"));
    }

    #[test]
    fn test_stale_cluster_list_is_ignored() {
        let mut selector = CascadingSelector::new();
        selector.dispatch(SelectionEvent::VCentersLoaded(options(&["vc-1", "vc-2"])));
        selector.dispatch(SelectionEvent::SelectVCenter("vc-2".to_string()));

        let effects = selector.dispatch(clusters_for("vc-1", &["old-cluster"]));
        assert!(effects.is_empty());
        assert!(selector.scope().cluster_id.is_none());

        selector.dispatch(clusters_for("vc-2", &["cl-new"]));
        assert_eq!(selector.scope().cluster_id.as_deref(), Some("cl-new"));
    }

    #[test]
    fn test_empty_cluster_list_clears_selection() {
        let mut selector = CascadingSelector::new();
        selector.dispatch(SelectionEvent::VCentersLoaded(options(&["vc-1"])));
        selector.dispatch(clusters_for("vc-1", &["cl-a"]));

        let effects = selector.dispatch(clusters_for("vc-1", &[]));
        assert!(selector.scope().cluster_id.is_none());
        assert_eq!(effects, vec![SelectionEffect::ClusterChanged(None)]);

        let effects = selector.dispatch(clusters_for("vc-1", &[]));
        assert!(effects.is_empty());
    }

    #[test]
    fn test_tag_toggle_round_trip() {
        let mut selector = CascadingSelector::new();
        selector.dispatch(SelectionEvent::VCentersLoaded(options(&["vc-1"])));
        selector.dispatch(clusters_for("vc-1", &["cl-a"]));
        selector.dispatch(SelectionEvent::ToggleTag("silver".to_string()));
        let original = selector.scope().tag_ids.clone();

        let effects = selector.dispatch(SelectionEvent::ToggleTag("gold".to_string()));
        assert_eq!(
            effects[0],
            SelectionEffect::TagsChanged(BTreeSet::from(["gold".to_string(), "silver".to_string()]))
        );
        assert!(matches!(effects[1], SelectionEffect::RequestClusters(_)));

        selector.dispatch(SelectionEvent::ToggleTag("gold".to_string()));
        assert_eq!(selector.scope().tag_ids, original);

        // Tags never reset the vCenter or cluster.
        assert_eq!(selector.scope().v_center_id.as_deref(), Some("vc-1"));
        assert_eq!(selector.scope().cluster_id.as_deref(), Some("cl-a"));
    }

    #[test]
    fn test_tag_toggle_without_vcenter_requests_nothing() {
        let mut selector = CascadingSelector::new();
        let effects = selector.dispatch(SelectionEvent::ToggleTag("gold".to_string()));
        assert_eq!(
            effects,
            vec![SelectionEffect::TagsChanged(BTreeSet::from(["gold".to_string()]))]
        );
    }

    #[test]
    fn test_select_cluster_requires_vcenter() {
        let mut selector = CascadingSelector::new();
        let effects = selector.dispatch(SelectionEvent::SelectCluster("cl-a".to_string()));
        assert!(effects.is_empty());
        assert!(selector.scope().cluster_id.is_none());
    }

    #[test]
    fn test_reduce_is_pure() {
        let state = SelectionState::default();
        let event = SelectionEvent::VCentersLoaded(options(&["vc-1"]));

        let first = reduce(state.clone(), event.clone());
        let second = reduce(state, event);
        assert_eq!(first, second);
    }
}
