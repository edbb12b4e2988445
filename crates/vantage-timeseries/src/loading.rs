//! Vantage Loading State
//!
//! @version 0.1.0
//! @author Vantage Development Team

use crate::state::SourceStatus;
use serde::{Deserialize, Serialize};

/// Loading and empty flags derived from several independent sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingState {
    pub is_loading: bool,
    pub is_empty: bool,
    pub loading_complete: bool,
}

pub struct LoadingStateResolver;

impl LoadingStateResolver {
    /// Data from any source ends the loading state, even while others are
    /// still pending. Empty is only reported once nothing is pending.
    pub fn resolve(statuses: &[SourceStatus], any_data_available: bool) -> LoadingState {
        let any_pending = statuses.iter().any(|s| *s == SourceStatus::Pending);
        let loading_complete = !any_pending;

        LoadingState {
            is_loading: !any_data_available && any_pending,
            is_empty: loading_complete && !any_data_available,
            loading_complete,
        }
    }
}
