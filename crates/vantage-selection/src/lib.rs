//! Vantage Selection - Cascading Scope Selection
//!
//! The vCenter → cluster → tag scope that parameterizes metric and selection
//! queries. Selection is driven by an explicit reducer so auto-selection on
//! data arrival can be tested without any rendering concerns.
//!
//! Key Features:
//! - Auto-select of the first vCenter and first cluster on arrival
//! - vCenter changes invalidate the cluster immediately
//! - Orthogonal, idempotent tag toggling
//! - Stale cluster lists for a previous vCenter are ignored
//!
//! @version 0.1.0
//! @author Vantage Development Team

pub mod scope;
pub mod selector;

pub use scope::{ClusterRequest, SelectionScope};
pub use selector::{
    reduce, CascadingSelector, SelectionEffect, SelectionEvent, SelectionState, SelectionStage,
    Transition,
};
