//! Vantage Selection Pipeline
//!
//! Polls the vCenter, tag and cluster lists and feeds them through the
//! cascading selector. Reducer effects asking for a cluster list become a
//! cluster task keyed by `(vCenter, tags)`, so a list requested for a
//! previous vCenter never reaches the selector.
//!
//! @version 0.1.0
//! @author Vantage Development Team

use crate::source::SelectionSource;
use crate::supervisor::QuerySupervisor;
use crate::task::{Fetcher, SourceUpdate};
use futures::FutureExt;
use std::sync::Arc;
use std::time::Duration;
use vantage_common::{PollingConfig, QueryKey, SelectionOption, SlotId};
use vantage_selection::{
    CascadingSelector, ClusterRequest, SelectionEffect, SelectionEvent, SelectionScope, SelectionState,
};

const VCENTERS_SLOT: &str = "selection.vcenters";
const CLUSTERS_SLOT: &str = "selection.clusters";
const TAGS_SLOT: &str = "selection.tags";

/// Payload of a selection source task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionFetch {
    VCenters(Vec<SelectionOption>),
    Clusters {
        v_center_id: String,
        options: Vec<SelectionOption>,
    },
    Tags(Vec<SelectionOption>),
}

pub struct SelectionPipeline {
    source: Arc<dyn SelectionSource>,
    interval: Duration,
    selector: CascadingSelector,
    supervisor: QuerySupervisor<SelectionFetch>,
}

impl SelectionPipeline {
    pub fn new(source: Arc<dyn SelectionSource>, interval: Duration) -> Self {
        Self {
            source,
            interval,
            selector: CascadingSelector::new(),
            supervisor: QuerySupervisor::new(),
        }
    }

    /// Option lists refresh at the status table interval.
    pub fn from_config(source: Arc<dyn SelectionSource>, polling: &PollingConfig) -> Self {
        Self::new(source, polling.status_table())
    }

    /// Start polling the vCenter and tag lists.
    pub fn start(&mut self) {
        let vcenters = self.vcenters_fetcher();
        self.supervisor.ensure(
            SlotId::new(VCENTERS_SLOT),
            QueryKey::from_parts(["vcenters"]),
            vcenters,
            self.interval,
        );

        let tags = self.tags_fetcher();
        self.supervisor
            .ensure(SlotId::new(TAGS_SLOT), QueryKey::from_parts(["tags"]), tags, self.interval);
    }

    pub fn scope(&self) -> &SelectionScope {
        self.selector.scope()
    }

    pub fn state(&self) -> &SelectionState {
        self.selector.state()
    }

    /// Key of the cluster query currently polled, if any.
    pub fn cluster_key(&self) -> Option<&QueryKey> {
        self.supervisor.current_key(&SlotId::new(CLUSTERS_SLOT))
    }

    pub fn select_vcenter(&mut self, id: impl Into<String>) -> Vec<SelectionEffect> {
        self.dispatch(SelectionEvent::SelectVCenter(id.into()))
    }

    pub fn select_cluster(&mut self, id: impl Into<String>) -> Vec<SelectionEffect> {
        self.dispatch(SelectionEvent::SelectCluster(id.into()))
    }

    pub fn toggle_tag(&mut self, id: impl Into<String>) -> Vec<SelectionEffect> {
        self.dispatch(SelectionEvent::ToggleTag(id.into()))
    }

    /// Wait for the next accepted source result, feed it to the selector
    /// and return the effects. A failed fetch leaves the selection as is
    /// and yields no effects.
    pub async fn next_effects(&mut self) -> Option<Vec<SelectionEffect>> {
        let update = self.supervisor.next_update().await?;
        Some(self.apply(update))
    }

    pub async fn shutdown(&mut self) {
        self.supervisor.shutdown().await;
    }

    fn apply(&mut self, update: SourceUpdate<SelectionFetch>) -> Vec<SelectionEffect> {
        let event = match update.result {
            Ok(SelectionFetch::VCenters(options)) => SelectionEvent::VCentersLoaded(options),
            Ok(SelectionFetch::Tags(options)) => SelectionEvent::TagsLoaded(options),
            Ok(SelectionFetch::Clusters { v_center_id, options }) => {
                SelectionEvent::ClustersLoaded { v_center_id, options }
            }
            Err(e) => {
                tracing::warn!(slot = %update.slot, "Keeping selection after failed fetch: {}", e);
                return Vec::new();
            }
        };
        self.dispatch(event)
    }

    fn dispatch(&mut self, event: SelectionEvent) -> Vec<SelectionEffect> {
        let effects = self.selector.dispatch(event);
        for effect in &effects {
            if let SelectionEffect::RequestClusters(request) = effect {
                let fetcher = self.clusters_fetcher(request);
                self.supervisor
                    .ensure(SlotId::new(CLUSTERS_SLOT), request.key(), fetcher, self.interval);
            }
        }
        effects
    }

    fn vcenters_fetcher(&self) -> Fetcher<SelectionFetch> {
        let source = Arc::clone(&self.source);
        Arc::new(move || {
            let source = Arc::clone(&source);
            async move { source.vcenters().await.map(SelectionFetch::VCenters) }.boxed()
        })
    }

    fn tags_fetcher(&self) -> Fetcher<SelectionFetch> {
        let source = Arc::clone(&self.source);
        Arc::new(move || {
            let source = Arc::clone(&source);
            async move { source.tags().await.map(SelectionFetch::Tags) }.boxed()
        })
    }

    fn clusters_fetcher(&self, request: &ClusterRequest) -> Fetcher<SelectionFetch> {
        let source = Arc::clone(&self.source);
        let request = request.clone();
        Arc::new(move || {
            let source = Arc::clone(&source);
            let request = request.clone();
            async move {
                source
                    .clusters(&request.v_center_id, &request.tag_ids)
                    .await
                    .map(|options| SelectionFetch::Clusters {
                        v_center_id: request.v_center_id.clone(),
                        options,
                    })
            }
            .boxed()
        })
    }
}
