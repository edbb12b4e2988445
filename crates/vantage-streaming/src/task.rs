//! Vantage Source Task
//!
//! A polling task bound to one result slot and one query key. Each tick runs
//! the fetcher and publishes the outcome on the supervisor's channel. The
//! task stops when cancelled, when its handle is dropped, or when the
//! receiving side of the channel is gone.
//!
//! @version 0.1.0
//! @author Vantage Development Team

use crate::source::FetchError;
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use vantage_common::{QueryKey, SlotId};

/// Future returned by a fetcher.
pub type FetchFuture<T> = BoxFuture<'static, Result<T, FetchError>>;

/// Produces a fresh fetch for every poll cycle.
pub type Fetcher<T> = Arc<dyn Fn() -> FetchFuture<T> + Send + Sync>;

/// Shortest poll period a task will run with.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

// =============================================================================
// Source Update
// =============================================================================

/// One poll cycle's result, tagged with the slot and key that produced it.
#[derive(Debug, Clone)]
pub struct SourceUpdate<T> {
    pub slot: SlotId,
    pub key: QueryKey,
    pub result: Result<T, FetchError>,
}

// =============================================================================
// Source Task
// =============================================================================

/// Handle to a running polling task.
pub struct SourceTask {
    slot: SlotId,
    key: QueryKey,
    cancel: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl SourceTask {
    /// Spawn a task that polls `fetcher` every `interval`, starting
    /// immediately. An in-flight fetch is abandoned on cancel.
    pub fn spawn<T>(
        slot: SlotId,
        key: QueryKey,
        fetcher: Fetcher<T>,
        interval: Duration,
        sender: mpsc::UnboundedSender<SourceUpdate<T>>,
    ) -> Self
    where
        T: Send + 'static,
    {
        if interval < MIN_POLL_INTERVAL {
            tracing::warn!(slot = %slot, ?interval, "Poll interval too short, using {:?}", MIN_POLL_INTERVAL);
        }
        let interval = interval.max(MIN_POLL_INTERVAL);
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let task_slot = slot.clone();
        let task_key = key.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {}
                }

                let result = tokio::select! {
                    _ = &mut stop_rx => break,
                    result = fetcher() => result,
                };

                if let Err(e) = &result {
                    tracing::warn!(slot = %task_slot, key = %task_key, "Fetch failed: {}", e);
                }

                let update = SourceUpdate {
                    slot: task_slot.clone(),
                    key: task_key.clone(),
                    result,
                };
                if sender.send(update).is_err() {
                    break;
                }
            }

            tracing::trace!(slot = %task_slot, key = %task_key, "Source task stopped");
        });

        tracing::debug!(slot = %slot, key = %key, ?interval, "Spawned source task");

        Self {
            slot,
            key,
            cancel: Some(stop_tx),
            task: Some(task),
        }
    }

    pub fn slot(&self) -> &SlotId {
        &self.slot
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// True once the loop has exited, e.g. because the receiver is gone.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Signal the task to stop and wait for it to exit.
    pub async fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for SourceTask {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
