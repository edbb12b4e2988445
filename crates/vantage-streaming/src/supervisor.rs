//! Vantage Query Supervisor
//!
//! Owns the source tasks of one view and the channel they publish on.
//! Every slot runs at most one task; asking for a slot with a new key
//! replaces the task, and results still in flight for the old key are
//! dropped on receipt.
//!
//! @version 0.1.0
//! @author Vantage Development Team

use crate::task::{Fetcher, SourceTask, SourceUpdate};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use vantage_common::{QueryKey, SlotId};

pub struct QuerySupervisor<T> {
    tasks: HashMap<SlotId, SourceTask>,
    sender: mpsc::UnboundedSender<SourceUpdate<T>>,
    receiver: mpsc::UnboundedReceiver<SourceUpdate<T>>,
    stale_dropped: u64,
}

impl<T: Send + 'static> Default for QuerySupervisor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> QuerySupervisor<T> {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            tasks: HashMap::new(),
            sender,
            receiver,
            stale_dropped: 0,
        }
    }

    /// Make sure `slot` is polling `key`. Returns true when a task was
    /// (re)started, false when the slot already runs this key.
    pub fn ensure(&mut self, slot: SlotId, key: QueryKey, fetcher: Fetcher<T>, interval: Duration) -> bool {
        if self.current_key(&slot) == Some(&key) {
            return false;
        }

        if let Some(previous) = self.tasks.remove(&slot) {
            tracing::debug!(slot = %slot, old = %previous.key(), new = %key, "Query key changed");
        }

        let task = SourceTask::spawn(slot.clone(), key, fetcher, interval, self.sender.clone());
        self.tasks.insert(slot, task);
        true
    }

    /// Stop the task for `slot`. Returns true when one was running.
    pub fn disable(&mut self, slot: &SlotId) -> bool {
        match self.tasks.remove(slot) {
            Some(task) => {
                tracing::debug!(slot = %slot, key = %task.key(), "Disabled source");
                true
            }
            None => false,
        }
    }

    pub fn current_key(&self, slot: &SlotId) -> Option<&QueryKey> {
        self.tasks.get(slot).map(SourceTask::key)
    }

    /// Whether a task owns `slot` and is still polling.
    pub fn is_active(&self, slot: &SlotId) -> bool {
        self.tasks.get(slot).is_some_and(|task| !task.is_finished())
    }

    pub fn active_slots(&self) -> Vec<&SlotId> {
        let mut slots: Vec<&SlotId> = self.tasks.keys().collect();
        slots.sort();
        slots
    }

    /// Number of results discarded because their key was superseded.
    pub fn stale_dropped(&self) -> u64 {
        self.stale_dropped
    }

    /// Wait for the next result whose key is still current for its slot.
    /// With no running tasks this waits until one is started elsewhere, so
    /// callers bound it with a timeout or a `select!`.
    pub async fn next_update(&mut self) -> Option<SourceUpdate<T>> {
        loop {
            let update = self.receiver.recv().await?;
            if self.accepts(&update) {
                return Some(update);
            }
        }
    }

    /// Non-blocking variant of `next_update`.
    pub fn try_next_update(&mut self) -> Option<SourceUpdate<T>> {
        while let Ok(update) = self.receiver.try_recv() {
            if self.accepts(&update) {
                return Some(update);
            }
        }
        None
    }

    /// Stop every task and wait for them to exit.
    pub async fn shutdown(&mut self) {
        let tasks: Vec<SourceTask> = self.tasks.drain().map(|(_, task)| task).collect();
        for task in tasks {
            task.cancel().await;
        }
        // Drain results produced before the tasks stopped.
        while self.receiver.try_recv().is_ok() {}
        tracing::debug!("Query supervisor shut down");
    }

    fn accepts(&mut self, update: &SourceUpdate<T>) -> bool {
        if self.current_key(&update.slot) == Some(&update.key) {
            return true;
        }
        self.stale_dropped += 1;
        tracing::debug!(slot = %update.slot, key = %update.key, "Dropped stale result");
        false
    }

    #[cfg(test)]
    fn inject(&self, update: SourceUpdate<T>) {
        let _ = self.sender.send(update);
    }
}

// =============================================================================
// Tests
// =============================================================================
