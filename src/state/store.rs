//! Dashboard store
//!
//! Holds the current `DashboardSnapshot` in a `watch` channel. Writers update
//! one slot at a time; each update publishes a new immutable snapshot and
//! wakes every subscriber.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;

use super::slot::Slot;
use super::snapshot::DashboardSnapshot;
use crate::model::{HistoricalSeries, Reading};

/// Shared handle to the dashboard state
#[derive(Clone)]
pub struct DashboardStore {
    tx: Arc<watch::Sender<Arc<DashboardSnapshot>>>,
}

impl DashboardStore {
    /// Create a store with every slot `Loading`
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(DashboardSnapshot::default()));
        Self { tx: Arc::new(tx) }
    }

    /// Latest snapshot
    pub fn snapshot(&self) -> Arc<DashboardSnapshot> {
        Arc::clone(&self.tx.borrow())
    }

    /// Receiver notified on every slot replacement
    pub fn subscribe(&self) -> watch::Receiver<Arc<DashboardSnapshot>> {
        self.tx.subscribe()
    }

    /// Apply a fetch outcome to the current slot; see [`Slot::merge`]
    pub fn set_current(&self, slot: Slot<Reading>) {
        self.update(|snapshot| snapshot.current = snapshot.current.merge(slot));
    }

    pub fn set_historical(&self, slot: Slot<HistoricalSeries>) {
        self.update(|snapshot| snapshot.historical = snapshot.historical.merge(slot));
    }

    pub fn set_prediction(&self, slot: Slot<Reading>) {
        self.update(|snapshot| snapshot.prediction = snapshot.prediction.merge(slot));
    }

    /// Wait until no slot is `Loading` and return that snapshot
    pub async fn settled(&self) -> Arc<DashboardSnapshot> {
        let mut rx = self.subscribe();
        let settled = rx
            .wait_for(|snapshot| snapshot.is_settled())
            .await
            .map(|snapshot| Arc::clone(&snapshot));
        // Err is unreachable while `self` holds the sender
        settled.unwrap_or_else(|_| self.snapshot())
    }

    /// Publish a copy of the snapshot with `apply` run on it
    fn update(&self, apply: impl FnOnce(&mut DashboardSnapshot)) {
        self.tx.send_modify(|current| {
            let mut next = DashboardSnapshot::clone(current);
            apply(&mut next);
            next.revision += 1;
            next.updated_at = Some(Utc::now());
            *current = Arc::new(next);
        });
    }
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self::new()
    }
}
