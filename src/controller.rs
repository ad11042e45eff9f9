//! Dashboard View Controller
//!
//! Issues the three resource fetches as independent tasks and writes each
//! outcome into its slot of the `DashboardStore`. Optionally repeats the
//! cycle on a fixed interval until shut down.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tracing::Instrument;
use uuid::Uuid;

use crate::api::{DataSource, FetchError};
use crate::state::{DashboardSnapshot, DashboardStore, Slot, SlotKind};

/// Drives fetches from a `DataSource` into a `DashboardStore`
pub struct DashboardController {
    source: Arc<dyn DataSource>,
    store: DashboardStore,
}

/// In-flight fetches of one load cycle
///
/// Dropping the handle aborts fetches that have not completed yet.
#[must_use = "dropping a LoadHandle aborts its fetches"]
pub struct LoadHandle {
    tasks: JoinSet<()>,
}

impl LoadHandle {
    /// Wait for all fetches of this cycle to finish
    pub async fn join(mut self) {
        while let Some(result) = self.tasks.join_next().await {
            if let Err(e) = result {
                if e.is_panic() {
                    tracing::error!(error = %e, "Fetch task panicked");
                }
            }
        }
    }
}

impl DashboardController {
    pub fn new(source: Arc<dyn DataSource>, store: DashboardStore) -> Self {
        Self { source, store }
    }

    pub fn store(&self) -> &DashboardStore {
        &self.store
    }

    /// Start one load cycle
    ///
    /// The three fetches run concurrently and never wait on each other. Each
    /// updates its slot once it completes. Slots are never reset to
    /// `Loading`, and a failed fetch keeps any value loaded earlier.
    pub fn load(&self) -> LoadHandle {
        let cycle = Uuid::new_v4();
        let span = tracing::info_span!("load", cycle = %cycle);
        tracing::debug!(parent: &span, "Starting load cycle");

        let mut tasks = JoinSet::new();

        let source = Arc::clone(&self.source);
        let store = self.store.clone();
        tasks.spawn(
            async move {
                let slot = fetch_slot(SlotKind::Current, source.current()).await;
                store.set_current(slot);
            }
            .instrument(span.clone()),
        );

        let source = Arc::clone(&self.source);
        let store = self.store.clone();
        tasks.spawn(
            async move {
                let slot = fetch_slot(SlotKind::Historical, source.historical()).await;
                store.set_historical(slot);
            }
            .instrument(span.clone()),
        );

        let source = Arc::clone(&self.source);
        let store = self.store.clone();
        tasks.spawn(
            async move {
                let slot = fetch_slot(SlotKind::Prediction, source.prediction()).await;
                store.set_prediction(slot);
            }
            .instrument(span),
        );

        LoadHandle { tasks }
    }

    /// Load once and wait for every slot to settle
    pub async fn load_settled(&self) -> Arc<DashboardSnapshot> {
        self.load().join().await;
        self.store.snapshot()
    }

    /// Load, then reload every `refresh` until `shutdown` resolves
    ///
    /// Without a refresh interval this is a single load cycle.
    pub async fn run<F>(&self, refresh: Option<Duration>, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let Some(period) = refresh else {
            tokio::select! {
                _ = self.load().join() => {}
                _ = &mut shutdown => tracing::info!("Shutdown before initial load completed"),
            }
            return;
        };

        tracing::info!(interval_secs = period.as_secs_f64(), "Starting periodic refresh");

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    let handle = self.load();
                    tokio::select! {
                        _ = handle.join() => {}
                        _ = &mut shutdown => break,
                    }
                }
            }
        }

        tracing::info!("Refresh loop stopped");
    }
}

/// Await one fetch and turn its outcome into a slot, logging the result
async fn fetch_slot<T, F>(kind: SlotKind, fetch: F) -> Slot<T>
where
    F: Future<Output = Result<T, FetchError>>,
{
    let started = Instant::now();
    let result = fetch.await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match &result {
        Ok(_) => tracing::info!(slot = %kind, elapsed_ms, "Slot loaded"),
        Err(e) => tracing::warn!(slot = %kind, elapsed_ms, error = %e, "Slot fetch failed"),
    }

    Slot::from_result(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HistoricalPoint, HistoricalSeries, Reading};
    use async_trait::async_trait;
    use chrono::DateTime;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn reading(value: f64, ms: i64) -> Reading {
        Reading::new(value, DateTime::from_timestamp_millis(ms).unwrap())
    }

    fn series() -> HistoricalSeries {
        HistoricalSeries::new(vec![
            HistoricalPoint::new(DateTime::from_timestamp_millis(1).unwrap(), 1.0),
            HistoricalPoint::new(DateTime::from_timestamp_millis(2).unwrap(), 2.0),
        ])
    }

    /// Source with canned answers; `current` can be made to hang forever
    /// or to time out on every call after the first
    struct FakeSource {
        current_hangs: bool,
        current_fails_after_first: bool,
        prediction_fails: bool,
        calls: AtomicU32,
    }

    impl FakeSource {
        fn healthy() -> Self {
            Self {
                current_hangs: false,
                current_fails_after_first: false,
                prediction_fails: false,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl DataSource for FakeSource {
        async fn current(&self) -> Result<Reading, FetchError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.current_hangs {
                std::future::pending::<()>().await;
            }
            if self.current_fails_after_first && call > 0 {
                return Err(FetchError::Timeout);
            }
            Ok(reading(42.567 + call as f64, 1_700_000_000_000))
        }

        async fn historical(&self) -> Result<HistoricalSeries, FetchError> {
            Ok(series())
        }

        async fn prediction(&self) -> Result<Reading, FetchError> {
            if self.prediction_fails {
                return Err(FetchError::status(500, "model not loaded"));
            }
            Ok(reading(50.0, 1_700_003_600_000))
        }
    }

    fn controller(source: FakeSource) -> DashboardController {
        DashboardController::new(Arc::new(source), DashboardStore::new())
    }

    #[tokio::test]
    async fn test_load_fills_all_slots() {
        let controller = controller(FakeSource::healthy());

        let snapshot = controller.load_settled().await;

        assert_eq!(snapshot.current.loaded().map(|r| r.value), Some(42.567));
        assert_eq!(snapshot.historical.loaded().map(|s| s.len()), Some(2));
        assert_eq!(snapshot.prediction.loaded().map(|r| r.value), Some(50.0));
        assert_eq!(snapshot.revision, 3);
    }

    #[tokio::test]
    async fn test_failure_is_isolated_to_its_slot() {
        let controller = controller(FakeSource {
            prediction_fails: true,
            ..FakeSource::healthy()
        });

        let snapshot = controller.load_settled().await;

        assert_eq!(snapshot.prediction.error(), Some("HTTP 500: model not loaded"));
        assert!(snapshot.current.loaded().is_some());
        assert!(snapshot.historical.loaded().is_some());
        assert_eq!(snapshot.failed_slots(), vec![SlotKind::Prediction]);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_last_reading() {
        let controller = controller(FakeSource {
            current_fails_after_first: true,
            ..FakeSource::healthy()
        });

        let first = controller.load_settled().await;
        assert_eq!(first.current, Slot::Loaded(reading(42.567, 1_700_000_000_000)));

        let second = controller.load_settled().await;
        assert!(second.current.is_stale());
        assert_eq!(second.current.loaded().map(|r| r.value), Some(42.567));
        assert_eq!(second.current.error(), Some("Request timed out"));
        assert_eq!(second.failed_slots(), vec![SlotKind::Current]);
        assert!(second.prediction.loaded().is_some());
    }

    #[tokio::test]
    async fn test_hung_fetch_does_not_block_others() {
        let controller = controller(FakeSource {
            current_hangs: true,
            ..FakeSource::healthy()
        });

        let handle = controller.load();
        let mut rx = controller.store().subscribe();

        let snapshot = tokio::time::timeout(
            Duration::from_secs(1),
            rx.wait_for(|s| s.historical.is_settled() && s.prediction.is_settled()),
        )
        .await
        .unwrap()
        .unwrap()
        .clone();

        assert!(snapshot.current.is_loading());
        assert!(snapshot.historical.loaded().is_some());
        assert!(snapshot.prediction.loaded().is_some());
        drop(handle);
    }

    #[tokio::test]
    async fn test_run_without_refresh_loads_once() {
        let source = Arc::new(FakeSource::healthy());
        let controller = DashboardController::new(source.clone(), DashboardStore::new());

        controller.run(None, std::future::pending::<()>()).await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert!(controller.store().snapshot().is_settled());
    }

    #[tokio::test]
    async fn test_run_refreshes_until_shutdown() {
        let source = Arc::new(FakeSource::healthy());
        let controller = DashboardController::new(source.clone(), DashboardStore::new());

        controller
            .run(
                Some(Duration::from_millis(20)),
                tokio::time::sleep(Duration::from_millis(110)),
            )
            .await;

        let calls = source.calls.load(Ordering::SeqCst);
        assert!(calls >= 2, "expected several refreshes, got {}", calls);

        // Each refresh replaces the current reading wholesale
        let current = controller.store().snapshot().current.loaded().cloned().unwrap();
        assert!(current.value > 42.567);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown_while_loading() {
        let controller = controller(FakeSource {
            current_hangs: true,
            ..FakeSource::healthy()
        });

        tokio::time::timeout(
            Duration::from_secs(1),
            controller.run(
                Some(Duration::from_secs(60)),
                tokio::time::sleep(Duration::from_millis(50)),
            ),
        )
        .await
        .expect("run should return after shutdown");

        assert!(controller.store().snapshot().current.is_loading());
    }
}
