use crate::backend::Backend;
use crate::executor::ActionExecutor;
use lineup_common::model::{ActionOutcome, BatchResult, PlaylistTarget, TrackRequest};
use std::time::Duration;
use tracing::{info, warn};

/// Progress callbacks for a batch run. Called synchronously, in input order.
pub trait BatchObserver: Send {
    fn on_start(&mut self, _index: usize, _total: usize, _request: &TrackRequest) {}

    fn on_outcome(&mut self, _index: usize, _total: usize, _outcome: &ActionOutcome) {}
}

pub struct NoopObserver;

impl BatchObserver for NoopObserver {}

/// Runs the action executor over a list of tracks, one at a time.
pub struct BatchRunner<'a> {
    executor: &'a ActionExecutor,
    pacing: Duration,
}

impl<'a> BatchRunner<'a> {
    pub fn new(executor: &'a ActionExecutor, pacing: Duration) -> Self {
        Self { executor, pacing }
    }

    /// Attempt every item exactly once, in order, against the same page.
    ///
    /// A failed item never stops the run. The pacing delay follows every
    /// attempt, whatever its outcome.
    pub async fn run(
        &self,
        backend: &mut dyn Backend,
        items: &[TrackRequest],
        target: &PlaylistTarget,
        observer: &mut dyn BatchObserver,
    ) -> BatchResult {
        let total = items.len();
        let mut result = BatchResult::new();
        info!(total, playlist = %target.name, "Starting batch");

        for (index, request) in items.iter().enumerate() {
            observer.on_start(index, total, request);

            let outcome = self.executor.execute(backend, request, target).await;
            if !outcome.is_added() {
                warn!(item = index + 1, total, "{}", outcome);
            }
            result.record(&outcome);
            observer.on_outcome(index, total, &outcome);

            tokio::time::sleep(self.pacing).await;
        }

        info!(
            added = result.success_count,
            failed = result.failure_count,
            "Batch complete"
        );
        result
    }
}
