use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

use super::cycle::{CycleOutcome, Pipeline};
use crate::services::{RecordStore, TransitSource, WeatherSource};

/// Waits between cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub normal_interval: Duration,
    /// Used after a failed fetch. Longer than `normal_interval`.
    pub backoff_interval: Duration,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            normal_interval: Duration::from_secs(15),
            backoff_interval: Duration::from_secs(60),
        }
    }
}

impl Schedule {
    pub fn delay_after(&self, outcome: CycleOutcome) -> Duration {
        if outcome.is_backoff() {
            self.backoff_interval
        } else {
            self.normal_interval
        }
    }
}

/// Runs pipeline cycles back to back, one at a time, until shutdown.
pub struct Scheduler<T, W, S> {
    pipeline: Pipeline<T, W, S>,
    schedule: Schedule,
}

impl<T, W, S> Scheduler<T, W, S>
where
    T: TransitSource,
    W: WeatherSource,
    S: RecordStore,
{
    pub fn new(pipeline: Pipeline<T, W, S>, schedule: Schedule) -> Self {
        Self { pipeline, schedule }
    }

    /// Loops until `shutdown` resolves and returns the number of cycles run.
    ///
    /// Shutdown is only observed while waiting between cycles, so a cycle
    /// that has started always runs to completion.
    pub async fn run<F>(&self, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut cycles = 0u64;

        loop {
            cycles += 1;
            let outcome = self.pipeline.run_cycle(cycles).await;
            let delay = self.schedule.delay_after(outcome);

            if outcome.is_backoff() {
                warn!(cycle = cycles, delay_secs = delay.as_secs(), "Backing off before next cycle");
            } else {
                info!(cycle = cycles, delay_secs = delay.as_secs(), "Cycle complete, waiting");
            }

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = &mut shutdown => break,
            }
        }

        info!(cycles, "Scheduler stopped");
        cycles
    }
}
