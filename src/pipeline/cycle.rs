use chrono::Utc;
use tracing::{Instrument, debug, error, info, warn};

use crate::error::IngestError;
use crate::ingest::{TripDelayIndex, dedupe_by_vehicle, merge_records};
use crate::services::{RecordStore, TransitSource, WeatherSource};
use crate::stats::CycleStats;

/// How a cycle ended. Decides the wait before the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The batch was written.
    Persisted { records: usize },
    /// Both fetches succeeded but no entity carried a vehicle position.
    NoData,
    /// The store rejected the batch. It is not retried.
    PersistFailed,
    /// The transit or weather fetch failed; nothing was merged.
    FetchFailed,
}

impl CycleOutcome {
    pub fn is_backoff(&self) -> bool {
        matches!(self, CycleOutcome::FetchFailed)
    }

    /// Maps a failed step onto an outcome. Fetch-side errors back off; a
    /// rejected write does not.
    pub fn from_error(err: &IngestError) -> Self {
        if err.is_fetch_failure() {
            CycleOutcome::FetchFailed
        } else {
            CycleOutcome::PersistFailed
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CycleOutcome::Persisted { .. } => "persisted",
            CycleOutcome::NoData => "no_data",
            CycleOutcome::PersistFailed => "persist_failed",
            CycleOutcome::FetchFailed => "fetch_failed",
        }
    }
}

/// One fetch → merge → persist pass over injected sources and store.
pub struct Pipeline<T, W, S> {
    transit: T,
    weather: W,
    store: S,
}

impl<T, W, S> Pipeline<T, W, S>
where
    T: TransitSource,
    W: WeatherSource,
    S: RecordStore,
{
    pub fn new(transit: T, weather: W, store: S) -> Self {
        Self {
            transit,
            weather,
            store,
        }
    }

    /// Runs a single cycle. Never fails: every error is logged and folded
    /// into the returned [`CycleOutcome`].
    pub async fn run_cycle(&self, cycle: u64) -> CycleOutcome {
        let span = tracing::info_span!("cycle", cycle);
        async {
            let (outcome, stats) = self.execute(cycle).await;
            stats.log(outcome.label());
            outcome
        }
        .instrument(span)
        .await
    }

    async fn execute(&self, cycle: u64) -> (CycleOutcome, CycleStats) {
        let started_at = Utc::now();
        info!("Running ingestion cycle");

        let (entities, weather) = tokio::join!(
            self.transit.fetch_entities(),
            self.weather.current_condition()
        );

        let (entities, weather) = match (entities, weather) {
            (Ok(entities), Ok(weather)) => (entities, weather),
            (entities, weather) => {
                let mut outcome = CycleOutcome::FetchFailed;
                if let Err(e) = &entities {
                    error!(error = %e, "Transit fetch failed");
                    outcome = CycleOutcome::from_error(e);
                }
                if let Err(e) = &weather {
                    error!(error = %e, "Weather fetch failed");
                    outcome = CycleOutcome::from_error(e);
                }
                warn!("Failed to fetch data, skipping this cycle");
                return (outcome, CycleStats::new(cycle, started_at));
            }
        };

        let mut stats = CycleStats::from_entities(cycle, started_at, &entities);

        // Record delays come from each entity's own trip update; the index
        // only reports how many trips announced a delay this cycle.
        let delays = TripDelayIndex::build(&entities);
        stats.indexed_trip_delays = delays.len();
        debug!(trip_delays = delays.len(), "Trip delay index built");

        let records = merge_records(&entities, &weather);
        if records.is_empty() {
            info!("No vehicle data to insert");
            return (CycleOutcome::NoData, stats);
        }

        let (batch, dropped) = dedupe_by_vehicle(&records);
        stats.duplicates_dropped = dropped;
        if dropped > 0 {
            warn!(dropped, "Duplicate vehicle ids in feed, keeping the last record of each");
        }

        info!(records = batch.len(), weather = %weather, "Upserting vehicle records");
        let outcome = match self.store.upsert(&batch).await {
            Ok(acknowledged) => {
                info!(acknowledged, "Upsert succeeded");
                stats.records_written = batch.len();
                CycleOutcome::Persisted {
                    records: batch.len(),
                }
            }
            Err(e) => {
                error!(error = %e, records = batch.len(), "Upsert failed, dropping batch");
                CycleOutcome::from_error(&e)
            }
        };

        (outcome, stats)
    }
}
