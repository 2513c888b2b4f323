use chrono::{DateTime, Utc};
use tracing::info;

use crate::ingest::FeedEntity;

/// Counters describing one ingestion cycle, logged when the cycle ends.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CycleStats {
    pub cycle: u64,
    pub started_at: DateTime<Utc>,
    pub total_entities: usize,

    // entity facets
    pub vehicles: usize,
    pub trip_updates: usize,
    pub trip_updates_with_delay: usize,
    pub vehicles_with_own_delay: usize,

    // merge results
    pub indexed_trip_delays: usize,
    pub records_written: usize,
    pub duplicates_dropped: usize,
}

impl CycleStats {
    /// Empty counters for a cycle that produced no feed data.
    pub fn new(cycle: u64, started_at: DateTime<Utc>) -> Self {
        CycleStats {
            cycle,
            started_at,
            ..Default::default()
        }
    }

    pub fn from_entities(cycle: u64, started_at: DateTime<Utc>, entities: &[FeedEntity]) -> Self {
        let mut s = Self::new(cycle, started_at);
        s.total_entities = entities.len();

        for e in entities {
            let delay = e.trip_update.as_ref().and_then(|u| u.delay);

            if e.vehicle.is_some() {
                s.vehicles += 1;

                if delay.is_some() {
                    s.vehicles_with_own_delay += 1;
                }
            }

            if e.trip_update.is_some() {
                s.trip_updates += 1;

                if delay.is_some() {
                    s.trip_updates_with_delay += 1;
                }
            }
        }

        s
    }

    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    /// Share of vehicle records that carry a known delay.
    pub fn delay_coverage_pct(&self) -> f64 {
        Self::pct(self.vehicles_with_own_delay, self.vehicles)
    }

    pub fn log(&self, outcome: &str) {
        info!(
            cycle = self.cycle,
            started_at = %self.started_at,
            outcome,
            total_entities = self.total_entities,
            vehicles = self.vehicles,
            trip_updates = self.trip_updates,
            trip_updates_with_delay = self.trip_updates_with_delay,
            indexed_trip_delays = self.indexed_trip_delays,
            delay_coverage_pct = self.delay_coverage_pct(),
            records_written = self.records_written,
            duplicates_dropped = self.duplicates_dropped,
            "Cycle stats"
        );
    }
}
