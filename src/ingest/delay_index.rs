use std::collections::HashMap;

use super::types::FeedEntity;

/// Trip id → current delay in seconds, rebuilt from each cycle's feed.
///
/// Only trips whose trip update explicitly carried a delay have an entry.
/// A missing entry means the delay is unknown, not zero.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TripDelayIndex {
    delays: HashMap<String, i32>,
}

impl TripDelayIndex {
    /// Scans every entity in feed order. A later delay for the same trip
    /// replaces an earlier one; updates without a delay leave the index as is.
    pub fn build(entities: &[FeedEntity]) -> Self {
        let mut delays = HashMap::new();

        for entity in entities {
            let Some(update) = &entity.trip_update else {
                continue;
            };
            if let Some(delay) = update.delay {
                delays.insert(update.trip_id.clone(), delay);
            }
        }

        Self { delays }
    }

    pub fn get(&self, trip_id: &str) -> Option<i32> {
        self.delays.get(trip_id).copied()
    }

    pub fn len(&self) -> usize {
        self.delays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delays.is_empty()
    }
}
