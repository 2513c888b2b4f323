use std::collections::HashMap;

use super::types::MergedRecord;

/// Collapses records sharing a `vehicle_id` so a batch carries each conflict
/// key once. The last record for a key wins and takes the slot where the key
/// first appeared.
///
/// Returns the batch and the number of records dropped.
pub fn dedupe_by_vehicle(records: &[MergedRecord]) -> (Vec<MergedRecord>, usize) {
    let mut slots: HashMap<&str, usize> = HashMap::with_capacity(records.len());
    let mut batch: Vec<MergedRecord> = Vec::with_capacity(records.len());

    for record in records {
        match slots.get(record.vehicle_id.as_str()) {
            Some(&slot) => batch[slot] = record.clone(),
            None => {
                slots.insert(&record.vehicle_id, batch.len());
                batch.push(record.clone());
            }
        }
    }

    let dropped = records.len() - batch.len();
    (batch, dropped)
}
