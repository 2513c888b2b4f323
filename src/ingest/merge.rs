use super::types::{FeedEntity, MergedRecord, ServerNow, WeatherCondition};

/// Builds one [`MergedRecord`] per entity that carries a vehicle position, in
/// feed order.
///
/// `delay_seconds` comes from the entity's own trip update, not from the
/// cycle's [`TripDelayIndex`](super::TripDelayIndex): a vehicle whose entity
/// has no trip update gets `None` even if its trip has a known delay.
pub fn merge_records(entities: &[FeedEntity], weather: &WeatherCondition) -> Vec<MergedRecord> {
    entities
        .iter()
        .filter_map(|entity| {
            let vehicle = entity.vehicle.as_ref()?;
            Some(MergedRecord {
                vehicle_id: vehicle.vehicle_id.clone(),
                latitude: vehicle.latitude,
                longitude: vehicle.longitude,
                route_id: vehicle.route_id.clone(),
                trip_id: vehicle.trip_id.clone(),
                delay_seconds: entity.trip_update.as_ref().and_then(|u| u.delay),
                timestamp: ServerNow,
                weather: weather.as_str().to_string(),
            })
        })
        .collect()
}
