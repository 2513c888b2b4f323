//! Data types shared by the merge pipeline.

use serde::{Serialize, Serializer};

/// Trip-level delay facet of a feed entity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TripUpdate {
    pub trip_id: String,
    /// Overall trip delay in seconds. `None` when the feed did not report one.
    pub delay: Option<i32>,
}

/// Vehicle-position facet of a feed entity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VehiclePosition {
    pub vehicle_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub trip_id: String,
    pub route_id: String,
}

/// One entity of a decoded feed. Either facet, both, or neither may be set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedEntity {
    pub trip_update: Option<TripUpdate>,
    pub vehicle: Option<VehiclePosition>,
}

impl FeedEntity {
    pub fn trip_update(trip_update: TripUpdate) -> Self {
        Self {
            trip_update: Some(trip_update),
            vehicle: None,
        }
    }

    pub fn vehicle(vehicle: VehiclePosition) -> Self {
        Self {
            trip_update: None,
            vehicle: Some(vehicle),
        }
    }
}

/// Primary weather classification ("Rain", "Clear", ...) at the configured point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherCondition(pub String);

impl WeatherCondition {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A row of the `vehicle_positions` table, keyed by `vehicle_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedRecord {
    pub vehicle_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub route_id: String,
    pub trip_id: String,
    pub delay_seconds: Option<i32>,
    pub timestamp: ServerNow,
    pub weather: String,
}

/// Ingestion timestamp placeholder.
///
/// Serializes as the PostgreSQL `now` input literal, so the store assigns the
/// value at write time on both insert and conflict update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServerNow;

impl Serialize for ServerNow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("now")
    }
}
