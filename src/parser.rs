//! Protobuf parser for GTFS Realtime feeds.

use prost::Message;

use crate::gtfs_rt;
use crate::ingest::{FeedEntity, TripUpdate, VehiclePosition};

/// Decodes a protobuf-encoded GTFS-RT [`FeedMessage`](gtfs_rt::FeedMessage) from raw bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not valid protobuf for a `FeedMessage`.
pub fn parse_feed(bytes: &[u8]) -> Result<gtfs_rt::FeedMessage, prost::DecodeError> {
    gtfs_rt::FeedMessage::decode(bytes)
}

/// Decodes a feed and projects its entities onto [`FeedEntity`], keeping feed order.
pub fn decode_entities(bytes: &[u8]) -> Result<Vec<FeedEntity>, prost::DecodeError> {
    let feed = parse_feed(bytes)?;
    Ok(feed.entity.into_iter().map(FeedEntity::from).collect())
}

impl From<gtfs_rt::FeedEntity> for FeedEntity {
    fn from(entity: gtfs_rt::FeedEntity) -> Self {
        let trip_update = entity.trip_update.map(|tu| TripUpdate {
            trip_id: tu.trip.trip_id.unwrap_or_default(),
            delay: tu.delay,
        });

        let vehicle = entity.vehicle.map(|vp| {
            let (latitude, longitude) = vp
                .position
                .map(|p| (f64::from(p.latitude), f64::from(p.longitude)))
                .unwrap_or_default();
            let trip = vp.trip.unwrap_or_default();

            VehiclePosition {
                // Feeds that omit the vehicle descriptor still need a stable key.
                vehicle_id: vp
                    .vehicle
                    .and_then(|v| v.id)
                    .unwrap_or_else(|| entity.id.clone()),
                latitude,
                longitude,
                trip_id: trip.trip_id.unwrap_or_default(),
                route_id: trip.route_id.unwrap_or_default(),
            }
        });

        FeedEntity {
            trip_update,
            vehicle,
        }
    }
}
