//! Per-cycle data shaping.
//!
//! Turns one cycle's decoded feed entities and weather condition into the
//! batch of [`MergedRecord`]s handed to the store.

pub mod batch;
pub mod delay_index;
pub mod merge;
pub mod types;

pub use batch::dedupe_by_vehicle;
pub use delay_index::TripDelayIndex;
pub use merge::merge_records;
pub use types::{FeedEntity, MergedRecord, ServerNow, TripUpdate, VehiclePosition, WeatherCondition};
