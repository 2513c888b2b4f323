//! Traits for the pipeline's external collaborators.
//!
//! Production implementations live in `crate::infra`; tests substitute
//! in-memory fakes.

pub mod record_store;
pub mod transit_source;
pub mod weather_source;

pub use record_store::RecordStore;
pub use transit_source::TransitSource;
pub use weather_source::WeatherSource;
