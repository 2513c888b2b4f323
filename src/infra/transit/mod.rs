mod client;

pub use client::GtfsRtSource;
