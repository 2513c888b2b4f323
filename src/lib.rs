pub mod config;
pub mod error;
pub mod fetch;
pub mod infra;
pub mod ingest;
pub mod parser;
pub mod pipeline;
pub mod services;
pub mod stats;

pub mod gtfs_rt {
    include!(concat!(env!("OUT_DIR"), "/transit_realtime.rs"));
}
