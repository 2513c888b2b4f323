use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use prost::Message;
use tokio::time::Instant;
use transit_weather_ingest::error::IngestError;
use transit_weather_ingest::fetch::HttpClient;
use transit_weather_ingest::gtfs_rt::{
    FeedEntity, FeedHeader, FeedMessage, Position, TripDescriptor, TripUpdate, VehicleDescriptor,
    VehiclePosition,
};
use transit_weather_ingest::infra::{openweather::OpenWeatherSource, transit::GtfsRtSource};
use transit_weather_ingest::ingest::MergedRecord;
use transit_weather_ingest::pipeline::{CycleOutcome, Pipeline, Schedule, Scheduler};
use transit_weather_ingest::services::RecordStore;

const MAX_FEED_BYTES: usize = 1024 * 1024;

/// Serves the same canned response to every request and records call times.
#[derive(Clone)]
struct Canned {
    status: u16,
    body: Vec<u8>,
    calls: Arc<Mutex<Vec<Instant>>>,
}

impl Canned {
    fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
            calls: Arc::default(),
        }
    }

    fn call_offsets(&self, start: Instant) -> Vec<u64> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|t| (*t - start).as_secs())
            .collect()
    }
}

#[async_trait]
impl HttpClient for Canned {
    async fn execute(&self, _req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.calls.lock().unwrap().push(Instant::now());
        let response = http::Response::builder()
            .status(self.status)
            .body(self.body.clone())
            .unwrap();
        Ok(response.into())
    }
}

/// Key-based table: an upsert replaces any row with the same vehicle id.
#[derive(Clone, Default)]
struct MemoryTable {
    rows: Arc<Mutex<HashMap<String, MergedRecord>>>,
    upserts: Arc<Mutex<usize>>,
    reject: bool,
}

#[async_trait]
impl RecordStore for MemoryTable {
    async fn upsert(&self, records: &[MergedRecord]) -> Result<usize, IngestError> {
        *self.upserts.lock().unwrap() += 1;
        if self.reject {
            return Err(IngestError::Persist("HTTP 409: duplicate key".into()));
        }
        let mut rows = self.rows.lock().unwrap();
        for record in records {
            rows.insert(record.vehicle_id.clone(), record.clone());
        }
        Ok(records.len())
    }
}

fn trip(trip_id: &str) -> TripDescriptor {
    TripDescriptor {
        trip_id: Some(trip_id.to_string()),
        route_id: Some("R1".to_string()),
        ..Default::default()
    }
}

fn vehicle(vehicle_id: &str, trip_id: &str, lat: f32, lon: f32) -> VehiclePosition {
    VehiclePosition {
        trip: Some(trip(trip_id)),
        vehicle: Some(VehicleDescriptor {
            id: Some(vehicle_id.to_string()),
            ..Default::default()
        }),
        position: Some(Position {
            latitude: lat,
            longitude: lon,
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn encode(entity: Vec<FeedEntity>) -> Vec<u8> {
    FeedMessage {
        header: FeedHeader {
            gtfs_realtime_version: "2.0".to_string(),
            timestamp: Some(1_700_000_000),
            ..Default::default()
        },
        entity,
    }
    .encode_to_vec()
}

/// veh1 carries its own trip update with a 90 s delay; veh2 has none.
fn two_vehicle_feed() -> Vec<u8> {
    encode(vec![
        FeedEntity {
            id: "1".to_string(),
            vehicle: Some(vehicle("veh1", "T1", 10.0, 20.0)),
            trip_update: Some(TripUpdate {
                trip: trip("T1"),
                delay: Some(90),
                ..Default::default()
            }),
            ..Default::default()
        },
        FeedEntity {
            id: "2".to_string(),
            vehicle: Some(vehicle("veh2", "T2", 30.0, 40.0)),
            ..Default::default()
        },
    ])
}

fn transit(client: Canned) -> GtfsRtSource<Canned> {
    GtfsRtSource::new(client, "http://feed.test/vehicle_positions", MAX_FEED_BYTES)
}

fn weather(client: Canned) -> OpenWeatherSource<Canned> {
    OpenWeatherSource::new(client, "http://weather.test/data/2.5/weather", 42.6621, -73.7932, "metric")
        .unwrap()
}

fn rain() -> Canned {
    Canned::new(200, r#"{"weather":[{"main":"Rain"}]}"#)
}

#[tokio::test]
async fn test_scenario_a_merges_vehicles_with_weather() {
    let table = MemoryTable::default();
    let pipeline = Pipeline::new(
        transit(Canned::new(200, two_vehicle_feed())),
        weather(rain()),
        table.clone(),
    );

    let outcome = pipeline.run_cycle(1).await;

    assert_eq!(outcome, CycleOutcome::Persisted { records: 2 });
    let rows = table.rows.lock().unwrap();
    assert_eq!(rows.len(), 2);

    let veh1 = &rows["veh1"];
    assert_eq!(veh1.delay_seconds, Some(90));
    assert_eq!(veh1.weather, "Rain");
    assert_eq!((veh1.latitude, veh1.longitude), (10.0, 20.0));
    assert_eq!(veh1.trip_id, "T1");

    let veh2 = &rows["veh2"];
    assert_eq!(veh2.delay_seconds, None);
    assert_eq!(veh2.weather, "Rain");
    assert_eq!((veh2.latitude, veh2.longitude), (30.0, 40.0));
}

#[tokio::test]
async fn test_repeated_vehicle_overwrites_previous_row() {
    let table = MemoryTable::default();

    let first = Pipeline::new(
        transit(Canned::new(200, two_vehicle_feed())),
        weather(rain()),
        table.clone(),
    );
    first.run_cycle(1).await;

    let moved = encode(vec![FeedEntity {
        id: "1".to_string(),
        vehicle: Some(vehicle("veh1", "T1", 11.0, 21.0)),
        ..Default::default()
    }]);
    let second = Pipeline::new(
        transit(Canned::new(200, moved)),
        weather(Canned::new(200, r#"{"weather":[{"main":"Clear"}]}"#)),
        table.clone(),
    );
    second.run_cycle(2).await;

    let rows = table.rows.lock().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows["veh1"].latitude, 11.0);
    assert_eq!(rows["veh1"].weather, "Clear");
    assert_eq!(rows["veh1"].delay_seconds, None);
    assert_eq!(rows["veh2"].weather, "Rain");
}

#[tokio::test(start_paused = true)]
async fn test_scenario_b_transit_error_backs_off() {
    let feed = Canned::new(500, "internal error");
    let table = MemoryTable::default();
    let scheduler = Scheduler::new(
        Pipeline::new(transit(feed.clone()), weather(rain()), table.clone()),
        Schedule::default(),
    );
    let start = Instant::now();

    let cycles = scheduler
        .run(tokio::time::sleep(Duration::from_secs(70)))
        .await;

    assert_eq!(cycles, 2);
    assert_eq!(feed.call_offsets(start), vec![0, 60]);
    assert_eq!(*table.upserts.lock().unwrap(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_undecodable_feed_backs_off() {
    let feed = Canned::new(200, vec![0xFF, 0xFE, 0x00, 0x01]);
    let table = MemoryTable::default();
    let scheduler = Scheduler::new(
        Pipeline::new(transit(feed.clone()), weather(rain()), table.clone()),
        Schedule::default(),
    );
    let start = Instant::now();

    let cycles = scheduler
        .run(tokio::time::sleep(Duration::from_secs(70)))
        .await;

    assert_eq!(cycles, 2);
    assert_eq!(feed.call_offsets(start), vec![0, 60]);
    assert_eq!(*table.upserts.lock().unwrap(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_malformed_weather_backs_off() {
    let sky = Canned::new(200, r#"{"weather":"sunny"}"#);
    let table = MemoryTable::default();
    let scheduler = Scheduler::new(
        Pipeline::new(transit(Canned::new(200, two_vehicle_feed())), weather(sky.clone()), table.clone()),
        Schedule::default(),
    );
    let start = Instant::now();

    scheduler
        .run(tokio::time::sleep(Duration::from_secs(70)))
        .await;

    assert_eq!(sky.call_offsets(start), vec![0, 60]);
    assert!(table.rows.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_scenario_c_no_vehicles_skips_store() {
    let updates_only = encode(vec![FeedEntity {
        id: "1".to_string(),
        trip_update: Some(TripUpdate {
            trip: trip("T1"),
            delay: Some(90),
            ..Default::default()
        }),
        ..Default::default()
    }]);
    let feed = Canned::new(200, updates_only);
    let table = MemoryTable::default();
    let scheduler = Scheduler::new(
        Pipeline::new(transit(feed.clone()), weather(rain()), table.clone()),
        Schedule::default(),
    );
    let start = Instant::now();

    scheduler
        .run(tokio::time::sleep(Duration::from_secs(20)))
        .await;

    assert_eq!(feed.call_offsets(start), vec![0, 15]);
    assert_eq!(*table.upserts.lock().unwrap(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_scenario_d_write_error_resumes_normal_interval() {
    let feed = Canned::new(200, two_vehicle_feed());
    let table = MemoryTable {
        reject: true,
        ..Default::default()
    };
    let scheduler = Scheduler::new(
        Pipeline::new(transit(feed.clone()), weather(rain()), table.clone()),
        Schedule::default(),
    );
    let start = Instant::now();

    scheduler
        .run(tokio::time::sleep(Duration::from_secs(20)))
        .await;

    assert_eq!(feed.call_offsets(start), vec![0, 15]);
    assert_eq!(*table.upserts.lock().unwrap(), 2);
}
