//! Entry point for the transit + weather ingestion service.
//!
//! Polls the GTFS-RT feed and the weather API on a fixed interval and upserts
//! one merged row per vehicle into the store until interrupted.

use anyhow::Result;
use clap::Parser;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use transit_weather_ingest::{
    config::Config,
    fetch::{
        BasicClient,
        auth::{ApiKey, UrlParam},
    },
    infra::{openweather::OpenWeatherSource, supabase::PostgrestStore, transit::GtfsRtSource},
    pipeline::{Pipeline, Scheduler},
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let config = Config::parse();
    let _file_guard = init_tracing(&config.log_file_path)?;
    config.validate()?;

    info!(?config, "Starting ingestion service");

    let timeout = config.request_timeout();

    let transit = GtfsRtSource::new(
        ApiKey::bearer(BasicClient::new(timeout)?, &config.transit_access_token)?,
        config.transit_url.clone(),
        config.max_feed_bytes,
    );

    let weather = OpenWeatherSource::new(
        UrlParam {
            inner: BasicClient::new(timeout)?,
            param_name: "appid".to_string(),
            key: config.weather_api_key.clone(),
        },
        &config.weather_url,
        config.weather_lat,
        config.weather_lon,
        &config.weather_units,
    )?;

    // PostgREST wants the project key both as `apikey` and as a bearer token.
    let store_client = ApiKey::new(
        ApiKey::bearer(BasicClient::new(timeout)?, &config.supabase_key)?,
        "apikey",
        &config.supabase_key,
    )?;
    let store = PostgrestStore::new(store_client, &config.supabase_url, &config.store_table)?;

    let scheduler = Scheduler::new(Pipeline::new(transit, weather, store), config.schedule());
    scheduler.run(shutdown_signal()).await;

    info!("Ingestion service stopped");
    Ok(())
}

/// Logging setup: colored stderr + JSON rolling log file.
fn init_tracing(log_file_path: &str) -> Result<WorkerGuard> {
    let log_dir = Path::new(log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("transit_weather_ingest.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}

/// Resolves on Ctrl+C. If the handler cannot be installed the service runs
/// until the process is killed.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}
