//! Process configuration, read from flags or the environment (`.env` included).

use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;

use crate::pipeline::Schedule;

pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

#[derive(Parser, Clone)]
#[command(name = "transit_weather_ingest")]
#[command(about = "Polls a GTFS-RT vehicle feed and current weather into a vehicle_positions table", long_about = None)]
pub struct Config {
    /// GTFS-RT vehicle positions / trip updates feed
    #[arg(long, env = "TRANSIT_REALTIME_URL")]
    pub transit_url: String,

    /// Bearer token for the transit feed
    #[arg(long, env = "TRANSIT_REALTIME_ACCESS_TOKEN", hide_env_values = true)]
    pub transit_access_token: String,

    /// OpenWeatherMap API key
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub weather_api_key: String,

    /// Current-weather endpoint
    #[arg(long, env = "WEATHER_URL", default_value = DEFAULT_WEATHER_URL)]
    pub weather_url: String,

    /// Latitude of the point whose weather is recorded
    #[arg(long, env = "WEATHER_LAT", default_value_t = 42.6621, allow_negative_numbers = true)]
    pub weather_lat: f64,

    /// Longitude of the point whose weather is recorded
    #[arg(long, env = "WEATHER_LON", default_value_t = -73.7932, allow_negative_numbers = true)]
    pub weather_lon: f64,

    /// Unit system passed to the weather API
    #[arg(long, env = "WEATHER_UNITS", default_value = "metric")]
    pub weather_units: String,

    /// Supabase project URL
    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: String,

    /// Supabase service or anon key
    #[arg(long, env = "SUPABASE_KEY", hide_env_values = true)]
    pub supabase_key: String,

    /// Table receiving the merged vehicle records
    #[arg(long, env = "STORE_TABLE", default_value = "vehicle_positions")]
    pub store_table: String,

    /// Seconds between cycles
    #[arg(long, env = "POLL_INTERVAL_SECS", default_value_t = 15)]
    pub poll_interval_secs: u64,

    /// Seconds to wait after a failed fetch
    #[arg(long, env = "BACKOFF_INTERVAL_SECS", default_value_t = 60)]
    pub backoff_interval_secs: u64,

    /// Per-request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Largest feed payload accepted, in bytes
    #[arg(long, env = "MAX_FEED_BYTES", default_value_t = 50 * 1024 * 1024)]
    pub max_feed_bytes: usize,

    /// JSON log file, rotated daily
    #[arg(long, env = "LOG_FILE_PATH", default_value = "logs/transit_weather_ingest.log")]
    pub log_file_path: String,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_secs == 0 {
            bail!("poll interval must be at least one second");
        }
        if self.backoff_interval_secs <= self.poll_interval_secs {
            bail!(
                "backoff interval ({}s) must be longer than the poll interval ({}s)",
                self.backoff_interval_secs,
                self.poll_interval_secs
            );
        }
        if self.request_timeout_secs == 0 {
            bail!("request timeout must be at least one second");
        }
        if self.max_feed_bytes == 0 {
            bail!("max feed size must be positive");
        }
        Ok(())
    }

    pub fn schedule(&self) -> Schedule {
        Schedule {
            normal_interval: Duration::from_secs(self.poll_interval_secs),
            backoff_interval: Duration::from_secs(self.backoff_interval_secs),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const REDACTED: &str = "<redacted>";
        f.debug_struct("Config")
            .field("transit_url", &self.transit_url)
            .field("transit_access_token", &REDACTED)
            .field("weather_api_key", &REDACTED)
            .field("weather_url", &self.weather_url)
            .field("weather_lat", &self.weather_lat)
            .field("weather_lon", &self.weather_lon)
            .field("weather_units", &self.weather_units)
            .field("supabase_url", &self.supabase_url)
            .field("supabase_key", &REDACTED)
            .field("store_table", &self.store_table)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("backoff_interval_secs", &self.backoff_interval_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_feed_bytes", &self.max_feed_bytes)
            .field("log_file_path", &self.log_file_path)
            .finish()
    }
}
