use anyhow::Result;
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use crate::error::IngestError;
use crate::fetch::{HttpClient, fetch_json};
use crate::ingest::WeatherCondition;
use crate::services::WeatherSource;

/// The part of the OpenWeatherMap "current weather" response we read.
#[derive(Debug, Deserialize)]
struct CurrentWeather {
    weather: Vec<WeatherEntry>,
}

#[derive(Debug, Deserialize)]
struct WeatherEntry {
    main: String,
}

/// OpenWeatherMap current conditions for a fixed coordinate.
///
/// The API key is expected to be attached by the client, normally a
/// [`UrlParam`](crate::fetch::auth::UrlParam) named `appid`.
pub struct OpenWeatherSource<C> {
    client: C,
    url: Url,
}

impl<C: HttpClient> OpenWeatherSource<C> {
    pub fn new(client: C, endpoint: &str, lat: f64, lon: f64, units: &str) -> Result<Self> {
        let url = Url::parse_with_params(
            endpoint,
            &[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("units", units.to_string()),
            ],
        )?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl<C: HttpClient> WeatherSource for OpenWeatherSource<C> {
    #[tracing::instrument(skip(self))]
    async fn current_condition(&self) -> Result<WeatherCondition, IngestError> {
        let body: CurrentWeather = fetch_json(&self.client, self.url.clone())
            .await
            .map_err(|e| IngestError::WeatherFetch(format!("{e:#}")))?;

        let condition = body
            .weather
            .into_iter()
            .next()
            .map(|entry| WeatherCondition(entry.main))
            .ok_or_else(|| IngestError::WeatherFetch("response has no weather entries".into()))?;

        debug!(condition = %condition, "Weather fetched");
        Ok(condition)
    }
}
