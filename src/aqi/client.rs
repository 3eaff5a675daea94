//! HTTP client for the WeatherAPI `current.json` endpoint.
//!
//! The API key never leaves the server; callers only see the rendered
//! [`AqiDisplay`](super::AqiDisplay).

use derive_more::Display;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct WeatherResponse {
    pub location: Option<WeatherLocation>,
    pub current: Option<CurrentConditions>,
}

#[derive(Debug, Deserialize)]
pub struct WeatherLocation {
    pub name: String,
    pub country: String,
}

#[derive(Debug, Deserialize)]
pub struct CurrentConditions {
    #[serde(default)]
    pub last_updated: String,
    pub air_quality: Option<AirQuality>,
}

/// Concentrations in μg/m³ plus the 1–6 US EPA index.
#[derive(Debug, Default, Deserialize)]
pub struct AirQuality {
    #[serde(rename = "us-epa-index")]
    pub us_epa_index: Option<u8>,
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
    pub co: Option<f64>,
    pub no2: Option<f64>,
    pub o3: Option<f64>,
    pub so2: Option<f64>,
}

#[derive(Debug, Display)]
pub enum AqiError {
    #[display(fmt = "weather API key is not configured")]
    MissingApiKey,
    #[display(fmt = "HTTP request failed: {}", _0)]
    Request(reqwest::Error),
    #[display(fmt = "weather API error ({}): {}", status, body)]
    Status { status: u16, body: String },
}

impl std::error::Error for AqiError {}

impl From<reqwest::Error> for AqiError {
    fn from(e: reqwest::Error) -> Self {
        AqiError::Request(e)
    }
}

pub struct WeatherApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherApiClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Current conditions with air quality for `city`.
    pub async fn current(&self, city: &str) -> Result<WeatherResponse, AqiError> {
        let key = self.api_key.as_deref().ok_or(AqiError::MissingApiKey)?;

        let response = self
            .client
            .get(format!("{}/current.json", self.base_url))
            .query(&[("key", key), ("q", city), ("aqi", "yes")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AqiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<WeatherResponse>().await?)
    }
}
