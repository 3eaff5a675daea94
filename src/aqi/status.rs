use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::client::{AirQuality, WeatherResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AqiStatus {
    pub text: &'static str,
    pub description: &'static str,
    pub style_class: &'static str,
}

/// Severity for a US EPA index (1–6).
pub fn aqi_status(index: u8) -> AqiStatus {
    let (text, description, style_class) = match index {
        1 => ("Good", "Air quality is satisfactory", "aqiGood"),
        2 => ("Moderate", "Air quality is acceptable", "aqiModerate"),
        3 => (
            "Unhealthy for Sensitive Groups",
            "Sensitive individuals may experience problems",
            "aqiUnhealthy",
        ),
        4 => ("Unhealthy", "Everyone may experience health effects", "aqiUnhealthy"),
        5 => (
            "Very Unhealthy",
            "Health alert: everyone may experience serious effects",
            "aqiVeryUnhealthy",
        ),
        6 => (
            "Hazardous",
            "Emergency conditions: entire population affected",
            "aqiHazardous",
        ),
        _ => ("Unknown", "AQI data unavailable", ""),
    };
    AqiStatus { text, description, style_class }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Pollutants {
    pub pm2_5: String,
    pub pm10: String,
    pub co: String,
    pub no2: String,
    pub o3: String,
    pub so2: String,
}

/// Text for every field of the AQI widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "available": true,
    "location": "Bengaluru, India",
    "headline": "AQI: 2 - Moderate",
    "description": "Air quality is acceptable",
    "style_class": "aqiModerate",
    "last_updated": "Updated: 2024-01-01 10:00",
    "pollutants": {"pm2_5": "36 μg/m³", "pm10": "60 μg/m³", "co": "411 μg/m³",
                   "no2": "12 μg/m³", "o3": "40 μg/m³", "so2": "3 μg/m³"}
}))]
pub struct AqiDisplay {
    pub available: bool,
    pub location: String,
    pub headline: String,
    pub description: String,
    pub style_class: String,
    pub last_updated: String,
    pub pollutants: Pollutants,
}

fn concentration(value: Option<f64>) -> String {
    format!("{} μg/m³", value.unwrap_or(0.0).round() as i64)
}

impl AqiDisplay {
    /// Fixed state shown whenever the lookup fails.
    pub fn unavailable() -> Self {
        let dash = || "-".to_string();
        AqiDisplay {
            available: false,
            location: "Location unavailable".into(),
            headline: "AQI data unavailable".into(),
            description: "Unable to fetch air quality data".into(),
            style_class: String::new(),
            last_updated: String::new(),
            pollutants: Pollutants {
                pm2_5: dash(),
                pm10: dash(),
                co: dash(),
                no2: dash(),
                o3: dash(),
                so2: dash(),
            },
        }
    }

    fn from_air_quality(location: String, last_updated: &str, aq: &AirQuality) -> Self {
        let index = aq.us_epa_index.unwrap_or(0);
        let status = aqi_status(index);
        AqiDisplay {
            available: true,
            location,
            headline: format!("AQI: {} - {}", index, status.text),
            description: status.description.to_string(),
            style_class: status.style_class.to_string(),
            last_updated: format!("Updated: {last_updated}"),
            pollutants: Pollutants {
                pm2_5: concentration(aq.pm2_5),
                pm10: concentration(aq.pm10),
                co: concentration(aq.co),
                no2: concentration(aq.no2),
                o3: concentration(aq.o3),
                so2: concentration(aq.so2),
            },
        }
    }
}

/// Renders a WeatherAPI response; anything without air quality data is unavailable.
pub fn render(response: &WeatherResponse) -> AqiDisplay {
    let Some(current) = response.current.as_ref() else {
        return AqiDisplay::unavailable();
    };
    let Some(aq) = current.air_quality.as_ref() else {
        return AqiDisplay::unavailable();
    };
    let location = response
        .location
        .as_ref()
        .map(|l| format!("{}, {}", l.name, l.country))
        .unwrap_or_default();

    AqiDisplay::from_air_quality(location, &current.last_updated, aq)
}
