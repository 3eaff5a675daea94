//! Air quality widget: WeatherAPI client and EPA index rendering.

pub mod client;
pub mod status;

pub use client::{AqiError, WeatherApiClient};
pub use status::{AqiDisplay, aqi_status, render};
