use crate::{
    aqi::{AqiDisplay, WeatherApiClient, render},
    config::Config,
};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use tracing::{info, warn};
use utoipa::IntoParams;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AqiQuery {
    /// City name, defaults to the configured city
    pub city: Option<String>,
}

/// Air quality for the widget; failures render the fixed unavailable state
#[utoipa::path(
    get,
    path = "/odata/v4/employee/aqi",
    params(AqiQuery),
    responses(
        (status = 200, description = "Rendered AQI widget data", body = AqiDisplay)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "AQI"
)]
pub async fn current_aqi(
    client: web::Data<WeatherApiClient>,
    config: web::Data<Config>,
    query: web::Query<AqiQuery>,
) -> impl Responder {
    let city = query
        .city
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(config.aqi_default_city.as_str());

    info!(city, "Fetching AQI data");
    let display = match client.current(city).await {
        Ok(response) => render(&response),
        Err(e) => {
            warn!(error = %e, city, "Failed to fetch AQI data");
            AqiDisplay::unavailable()
        }
    };

    HttpResponse::Ok().json(display)
}
