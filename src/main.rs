use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use leave_service::aqi::WeatherApiClient;
use leave_service::config::{Config, StoreBackend};
use leave_service::db::init_db;
use leave_service::docs::ApiDoc;
use leave_service::routes;
use leave_service::store::{LeaveRepository, MemoryStore, MySqlStore};

#[get("/")]
async fn index() -> impl Responder {
    "Leave service is running"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(backend = ?config.store_backend, "Server starting...");

    let repo: Arc<dyn LeaveRepository> = match config.store_backend {
        StoreBackend::MySql => {
            let url = config.database_url.as_deref().unwrap_or_default();
            Arc::new(MySqlStore::new(init_db(url).await?))
        }
        StoreBackend::Memory => Arc::new(MemoryStore::with_demo_employees()),
    };
    let repo_data: Data<dyn LeaveRepository> = Data::from(repo);
    let weather = Data::new(WeatherApiClient::new(
        config.weather_api_url.clone(),
        config.weather_api_key.clone(),
    ));
    if config.weather_api_key.is_none() {
        info!("WEATHER_API_KEY not set, AQI widget will show the unavailable state");
    }

    let server_addr = config.server_addr.clone();
    let config_data = Data::new(config);

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                // wildcard {_:.*} matches the UI's JS/CSS assets
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(config_data.clone())
            .app_data(repo_data.clone())
            .app_data(weather.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, &config_data))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
