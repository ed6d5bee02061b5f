use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use hibp_relay::auth::JwtService;
use hibp_relay::config::load_config;
use hibp_relay::hibp::HibpClient;
use hibp_relay::types::StartupError;
use hibp_relay::{configure_routes, RelayState, SERVICE_NAME, VERSION};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> Result<(), StartupError> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = load_config()?;
    log::info!("Starting {} v{} on {}", SERVICE_NAME, VERSION, config.bind_address);
    log::debug!("Loaded configuration: {:?}", config);

    let upstream = HibpClient::new(config.hibp.timeout)
        .map_err(|e| StartupError::HttpClient(e.to_string()))?;

    let jwt_service = web::Data::new(JwtService::new(&config.secret_key));
    let state = web::Data::new(RelayState::new(config.hibp.clone(), Arc::new(upstream)));

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(jwt_service.clone())
            .app_data(state.clone())
            .configure(configure_routes)
    })
    .bind(&config.bind_address)
    .map_err(|e| StartupError::ServerBind(e.to_string()))?
    .run()
    .await
    .map_err(|e| StartupError::ServerBind(e.to_string()))
}
