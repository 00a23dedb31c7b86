use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use staybook_api::db::mongo::{create_mongo_client, MongoBookingRepository};
use staybook_api::db::repository::BookingRepository;
use staybook_api::middleware::auth::JwtConfig;
use staybook_api::routes;
use staybook_api::services::analytics_service::AnalyticsTracker;
use staybook_api::services::pricing_service::{PricingConfig, PricingService};
use staybook_api::state::AppState;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const DATABASE: &str = "Staybook";

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    log::info!("Application starting...");

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);

    let pricing = PricingService::new(PricingConfig::from_env());
    let analytics = AnalyticsTracker::from_env();
    log::info!(
        "Pricing: service fee {}, tax rate {}",
        pricing.config.service_fee,
        pricing.config.tax_rate
    );

    let state = match std::env::var("MONGODB_URI") {
        Ok(uri) => {
            let database =
                std::env::var("MONGODB_DATABASE").unwrap_or_else(|_| DATABASE.to_string());
            let client = create_mongo_client(&uri)
                .await
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            log::info!("Storing bookings in MongoDB database {}", database);
            let bookings: Arc<dyn BookingRepository> =
                Arc::new(MongoBookingRepository::new(&client, &database));
            AppState::with_bookings(bookings, pricing, analytics)
        }
        Err(_) => {
            log::warn!("MONGODB_URI not set, bookings are kept in memory");
            AppState::in_memory(pricing, analytics)
        }
    };

    let state = web::Data::new(state);
    let jwt = web::Data::new(JwtConfig::from_env());

    log::info!("Starting HTTP server on {}:{}", host, port);
    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .app_data(state.clone())
            .app_data(jwt.clone())
            .route("/health", web::get().to(routes::health::health_check))
            .configure(routes::config)
    })
    .bind((host, port))?
    .run()
    .await
}
