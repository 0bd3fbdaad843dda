use std::sync::{Arc, Mutex};

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use salonbook::config::AppConfig;
use salonbook::db;
use salonbook::handlers;
use salonbook::models::BusinessHours;
use salonbook::services::holiday::WeeklyClosure;
use salonbook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let holidays = WeeklyClosure::from_names(&config.closed_days);
    tracing::info!("closed on: {:?}", config.closed_days);

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        hours: Mutex::new(BusinessHours::default()),
        holidays: Box::new(holidays),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/customers", get(handlers::customers::list_customers))
        .route("/api/customers", post(handlers::customers::create_customer))
        .route("/api/customers/:id", get(handlers::customers::get_customer))
        .route("/api/customers/:id", put(handlers::customers::update_customer))
        .route("/api/customers/:id", delete(handlers::customers::delete_customer))
        .route(
            "/api/customers/:id/reservations",
            get(handlers::customers::customer_reservations),
        )
        .route("/api/staff", get(handlers::staff::list_staff))
        .route("/api/staff", post(handlers::staff::create_staff))
        .route("/api/staff/:id", put(handlers::staff::update_staff))
        .route("/api/staff/:id", delete(handlers::staff::delete_staff))
        .route("/api/services", get(handlers::services::list_services))
        .route("/api/services", post(handlers::services::create_service))
        .route("/api/services/:id", put(handlers::services::update_service))
        .route("/api/services/:id", delete(handlers::services::delete_service))
        .route("/api/reservations", get(handlers::reservations::list_reservations))
        .route("/api/reservations", post(handlers::reservations::create_reservation))
        .route("/api/reservations/:id", get(handlers::reservations::get_reservation))
        .route("/api/reservations/:id", put(handlers::reservations::update_reservation))
        .route("/api/reservations/:id", delete(handlers::reservations::delete_reservation))
        .route(
            "/api/reservations/:id/status",
            post(handlers::reservations::set_reservation_status),
        )
        .route("/api/reservations/:id/ics", get(handlers::reservations::download_ics))
        .route("/api/availability/slots", get(handlers::availability::get_slots))
        .route("/api/availability/suggestions", get(handlers::availability::get_suggestions))
        .route("/api/availability/staff", get(handlers::availability::get_available_staff))
        .route("/api/availability/check", get(handlers::availability::check_availability))
        .route("/api/settings/business-hours", get(handlers::settings::get_business_hours))
        .route("/api/settings/business-hours", put(handlers::settings::update_business_hours))
        .route("/api/reports/dashboard", get(handlers::reports::dashboard))
        .route("/api/reports/daily", get(handlers::reports::daily))
        .route("/api/reports/monthly", get(handlers::reports::monthly))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
