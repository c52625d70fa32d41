use std::sync::{Arc, Mutex};

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use casebook::config::AppConfig;
use casebook::db;
use casebook::handlers;
use casebook::services::auth::{self, SeedOutcome};
use casebook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    match auth::seed_admin(&conn, &config)? {
        SeedOutcome::Created => tracing::info!("default admin credential created"),
        SeedOutcome::AlreadyExists => {}
        SeedOutcome::SecretsMissing => {
            tracing::warn!("admin seeding secrets not set, no admin will exist until seeded")
        }
    }

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
    });

    // The booking UI is served separately; permissive CORS matches it.
    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/bookings",
            post(handlers::bookings::create_booking).get(handlers::bookings::list_bookings),
        )
        .route("/status/:ref_id", get(handlers::bookings::get_status))
        .route(
            "/bookings/:id",
            put(handlers::bookings::update_status).delete(handlers::bookings::delete_booking),
        )
        .route("/admin/login", post(handlers::admin::login))
        .route(
            "/admin/reset-password",
            post(handlers::admin::reset_password),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
