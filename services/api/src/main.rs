use std::sync::Arc;

use sea_orm::Database;
use tracing::info;

use cardoctor_api::config::ApiConfig;
use cardoctor_api::router::build_router;
use cardoctor_api::state::AppState;
use cardoctor_core::cors::cors_layer;
use cardoctor_core::shutdown::shutdown_signal;
use cardoctor_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = ApiConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");
    db.ping().await.expect("database did not answer ping");
    info!("connected to document store");

    let db = Arc::new(db);
    let state = AppState::new(Arc::clone(&db), config.token_secret);

    let router = build_router(state).layer(cors_layer(&config.allowed_origins));
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!(origins = ?config.allowed_origins, "car doctor api listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    match Arc::try_unwrap(db) {
        Ok(db) => {
            if let Err(e) = db.close().await {
                tracing::warn!(error = %e, "failed to close database connection");
            }
        }
        Err(_) => tracing::warn!("database connection still shared at shutdown; not closed"),
    }
    info!("shutdown complete");
}
