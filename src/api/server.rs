//! Router construction and server lifecycle.

use crate::api::handlers::{
    filter_handler, meal_custom_handler, meal_delete_handler, meal_record_handler, meal_records_handler,
    sleep_custom_handler, sleep_delete_handler, sleep_end_handler, sleep_records_handler, sleep_start_handler,
    sleep_status_handler, statistics_handler, AppState,
};
use crate::libs::messages::Message;
use crate::{msg_info, msg_success};
use anyhow::Result;
use axum::{
    http::{header, Method},
    routing::{delete, get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};

/// Builds the complete API router over the given state.
pub fn router(state: AppState) -> Router {
    // The UI may be opened from file:// or any localhost port; the API is
    // unauthenticated single-user, so the CORS policy is deliberately open.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/sleep-start", post(sleep_start_handler))
        .route("/api/sleep-end", post(sleep_end_handler))
        .route("/api/sleep-status", get(sleep_status_handler))
        .route("/api/sleep-records", get(sleep_records_handler))
        .route("/api/sleep-records/{id}", delete(sleep_delete_handler))
        .route("/api/sleep-records/custom", post(sleep_custom_handler))
        .route("/api/meal-record", post(meal_record_handler))
        .route("/api/meal-records", get(meal_records_handler))
        .route("/api/meal-records/{id}", delete(meal_delete_handler))
        .route("/api/meal-records/custom", post(meal_custom_handler))
        .route("/api/records/filter", get(filter_handler))
        .route("/api/statistics", get(statistics_handler))
        .layer(cors)
        .with_state(state)
}

/// Binds the API to 127.0.0.1 on the given port and serves until ctrl-c.
pub async fn run(port: u16) -> Result<()> {
    let state = AppState::new()?;
    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(%local_addr, "api server bound");
    msg_success!(Message::ServerListening(local_addr.to_string()));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    msg_info!(Message::ServerShutdown);
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
