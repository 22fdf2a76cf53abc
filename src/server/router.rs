use axum::{Router, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{self, ServiceState};

/// Create the application router with all API endpoints
pub fn create_router(service: ServiceState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/transactions", get(handlers::get_transactions))
        .with_state(service)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
