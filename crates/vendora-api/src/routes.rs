//! # Routes
//!
//! Axum router configuration for the payment API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - GET  /health - Health check
/// - GET  /api/v1/products - List active products
/// - GET  /api/v1/products/{id} - Get product by ID
/// - GET  /api/v1/gateways - List available payment gateways
/// - POST /api/v1/checkout - Create and charge an order
/// - POST /api/v1/refunds - Refund a payment (admin)
/// - POST /webhook/{gateway} - Provider webhook/callback
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/checkout", post(handlers::checkout))
        .route("/refunds", post(handlers::refund))
        .route("/gateways", get(handlers::list_gateways))
        .route("/products", get(handlers::list_products))
        .route("/products/{product_id}", get(handlers::get_product));

    Router::new()
        .route("/", get(handlers::health))
        .route("/health", get(handlers::health))
        .nest("/api/v1", api_routes)
        .route("/webhook/{gateway}", post(handlers::webhook))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
