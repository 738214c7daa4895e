//! # Vendora
//!
//! Marketplace payment engine.
//!
//! ## Usage
//!
//! ```bash
//! # Optional: point a gateway at live credentials
//! export STRIPE_MODE=live
//! export STRIPE_API_KEY=pk_...
//! export STRIPE_SECRET_KEY=sk_...
//!
//! # Run the server
//! vendora
//! ```

use vendora_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr();
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Products loaded: {}", state.catalog.products.len());
    info!("Payment gateways: {:?}", state.service.names());
    info!(
        "Available gateways: {:?}",
        state.service.available_names()
    );

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("Vendora starting on http://{}", addr);

    if !is_prod {
        info!("Checkout: POST http://{}/api/v1/checkout", addr);
        info!("Webhooks: POST http://{}/webhook/{{gateway}}", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
