//! # Application State
//!
//! Shared state for the Axum application: the payment service (constructed
//! once at startup, then immutable), the product catalog, and the order
//! store.

use crate::store::InMemoryOrderStore;
use std::sync::Arc;
use vendora_core::{OrderStore, PaymentService, ProductCatalog};
use vendora_gateways::{PayPalGateway, RazorpayGateway, StripeGateway};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address")
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment service (registry + dispatcher)
    pub service: Arc<PaymentService>,
    /// Product catalog
    pub catalog: ProductCatalog,
    /// Order persistence
    pub orders: Arc<dyn OrderStore>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create the production state: gateways configured from the
    /// environment, catalog from `config/products.toml`.
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let catalog = load_product_catalog()?;

        let mut service = PaymentService::new();
        service.register(Arc::new(StripeGateway::from_env()));
        service.register(Arc::new(PayPalGateway::from_env()));
        service.register(Arc::new(RazorpayGateway::from_env()));

        Ok(Self {
            service: Arc::new(service),
            catalog,
            orders: Arc::new(InMemoryOrderStore::new()),
            config,
        })
    }

    /// All-sandbox state with an explicit catalog, for tests
    pub fn sandbox(catalog: ProductCatalog) -> Self {
        let service = PaymentService::new()
            .with_gateway(Arc::new(StripeGateway::sandbox()))
            .with_gateway(Arc::new(PayPalGateway::sandbox()))
            .with_gateway(Arc::new(RazorpayGateway::sandbox()));

        Self {
            service: Arc::new(service),
            catalog,
            orders: Arc::new(InMemoryOrderStore::new()),
            config: AppConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                environment: "test".to_string(),
            },
        }
    }
}

/// Load product catalog from config file
fn load_product_catalog() -> anyhow::Result<ProductCatalog> {
    let config_paths = [
        "config/products.toml",
        "../config/products.toml",
        "../../config/products.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let catalog: ProductCatalog = toml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded {} products from {}", catalog.products.len(), path);
            return Ok(catalog);
        }
    }

    tracing::warn!("No product catalog found, using empty catalog");
    Ok(ProductCatalog::new())
}
