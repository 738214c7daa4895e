//! # Payment Error Types
//!
//! Typed error handling for the vendora payment engine.
//!
//! Only configuration and programming errors surface as `Err` values. A
//! declined charge, a missing webhook field, or an unavailable provider is a
//! business outcome and travels as a [`crate::PaymentResult`] failure instead.

use crate::order::PaymentStatus;
use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Gateway name not present in the service registry
    #[error("Payment gateway '{name}' not found")]
    GatewayNotFound { name: String },

    /// The service registry is empty, so no default gateway exists
    #[error("No payment gateways registered")]
    NoGatewaysRegistered,

    /// Product not found in catalog
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: String },

    /// Order status transition not permitted by the state machine
    #[error("Invalid payment status transition: {from} -> {to}")]
    InvalidTransition {
        from: PaymentStatus,
        to: PaymentStatus,
    },

    /// A transition to `paid` requires a provider transaction identifier
    #[error("A non-empty transaction id is required to mark an order paid")]
    MissingTransactionId,

    /// Order store failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::Configuration(_) => 500,
            PaymentError::InvalidRequest(_) => 400,
            PaymentError::GatewayNotFound { .. } => 404,
            PaymentError::NoGatewaysRegistered => 503,
            PaymentError::ProductNotFound { .. } => 404,
            PaymentError::InvalidTransition { .. } => 409,
            PaymentError::MissingTransactionId => 422,
            PaymentError::Storage(_) => 500,
            PaymentError::Serialization(_) => 500,
        }
    }
}
