//! # vendora-gateways
//!
//! Payment gateway implementations for the vendora payment engine.
//!
//! Each gateway is one conforming implementation of
//! [`vendora_core::PaymentGateway`]; the differences between them are pure
//! configuration — which payment-detail and webhook fields they read, their
//! transaction-id prefix, their default currency, and whether they offer a
//! redirect URL:
//!
//! | Gateway                       | Flow     | Prefix    | Currency |
//! |-------------------------------|----------|-----------|----------|
//! | [`stripe::StripeGateway`]     | embedded | `stripe_` | USD      |
//! | [`paypal::PayPalGateway`]     | redirect | `paypal_` | USD      |
//! | [`razorpay::RazorpayGateway`] | embedded | `rzp_`    | INR      |
//!
//! Sandbox vs. live is decided once, at construction time, on each config
//! struct. Sandbox mode synthesizes deterministic-but-unique success
//! results without contacting any processor; live mode without a real
//! integration always fails descriptively.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vendora_core::PaymentService;
//! use vendora_gateways::{PayPalGateway, RazorpayGateway, StripeGateway};
//!
//! let mut service = PaymentService::new();
//! service.register(Arc::new(StripeGateway::from_env()));
//! service.register(Arc::new(PayPalGateway::from_env()));
//! service.register(Arc::new(RazorpayGateway::from_env()));
//! ```

pub mod paypal;
pub mod razorpay;
pub mod stripe;

// Re-exports
pub use paypal::{PayPalConfig, PayPalGateway};
pub use razorpay::{RazorpayConfig, RazorpayGateway, RazorpayOrder};
pub use stripe::{StripeConfig, StripeGateway};

use serde_json::{Map, Value};
use uuid::Uuid;

/// Generate a fresh hex token of `len` characters for synthesized
/// transaction identifiers.
pub(crate) fn token_hex(len: usize) -> String {
    let mut token = String::with_capacity(len + 32);
    while token.len() < len {
        token.push_str(&Uuid::new_v4().simple().to_string());
    }
    token.truncate(len);
    token
}

/// Read a non-empty string field from an open payload/details mapping.
pub(crate) fn field_str<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Sandbox unless the mode variable is explicitly set to "live".
pub(crate) fn sandbox_from_env(var: &str) -> bool {
    !matches!(std::env::var(var), Ok(v) if v.eq_ignore_ascii_case("live"))
}
