//! # Razorpay Gateway
//!
//! Signature-based gateway with an embedded flow. The front-end completes
//! the payment against Razorpay and posts `razorpay_payment_id` and
//! `razorpay_signature` back as payment details; a live integration would
//! capture the payment server-side from those fields.

use crate::{field_str, sandbox_from_env, token_hex};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, instrument};
use vendora_core::{
    Currency, Order, PaymentDetails, PaymentGateway, PaymentResult, Price, WebhookPayload,
};

/// Razorpay configuration
#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    /// API key id
    pub key_id: String,

    /// API key secret
    pub key_secret: String,

    /// Default currency reported in charge metadata
    pub currency: Currency,

    /// Sandbox mode: synthesize results instead of contacting Razorpay
    pub sandbox: bool,
}

impl RazorpayConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads `RAZORPAY_KEY_ID` and `RAZORPAY_KEY_SECRET`; the gateway runs
    /// in sandbox mode unless `RAZORPAY_MODE=live`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self {
            key_id: std::env::var("RAZORPAY_KEY_ID").unwrap_or_default(),
            key_secret: std::env::var("RAZORPAY_KEY_SECRET").unwrap_or_default(),
            currency: Currency::Inr,
            sandbox: sandbox_from_env("RAZORPAY_MODE"),
        }
    }

    /// Sandbox config with no credentials (for tests and local dev)
    pub fn sandbox() -> Self {
        Self {
            key_id: String::new(),
            key_secret: String::new(),
            currency: Currency::Inr,
            sandbox: true,
        }
    }

    /// Live config with explicit credentials
    pub fn live(key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret: key_secret.into(),
            currency: Currency::Inr,
            sandbox: false,
        }
    }
}

/// A provider-side order, required by Razorpay before checkout begins
#[derive(Debug, Clone, Serialize)]
pub struct RazorpayOrder {
    /// Provider order identifier
    pub id: String,
    /// Amount in the smallest currency unit (paise for INR)
    pub amount: i64,
    /// Currency code
    pub currency: Currency,
}

/// Razorpay payment gateway
pub struct RazorpayGateway {
    config: RazorpayConfig,
}

impl RazorpayGateway {
    pub fn new(config: RazorpayConfig) -> Self {
        Self { config }
    }

    /// Construct from environment variables
    pub fn from_env() -> Self {
        Self::new(RazorpayConfig::from_env())
    }

    /// Sandbox gateway (for tests and local dev)
    pub fn sandbox() -> Self {
        Self::new(RazorpayConfig::sandbox())
    }

    /// Synthesize the provider-side order that must exist before the
    /// front-end opens the Razorpay checkout.
    pub fn create_order(&self, amount: Price) -> RazorpayOrder {
        RazorpayOrder {
            id: format!("order_{}", token_hex(16)),
            amount: amount.amount,
            currency: amount.currency,
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    fn name(&self) -> &'static str {
        "razorpay"
    }

    fn display_name(&self) -> &'static str {
        "Razorpay"
    }

    fn is_available(&self) -> bool {
        !self.config.key_id.is_empty() || self.config.sandbox
    }

    #[instrument(skip(self, order, details), fields(total = %order.total_amount))]
    async fn charge(&self, order: &Order, details: &PaymentDetails) -> PaymentResult {
        if !self.config.sandbox
            && (field_str(details, "razorpay_payment_id").is_none()
                || field_str(details, "razorpay_signature").is_none())
        {
            return PaymentResult::failure("Razorpay payment id and signature are required");
        }

        if self.config.sandbox {
            let transaction_id = format!("rzp_{}", token_hex(24));
            debug!(%transaction_id, "synthesized sandbox charge");

            return PaymentResult::success(
                transaction_id,
                "Payment processed successfully via Razorpay",
            )
            .with_metadata("provider", "razorpay")
            .with_metadata("amount", order.total_amount.as_decimal())
            .with_metadata("currency", self.config.currency.code())
            .with_metadata("test_mode", true);
        }

        PaymentResult::failure("Razorpay API not configured")
    }

    #[instrument(skip(self))]
    async fn refund(&self, transaction_id: &str, amount: Price) -> PaymentResult {
        if self.config.sandbox {
            let refund_id = format!("rzp_refund_{}", token_hex(16));
            debug!(%refund_id, "synthesized sandbox refund");

            return PaymentResult::success(
                refund_id,
                format!("Refunded {} successfully via Razorpay", amount.display()),
            )
            .with_metadata("original_transaction", transaction_id);
        }

        PaymentResult::failure("Razorpay API not configured for refunds")
    }

    async fn verify_payment(&self, payload: &WebhookPayload) -> PaymentResult {
        match field_str(payload, "razorpay_payment_id") {
            Some(id) => PaymentResult::success(id, "Razorpay payment verified"),
            None => PaymentResult::failure("Invalid Razorpay payload"),
        }
    }

    // Embedded checkout: no redirect URL (trait default applies).
}
