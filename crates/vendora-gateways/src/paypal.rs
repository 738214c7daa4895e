//! # PayPal Gateway
//!
//! Redirect-style gateway: in sandbox mode it hands out a hosted checkout
//! URL for the buyer to approve the payment on PayPal's side.

use crate::{field_str, sandbox_from_env, token_hex};
use async_trait::async_trait;
use tracing::{debug, instrument};
use vendora_core::{
    Currency, Order, PaymentDetails, PaymentGateway, PaymentResult, Price, WebhookPayload,
};

/// PayPal configuration
#[derive(Debug, Clone)]
pub struct PayPalConfig {
    /// REST API client id
    pub client_id: String,

    /// REST API client secret
    pub client_secret: String,

    /// Default currency reported in charge metadata
    pub currency: Currency,

    /// Sandbox mode: synthesize results instead of contacting PayPal
    pub sandbox: bool,
}

impl PayPalConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads `PAYPAL_CLIENT_ID` and `PAYPAL_CLIENT_SECRET`; the gateway
    /// runs in sandbox mode unless `PAYPAL_MODE=live`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self {
            client_id: std::env::var("PAYPAL_CLIENT_ID").unwrap_or_default(),
            client_secret: std::env::var("PAYPAL_CLIENT_SECRET").unwrap_or_default(),
            currency: Currency::Usd,
            sandbox: sandbox_from_env("PAYPAL_MODE"),
        }
    }

    /// Sandbox config with no credentials (for tests and local dev)
    pub fn sandbox() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            currency: Currency::Usd,
            sandbox: true,
        }
    }

    /// Live config with explicit credentials
    pub fn live(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            currency: Currency::Usd,
            sandbox: false,
        }
    }
}

/// PayPal payment gateway
pub struct PayPalGateway {
    config: PayPalConfig,
}

impl PayPalGateway {
    pub fn new(config: PayPalConfig) -> Self {
        Self { config }
    }

    /// Construct from environment variables
    pub fn from_env() -> Self {
        Self::new(PayPalConfig::from_env())
    }

    /// Sandbox gateway (for tests and local dev)
    pub fn sandbox() -> Self {
        Self::new(PayPalConfig::sandbox())
    }
}

#[async_trait]
impl PaymentGateway for PayPalGateway {
    fn name(&self) -> &'static str {
        "paypal"
    }

    fn display_name(&self) -> &'static str {
        "PayPal"
    }

    fn is_available(&self) -> bool {
        !self.config.client_id.is_empty() || self.config.sandbox
    }

    #[instrument(skip(self, order, details), fields(total = %order.total_amount))]
    async fn charge(&self, order: &Order, details: &PaymentDetails) -> PaymentResult {
        if self.config.sandbox {
            let transaction_id = format!("paypal_{}", token_hex(20).to_uppercase());
            let payer_email = field_str(details, "payer_email").unwrap_or("test@example.com");
            debug!(%transaction_id, "synthesized sandbox charge");

            return PaymentResult::success(
                transaction_id,
                "Payment processed successfully via PayPal",
            )
            .with_metadata("provider", "paypal")
            .with_metadata("amount", order.total_amount.as_decimal())
            .with_metadata("currency", self.config.currency.code())
            .with_metadata("sandbox", true)
            .with_metadata("payer_email", payer_email);
        }

        PaymentResult::failure("PayPal API not configured")
    }

    #[instrument(skip(self))]
    async fn refund(&self, transaction_id: &str, amount: Price) -> PaymentResult {
        if self.config.sandbox {
            let refund_id = format!("paypal_refund_{}", token_hex(16));
            debug!(%refund_id, "synthesized sandbox refund");

            return PaymentResult::success(
                refund_id,
                format!("Refunded {} successfully via PayPal", amount.display()),
            )
            .with_metadata("original_transaction", transaction_id);
        }

        PaymentResult::failure("PayPal API not configured for refunds")
    }

    async fn verify_payment(&self, payload: &WebhookPayload) -> PaymentResult {
        let transaction_id = field_str(payload, "txn_id").or_else(|| field_str(payload, "id"));

        match transaction_id {
            Some(id) => PaymentResult::success(id, "PayPal payment verified"),
            None => PaymentResult::failure("Invalid PayPal webhook payload"),
        }
    }

    fn checkout_url(&self, order: &Order) -> Option<String> {
        if self.config.sandbox {
            let order_ref = order.id.map(|id| id.to_string()).unwrap_or_default();
            return Some(format!(
                "https://www.sandbox.paypal.com/checkoutnow?token=mock_{order_ref}"
            ));
        }
        None
    }
}
