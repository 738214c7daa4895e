//! # Stripe Gateway
//!
//! Card-network style gateway with an embedded (non-redirect) flow.
//! Live charges require a card `token` payment detail produced by the
//! front-end; sandbox mode synthesizes results without contacting Stripe.

use crate::{field_str, sandbox_from_env, token_hex};
use async_trait::async_trait;
use tracing::{debug, instrument};
use vendora_core::{
    Currency, Order, PaymentDetails, PaymentGateway, PaymentResult, Price, WebhookPayload,
};

/// Stripe configuration
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Publishable API key
    pub api_key: String,

    /// Secret key
    pub secret_key: String,

    /// Default currency reported in charge metadata
    pub currency: Currency,

    /// Sandbox mode: synthesize results instead of contacting Stripe
    pub sandbox: bool,
}

impl StripeConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads `STRIPE_API_KEY` and `STRIPE_SECRET_KEY`; the gateway runs in
    /// sandbox mode unless `STRIPE_MODE=live`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self {
            api_key: std::env::var("STRIPE_API_KEY").unwrap_or_default(),
            secret_key: std::env::var("STRIPE_SECRET_KEY").unwrap_or_default(),
            currency: Currency::Usd,
            sandbox: sandbox_from_env("STRIPE_MODE"),
        }
    }

    /// Sandbox config with no credentials (for tests and local dev)
    pub fn sandbox() -> Self {
        Self {
            api_key: String::new(),
            secret_key: String::new(),
            currency: Currency::Usd,
            sandbox: true,
        }
    }

    /// Live config with explicit credentials
    pub fn live(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            currency: Currency::Usd,
            sandbox: false,
        }
    }
}

/// Stripe payment gateway
pub struct StripeGateway {
    config: StripeConfig,
}

impl StripeGateway {
    pub fn new(config: StripeConfig) -> Self {
        Self { config }
    }

    /// Construct from environment variables
    pub fn from_env() -> Self {
        Self::new(StripeConfig::from_env())
    }

    /// Sandbox gateway (for tests and local dev)
    pub fn sandbox() -> Self {
        Self::new(StripeConfig::sandbox())
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    fn name(&self) -> &'static str {
        "stripe"
    }

    fn display_name(&self) -> &'static str {
        "Stripe"
    }

    fn is_available(&self) -> bool {
        !self.config.api_key.is_empty() || self.config.sandbox
    }

    #[instrument(skip(self, order, details), fields(total = %order.total_amount))]
    async fn charge(&self, order: &Order, details: &PaymentDetails) -> PaymentResult {
        if !self.config.sandbox && field_str(details, "token").is_none() {
            return PaymentResult::failure("Payment token is required");
        }

        if self.config.sandbox {
            let transaction_id = format!("stripe_{}", token_hex(32));
            debug!(%transaction_id, "synthesized sandbox charge");

            return PaymentResult::success(
                transaction_id,
                "Payment processed successfully via Stripe",
            )
            .with_metadata("provider", "stripe")
            .with_metadata("amount", order.total_amount.as_decimal())
            .with_metadata("currency", self.config.currency.code())
            .with_metadata("test_mode", true);
        }

        PaymentResult::failure("Stripe API not configured")
    }

    #[instrument(skip(self))]
    async fn refund(&self, transaction_id: &str, amount: Price) -> PaymentResult {
        if self.config.sandbox {
            let refund_id = format!("refund_{}", token_hex(16));
            debug!(%refund_id, "synthesized sandbox refund");

            return PaymentResult::success(
                refund_id,
                format!("Refunded {} successfully", amount.display()),
            )
            .with_metadata("original_transaction", transaction_id);
        }

        PaymentResult::failure("Stripe API not configured for refunds")
    }

    async fn verify_payment(&self, payload: &WebhookPayload) -> PaymentResult {
        let transaction_id = field_str(payload, "payment_intent")
            .or_else(|| field_str(payload, "id"));

        match transaction_id {
            Some(id) => PaymentResult::success(id, "Payment verified"),
            None => PaymentResult::failure("Invalid webhook payload"),
        }
    }

    // Embedded checkout: no redirect URL (trait default applies).
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order() -> Order {
        let mut order = Order::new(Currency::Usd);
        order.total_amount = Price::new(25.0, Currency::Usd);
        order
    }

    #[tokio::test]
    async fn sandbox_charge_succeeds_with_prefixed_id() {
        let gateway = StripeGateway::sandbox();
        let result = gateway.charge(&order(), &PaymentDetails::new()).await;

        assert!(result.is_success());
        assert!(result.transaction_id().starts_with("stripe_"));
        assert_eq!(result.transaction_id().len(), "stripe_".len() + 32);

        let meta = result.metadata();
        assert_eq!(meta["provider"], "stripe");
        assert_eq!(meta["amount"], 25.0);
        assert_eq!(meta["currency"], "USD");
        assert_eq!(meta["test_mode"], true);
    }

    #[tokio::test]
    async fn sandbox_charge_ids_are_unique() {
        let gateway = StripeGateway::sandbox();
        let first = gateway.charge(&order(), &PaymentDetails::new()).await;
        let second = gateway.charge(&order(), &PaymentDetails::new()).await;
        assert_ne!(first.transaction_id(), second.transaction_id());
    }

    #[tokio::test]
    async fn live_charge_requires_token() {
        let gateway = StripeGateway::new(StripeConfig::live("pk_x", "sk_x"));
        let result = gateway.charge(&order(), &PaymentDetails::new()).await;

        assert!(!result.is_success());
        assert_eq!(result.message(), "Payment token is required");
    }

    #[tokio::test]
    async fn live_charge_never_silently_succeeds() {
        let gateway = StripeGateway::new(StripeConfig::live("pk_x", "sk_x"));
        let details = json!({"token": "tok_visa"});
        let result = gateway
            .charge(&order(), details.as_object().unwrap())
            .await;

        assert!(!result.is_success());
        assert_eq!(result.message(), "Stripe API not configured");
    }

    #[tokio::test]
    async fn refund_carries_original_transaction() {
        let gateway = StripeGateway::sandbox();
        let result = gateway
            .refund("stripe_abc", Price::new(25.0, Currency::Usd))
            .await;

        assert!(result.is_success());
        assert!(result.transaction_id().starts_with("refund_"));
        assert_eq!(result.metadata()["original_transaction"], "stripe_abc");
        assert!(result.message().contains("$25.00"));
    }

    #[tokio::test]
    async fn verify_prefers_payment_intent_over_id() {
        let gateway = StripeGateway::sandbox();

        let payload = json!({"payment_intent": "pi_123", "id": "evt_1"});
        let result = gateway
            .verify_payment(payload.as_object().unwrap())
            .await;
        assert_eq!(result.transaction_id(), "pi_123");

        let payload = json!({"id": "ch_456"});
        let result = gateway
            .verify_payment(payload.as_object().unwrap())
            .await;
        assert_eq!(result.transaction_id(), "ch_456");
    }

    #[tokio::test]
    async fn verify_rejects_empty_payload() {
        let gateway = StripeGateway::sandbox();
        let result = gateway.verify_payment(&WebhookPayload::new()).await;

        assert!(!result.is_success());
        assert_eq!(result.message(), "Invalid webhook payload");
    }

    #[test]
    fn availability_rules() {
        assert!(StripeGateway::sandbox().is_available());
        assert!(!StripeGateway::new(StripeConfig::live("", "")).is_available());
        assert!(StripeGateway::new(StripeConfig::live("pk_x", "sk_x")).is_available());
    }

    #[test]
    fn embedded_flow_has_no_checkout_url() {
        assert!(StripeGateway::sandbox().checkout_url(&order()).is_none());
    }
}
