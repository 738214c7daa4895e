//! # Payment Gateway Trait
//!
//! Capability contract every payment provider implements.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PaymentGateway (trait)                   │
//! │  ├── charge()                                               │
//! │  ├── refund()                                               │
//! │  ├── verify_payment()                                       │
//! │  └── is_available() / name() / display_name()               │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!          ┌─────────────────┼─────────────────┐
//!          │                 │                 │
//!  ┌───────┴───────┐ ┌───────┴───────┐ ┌───────┴───────┐
//!  │ StripeGateway │ │ PayPalGateway │ │RazorpayGateway│
//!  └───────────────┘ └───────────────┘ └───────────────┘
//! ```
//!
//! Concrete gateways differ only in configuration: the detail/payload field
//! names they read, their transaction-id prefix, their default currency, and
//! whether they support a redirect URL. The [`crate::PaymentService`]
//! depends only on this trait, never on a concrete provider type.
//!
//! Every operation returns a [`PaymentResult`] value rather than `Result`:
//! a declined charge is an expected business outcome, and an implementation
//! has no way to let an internal fault escape past this boundary.

use crate::money::Price;
use crate::order::Order;
use crate::result::PaymentResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Payment details supplied by the buyer or the checkout front-end
/// (card token, payer email, provider-specific fields). Open mapping;
/// gateways read the fields they understand and ignore the rest.
pub type PaymentDetails = serde_json::Map<String, serde_json::Value>;

/// Inbound provider payload from a webhook or redirect callback.
pub type WebhookPayload = serde_json::Map<String, serde_json::Value>;

/// Capability contract for a payment provider.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Stable machine identifier, unique per registration (e.g. "stripe")
    fn name(&self) -> &'static str;

    /// Human-readable label (e.g. "Stripe")
    fn display_name(&self) -> &'static str;

    /// True when the gateway has the configuration it needs, or is running
    /// in sandbox mode and synthesizes results.
    fn is_available(&self) -> bool;

    /// Attempt to move money for `order.total_amount`.
    ///
    /// Never mutates the order; the caller applies the resulting status
    /// transition. In sandbox mode this always succeeds with a freshly
    /// generated, provider-prefixed transaction id and metadata containing
    /// at least `provider`, `amount`, and `currency`. In live mode without a
    /// real integration it fails with a descriptive message, never silently
    /// succeeding.
    async fn charge(&self, order: &Order, details: &PaymentDetails) -> PaymentResult;

    /// Refund a previously processed payment.
    ///
    /// Success metadata carries the charged transaction id under
    /// `original_transaction`.
    async fn refund(&self, transaction_id: &str, amount: Price) -> PaymentResult;

    /// Confirm that an inbound provider payload references a transaction.
    ///
    /// Fails when the provider's identifier field is absent; otherwise
    /// succeeds, echoing that identifier as the result's transaction id.
    ///
    /// This is an identity check only — no signature or HMAC verification is
    /// performed in any mode. Harden before relying on it in production.
    async fn verify_payment(&self, payload: &WebhookPayload) -> PaymentResult;

    /// Redirect URL for hosted checkout flows; `None` for embedded flows.
    fn checkout_url(&self, order: &Order) -> Option<String> {
        let _ = order;
        None
    }
}

/// Type alias for a shared, dynamically dispatched gateway
pub type BoxedGateway = Arc<dyn PaymentGateway>;
