//! # Order Types
//!
//! Orders and the payment status state machine.
//!
//! ```text
//! pending --(charge succeeds)--> paid --(refund succeeds)--> refunded
//! pending --(charge fails)-----> failed
//! ```
//!
//! `pending` is the only legal initial state. The status and transaction id
//! fields are private: the only way to move an order through the machine is
//! the `mark_*` methods, which reject illegal transitions with a typed error.

use crate::cart::CartItem;
use crate::error::PaymentError;
use crate::money::{Currency, Price};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payment status of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Awaiting a charge outcome
    Pending,
    /// Charge succeeded
    Paid,
    /// Charge failed
    Failed,
    /// A refund was issued after payment
    Refunded,
}

impl PaymentStatus {
    /// Stable string form, matching the persisted representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A buyer's order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Persistence-assigned identifier; `None` before the first save
    pub id: Option<i64>,

    /// Buyer, when known
    pub user_id: Option<i64>,

    /// Currency for all line items
    pub currency: Currency,

    /// Derived total; recompute with [`Order::calculate_total`]
    pub total_amount: Price,

    /// Name of the gateway that handled or will handle the charge
    pub payment_provider: String,

    /// Payment status (state machine; mutate via `mark_*`)
    payment_status: PaymentStatus,

    /// Provider-assigned transaction identifier; empty until a successful
    /// charge or an explicit mark
    transaction_id: String,

    /// When the order was created
    pub order_date: DateTime<Utc>,

    /// Line items, insertion order = display order
    pub items: Vec<CartItem>,
}

impl Order {
    /// Create a new pending order
    pub fn new(currency: Currency) -> Self {
        Self {
            id: None,
            user_id: None,
            currency,
            total_amount: Price::zero(currency),
            payment_provider: String::new(),
            payment_status: PaymentStatus::Pending,
            transaction_id: String::new(),
            order_date: Utc::now(),
            items: Vec::new(),
        }
    }

    /// Builder: set the buyer
    pub fn with_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Builder: set the payment provider name
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.payment_provider = provider.into();
        self
    }

    /// Append a line item
    pub fn add_item(&mut self, item: CartItem) {
        self.items.push(item);
    }

    /// Recompute `total_amount` as the sum of line subtotals.
    ///
    /// Idempotent: the total is overwritten, never accumulated, so running
    /// this twice yields the same result as running it once.
    pub fn calculate_total(&mut self) -> &mut Self {
        let amount = self.items.iter().map(|i| i.subtotal().amount).sum();
        self.total_amount = Price::from_minor(amount, self.currency);
        self
    }

    /// Current payment status
    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    /// Provider transaction identifier; empty until a successful charge
    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    /// Check if the order has been paid
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    /// Transition `pending -> paid`, recording the provider transaction id.
    ///
    /// Fails if the order is not pending or the transaction id is empty.
    pub fn mark_paid(&mut self, transaction_id: impl Into<String>) -> Result<(), PaymentError> {
        let transaction_id = transaction_id.into();
        if transaction_id.is_empty() {
            return Err(PaymentError::MissingTransactionId);
        }
        if self.payment_status != PaymentStatus::Pending {
            return Err(PaymentError::InvalidTransition {
                from: self.payment_status,
                to: PaymentStatus::Paid,
            });
        }
        self.payment_status = PaymentStatus::Paid;
        self.transaction_id = transaction_id;
        Ok(())
    }

    /// Transition `pending -> failed`. An existing transaction id, if any,
    /// is left untouched.
    pub fn mark_failed(&mut self) -> Result<(), PaymentError> {
        if self.payment_status != PaymentStatus::Pending {
            return Err(PaymentError::InvalidTransition {
                from: self.payment_status,
                to: PaymentStatus::Failed,
            });
        }
        self.payment_status = PaymentStatus::Failed;
        Ok(())
    }

    /// Transition `paid -> refunded`.
    ///
    /// The original transaction id is kept unless a new (refund) identifier
    /// is supplied.
    pub fn mark_refunded(&mut self, transaction_id: Option<String>) -> Result<(), PaymentError> {
        if self.payment_status != PaymentStatus::Paid {
            return Err(PaymentError::InvalidTransition {
                from: self.payment_status,
                to: PaymentStatus::Refunded,
            });
        }
        self.payment_status = PaymentStatus::Refunded;
        if let Some(id) = transaction_id.filter(|id| !id.is_empty()) {
            self.transaction_id = id;
        }
        Ok(())
    }

    /// Format the total for display (e.g., "$25.00")
    pub fn formatted_total(&self) -> String {
        self.total_amount.display()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_with_items() -> Order {
        let mut order = Order::new(Currency::Usd);
        order.add_item(CartItem::new(
            "ebook",
            "E-Book",
            Price::new(10.0, Currency::Usd),
            2,
        ));
        order.add_item(CartItem::new(
            "icons",
            "Icon Pack",
            Price::new(5.0, Currency::Usd),
            1,
        ));
        order
    }

    #[test]
    fn test_calculate_total() {
        let mut order = order_with_items();
        order.calculate_total();
        assert_eq!(order.total_amount, Price::new(25.0, Currency::Usd));
    }

    #[test]
    fn test_calculate_total_is_idempotent() {
        let mut order = order_with_items();
        order.calculate_total();
        let first = order.total_amount;
        order.calculate_total();
        assert_eq!(order.total_amount, first);
    }

    #[test]
    fn test_new_order_is_pending() {
        let order = Order::new(Currency::Usd);
        assert_eq!(order.payment_status(), PaymentStatus::Pending);
        assert!(order.transaction_id().is_empty());
        assert!(order.id.is_none());
    }

    #[test]
    fn test_mark_paid_requires_transaction_id() {
        let mut order = Order::new(Currency::Usd);
        assert!(matches!(
            order.mark_paid(""),
            Err(PaymentError::MissingTransactionId)
        ));
        assert_eq!(order.payment_status(), PaymentStatus::Pending);

        order.mark_paid("stripe_abc123").unwrap();
        assert!(order.is_paid());
        assert_eq!(order.transaction_id(), "stripe_abc123");
    }

    #[test]
    fn test_paid_is_not_reenterable() {
        let mut order = Order::new(Currency::Usd);
        order.mark_paid("stripe_abc123").unwrap();
        assert!(matches!(
            order.mark_paid("stripe_other"),
            Err(PaymentError::InvalidTransition { .. })
        ));
        assert_eq!(order.transaction_id(), "stripe_abc123");
    }

    #[test]
    fn test_refund_only_from_paid() {
        let mut order = Order::new(Currency::Usd);
        assert!(matches!(
            order.mark_refunded(None),
            Err(PaymentError::InvalidTransition { .. })
        ));

        order.mark_paid("paypal_TX1").unwrap();
        order.mark_refunded(None).unwrap();
        assert_eq!(order.payment_status(), PaymentStatus::Refunded);
        // No refund id supplied: the charge id is preserved.
        assert_eq!(order.transaction_id(), "paypal_TX1");
    }

    #[test]
    fn test_refund_with_new_id_overwrites() {
        let mut order = Order::new(Currency::Usd);
        order.mark_paid("paypal_TX1").unwrap();
        order
            .mark_refunded(Some("paypal_refund_9f".to_string()))
            .unwrap();
        assert_eq!(order.transaction_id(), "paypal_refund_9f");
    }

    #[test]
    fn test_mark_failed_only_from_pending() {
        let mut order = Order::new(Currency::Usd);
        order.mark_failed().unwrap();
        assert_eq!(order.payment_status(), PaymentStatus::Failed);
        assert!(order.mark_failed().is_err());

        let mut paid = Order::new(Currency::Usd);
        paid.mark_paid("rzp_1").unwrap();
        assert!(paid.mark_failed().is_err());
    }

    #[test]
    fn test_status_serde_strings() {
        let json = serde_json::to_string(&PaymentStatus::Refunded).unwrap();
        assert_eq!(json, "\"refunded\"");
        let parsed: PaymentStatus = serde_json::from_str("\"paid\"").unwrap();
        assert_eq!(parsed, PaymentStatus::Paid);
    }
}
