//! Service-level dispatch tests using an instrumented gateway double.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use vendora_core::{
    Currency, Order, PaymentDetails, PaymentError, PaymentGateway, PaymentResult, PaymentService,
    Price, WebhookPayload,
};

/// Gateway double that records every charge/refund call.
struct RecordingGateway {
    name: &'static str,
    display: &'static str,
    available: bool,
    charge_calls: AtomicUsize,
    refund_calls: AtomicUsize,
}

impl RecordingGateway {
    fn new(name: &'static str, display: &'static str, available: bool) -> Arc<Self> {
        Arc::new(Self {
            name,
            display,
            available,
            charge_calls: AtomicUsize::new(0),
            refund_calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl PaymentGateway for RecordingGateway {
    fn name(&self) -> &'static str {
        self.name
    }

    fn display_name(&self) -> &'static str {
        self.display
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn charge(&self, _order: &Order, _details: &PaymentDetails) -> PaymentResult {
        self.charge_calls.fetch_add(1, Ordering::SeqCst);
        PaymentResult::success(format!("{}_tx1", self.name), "charged")
    }

    async fn refund(&self, transaction_id: &str, _amount: Price) -> PaymentResult {
        self.refund_calls.fetch_add(1, Ordering::SeqCst);
        PaymentResult::success(format!("{}_refund1", self.name), "refunded")
            .with_metadata("original_transaction", transaction_id)
    }

    async fn verify_payment(&self, _payload: &WebhookPayload) -> PaymentResult {
        PaymentResult::failure("not used")
    }
}

/// Gateway double that never answers within any reasonable bound.
struct StalledGateway;

#[async_trait]
impl PaymentGateway for StalledGateway {
    fn name(&self) -> &'static str {
        "stalled"
    }

    fn display_name(&self) -> &'static str {
        "Stalled"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn charge(&self, _order: &Order, _details: &PaymentDetails) -> PaymentResult {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        PaymentResult::success("stalled_tx", "too late")
    }

    async fn refund(&self, _transaction_id: &str, _amount: Price) -> PaymentResult {
        PaymentResult::failure("not used")
    }

    async fn verify_payment(&self, _payload: &WebhookPayload) -> PaymentResult {
        PaymentResult::failure("not used")
    }
}

fn order() -> Order {
    let mut order = Order::new(Currency::Usd);
    order.total_amount = Price::new(25.0, Currency::Usd);
    order
}

#[tokio::test]
async fn unavailable_gateway_is_never_charged() {
    let gateway = RecordingGateway::new("stripe", "Stripe", false);
    let service = PaymentService::new().with_gateway(gateway.clone());

    let result = service
        .process_payment(&order(), &PaymentDetails::new(), Some("stripe"))
        .await
        .unwrap();

    assert!(!result.is_success());
    assert!(result.message().contains("Stripe"));
    assert!(result.transaction_id().is_empty());
    assert_eq!(gateway.charge_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn default_gateway_is_first_registered() {
    let a = RecordingGateway::new("alpha", "Alpha Pay", true);
    let b = RecordingGateway::new("beta", "Beta Pay", false);
    let service = PaymentService::new()
        .with_gateway(a.clone())
        .with_gateway(b.clone());

    // No explicit gateway name: the implicit default (alpha) takes the charge.
    let result = service
        .process_payment(&order(), &PaymentDetails::new(), None)
        .await
        .unwrap();

    assert!(result.is_success());
    assert_eq!(result.transaction_id(), "alpha_tx1");
    assert_eq!(a.charge_calls.load(Ordering::SeqCst), 1);
    assert_eq!(b.charge_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unknown_gateway_name_is_an_error() {
    let a = RecordingGateway::new("alpha", "Alpha Pay", true);
    let service = PaymentService::new().with_gateway(a.clone());

    let err = service
        .process_payment(&order(), &PaymentDetails::new(), Some("square"))
        .await
        .unwrap_err();

    assert!(matches!(err, PaymentError::GatewayNotFound { name } if name == "square"));
    assert_eq!(a.charge_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn refund_requires_registered_explicit_gateway() {
    let a = RecordingGateway::new("alpha", "Alpha Pay", true);
    let service = PaymentService::new().with_gateway(a.clone());

    let err = service
        .process_refund("alpha_tx1", Price::new(25.0, Currency::Usd), "square")
        .await
        .unwrap_err();

    assert!(matches!(err, PaymentError::GatewayNotFound { .. }));
    assert_eq!(a.refund_calls.load(Ordering::SeqCst), 0);

    let result = service
        .process_refund("alpha_tx1", Price::new(25.0, Currency::Usd), "alpha")
        .await
        .unwrap();
    assert!(result.is_success());
    assert_eq!(
        result
            .metadata()
            .get("original_transaction")
            .and_then(|v| v.as_str()),
        Some("alpha_tx1")
    );
}

#[tokio::test]
async fn duplicate_registration_overwrites_by_name() {
    let first = RecordingGateway::new("alpha", "Alpha Pay", true);
    let second = RecordingGateway::new("alpha", "Alpha Pay v2", true);
    let service = PaymentService::new()
        .with_gateway(first.clone())
        .with_gateway(second.clone());

    assert_eq!(service.len(), 1);
    let result = service
        .process_payment(&order(), &PaymentDetails::new(), None)
        .await
        .unwrap();
    assert!(result.is_success());
    assert_eq!(first.charge_calls.load(Ordering::SeqCst), 0);
    assert_eq!(second.charge_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn removing_default_promotes_remaining_gateway() {
    let a = RecordingGateway::new("alpha", "Alpha Pay", true);
    let b = RecordingGateway::new("beta", "Beta Pay", true);
    let mut service = PaymentService::new();
    service.register(a);
    service.register(b);

    assert!(service.remove("alpha").is_some());
    let promoted = service.default_gateway().unwrap();
    assert_eq!(promoted.name(), "beta");

    assert!(service.remove("beta").is_some());
    assert!(matches!(
        service.default_gateway(),
        Err(PaymentError::NoGatewaysRegistered)
    ));
}

#[tokio::test]
async fn set_default_redirects_implicit_dispatch() {
    let a = RecordingGateway::new("alpha", "Alpha Pay", true);
    let b = RecordingGateway::new("beta", "Beta Pay", true);
    let mut service = PaymentService::new();
    service.register(a.clone());
    service.register(b.clone());
    service.set_default("beta").unwrap();

    let result = service
        .process_payment(&order(), &PaymentDetails::new(), None)
        .await
        .unwrap();
    assert_eq!(result.transaction_id(), "beta_tx1");
    assert_eq!(a.charge_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn available_names_filters_unavailable() {
    let a = RecordingGateway::new("alpha", "Alpha Pay", true);
    let b = RecordingGateway::new("beta", "Beta Pay", false);
    let service = PaymentService::new().with_gateway(a).with_gateway(b);

    let names = service.available_names();
    assert_eq!(names.len(), 1);
    assert_eq!(names.get("alpha"), Some(&"Alpha Pay"));
}

#[tokio::test(start_paused = true)]
async fn stalled_gateway_call_becomes_failure() {
    let service = PaymentService::new()
        .with_gateway(Arc::new(StalledGateway))
        .with_call_timeout(Duration::from_secs(5));

    let result = service
        .process_payment(&order(), &PaymentDetails::new(), None)
        .await
        .unwrap();

    assert!(!result.is_success());
    assert!(result.message().contains("timed out"));
    assert!(result.transaction_id().is_empty());
}
