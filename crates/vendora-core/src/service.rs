//! # Payment Service
//!
//! Registry, selector, and dispatcher over payment gateways. This is the
//! only entry point the checkout flow calls.
//!
//! Gateway selection is late-bound and name-keyed so the checkout flow can
//! let the buyer pick a processor without this service depending on any
//! concrete gateway type. Availability is checked here, at the service
//! boundary, so a misconfigured gateway never reaches provider code.
//!
//! The registry is mutated only through `register`/`remove`/`set_default`,
//! which take `&mut self` and run at startup. Afterwards the service is
//! shared behind an `Arc` and is immutable, so lookups never observe a
//! half-updated mapping and the dispatch path holds no lock.

use crate::error::PaymentError;
use crate::gateway::{BoxedGateway, PaymentDetails};
use crate::money::Price;
use crate::order::Order;
use crate::result::PaymentResult;
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

/// Default bound on a single gateway call. A gateway performs network I/O
/// against an external processor in a real deployment; a call that exceeds
/// this bound is reported as a failure result, never a crash.
const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Registry and dispatcher for payment gateways
pub struct PaymentService {
    gateways: HashMap<&'static str, BoxedGateway>,
    default_gateway: Option<&'static str>,
    call_timeout: Duration,
}

impl PaymentService {
    /// Create an empty service
    pub fn new() -> Self {
        Self {
            gateways: HashMap::new(),
            default_gateway: None,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Builder: override the per-call timeout
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Builder: register a gateway
    pub fn with_gateway(mut self, gateway: BoxedGateway) -> Self {
        self.register(gateway);
        self
    }

    /// Register a gateway, keyed by `name()`.
    ///
    /// Registering a duplicate name overwrites the previous entry. The first
    /// gateway ever registered becomes the default.
    pub fn register(&mut self, gateway: BoxedGateway) {
        let name = gateway.name();
        info!(gateway = name, "registering payment gateway");
        self.gateways.insert(name, gateway);
        if self.default_gateway.is_none() {
            self.default_gateway = Some(name);
        }
    }

    /// Look up a gateway by name
    pub fn gateway(&self, name: &str) -> Result<&BoxedGateway, PaymentError> {
        self.gateways
            .get(name)
            .ok_or_else(|| PaymentError::GatewayNotFound {
                name: name.to_string(),
            })
    }

    /// The current default gateway
    pub fn default_gateway(&self) -> Result<&BoxedGateway, PaymentError> {
        let name = self
            .default_gateway
            .ok_or(PaymentError::NoGatewaysRegistered)?;
        self.gateway(name)
    }

    /// Change the default gateway
    pub fn set_default(&mut self, name: &str) -> Result<(), PaymentError> {
        let key = self
            .gateways
            .get_key_value(name)
            .map(|(key, _)| *key)
            .ok_or_else(|| PaymentError::GatewayNotFound {
                name: name.to_string(),
            })?;
        self.default_gateway = Some(key);
        Ok(())
    }

    /// Resolve an explicit gateway name, or fall back to the default
    pub fn resolve(&self, name: Option<&str>) -> Result<&BoxedGateway, PaymentError> {
        match name {
            Some(name) => self.gateway(name),
            None => self.default_gateway(),
        }
    }

    /// Gateways that currently report themselves available
    pub fn available(&self) -> Vec<&BoxedGateway> {
        self.gateways.values().filter(|g| g.is_available()).collect()
    }

    /// Available gateway names mapped to display names, for buyer-facing
    /// provider pickers
    pub fn available_names(&self) -> BTreeMap<&'static str, &'static str> {
        self.available()
            .into_iter()
            .map(|g| (g.name(), g.display_name()))
            .collect()
    }

    /// All registered gateway names
    pub fn names(&self) -> Vec<&'static str> {
        self.gateways.keys().copied().collect()
    }

    /// Check if a gateway is registered
    pub fn has(&self, name: &str) -> bool {
        self.gateways.contains_key(name)
    }

    /// Number of registered gateways
    pub fn len(&self) -> usize {
        self.gateways.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gateways.is_empty()
    }

    /// Deregister a gateway and return it.
    ///
    /// If the removed gateway was the default, an arbitrary remaining
    /// gateway is promoted; with none remaining the default is unset and
    /// [`PaymentService::default_gateway`] fails until the next
    /// registration.
    pub fn remove(&mut self, name: &str) -> Option<BoxedGateway> {
        let removed = self.gateways.remove(name);
        if removed.is_some() && self.default_gateway == Some(name) {
            self.default_gateway = self.gateways.keys().next().copied();
        }
        removed
    }

    /// Charge an order through the named gateway, or the default when no
    /// name is given.
    ///
    /// Unknown names are an `Err`; an unavailable gateway short-circuits to
    /// a failure result naming its display name, without invoking `charge`.
    pub async fn process_payment(
        &self,
        order: &Order,
        details: &PaymentDetails,
        gateway_name: Option<&str>,
    ) -> Result<PaymentResult, PaymentError> {
        let gateway = self.resolve(gateway_name)?;

        if !gateway.is_available() {
            warn!(
                gateway = gateway.name(),
                "charge rejected: gateway unavailable"
            );
            return Ok(PaymentResult::failure(format!(
                "Payment gateway '{}' is not available",
                gateway.display_name()
            )));
        }

        info!(
            gateway = gateway.name(),
            total = %order.total_amount,
            "dispatching charge"
        );
        Ok(self
            .bounded(gateway.display_name(), gateway.charge(order, details))
            .await)
    }

    /// Refund a previously processed payment.
    ///
    /// A refund must go back through the processor that took the money, so
    /// the gateway name is always explicit — there is no default fallback.
    ///
    /// The amount is not cross-checked against the original charge, and
    /// concurrent refund/charge on the same transaction id must be
    /// serialized by the caller; this service holds no per-transaction lock.
    pub async fn process_refund(
        &self,
        transaction_id: &str,
        amount: Price,
        gateway_name: &str,
    ) -> Result<PaymentResult, PaymentError> {
        let gateway = self.gateway(gateway_name)?;
        info!(
            gateway = gateway_name,
            transaction_id,
            amount = %amount,
            "dispatching refund"
        );
        Ok(self
            .bounded(
                gateway.display_name(),
                gateway.refund(transaction_id, amount),
            )
            .await)
    }

    /// Run a gateway call under the per-call timeout, downgrading a timeout
    /// to a failure result.
    async fn bounded<F>(&self, display_name: &str, call: F) -> PaymentResult
    where
        F: Future<Output = PaymentResult>,
    {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(gateway = display_name, "gateway call timed out");
                PaymentResult::failure(format!(
                    "Payment gateway '{}' timed out after {}s",
                    display_name,
                    self.call_timeout.as_secs()
                ))
            }
        }
    }
}

impl Default for PaymentService {
    fn default() -> Self {
        Self::new()
    }
}
