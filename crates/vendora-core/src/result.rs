//! # Payment Result
//!
//! The uniform outcome type returned by every gateway operation.
//!
//! A result is either a success carrying a non-empty transaction id, or a
//! failure carrying a displayable message and an empty transaction id. The
//! two named constructors enforce that pairing, so consumers can rely on
//! `is_success() == !transaction_id().is_empty()`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Open metadata mapping attached to a payment outcome (amount, currency,
/// provider-specific flags). No key is guaranteed to exist except where a
/// specific operation's contract promises it.
pub type Metadata = serde_json::Map<String, Value>;

/// Outcome of a charge, refund, or verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentResult {
    success: bool,
    transaction_id: String,
    message: String,
    metadata: Metadata,
}

impl PaymentResult {
    /// Create a success result. `transaction_id` must be non-empty.
    pub fn success(transaction_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            transaction_id: transaction_id.into(),
            message: message.into(),
            metadata: Metadata::new(),
        }
    }

    /// Create a failure result. The transaction id is always empty.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            transaction_id: String::new(),
            message: message.into(),
            metadata: Metadata::new(),
        }
    }

    /// Builder: attach a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Provider transaction identifier; empty on failure
    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    /// Human-readable outcome message
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Serialize to the wire mapping: `success`, `transaction_id`,
    /// `message`, `metadata`. API responses and log records must preserve
    /// these key names byte-for-byte.
    pub fn to_map(&self) -> Metadata {
        let mut map = Metadata::new();
        map.insert("success".to_string(), Value::Bool(self.success));
        map.insert(
            "transaction_id".to_string(),
            Value::String(self.transaction_id.clone()),
        );
        map.insert("message".to_string(), Value::String(self.message.clone()));
        map.insert("metadata".to_string(), Value::Object(self.metadata.clone()));
        map
    }
}
