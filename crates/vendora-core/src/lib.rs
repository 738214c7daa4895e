//! # vendora-core
//!
//! Core types and traits for the vendora payment engine.
//!
//! This crate provides:
//! - `PaymentGateway` trait for implementing payment providers
//! - `PaymentResult` uniform outcome model for every gateway operation
//! - `PaymentService` registry/selector/dispatcher over gateways
//! - `Order`, `CartItem`, and `Cart` for the checkout data model
//! - `Product` and `ProductCatalog` for the product catalog
//! - `OrderStore` persistence port
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use vendora_core::{Cart, Currency, PaymentService, Product, Price};
//!
//! // Build an order from cart contents
//! let mut cart = Cart::new(Currency::Usd);
//! cart.add_product(&product, 2);
//! let mut order = cart.into_order(Some(user_id));
//!
//! // Charge through the buyer's chosen gateway (or the default)
//! let result = service.process_payment(&order, &details, Some("stripe")).await?;
//!
//! // The caller applies the status transition
//! if result.is_success() {
//!     order.mark_paid(result.transaction_id())?;
//! } else {
//!     order.mark_failed()?;
//! }
//! ```

pub mod cart;
pub mod error;
pub mod gateway;
pub mod money;
pub mod order;
pub mod product;
pub mod result;
pub mod service;
pub mod store;

// Re-exports for convenience
pub use cart::{Cart, CartItem};
pub use error::PaymentError;
pub use gateway::{BoxedGateway, PaymentDetails, PaymentGateway, WebhookPayload};
pub use money::{Currency, Price};
pub use order::{Order, PaymentStatus};
pub use product::{Product, ProductCatalog};
pub use result::{Metadata, PaymentResult};
pub use service::PaymentService;
pub use store::OrderStore;
