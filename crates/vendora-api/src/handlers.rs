//! # Request Handlers
//!
//! Axum request handlers for the payment API.
//!
//! The checkout, webhook, and refund handlers are the collaborators around
//! the payment core: they build orders, invoke the `PaymentService`, and
//! apply the resulting status transitions. A buyer always receives either a
//! transaction id or a displayable failure message — never a raw fault.

use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use vendora_core::{
    Cart, Currency, PaymentDetails, PaymentError, PaymentResult, PaymentStatus, Price, Product,
    WebhookPayload,
};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Checkout request
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    /// Items to purchase
    #[serde(default)]
    pub items: Vec<CheckoutItem>,
    /// Buyer id (optional)
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Gateway name (optional; the service default is used when absent)
    #[serde(default)]
    pub gateway: Option<String>,
    /// Provider-specific payment details (card token, payer email, ...)
    #[serde(default)]
    pub payment_details: PaymentDetails,
}

/// Item in a checkout request
#[derive(Debug, Deserialize)]
pub struct CheckoutItem {
    /// Product ID
    pub product_id: String,
    /// Quantity
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Checkout response
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    /// Persisted order id
    pub order_id: i64,
    /// Order status after the charge outcome was applied
    pub status: PaymentStatus,
    /// Serialized charge outcome
    pub payment: PaymentResult,
    /// Redirect URL for hosted flows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,
}

/// Refund request (admin)
#[derive(Debug, Deserialize)]
pub struct RefundRequest {
    /// Transaction id of the original charge
    pub transaction_id: String,
    /// Amount to refund
    pub amount: f64,
    /// Gateway that took the original payment (always explicit)
    pub gateway: String,
    /// Currency of the refund amount (defaults to USD)
    #[serde(default)]
    pub currency: Option<Currency>,
}

/// Refund response
#[derive(Debug, Serialize)]
pub struct RefundResponse {
    /// Serialized refund outcome
    pub payment: PaymentResult,
    /// Reconciled order, when one was found for the transaction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_status: Option<PaymentStatus>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

type ErrorReply = (StatusCode, Json<ErrorResponse>);

fn payment_error_to_response(err: PaymentError) -> ErrorReply {
    let code = err.status_code();
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(ErrorResponse::new(err.to_string(), code)),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "vendora",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// List active catalog products
pub async fn list_products(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.catalog.active_products().cloned().collect())
}

/// Get one product by id
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<Product>, ErrorReply> {
    state
        .catalog
        .get(&product_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| payment_error_to_response(PaymentError::ProductNotFound { product_id }))
}

/// List available gateways (name -> display name)
pub async fn list_gateways(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.service.available_names())
}

/// Create and charge an order.
///
/// Builds the order from catalog items, persists it pending, dispatches the
/// charge through the service, then applies and persists the resulting
/// status transition.
#[instrument(skip(state, request), fields(items = request.items.len()))]
pub async fn checkout(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ErrorReply> {
    if request.items.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("No items in checkout request", 400)),
        ));
    }

    let mut cart = Cart::new(Currency::Usd);
    for item in &request.items {
        let product = state.catalog.get(&item.product_id).ok_or_else(|| {
            payment_error_to_response(PaymentError::ProductNotFound {
                product_id: item.product_id.clone(),
            })
        })?;
        if !product.active {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(
                    format!("Product is not available: {}", item.product_id),
                    400,
                )),
            ));
        }
        cart.add_product(product, item.quantity);
    }

    // Resolve the gateway up front so the order records its provider even
    // when the charge fails.
    let gateway = state
        .service
        .resolve(request.gateway.as_deref())
        .map_err(payment_error_to_response)?;

    let mut order = cart.into_order(request.user_id);
    order.payment_provider = gateway.name().to_string();

    let order_id = state
        .orders
        .insert(&order)
        .await
        .map_err(payment_error_to_response)?;
    order.id = Some(order_id);

    let checkout_url = gateway.checkout_url(&order);

    let result = state
        .service
        .process_payment(&order, &request.payment_details, request.gateway.as_deref())
        .await
        .map_err(payment_error_to_response)?;

    if result.is_success() {
        order
            .mark_paid(result.transaction_id())
            .map_err(payment_error_to_response)?;
    } else {
        order.mark_failed().map_err(payment_error_to_response)?;
    }

    state
        .orders
        .update(&order)
        .await
        .map_err(payment_error_to_response)?;

    info!(
        order_id,
        success = result.is_success(),
        "checkout complete"
    );

    Ok(Json(CheckoutResponse {
        order_id,
        status: order.payment_status(),
        payment: result,
        checkout_url,
    }))
}

/// Handle a provider webhook/callback.
///
/// The payload is handed to the named gateway's `verify_payment`; a
/// verified transaction is reconciled against the order store.
#[instrument(skip(state, payload), fields(gateway = %gateway_name))]
pub async fn webhook(
    State(state): State<AppState>,
    Path(gateway_name): Path<String>,
    Json(payload): Json<WebhookPayload>,
) -> Result<(StatusCode, Json<PaymentResult>), ErrorReply> {
    let gateway = state
        .service
        .gateway(&gateway_name)
        .map_err(payment_error_to_response)?;

    let result = gateway.verify_payment(&payload).await;
    if !result.is_success() {
        warn!(message = result.message(), "webhook verification failed");
        return Ok((StatusCode::BAD_REQUEST, Json(result)));
    }

    match state
        .orders
        .find_by_transaction_id(result.transaction_id())
        .await
        .map_err(payment_error_to_response)?
    {
        Some(mut order) if order.payment_status() == PaymentStatus::Pending => {
            order
                .mark_paid(result.transaction_id())
                .map_err(payment_error_to_response)?;
            state
                .orders
                .update(&order)
                .await
                .map_err(payment_error_to_response)?;
            info!(order_id = order.id, "order reconciled from webhook");
        }
        Some(order) => {
            info!(
                order_id = order.id,
                status = %order.payment_status(),
                "webhook for already-settled order"
            );
        }
        None => {
            warn!(
                transaction_id = result.transaction_id(),
                "webhook references unknown transaction"
            );
        }
    }

    Ok((StatusCode::OK, Json(result)))
}

/// Issue a refund through the gateway that took the original payment.
#[instrument(skip(state, request), fields(gateway = %request.gateway))]
pub async fn refund(
    State(state): State<AppState>,
    Json(request): Json<RefundRequest>,
) -> Result<Json<RefundResponse>, ErrorReply> {
    let currency = request.currency.unwrap_or_default();
    let amount = Price::new(request.amount, currency);

    let result = state
        .service
        .process_refund(&request.transaction_id, amount, &request.gateway)
        .await
        .map_err(payment_error_to_response)?;

    let mut order_id = None;
    let mut order_status = None;

    if result.is_success() {
        match state
            .orders
            .find_by_transaction_id(&request.transaction_id)
            .await
            .map_err(payment_error_to_response)?
        {
            Some(mut order) => {
                // Keep the original charge id on the order; the refund id
                // travels in the response.
                order
                    .mark_refunded(None)
                    .map_err(payment_error_to_response)?;
                state
                    .orders
                    .update(&order)
                    .await
                    .map_err(payment_error_to_response)?;
                order_id = order.id;
                order_status = Some(order.payment_status());
            }
            None => {
                error!(
                    transaction_id = %request.transaction_id,
                    "refund succeeded but no order references the transaction"
                );
            }
        }
    }

    Ok(Json(RefundResponse {
        payment: result,
        order_id,
        order_status,
    }))
}
