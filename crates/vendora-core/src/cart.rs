//! # Cart Types
//!
//! Cart line items for the vendora checkout flow.
//!
//! A [`CartItem`] snapshots the catalog title and unit price at the moment a
//! product is added, so later catalog edits do not change what the buyer was
//! shown. Items are owned by whichever cart or order currently holds them.

use crate::money::{Currency, Price};
use crate::order::Order;
use crate::product::Product;
use serde::{Deserialize, Serialize};

/// A line item in a cart or order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Catalog product identifier
    pub product_id: String,

    /// Product title (display snapshot, not a live join)
    pub title: String,

    /// Unit price, non-negative
    unit_price: Price,

    /// Quantity, always >= 1
    quantity: u32,
}

impl CartItem {
    /// Create a new cart item.
    ///
    /// Negative unit prices are clamped to zero and quantities below 1 to 1.
    pub fn new(
        product_id: impl Into<String>,
        title: impl Into<String>,
        unit_price: Price,
        quantity: u32,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            title: title.into(),
            unit_price: Price::from_minor(unit_price.amount.max(0), unit_price.currency),
            quantity: quantity.max(1),
        }
    }

    /// Create a cart item from a catalog product
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self::new(
            product.id.clone(),
            product.title.clone(),
            product.price,
            quantity,
        )
    }

    /// Unit price
    pub fn unit_price(&self) -> Price {
        self.unit_price
    }

    /// Quantity
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Set the quantity, clamping any value below 1 to 1
    pub fn set_quantity(&mut self, quantity: i32) {
        self.quantity = quantity.max(1) as u32;
    }

    /// Increase the quantity by `amount`
    pub fn increment_quantity(&mut self, amount: u32) {
        self.quantity += amount;
    }

    /// Calculate the subtotal for this line (`unit_price * quantity`)
    pub fn subtotal(&self) -> Price {
        Price::from_minor(
            self.unit_price.amount * self.quantity as i64,
            self.unit_price.currency,
        )
    }
}

/// A buyer's cart: ordered line items keyed by product id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    /// Currency for all items in the cart
    pub currency: Currency,

    /// Line items, insertion order preserved
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            items: Vec::new(),
        }
    }

    /// Add an item. Adding a product already in the cart increments the
    /// existing line's quantity instead of appending a duplicate.
    pub fn add_item(&mut self, item: CartItem) {
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.product_id == item.product_id)
        {
            existing.increment_quantity(item.quantity());
        } else {
            self.items.push(item);
        }
    }

    /// Add a catalog product with quantity
    pub fn add_product(&mut self, product: &Product, quantity: u32) {
        self.add_item(CartItem::from_product(product, quantity));
    }

    /// Update the quantity of a line. Returns false if the product is not in
    /// the cart.
    pub fn set_quantity(&mut self, product_id: &str, quantity: i32) -> bool {
        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                item.set_quantity(quantity);
                true
            }
            None => false,
        }
    }

    /// Remove a line by product id. Returns false if the product is not in
    /// the cart.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() != before
    }

    /// Remove all items
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Line items in display order
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Check if the cart has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total unit count across all lines
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity()).sum()
    }

    /// Cart total (sum of line subtotals)
    pub fn total(&self) -> Price {
        let amount = self.items.iter().map(|i| i.subtotal().amount).sum();
        Price::from_minor(amount, self.currency)
    }

    /// Commit the cart into an order. The cart is consumed: its items now
    /// belong to the order.
    pub fn into_order(self, user_id: Option<i64>) -> Order {
        let mut order = Order::new(self.currency);
        order.user_id = user_id;
        for item in self.items {
            order.add_item(item);
        }
        order.calculate_total();
        order
    }
}
