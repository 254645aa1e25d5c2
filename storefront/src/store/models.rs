//! Store entities and create-request types.
//!
//! These are the persisted shapes, kept separate from the API wire models
//! in [`crate::api::models`]. Conversions between the two live with the
//! API models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::api::models::users::Role;
use crate::auth::permissions::Owned;
use crate::types::{OrderId, ProductId, UserId};

/// A registered user account.
///
/// `email` is unique and doubles as the token subject. `password_hash` is
/// an opaque PHC-format digest; the plaintext never reaches the store.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Request for creating a new user; the store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// A placed order, linked to the account that placed it.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub owner_id: UserId,
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    pub ordered_at: DateTime<Utc>,
}

impl Owned for Order {
    fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

/// One line of an order. `price` is the line total (unit price x quantity),
/// captured at ordering time so later product price changes don't rewrite
/// order history.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Decimal,
}

/// Request for creating a new order; the store assigns `id` and `ordered_at`.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub owner_id: UserId,
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
}

/// A product available for ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
}

/// Request for creating a new product; the store assigns `id`.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
}
