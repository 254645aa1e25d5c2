//! API request/response models for orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::store::models::{Order, OrderItem};
use crate::types::{OrderId, ProductId, UserId};

/// Request to place a new order
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderRequest {
    pub items: Vec<OrderItemRequest>,
}

/// One requested order line
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItemRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// A placed order
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItemResponse>,
    /// Order total, computed server-side from current product prices
    #[schema(value_type = String)]
    pub total_amount: Decimal,
    pub ordered_at: DateTime<Utc>,
}

/// One line of a placed order
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItemResponse {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Line total captured at ordering time
    #[schema(value_type = String)]
    pub price: Decimal,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            product_id: item.product_id,
            quantity: item.quantity,
            price: item.price,
        }
    }
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            user_id: order.owner_id,
            items: order.items.into_iter().map(OrderItemResponse::from).collect(),
            total_amount: order.total_amount,
            ordered_at: order.ordered_at,
        }
    }
}
