use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use tracing::info;

use crate::{
    AppState,
    api::models::{
        orders::{OrderRequest, OrderResponse},
        users::Principal,
    },
    auth::permissions,
    errors::Error,
    store::{
        IdentityStore, OrderStore, ProductStore,
        models::{NewOrder, OrderItem},
    },
    types::{Action, OrderId},
};

/// Place a new order
#[utoipa::path(
    post,
    path = "/api/orders/place",
    request_body = OrderRequest,
    tag = "orders",
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 400, description = "Invalid order"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Unknown product"),
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn place_order(
    State(state): State<AppState>,
    principal: Principal,
    Json(request): Json<OrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), Error> {
    if request.items.is_empty() {
        return Err(Error::BadRequest {
            message: "Order must contain at least one item".to_string(),
        });
    }

    // The order is linked to the live identity, not to whatever the token
    // was minted from.
    let user = state
        .store
        .find_by_email(&principal.email)
        .await?
        .ok_or(Error::Unauthenticated { message: None })?;

    let mut items = Vec::with_capacity(request.items.len());
    let mut total = Decimal::ZERO;
    for item in &request.items {
        if item.quantity == 0 {
            return Err(Error::BadRequest {
                message: "Item quantity must be at least 1".to_string(),
            });
        }

        let product = state
            .store
            .product_by_id(item.product_id)
            .await?
            .ok_or_else(|| Error::NotFound {
                resource: "Product",
                id: item.product_id.to_string(),
            })?;

        let line_total = product.price * Decimal::from(item.quantity);
        total += line_total;
        items.push(OrderItem {
            product_id: product.id,
            quantity: item.quantity,
            price: line_total,
        });
    }

    let order = state
        .store
        .create_order(NewOrder {
            owner_id: user.id,
            items,
            total_amount: total,
        })
        .await?;
    info!(order_id = order.id, user_id = user.id, "order placed");

    Ok((StatusCode::CREATED, Json(order.into())))
}

/// List the caller's own orders
#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "orders",
    responses(
        (status = 200, description = "Orders placed by the caller", body = [OrderResponse]),
        (status = 401, description = "Not authenticated"),
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_orders(State(state): State<AppState>, principal: Principal) -> Result<Json<Vec<OrderResponse>>, Error> {
    let user = state
        .store
        .find_by_email(&principal.email)
        .await?
        .ok_or(Error::Unauthenticated { message: None })?;

    let orders = state.store.orders_by_owner(user.id).await?;

    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

/// Fetch one order, owner only
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "orders",
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "The order", body = OrderResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Order belongs to another account"),
        (status = 404, description = "No such order"),
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_order(
    State(state): State<AppState>,
    principal: Option<Principal>,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderResponse>, Error> {
    let order = state.store.order_by_id(id).await?.ok_or_else(|| Error::NotFound {
        resource: "Order",
        id: id.to_string(),
    })?;

    permissions::require_owner(principal.as_ref(), &order, Action::Read, &format!("order {id}"))?;

    Ok(Json(order.into()))
}
