use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use rust_decimal::Decimal;
use tracing::info;

use crate::{
    AppState,
    api::models::{
        products::{ProductCreate, ProductResponse},
        users::{Principal, Role},
    },
    auth::permissions,
    errors::Error,
    store::{ProductStore, models::NewProduct},
    types::Action,
};

/// List the product catalogue
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "products",
    responses(
        (status = 200, description = "All products", body = [ProductResponse]),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<ProductResponse>>, Error> {
    let products = state.store.products().await?;

    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

/// Add a product to the catalogue (admin only)
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = ProductCreate,
    tag = "products",
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid product"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin role required"),
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_product(
    State(state): State<AppState>,
    principal: Option<Principal>,
    Json(request): Json<ProductCreate>,
) -> Result<(StatusCode, Json<ProductResponse>), Error> {
    let admin = permissions::require_role(principal.as_ref(), Role::Admin, Action::Create, "products")?;

    if request.name.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "Product name must not be empty".to_string(),
        });
    }
    if request.price < Decimal::ZERO {
        return Err(Error::BadRequest {
            message: "Product price must not be negative".to_string(),
        });
    }

    let product = state
        .store
        .create_product(NewProduct {
            name: request.name,
            description: request.description,
            price: request.price,
        })
        .await?;
    info!(product_id = product.id, admin_id = admin.id, "product created");

    Ok((StatusCode::CREATED, Json(product.into())))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use rust_decimal::Decimal;
    use serde_json::json;

    use crate::api::models::products::ProductResponse;
    use crate::api::models::users::Role;
    use crate::test_utils::{create_test_server, create_test_state, seed_user};

    #[tokio::test]
    async fn catalogue_is_public() {
        let state = create_test_state();
        let server = create_test_server(state);

        let response = server.get("/api/products").await;
        response.assert_status_ok();
        let products: Vec<ProductResponse> = response.json();
        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn create_product_is_admin_only() {
        let state = create_test_state();
        let server = create_test_server(state.clone());
        let admin = seed_user(state.store.as_ref(), "admin@example.com", "admin-password", Role::Admin).await;
        let user = seed_user(state.store.as_ref(), "user@example.com", "password123", Role::User).await;
        let request = json!({"name": "Laptop", "description": "A laptop", "price": "499.99"});

        server.post("/api/products").json(&request).await.assert_status(StatusCode::UNAUTHORIZED);

        let user_token = state.tokens.issue(&user).unwrap();
        server
            .post("/api/products")
            .authorization_bearer(&user_token)
            .json(&request)
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let admin_token = state.tokens.issue(&admin).unwrap();
        let response = server.post("/api/products").authorization_bearer(&admin_token).json(&request).await;
        response.assert_status(StatusCode::CREATED);
        let product: ProductResponse = response.json();
        assert_eq!(product.name, "Laptop");
        assert_eq!(product.price, Decimal::new(499_99, 2));

        // The new product shows up in the public listing
        let listing: Vec<ProductResponse> = server.get("/api/products").await.json();
        assert_eq!(listing.len(), 1);
    }

    #[tokio::test]
    async fn create_product_validates_input() {
        let state = create_test_state();
        let server = create_test_server(state.clone());
        let admin = seed_user(state.store.as_ref(), "admin@example.com", "admin-password", Role::Admin).await;
        let token = state.tokens.issue(&admin).unwrap();

        server
            .post("/api/products")
            .authorization_bearer(&token)
            .json(&json!({"name": "  ", "price": "1.00"}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .post("/api/products")
            .authorization_bearer(&token)
            .json(&json!({"name": "Laptop", "price": "-1.00"}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
