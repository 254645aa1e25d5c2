//! OpenAPI documentation configuration.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::models::{
    auth::{AuthResponse, DeleteAccountRequest, LoginRequest, RegisterRequest},
    orders::{OrderItemRequest, OrderItemResponse, OrderRequest, OrderResponse},
    products::{ProductCreate, ProductResponse},
    users::{Role, UserResponse},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::auth::register,
        crate::api::handlers::auth::login,
        crate::api::handlers::auth::delete_account,
        crate::api::handlers::auth::delete_user,
        crate::api::handlers::orders::place_order,
        crate::api::handlers::orders::list_orders,
        crate::api::handlers::orders::get_order,
        crate::api::handlers::products::list_products,
        crate::api::handlers::products::create_product,
        crate::api::handlers::users::get_current_user,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        DeleteAccountRequest,
        AuthResponse,
        OrderRequest,
        OrderItemRequest,
        OrderResponse,
        OrderItemResponse,
        ProductCreate,
        ProductResponse,
        Role,
        UserResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login, and account removal"),
        (name = "orders", description = "Placing and reading orders"),
        (name = "products", description = "Product catalogue"),
        (name = "users", description = "Account profiles"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_renders() {
        let spec = ApiDoc::openapi().to_json().unwrap();
        assert!(spec.contains("/api/auth/login"));
        assert!(spec.contains("bearer_token"));
    }
}
