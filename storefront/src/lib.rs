//! # storefront: a small e-commerce backend with stateless authentication
//!
//! `storefront` is an HTTP service for a minimal shop: accounts, a product
//! catalogue, and orders. Its centerpiece is the authentication and
//! authorization layer - signed, self-contained session tokens carry
//! identity and role, every request rebuilds its principal from the token
//! plus a fresh identity lookup, and two orthogonal authorization checks
//! (role and ownership) gate the protected operations.
//!
//! ## Request flow
//!
//! Every inbound request passes through the authentication middleware
//! ([`auth::middleware::attach_principal`]). The middleware reads the
//! `Authorization: Bearer` header, validates the token signature and
//! expiry via [`auth::token::TokenService`], re-resolves the subject
//! against the identity store, and - on success - attaches a
//! request-scoped principal to the request. Requests without a valid
//! credential continue anonymously; nothing is rejected at this layer.
//!
//! Handlers then declare what they need: an extractor for the principal
//! when an identity is required, and the checks in [`auth::permissions`]
//! when a role or ownership rule applies. Denials come back as values and
//! map to 401/403 at the edge, so anonymous access fails exactly where it
//! must and nowhere else.
//!
//! There is no server-side session state: validity is derived entirely
//! from the token and the live identity record, which keeps the service
//! safe to scale horizontally. The flip side - tokens cannot be revoked
//! before expiry - is mitigated by re-resolving the identity on every
//! request, so deleted or demoted accounts stop authenticating
//! immediately.
//!
//! ## Core components
//!
//! The **API layer** ([`api`]) holds the axum route handlers and the
//! request/response models. The **authentication layer** ([`auth`])
//! provides password hashing, the token service, the request
//! authenticator, and the authorization checks. The **store layer**
//! ([`store`]) defines the persistence contract as traits and ships a
//! concurrent in-memory implementation; handlers and the authenticator
//! only ever consume the traits.
//!
//! ## Quick start
//!
//! ```no_run
//! use clap::Parser;
//! use storefront::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = storefront::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     storefront::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module. The token signing secret is required; the
//! server refuses to start without it.

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
mod openapi;
pub mod store;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use std::sync::Arc;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
};
use bon::Builder;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, debug, info, instrument, warn};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::api::models::users::Role;
use crate::auth::{password, token::TokenService};
use crate::openapi::ApiDoc;
use crate::store::{IdentityStore, memory::MemoryStore, models::NewUser};

pub use config::Config;
pub use types::{OrderId, ProductId, UserId};

/// Application state shared across all request handlers.
///
/// Cloned per request by axum; every field is cheap to clone and
/// read-only after startup. The store is the only shared resource, and it
/// serializes its own access.
#[derive(Clone, Builder)]
pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub config: Config,
    pub tokens: TokenService,
}

/// Create the initial admin user if it doesn't exist.
///
/// Idempotent: an existing account with the configured email is left
/// untouched. When no admin password is configured, nothing is seeded -
/// the deployment then only has self-registered (non-admin) accounts.
#[instrument(skip_all)]
pub async fn create_initial_admin_user(
    email: &str,
    password_text: Option<&str>,
    identities: &dyn IdentityStore,
) -> Result<Option<UserId>, errors::Error> {
    let Some(password_text) = password_text else {
        warn!("admin_password is not set; skipping initial admin user");
        return Ok(None);
    };

    if let Some(existing) = identities.find_by_email(email).await? {
        return Ok(Some(existing.id));
    }

    let password_hash = password::hash(password_text)?;
    let admin = identities
        .save(NewUser {
            name: "Administrator".to_string(),
            email: email.to_string(),
            password_hash,
            role: Role::Admin,
        })
        .await?;
    info!(user_id = admin.id, "initial admin user created");

    Ok(Some(admin.id))
}

/// Build the application router with all routes and middleware applied.
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/api/auth/register", post(api::handlers::auth::register))
        .route("/api/auth/login", post(api::handlers::auth::login))
        .route("/api/auth/delete", delete(api::handlers::auth::delete_account))
        .route("/api/auth/delete/{id}", delete(api::handlers::auth::delete_user));

    let order_routes = Router::new()
        .route("/api/orders/place", post(api::handlers::orders::place_order))
        .route("/api/orders", get(api::handlers::orders::list_orders))
        .route("/api/orders/{id}", get(api::handlers::orders::get_order));

    let product_routes = Router::new().route(
        "/api/products",
        get(api::handlers::products::list_products).post(api::handlers::products::create_product),
    );

    let user_routes = Router::new().route("/api/users/current", get(api::handlers::users::get_current_user));

    Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .merge(auth_routes)
        .merge(order_routes)
        .merge(product_routes)
        .merge(user_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        // Authentication runs before routing decisions; tracing wraps everything
        .layer(from_fn_with_state(state.clone(), auth::middleware::attach_principal))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Main application struct that owns all resources and lifecycle.
///
/// 1. **Create**: [`Application::new`] validates the signing secret,
///    builds the store, seeds the initial admin user, and assembles the
///    router.
/// 2. **Serve**: [`Application::serve`] binds the TCP port and handles
///    requests until the shutdown future resolves.
pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Create a new application instance with all resources initialized.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting storefront with configuration: {:#?}", config);

        // Fatal when the signing secret is missing; never serve with a
        // default key.
        let tokens = TokenService::from_config(&config)?;

        let store = Arc::new(MemoryStore::new());
        create_initial_admin_user(&config.admin_email, config.admin_password.as_deref(), store.as_ref()).await?;

        let state = AppState::builder().store(store).config(config.clone()).tokens(tokens).build();
        let router = build_router(state);

        Ok(Self { router, config })
    }

    /// Convert the application into a test server (for tests).
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application until `shutdown` resolves.
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("storefront listening on http://{}", bind_addr);

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("storefront shut down");
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::api::models::auth::AuthResponse;
    use crate::api::models::orders::OrderResponse;
    use crate::api::models::products::ProductResponse;
    use crate::test_utils::create_test_config;

    #[tokio::test]
    async fn startup_fails_without_secret() {
        let mut config = create_test_config();
        config.secret_key = None;

        assert!(Application::new(config).await.is_err());
    }

    #[tokio::test]
    async fn admin_seeding_is_idempotent() {
        let store = MemoryStore::new();

        let first = create_initial_admin_user("root@example.com", Some("admin-password"), &store)
            .await
            .unwrap();
        let second = create_initial_admin_user("root@example.com", Some("admin-password"), &store)
            .await
            .unwrap();
        assert_eq!(first, second);

        let none = create_initial_admin_user("other@example.com", None, &store).await.unwrap();
        assert_eq!(none, None);
    }

    /// End-to-end: seeded admin stocks the catalogue, a self-registered
    /// user orders from it, and the foreign-order read is forbidden.
    #[tokio::test]
    async fn full_flow() {
        let mut config = create_test_config();
        config.admin_email = "root@example.com".to_string();
        config.admin_password = Some("admin-password".to_string());

        let server = Application::new(config).await.unwrap().into_test_server();

        server.get("/healthz").await.assert_status_ok();

        // Admin logs in with the seeded credentials and creates a product
        let admin: AuthResponse = server
            .post("/api/auth/login")
            .json(&json!({"email": "root@example.com", "password": "admin-password"}))
            .await
            .json();
        let product: ProductResponse = server
            .post("/api/products")
            .authorization_bearer(&admin.token)
            .json(&json!({"name": "Laptop", "price": "499.99"}))
            .await
            .json();

        // A fresh user registers and orders it
        let buyer: AuthResponse = server
            .post("/api/auth/register")
            .json(&json!({"name": "Buyer", "email": "buyer@example.com", "password": "password123"}))
            .await
            .json();
        let order_response = server
            .post("/api/orders/place")
            .authorization_bearer(&buyer.token)
            .json(&json!({"items": [{"product_id": product.id, "quantity": 2}]}))
            .await;
        order_response.assert_status(StatusCode::CREATED);
        let order: OrderResponse = order_response.json();
        assert_eq!(order.total_amount, rust_decimal::Decimal::new(999_98, 2));

        // The admin is not the owner of the buyer's order
        server
            .get(&format!("/api/orders/{}", order.id))
            .authorization_bearer(&admin.token)
            .await
            .assert_status(StatusCode::FORBIDDEN);

        // Anonymous requests reach authorization and are denied there
        server.get("/api/orders").await.assert_status(StatusCode::UNAUTHORIZED);
        server
            .get(&format!("/api/orders/{}", order.id))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
