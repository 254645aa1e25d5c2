//! Persistence contract and the in-memory collaborator that implements it.
//!
//! The authentication core and the HTTP handlers never talk to a concrete
//! storage engine; they consume the traits below. Each trait is the data
//! access contract for one entity family, in the style of a repository:
//! creation assigns identifiers, lookups return `Option`, and uniqueness
//! violations surface as [`errors::StoreError::UniqueViolation`].
//!
//! [`memory::MemoryStore`] is the process-local implementation used by the
//! binary and the tests. A database-backed collaborator can replace it
//! without touching the rest of the crate.

pub mod errors;
pub mod memory;
pub mod models;

use crate::types::{OrderId, ProductId, UserId};
use self::errors::Result;
use self::models::{NewOrder, NewProduct, NewUser, Order, Product, User};

/// Data access contract for user accounts.
///
/// This is the only store the authentication layer consults: the request
/// authenticator re-resolves the token subject through [`find_by_email`]
/// on every request rather than trusting embedded claims.
///
/// [`find_by_email`]: IdentityStore::find_by_email
#[async_trait::async_trait]
pub trait IdentityStore: Send + Sync {
    /// Look up a user by email (the token subject).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Look up a user by ID.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>>;

    /// Persist a new user, assigning its ID. Fails with
    /// `UniqueViolation { field: "email" }` when the email is taken.
    async fn save(&self, user: NewUser) -> Result<User>;

    /// Whether a user with this ID exists.
    async fn exists_by_id(&self, id: UserId) -> Result<bool>;

    /// Delete a user by ID. Fails with `NotFound` when absent.
    async fn delete_by_id(&self, id: UserId) -> Result<()>;
}

/// Data access contract for orders.
#[async_trait::async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist a new order, assigning its ID.
    async fn create_order(&self, order: NewOrder) -> Result<Order>;

    /// Look up an order by ID.
    async fn order_by_id(&self, id: OrderId) -> Result<Option<Order>>;

    /// All orders placed by the given user, oldest first.
    async fn orders_by_owner(&self, owner: UserId) -> Result<Vec<Order>>;
}

/// Data access contract for products.
#[async_trait::async_trait]
pub trait ProductStore: Send + Sync {
    /// Persist a new product, assigning its ID.
    async fn create_product(&self, product: NewProduct) -> Result<Product>;

    /// Look up a product by ID.
    async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>>;

    /// All products, in insertion order.
    async fn products(&self) -> Result<Vec<Product>>;
}
