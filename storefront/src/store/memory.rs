//! In-memory store implementation.
//!
//! Backed by [`DashMap`] so concurrent requests can read and write without
//! a global lock. IDs are handed out from per-entity atomic counters,
//! starting at 1. Email uniqueness is enforced through a secondary index
//! map whose entry guard serializes concurrent registrations of the same
//! address.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::types::{OrderId, ProductId, UserId};

use super::errors::{Result, StoreError};
use super::models::{NewOrder, NewProduct, NewUser, Order, Product, User};
use super::{IdentityStore, OrderStore, ProductStore};

/// Process-local store for users, orders, and products.
#[derive(Debug)]
pub struct MemoryStore {
    users: DashMap<UserId, User>,
    users_by_email: DashMap<String, UserId>,
    orders: DashMap<OrderId, Order>,
    products: DashMap<ProductId, Product>,
    next_user_id: AtomicI64,
    next_order_id: AtomicI64,
    next_product_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            users_by_email: DashMap::new(),
            orders: DashMap::new(),
            products: DashMap::new(),
            next_user_id: AtomicI64::new(1),
            next_order_id: AtomicI64::new(1),
            next_product_id: AtomicI64::new(1),
        }
    }
}

#[async_trait::async_trait]
impl IdentityStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let id = match self.users_by_email.get(email) {
            Some(id) => *id,
            None => return Ok(None),
        };
        Ok(self.users.get(&id).map(|user| user.value().clone()))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.users.get(&id).map(|user| user.value().clone()))
    }

    async fn save(&self, user: NewUser) -> Result<User> {
        match self.users_by_email.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::UniqueViolation { field: "email" }),
            Entry::Vacant(slot) => {
                let id = self.next_user_id.fetch_add(1, Ordering::Relaxed);
                let user = User {
                    id,
                    name: user.name,
                    email: user.email,
                    password_hash: user.password_hash,
                    role: user.role,
                    created_at: Utc::now(),
                };
                self.users.insert(id, user.clone());
                slot.insert(id);
                Ok(user)
            }
        }
    }

    async fn exists_by_id(&self, id: UserId) -> Result<bool> {
        Ok(self.users.contains_key(&id))
    }

    async fn delete_by_id(&self, id: UserId) -> Result<()> {
        match self.users.remove(&id) {
            Some((_, user)) => {
                self.users_by_email.remove(&user.email);
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }
}

#[async_trait::async_trait]
impl OrderStore for MemoryStore {
    async fn create_order(&self, order: NewOrder) -> Result<Order> {
        let id = self.next_order_id.fetch_add(1, Ordering::Relaxed);
        let order = Order {
            id,
            owner_id: order.owner_id,
            items: order.items,
            total_amount: order.total_amount,
            ordered_at: Utc::now(),
        };
        self.orders.insert(id, order.clone());
        Ok(order)
    }

    async fn order_by_id(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.orders.get(&id).map(|order| order.value().clone()))
    }

    async fn orders_by_owner(&self, owner: UserId) -> Result<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .orders
            .iter()
            .filter(|entry| entry.value().owner_id == owner)
            .map(|entry| entry.value().clone())
            .collect();
        // DashMap iteration order is arbitrary
        orders.sort_by_key(|order| order.id);
        Ok(orders)
    }
}

#[async_trait::async_trait]
impl ProductStore for MemoryStore {
    async fn create_product(&self, product: NewProduct) -> Result<Product> {
        let id = self.next_product_id.fetch_add(1, Ordering::Relaxed);
        let product = Product {
            id,
            name: product.name,
            description: product.description,
            price: product.price,
        };
        self.products.insert(id, product.clone());
        Ok(product)
    }

    async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>> {
        Ok(self.products.get(&id).map(|product| product.value().clone()))
    }

    async fn products(&self) -> Result<Vec<Product>> {
        let mut products: Vec<Product> = self.products.iter().map(|entry| entry.value().clone()).collect();
        products.sort_by_key(|product| product.id);
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::api::models::users::Role;
    use crate::store::models::OrderItem;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$fake".to_string(),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn save_and_find_user() {
        let store = MemoryStore::new();
        let created = store.save(new_user("a@example.com")).await.unwrap();
        assert_eq!(created.id, 1);

        let by_email = store.find_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(by_email, created);

        let by_id = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id, created);

        assert!(store.exists_by_id(created.id).await.unwrap());
        assert!(!store.exists_by_id(999).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let store = MemoryStore::new();
        store.save(new_user("a@example.com")).await.unwrap();

        let err = store.save(new_user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { field: "email" }));
    }

    #[tokio::test]
    async fn delete_frees_email() {
        let store = MemoryStore::new();
        let created = store.save(new_user("a@example.com")).await.unwrap();

        store.delete_by_id(created.id).await.unwrap();
        assert!(store.find_by_email("a@example.com").await.unwrap().is_none());

        // The address can be registered again after deletion
        store.save(new_user("a@example.com")).await.unwrap();

        let err = store.delete_by_id(created.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn orders_filtered_by_owner() {
        let store = MemoryStore::new();
        let item = OrderItem {
            product_id: 1,
            quantity: 1,
            price: Decimal::new(500, 2),
        };
        for owner_id in [1, 2, 1] {
            store
                .create_order(NewOrder {
                    owner_id,
                    items: vec![item.clone()],
                    total_amount: item.price,
                })
                .await
                .unwrap();
        }

        let orders = store.orders_by_owner(1).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert!(orders[0].id < orders[1].id);
        assert!(orders.iter().all(|order| order.owner_id == 1));
    }

    #[tokio::test]
    async fn products_listed_in_id_order() {
        let store = MemoryStore::new();
        for name in ["Laptop", "Mouse", "Keyboard"] {
            store
                .create_product(NewProduct {
                    name: name.to_string(),
                    description: None,
                    price: Decimal::new(1000, 2),
                })
                .await
                .unwrap();
        }

        let products = store.products().await.unwrap();
        let names: Vec<&str> = products.iter().map(|product| product.name.as_str()).collect();
        assert_eq!(names, vec!["Laptop", "Mouse", "Keyboard"]);
    }
}
