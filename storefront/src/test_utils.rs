//! Shared builders for unit and handler tests.

use std::sync::Arc;

use axum_test::TestServer;
use chrono::Utc;

use crate::api::models::users::Role;
use crate::auth::{password, token::TokenService};
use crate::config::Config;
use crate::store::IdentityStore;
use crate::store::memory::MemoryStore;
use crate::store::models::{NewUser, User};
use crate::types::UserId;
use crate::{AppState, build_router};

pub fn create_test_config() -> Config {
    Config {
        secret_key: Some("test-secret-key-for-tokens".to_string()),
        ..Config::default()
    }
}

pub fn create_test_state_with_config(config: Config) -> AppState {
    let tokens = TokenService::from_config(&config).expect("test config must carry a secret");
    AppState::builder()
        .store(Arc::new(MemoryStore::new()))
        .config(config)
        .tokens(tokens)
        .build()
}

pub fn create_test_state() -> AppState {
    create_test_state_with_config(create_test_config())
}

pub fn create_test_server(state: AppState) -> TestServer {
    TestServer::new(build_router(state)).expect("Failed to create test server")
}

/// Persist a user with the given credentials.
pub async fn seed_user(identities: &dyn IdentityStore, email: &str, password_text: &str, role: Role) -> User {
    identities
        .save(NewUser {
            name: email.split('@').next().unwrap_or("user").to_string(),
            email: email.to_string(),
            password_hash: password::hash(password_text).expect("hash test password"),
            role,
        })
        .await
        .expect("seed test user")
}

/// A user value that is not persisted anywhere.
pub fn test_user(id: UserId, email: &str, role: Role) -> User {
    User {
        id,
        name: "Test User".to_string(),
        email: email.to_string(),
        password_hash: "$argon2id$unused".to_string(),
        role,
        created_at: Utc::now(),
    }
}
