//! Authentication and authorization.
//!
//! The layer is stateless by construction: identity travels in a signed,
//! self-contained bearer token, and every request rebuilds its principal
//! from that token plus a fresh identity lookup. Nothing is remembered
//! between requests and nothing is shared across them.
//!
//! # Flow
//!
//! An inbound request passes through [`middleware::attach_principal`],
//! which consults [`token::TokenService`] and the identity store and, on
//! success, attaches a request-scoped [`Principal`]. Handlers receive the
//! principal through the extractors in [`principal`] and gate their work
//! with the checks in [`permissions`]. Authentication failure never
//! rejects a request by itself - anonymous requests flow through and are
//! denied (or not) where authorization is enforced.
//!
//! # Modules
//!
//! - [`password`]: one-way salted password hashing (Argon2id)
//! - [`token`]: signed session token issuing and validation
//! - [`middleware`]: the per-request authenticator
//! - [`principal`]: extractors for the request-scoped principal
//! - [`permissions`]: role and ownership checks
//!
//! [`Principal`]: crate::api::models::users::Principal

pub mod middleware;
pub mod password;
pub mod permissions;
pub mod principal;
pub mod token;
