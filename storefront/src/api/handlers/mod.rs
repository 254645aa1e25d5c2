//! HTTP request handlers.
//!
//! Each handler validates its input, consults the authorization checks it
//! needs, runs the business operation against the store, and serializes
//! the response. Handlers return [`crate::errors::Error`], which converts
//! to the appropriate HTTP status automatically.
//!
//! - [`auth`]: registration, login, and account removal
//! - [`orders`]: placing and reading orders
//! - [`products`]: the product catalogue
//! - [`users`]: account profiles

pub mod auth;
pub mod orders;
pub mod products;
pub mod users;
