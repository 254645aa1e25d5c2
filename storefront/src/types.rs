//! Common type definitions.
//!
//! Entity identifiers are stable numeric handles wrapped in type aliases
//! for readability at call sites:
//!
//! - [`UserId`]: user account identifier
//! - [`OrderId`]: order identifier
//! - [`ProductId`]: product identifier

use std::fmt;

// Type aliases for IDs
pub type UserId = i64;
pub type OrderId = i64;
pub type ProductId = i64;

/// The action an authorization check is gating, used in denial messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Create => write!(f, "create"),
            Action::Read => write!(f, "read"),
            Action::Update => write!(f, "update"),
            Action::Delete => write!(f, "delete"),
        }
    }
}
