//! Role and ownership checks.
//!
//! Two orthogonal authorization predicates, composed by the business
//! operation rather than baked into the authenticator. Both are pure
//! functions over already-resolved data and perform no I/O; denial comes
//! back as a value, so callers must handle it explicitly.
//!
//! An absent principal is denied by both checks (401); a present
//! principal failing the predicate is denied as forbidden (403). The two
//! outcomes are deliberately distinct: "who are you" failures and "you
//! may not do this" failures map to different responses.

use crate::api::models::users::{Principal, Role};
use crate::errors::Error;
use crate::types::{Action, UserId};

/// A resource carrying an owner reference.
pub trait Owned {
    fn owner_id(&self) -> UserId;
}

/// Require the principal to hold `role`.
///
/// `action` and `resource` only feed the denial message.
pub fn require_role<'a>(
    principal: Option<&'a Principal>,
    role: Role,
    action: Action,
    resource: &str,
) -> Result<&'a Principal, Error> {
    let principal = principal.ok_or(Error::Unauthenticated { message: None })?;
    if principal.role != role {
        return Err(Error::Forbidden {
            action,
            resource: resource.to_string(),
        });
    }
    Ok(principal)
}

/// Require the principal to own `resource`.
pub fn require_owner<'a, R: Owned>(
    principal: Option<&'a Principal>,
    resource: &R,
    action: Action,
    resource_name: &str,
) -> Result<&'a Principal, Error> {
    let principal = principal.ok_or(Error::Unauthenticated { message: None })?;
    if resource.owner_id() != principal.id {
        return Err(Error::Forbidden {
            action,
            resource: resource_name.to_string(),
        });
    }
    Ok(principal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn principal(id: UserId, role: Role) -> Principal {
        Principal {
            id,
            email: format!("user{id}@example.com"),
            role,
        }
    }

    struct Record {
        owner: UserId,
    }

    impl Owned for Record {
        fn owner_id(&self) -> UserId {
            self.owner
        }
    }

    #[test]
    fn role_check_approves_matching_role() {
        let admin = principal(1, Role::Admin);
        let granted = require_role(Some(&admin), Role::Admin, Action::Delete, "users").unwrap();
        assert_eq!(granted.id, 1);
    }

    #[test]
    fn role_check_denies_user_for_admin() {
        let user = principal(1, Role::User);
        let err = require_role(Some(&user), Role::Admin, Action::Delete, "users").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn role_check_denies_absent_principal() {
        let err = require_role(None, Role::Admin, Action::Delete, "users").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn role_check_reflects_reresolved_role() {
        // An admin whose role was changed externally: once the principal is
        // rebuilt from live data, the same check that approved now denies.
        let before = principal(1, Role::Admin);
        assert!(require_role(Some(&before), Role::Admin, Action::Delete, "users").is_ok());

        let after = Principal {
            role: Role::User,
            ..before
        };
        assert!(require_role(Some(&after), Role::Admin, Action::Delete, "users").is_err());
    }

    #[test]
    fn ownership_check_approves_owner() {
        let owner = principal(1, Role::User);
        let record = Record { owner: 1 };
        assert!(require_owner(Some(&owner), &record, Action::Read, "order 1").is_ok());
    }

    #[test]
    fn ownership_check_denies_foreign_resource() {
        let intruder = principal(1, Role::User);
        let record = Record { owner: 2 };
        let err = require_owner(Some(&intruder), &record, Action::Read, "order 1").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn ownership_check_denies_absent_principal() {
        let record = Record { owner: 2 };
        let err = require_owner(None, &record, Action::Read, "order 1").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }
}
