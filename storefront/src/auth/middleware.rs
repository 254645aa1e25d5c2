//! Request authentication.
//!
//! A per-request interceptor with two outcomes: the request gains an
//! authenticated [`Principal`], or it stays anonymous. It never rejects a
//! request itself; whether anonymous access is acceptable is decided
//! downstream by [`crate::auth::permissions`].
//!
//! The algorithm, per request:
//!
//! 1. Read the `Authorization` header. Absent, or not a `Bearer` value,
//!    means anonymous.
//! 2. Validate the token (signature + expiry) via
//!    [`TokenService::validate`].
//! 3. Re-resolve the identity by the token subject. This is a defensive
//!    lookup, not a trust-the-token shortcut: deleted accounts stop
//!    authenticating immediately, even with an unexpired token.
//! 4. Confirm the claims still describe that identity: subject must match
//!    the record's email, and the embedded role must match the record's
//!    current role. Live data wins; a token claiming a role the account
//!    no longer holds is rejected rather than honored.
//! 5. Attach the principal, built from the live record, to the request.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use thiserror::Error as ThisError;
use tracing::{debug, warn};

use super::token::{TokenError, TokenService};
use crate::AppState;
use crate::api::models::users::Principal;
use crate::store::IdentityStore;
use crate::store::errors::StoreError;

/// Why a presented credential was rejected. Logged server-side only;
/// clients always see plain "unauthenticated" downstream.
#[derive(Debug, ThisError)]
enum Rejection {
    #[error("credential is not a bearer token")]
    InvalidCredentialFormat,
    #[error("token rejected: {0}")]
    Token(#[from] TokenError),
    #[error("token subject does not resolve to a known identity")]
    UnknownSubject,
    #[error("token subject does not match the resolved identity")]
    SubjectMismatch,
    #[error("token role does not match the identity's current role")]
    RoleMismatch,
    #[error("identity lookup failed: {0}")]
    Store(#[from] StoreError),
}

/// The per-request hook: given the raw `Authorization` header value,
/// produce the authenticated principal, or `None` for anonymous requests.
pub async fn authenticate(header: Option<&str>, tokens: &TokenService, identities: &dyn IdentityStore) -> Option<Principal> {
    let header = header?;
    match resolve_principal(header, tokens, identities).await {
        Ok(principal) => Some(principal),
        Err(rejection @ Rejection::Store(_)) => {
            warn!("bearer authentication failed: {rejection}");
            None
        }
        Err(rejection) => {
            debug!("bearer authentication rejected: {rejection}");
            None
        }
    }
}

async fn resolve_principal(header: &str, tokens: &TokenService, identities: &dyn IdentityStore) -> Result<Principal, Rejection> {
    let token = header.strip_prefix("Bearer ").ok_or(Rejection::InvalidCredentialFormat)?;
    let claims = tokens.validate(token)?;

    let identity = identities.find_by_email(&claims.sub).await?.ok_or(Rejection::UnknownSubject)?;
    if !claims.matches_identity(&identity.email) {
        return Err(Rejection::SubjectMismatch);
    }
    if claims.role != identity.role {
        return Err(Rejection::RoleMismatch);
    }

    Ok(Principal {
        id: identity.id,
        email: identity.email,
        role: identity.role,
    })
}

/// Middleware that attaches the authenticated principal to the request
/// extensions and forwards the request either way.
pub async fn attach_principal(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if let Some(principal) = authenticate(header, &state.tokens, state.store.as_ref()).await {
        debug!(user_id = principal.id, "request authenticated");
        request.extensions_mut().insert(principal);
    }

    next.run(request).await
}
