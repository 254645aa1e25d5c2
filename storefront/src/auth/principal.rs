//! Extractors for the authenticated principal.
//!
//! Handlers declare `Principal` when the operation requires an identity
//! (absent principal rejects with 401 before the handler runs) or
//! `Option<Principal>` when the authorization guard decides. The value is
//! whatever [`crate::auth::middleware::attach_principal`] stored for this
//! request; there is no global security context to fall back on.

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;

use crate::AppState;
use crate::api::models::users::Principal;
use crate::errors::Error;

impl FromRequestParts<AppState> for Principal {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &AppState) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or(Error::Unauthenticated { message: None })
    }
}

impl OptionalFromRequestParts<AppState> for Principal {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &AppState) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Principal>().cloned())
    }
}
