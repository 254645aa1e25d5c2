//! Session token issuing and validation.
//!
//! Tokens are self-contained signed claims (JWT, HS256): subject, role,
//! issue time, and expiry. Validity is derived purely from the signature
//! and the expiry at verification time; there is no server-side session
//! record and no revocation list. The trade-off is that deleting or
//! demoting an account does not invalidate tokens already in the wild,
//! which is why the request authenticator re-resolves the identity on
//! every request instead of trusting embedded claims.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

use crate::api::models::users::Role;
use crate::config::Config;
use crate::errors::Error;
use crate::store::models::User;

/// Why a token failed validation.
///
/// Kept distinct for logging; every variant collapses to the same
/// "unauthenticated" outcome at the HTTP edge.
#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("bad signature")]
    BadSignature,
    #[error("token expired")]
    Expired,
}

/// Signed token claims.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject: the account email
    pub sub: String,
    /// Role at issue time
    pub role: Role,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expires at (Unix seconds)
    pub exp: i64,
}

impl Claims {
    /// Whether the token subject equals an independently resolved
    /// identity's email.
    ///
    /// Guards against stale or foreign tokens whose subject no longer
    /// matches a freshly loaded record (e.g. a post-deletion race).
    pub fn matches_identity(&self, email: &str) -> bool {
        self.sub == email
    }
}

/// Issues and validates signed session tokens.
///
/// Holds the signing keys and the configured TTL; read-only after startup
/// and safe to share across unlimited concurrent requests.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    /// Build the service from configuration.
    ///
    /// A missing or empty `secret_key` is a startup-time failure; tokens
    /// are never issued or validated with a default key.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let secret = config
            .secret_key
            .as_deref()
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| Error::Internal {
                operation: "load token signing secret: secret_key is required".to_string(),
            })?;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: config.auth.token_ttl,
        })
    }

    /// Issue a token for the given account, valid for the configured TTL.
    pub fn issue(&self, user: &User) -> Result<String, Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|e| Error::Internal {
            operation: format!("sign token: {e}"),
        })
    }

    /// Verify signature and expiry, returning the extracted claims.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0; // a token is valid only while now < exp

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed,
            })
    }
}
