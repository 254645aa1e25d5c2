use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::info;

use crate::{
    AppState,
    api::models::{
        auth::{AuthResponse, DeleteAccountRequest, LoginRequest, RegisterRequest},
        users::{Principal, Role},
    },
    auth::{password, permissions},
    errors::Error,
    store::{IdentityStore, models::NewUser},
    types::{Action, UserId},
};

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    tag = "auth",
    responses(
        (status = 201, description = "Account registered", body = AuthResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn register(State(state): State<AppState>, Json(request): Json<RegisterRequest>) -> Result<(StatusCode, Json<AuthResponse>), Error> {
    if !state.config.auth.allow_registration {
        return Err(Error::BadRequest {
            message: "Registration is disabled".to_string(),
        });
    }

    if !request.email.contains('@') {
        return Err(Error::BadRequest {
            message: "Invalid email format".to_string(),
        });
    }

    let rules = &state.config.auth.password;
    if request.password.len() < rules.min_length {
        return Err(Error::BadRequest {
            message: format!("Password must be at least {} characters", rules.min_length),
        });
    }
    if request.password.len() > rules.max_length {
        return Err(Error::BadRequest {
            message: format!("Password must be no more than {} characters", rules.max_length),
        });
    }

    if state.store.find_by_email(&request.email).await?.is_some() {
        return Err(Error::Conflict {
            message: "An account with this email address already exists".to_string(),
        });
    }

    // Hash on a blocking thread; key derivation is deliberately slow
    let password = request.password;
    let password_hash = tokio::task::spawn_blocking(move || password::hash(&password))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password hashing task: {e}"),
        })??;

    let user = state
        .store
        .save(NewUser {
            name: request.name,
            email: request.email,
            password_hash,
            role: Role::User,
        })
        .await?;
    info!(user_id = user.id, "user registered");

    let token = state.tokens.issue(&user)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            name: user.name,
            role: user.role,
        }),
    ))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    tag = "auth",
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Result<Json<AuthResponse>, Error> {
    // A single message for unknown email and wrong password; the split
    // would let callers enumerate accounts.
    let user = state
        .store
        .find_by_email(&request.email)
        .await?
        .ok_or_else(|| Error::Unauthenticated {
            message: Some("Invalid email or password".to_string()),
        })?;

    let password = request.password;
    let digest = user.password_hash.clone();
    let is_valid = tokio::task::spawn_blocking(move || password::matches(&password, &digest))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password verification task: {e}"),
        })??;

    if !is_valid {
        return Err(Error::Unauthenticated {
            message: Some("Invalid email or password".to_string()),
        });
    }
    info!(user_id = user.id, "login successful");

    let token = state.tokens.issue(&user)?;

    Ok(Json(AuthResponse {
        token,
        name: user.name,
        role: user.role,
    }))
}

/// Delete one's own account, confirmed by password
#[utoipa::path(
    delete,
    path = "/api/auth/delete",
    request_body = DeleteAccountRequest,
    tag = "auth",
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Not authenticated or wrong password"),
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_account(
    State(state): State<AppState>,
    principal: Principal,
    Json(request): Json<DeleteAccountRequest>,
) -> Result<StatusCode, Error> {
    // The password check must run against the current record, not against
    // whatever the token was minted from.
    let user = state
        .store
        .find_by_email(&principal.email)
        .await?
        .ok_or(Error::Unauthenticated { message: None })?;

    let password = request.password;
    let digest = user.password_hash.clone();
    let confirmed = tokio::task::spawn_blocking(move || password::matches(&password, &digest))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password verification task: {e}"),
        })??;

    if !confirmed {
        return Err(Error::Unauthenticated {
            message: Some("Invalid password confirmation".to_string()),
        });
    }

    state.store.delete_by_id(user.id).await?;
    info!(user_id = user.id, "account deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Delete any account by ID (admin only)
#[utoipa::path(
    delete,
    path = "/api/auth/delete/{id}",
    tag = "auth",
    params(("id" = i64, Path, description = "ID of the account to delete")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "No such account"),
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_user(
    State(state): State<AppState>,
    principal: Option<Principal>,
    Path(id): Path<UserId>,
) -> Result<StatusCode, Error> {
    let admin = permissions::require_role(principal.as_ref(), Role::Admin, Action::Delete, "users")?;

    if !state.store.exists_by_id(id).await? {
        return Err(Error::NotFound {
            resource: "User",
            id: id.to_string(),
        });
    }

    state.store.delete_by_id(id).await?;
    info!(user_id = id, admin_id = admin.id, "account deleted by admin");

    Ok(StatusCode::NO_CONTENT)
}
