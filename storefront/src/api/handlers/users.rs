use axum::{Json, extract::State};

use crate::{
    AppState,
    api::models::users::{Principal, UserResponse},
    errors::Error,
    store::IdentityStore,
};

/// The authenticated account's own profile
#[utoipa::path(
    get,
    path = "/api/users/current",
    tag = "users",
    responses(
        (status = 200, description = "The caller's account", body = UserResponse),
        (status = 401, description = "Not authenticated"),
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_current_user(State(state): State<AppState>, principal: Principal) -> Result<Json<UserResponse>, Error> {
    // Resolved from the store rather than echoed from the principal, so
    // the response reflects the record as it is right now.
    let user = state
        .store
        .find_by_email(&principal.email)
        .await?
        .ok_or(Error::Unauthenticated { message: None })?;

    Ok(Json(user.into()))
}
