//! Registration, login and account approval endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        record::RejectRequest,
        user::{ApproveUser, LoginRequest, LoginResponse, RegisterUser, User},
    },
    AppState,
};

use super::AuthenticatedUser;

/// Register a new account (pending administrator approval)
#[utoipa::path(
    post,
    path = "/users/register",
    tag = "users",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "Registration received", body = User),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "Username already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(data): Json<RegisterUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    data.validate()?;
    let user = state.services.users.register(&data).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Login with username and password
#[utoipa::path(
    post,
    path = "/users/login",
    tag = "users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials or account not approved", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = state
        .services
        .users
        .authenticate(&request.username, &request.password)
        .await?;
    Ok(Json(response))
}

/// Current user's account
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<User>> {
    let user = state.services.users.get_by_id(claims.user_id).await?;
    Ok(Json(user))
}

/// Registrations awaiting approval
#[utoipa::path(
    get,
    path = "/users/registrations",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Pending registrations", body = Vec<User>),
        (status = 403, description = "Administrator only")
    )
)]
pub async fn list_registrations(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<User>>> {
    claims.require_admin()?;
    let users = state.services.users.registrations().await?;
    Ok(Json(users))
}

/// Approve a registration, granting asset type access
#[utoipa::path(
    post,
    path = "/users/{id}/approve",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    request_body = ApproveUser,
    responses(
        (status = 200, description = "Registration approved", body = User),
        (status = 400, description = "Missing access grant", body = crate::error::ErrorResponse),
        (status = 409, description = "Registration already decided", body = crate::error::ErrorResponse)
    )
)]
pub async fn approve_user(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(grant): Json<ApproveUser>,
) -> AppResult<Json<User>> {
    claims.require_admin()?;
    let user = state.services.users.approve(id, &grant.access).await?;
    Ok(Json(user))
}

/// Reject a registration with a remark
#[utoipa::path(
    post,
    path = "/users/{id}/reject",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    request_body = RejectRequest,
    responses(
        (status = 200, description = "Registration rejected", body = User),
        (status = 400, description = "Remark missing", body = crate::error::ErrorResponse)
    )
)]
pub async fn reject_user(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(request): Json<RejectRequest>,
) -> AppResult<Json<User>> {
    claims.require_admin()?;
    let user = state.services.users.reject(id, &request.remark).await?;
    Ok(Json(user))
}
