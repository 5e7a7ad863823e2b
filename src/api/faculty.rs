//! Faculty register endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        faculty::{Faculty, FacultyInput, FacultyQuery},
        record::RejectRequest,
    },
    AppState,
};

use super::AuthenticatedUser;

/// Submit a faculty record for verification
#[utoipa::path(
    post,
    path = "/faculty",
    tag = "faculty",
    security(("bearer_auth" = [])),
    request_body = FacultyInput,
    responses(
        (status = 201, description = "Faculty record pending verification", body = Faculty),
        (status = 400, description = "Validation errors", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_faculty(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(input): Json<FacultyInput>,
) -> AppResult<(StatusCode, Json<Faculty>)> {
    claims.require_faculty_entry()?;
    let faculty = state.services.faculty.create(&input, &claims.sub).await?;
    Ok((StatusCode::CREATED, Json(faculty)))
}

/// Search faculty records
#[utoipa::path(
    get,
    path = "/faculty",
    tag = "faculty",
    security(("bearer_auth" = [])),
    params(FacultyQuery),
    responses(
        (status = 200, description = "Faculty records", body = Vec<Faculty>)
    )
)]
pub async fn list_faculty(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<FacultyQuery>,
) -> AppResult<Json<Vec<Faculty>>> {
    claims.require_faculty_view()?;
    Ok(Json(state.services.faculty.list(&query).await?))
}

#[utoipa::path(
    get,
    path = "/faculty/{id}",
    tag = "faculty",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Faculty ID")
    ),
    responses(
        (status = 200, description = "Faculty record", body = Faculty),
        (status = 404, description = "Faculty not found")
    )
)]
pub async fn get_faculty(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Faculty>> {
    claims.require_faculty_view()?;
    Ok(Json(state.services.faculty.get_by_id(id).await?))
}

/// Edit a faculty record; it goes back to pending verification
#[utoipa::path(
    put,
    path = "/faculty/{id}",
    tag = "faculty",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Faculty ID")
    ),
    request_body = FacultyInput,
    responses(
        (status = 200, description = "Faculty record updated", body = Faculty),
        (status = 400, description = "Validation errors", body = crate::error::ErrorResponse),
        (status = 404, description = "Faculty not found")
    )
)]
pub async fn update_faculty(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(input): Json<FacultyInput>,
) -> AppResult<Json<Faculty>> {
    claims.require_faculty_entry()?;
    Ok(Json(state.services.faculty.update(id, &input).await?))
}

#[utoipa::path(
    post,
    path = "/faculty/{id}/approve",
    tag = "faculty",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Faculty ID")
    ),
    responses(
        (status = 200, description = "Faculty record verified", body = Faculty),
        (status = 409, description = "Record is not pending", body = crate::error::ErrorResponse)
    )
)]
pub async fn approve_faculty(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Faculty>> {
    claims.require_faculty_approval()?;
    Ok(Json(state.services.faculty.approve(id, &claims.sub).await?))
}

#[utoipa::path(
    post,
    path = "/faculty/{id}/reject",
    tag = "faculty",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Faculty ID")
    ),
    request_body = RejectRequest,
    responses(
        (status = 200, description = "Faculty record rejected", body = Faculty),
        (status = 400, description = "Remark missing", body = crate::error::ErrorResponse),
        (status = 409, description = "Record is not pending", body = crate::error::ErrorResponse)
    )
)]
pub async fn reject_faculty(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(request): Json<RejectRequest>,
) -> AppResult<Json<Faculty>> {
    claims.require_faculty_approval()?;
    request.validate()?;
    Ok(Json(
        state
            .services
            .faculty
            .reject(id, &request.remark, &claims.sub)
            .await?,
    ))
}
