//! Asset record approval workflow endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        record::{
            AssetRecordView, CreatedRecord, RecordQuery, RejectRequest, RejectedRecordView,
            ResubmitQuery,
        },
    },
    AppState,
};

use super::AuthenticatedUser;

/// Records waiting for approval
#[utoipa::path(
    get,
    path = "/assets/pending",
    tag = "approvals",
    security(("bearer_auth" = [])),
    params(RecordQuery),
    responses(
        (status = 200, description = "Pending records", body = Vec<AssetRecordView>),
        (status = 403, description = "Not an asset manager")
    )
)]
pub async fn list_pending(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<RecordQuery>,
) -> AppResult<Json<Vec<AssetRecordView>>> {
    claims.require_asset_approval()?;
    let records = state
        .services
        .approvals
        .pending(&claims, query.kind, query.asset_type)
        .await?;
    let views = records.iter().map(AssetRecordView::try_from).collect::<AppResult<_>>()?;
    Ok(Json(views))
}

/// One asset record
#[utoipa::path(
    get,
    path = "/assets/records/{id}",
    tag = "approvals",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Record ID")
    ),
    responses(
        (status = 200, description = "Record", body = AssetRecordView),
        (status = 404, description = "Record not found")
    )
)]
pub async fn get_record(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<AssetRecordView>> {
    claims.require_asset_reports()?;
    let record = state.services.approvals.get(id).await?;
    claims.require_asset_type(record.payload.asset_type())?;
    Ok(Json(AssetRecordView::try_from(&record)?))
}

/// Approve a pending record and apply it to the stock ledger
#[utoipa::path(
    post,
    path = "/assets/records/{id}/approve",
    tag = "approvals",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Record ID")
    ),
    responses(
        (status = 200, description = "Record approved", body = AssetRecordView),
        (status = 409, description = "Record is not pending", body = crate::error::ErrorResponse),
        (status = 422, description = "Insufficient stock", body = crate::error::ErrorResponse)
    )
)]
pub async fn approve_record(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<AssetRecordView>> {
    claims.require_asset_approval()?;
    Ok(Json(state.services.approvals.approve(id, &claims).await?))
}

/// Reject a pending record with a remark
#[utoipa::path(
    post,
    path = "/assets/records/{id}/reject",
    tag = "approvals",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Record ID")
    ),
    request_body = RejectRequest,
    responses(
        (status = 200, description = "Record rejected", body = AssetRecordView),
        (status = 400, description = "Remark missing", body = crate::error::ErrorResponse),
        (status = 409, description = "Record is not pending", body = crate::error::ErrorResponse)
    )
)]
pub async fn reject_record(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(request): Json<RejectRequest>,
) -> AppResult<Json<AssetRecordView>> {
    claims.require_asset_approval()?;
    request.validate()?;
    Ok(Json(state.services.approvals.reject(id, &request.remark, &claims).await?))
}

/// Rejected records available for correction
#[utoipa::path(
    get,
    path = "/assets/rejected",
    tag = "approvals",
    security(("bearer_auth" = [])),
    params(RecordQuery),
    responses(
        (status = 200, description = "Rejected records", body = Vec<AssetRecordView>)
    )
)]
pub async fn list_rejected(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<RecordQuery>,
) -> AppResult<Json<Vec<AssetRecordView>>> {
    claims.require_asset_entry()?;
    let scope = claims.asset_scope(query.asset_type)?;
    let records = state.services.assets.rejected(query.kind, scope.as_deref()).await?;
    let views = records.iter().map(AssetRecordView::try_from).collect::<AppResult<_>>()?;
    Ok(Json(views))
}

/// Rejected record with the entry form and tab that re-populate it
#[utoipa::path(
    get,
    path = "/assets/rejected/{id}",
    tag = "approvals",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Record ID")
    ),
    responses(
        (status = 200, description = "Classified rejected record", body = RejectedRecordView),
        (status = 403, description = "No access to the record's asset type"),
        (status = 404, description = "Record not found")
    )
)]
pub async fn get_rejected(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<RejectedRecordView>> {
    claims.require_asset_entry()?;
    Ok(Json(state.services.assets.rejected_view(id, &claims).await?))
}

/// Replace a rejected record by its corrected version
#[utoipa::path(
    post,
    path = "/assets/rejected/{id}/resubmit",
    tag = "approvals",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Rejected record ID"),
        ResubmitQuery
    ),
    request_body(content = Value, description = "Corrected record document"),
    responses(
        (status = 201, description = "Record pending approval again", body = CreatedRecord),
        (status = 400, description = "Validation errors", body = crate::error::ErrorResponse),
        (status = 403, description = "No access to the record's asset type"),
        (status = 409, description = "Record is not rejected", body = crate::error::ErrorResponse)
    )
)]
pub async fn resubmit_rejected(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Query(query): Query<ResubmitQuery>,
    Json(document): Json<Value>,
) -> AppResult<(StatusCode, Json<CreatedRecord>)> {
    claims.require_asset_entry()?;
    let created = state
        .services
        .assets
        .resubmit(id, query.form, document, &claims)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}
