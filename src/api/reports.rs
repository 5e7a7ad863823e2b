//! Report filter, dead-stock update and CSV export endpoints

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

use crate::{
    domain::{export::ExportRequest, FilterPayload, FilterTab},
    error::{AppError, AppResult},
    models::{
        stock::{DeadStockItem, DeadStockQuantityUpdate},
        UserClaims,
    },
    AppState,
};

use super::AuthenticatedUser;

async fn filter(
    state: &AppState,
    claims: &UserClaims,
    tab: FilterTab,
    filters: &FilterPayload,
) -> AppResult<Json<Vec<Value>>> {
    claims.require_asset_reports()?;
    if let Some(asset_type) = filters.asset_type {
        claims.require_asset_type(asset_type)?;
    }
    Ok(Json(state.services.reports.filter(tab, filters).await?))
}

/// Purchase report, one row per purchased item
#[utoipa::path(
    post,
    path = "/assets/filterPurchase",
    tag = "reports",
    security(("bearer_auth" = [])),
    request_body = FilterPayload,
    responses(
        (status = 200, description = "Matching rows", body = Vec<Value>)
    )
)]
pub async fn filter_purchase(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(filters): Json<FilterPayload>,
) -> AppResult<Json<Vec<Value>>> {
    filter(&state, &claims, FilterTab::Purchase, &filters).await
}

/// Store and issue report: in-store quantities and issued quantities per location
#[utoipa::path(
    post,
    path = "/assets/filterStoreIssue",
    tag = "reports",
    security(("bearer_auth" = [])),
    request_body = FilterPayload,
    responses(
        (status = 200, description = "Matching rows", body = Vec<Value>)
    )
)]
pub async fn filter_store_issue(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(filters): Json<FilterPayload>,
) -> AppResult<Json<Vec<Value>>> {
    filter(&state, &claims, FilterTab::StoreIssue, &filters).await
}

/// Service and return report
#[utoipa::path(
    post,
    path = "/assets/filterServiceReturn",
    tag = "reports",
    security(("bearer_auth" = [])),
    request_body = FilterPayload,
    responses(
        (status = 200, description = "Matching rows", body = Vec<Value>)
    )
)]
pub async fn filter_service_return(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(filters): Json<FilterPayload>,
) -> AppResult<Json<Vec<Value>>> {
    filter(&state, &claims, FilterTab::ServiceReturn, &filters).await
}

/// Item and building disposal report
#[utoipa::path(
    post,
    path = "/assets/filterDisposal",
    tag = "reports",
    security(("bearer_auth" = [])),
    request_body = FilterPayload,
    responses(
        (status = 200, description = "Matching rows", body = Vec<Value>)
    )
)]
pub async fn filter_disposal(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(filters): Json<FilterPayload>,
) -> AppResult<Json<Vec<Value>>> {
    filter(&state, &claims, FilterTab::Disposal, &filters).await
}

/// Dead stock register
#[utoipa::path(
    post,
    path = "/assets/filterDeadStock",
    tag = "reports",
    security(("bearer_auth" = [])),
    request_body = FilterPayload,
    responses(
        (status = 200, description = "Matching rows", body = Vec<Value>)
    )
)]
pub async fn filter_dead_stock(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(filters): Json<FilterPayload>,
) -> AppResult<Json<Vec<Value>>> {
    filter(&state, &claims, FilterTab::DeadStock, &filters).await
}

/// Record servicable and condemned quantities of dead stock rows
#[utoipa::path(
    post,
    path = "/assets/updateDeadStockQuantities",
    tag = "reports",
    security(("bearer_auth" = [])),
    request_body = Vec<DeadStockQuantityUpdate>,
    responses(
        (status = 200, description = "Updated rows", body = Vec<DeadStockItem>),
        (status = 400, description = "Quantities exceed the overall quantity", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_dead_stock_quantities(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(updates): Json<Vec<DeadStockQuantityUpdate>>,
) -> AppResult<Json<Vec<DeadStockItem>>> {
    claims.require_asset_approval()?;
    Ok(Json(state.services.reports.update_dead_stock(&updates).await?))
}

/// Filtered, sorted report tab as CSV
#[utoipa::path(
    post,
    path = "/assets/export/{tab}",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(
        ("tab" = String, Path, description = "Report tab, e.g. filterPurchase or purchase")
    ),
    request_body = ExportRequest,
    responses(
        (status = 200, description = "CSV document", content_type = "text/csv", body = String),
        (status = 400, description = "Unknown report", body = crate::error::ErrorResponse)
    )
)]
pub async fn export(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(tab): Path<String>,
    Json(request): Json<ExportRequest>,
) -> AppResult<impl IntoResponse> {
    claims.require_asset_reports()?;
    let tab: FilterTab = tab.parse().map_err(AppError::BadRequest)?;
    if let Some(asset_type) = request.filters.asset_type {
        claims.require_asset_type(asset_type)?;
    }

    let csv = state.services.reports.export(tab, &request).await?;
    let disposition = format!(
        "attachment; filename=\"{}.csv\"",
        tab.endpoint().trim_start_matches("filter").to_lowercase()
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}
