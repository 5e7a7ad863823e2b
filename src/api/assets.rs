//! Asset entry and stock lookup endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppResult,
    models::{
        enums::{AssetType, OTHERS},
        record::{CreatedRecord, RecordPayload},
        returned::{ReturnedAssetRow, ReturnedAssetsQuery},
        stock::{AvailableQuantity, IssuedItem, ReturnedItem, StockQuery, StoreItem},
        upgrade::{BuildingUpgradesQuery, Upgrade},
        BuildingDisposal, BuildingUpgradeEntry, IssueEntry, ItemDisposal, MaintenanceEntry,
        ReturnEntry, ServiceEntry, StoreEntry, UserClaims,
    },
    AppState,
};

use super::AuthenticatedUser;

async fn submit(
    state: &AppState,
    claims: &UserClaims,
    payload: RecordPayload,
) -> AppResult<(StatusCode, Json<CreatedRecord>)> {
    claims.require_asset_entry()?;
    claims.require_asset_type(payload.asset_type())?;
    let created = state.services.assets.submit(payload, &claims.sub).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Record a purchase (items, building or land)
#[utoipa::path(
    post,
    path = "/assets/storeTempAsset",
    tag = "assets",
    security(("bearer_auth" = [])),
    request_body = StoreEntry,
    responses(
        (status = 201, description = "Record pending approval", body = CreatedRecord),
        (status = 400, description = "Validation errors", body = crate::error::ErrorResponse),
        (status = 409, description = "Item IDs already recorded", body = crate::error::ErrorResponse)
    )
)]
pub async fn store_temp_asset(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(entry): Json<StoreEntry>,
) -> AppResult<(StatusCode, Json<CreatedRecord>)> {
    submit(&state, &claims, RecordPayload::Store(entry)).await
}

/// Record an issue from store to a location
#[utoipa::path(
    post,
    path = "/assets/storeTempIssue",
    tag = "assets",
    security(("bearer_auth" = [])),
    request_body = IssueEntry,
    responses(
        (status = 201, description = "Record pending approval", body = CreatedRecord),
        (status = 400, description = "Validation errors", body = crate::error::ErrorResponse)
    )
)]
pub async fn store_temp_issue(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(entry): Json<IssueEntry>,
) -> AppResult<(StatusCode, Json<CreatedRecord>)> {
    submit(&state, &claims, RecordPayload::Issue(entry)).await
}

/// Record servicing of returned items
#[utoipa::path(
    post,
    path = "/assets/storeTempService",
    tag = "assets",
    security(("bearer_auth" = [])),
    request_body = ServiceEntry,
    responses(
        (status = 201, description = "Record pending approval", body = CreatedRecord),
        (status = 400, description = "Validation errors", body = crate::error::ErrorResponse)
    )
)]
pub async fn store_temp_service(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(entry): Json<ServiceEntry>,
) -> AppResult<(StatusCode, Json<CreatedRecord>)> {
    submit(&state, &claims, RecordPayload::Service(entry)).await
}

/// Record building maintenance
#[utoipa::path(
    post,
    path = "/assets/storeTempMaintenance",
    tag = "assets",
    security(("bearer_auth" = [])),
    request_body = MaintenanceEntry,
    responses(
        (status = 201, description = "Record pending approval", body = CreatedRecord),
        (status = 400, description = "Validation errors", body = crate::error::ErrorResponse)
    )
)]
pub async fn store_temp_maintenance(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(entry): Json<MaintenanceEntry>,
) -> AppResult<(StatusCode, Json<CreatedRecord>)> {
    submit(&state, &claims, RecordPayload::Maintenance(entry)).await
}

/// Record disposal of items marked for disposal
#[utoipa::path(
    post,
    path = "/assets/storeTempDisposal",
    tag = "assets",
    security(("bearer_auth" = [])),
    request_body = ItemDisposal,
    responses(
        (status = 201, description = "Record pending approval", body = CreatedRecord),
        (status = 400, description = "Validation errors", body = crate::error::ErrorResponse)
    )
)]
pub async fn store_temp_disposal(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(entry): Json<ItemDisposal>,
) -> AppResult<(StatusCode, Json<CreatedRecord>)> {
    submit(&state, &claims, RecordPayload::ItemDisposal(entry)).await
}

/// Record condemnation of a building
#[utoipa::path(
    post,
    path = "/assets/storeTempBuildingDisposal",
    tag = "assets",
    security(("bearer_auth" = [])),
    request_body = BuildingDisposal,
    responses(
        (status = 201, description = "Record pending approval", body = CreatedRecord),
        (status = 400, description = "Validation errors", body = crate::error::ErrorResponse)
    )
)]
pub async fn store_temp_building_disposal(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(entry): Json<BuildingDisposal>,
) -> AppResult<(StatusCode, Json<CreatedRecord>)> {
    submit(&state, &claims, RecordPayload::BuildingDisposal(entry)).await
}

/// Record a return from a location with the condition of the units
#[utoipa::path(
    post,
    path = "/assets/saveReturnedStatus",
    tag = "assets",
    security(("bearer_auth" = [])),
    request_body = ReturnEntry,
    responses(
        (status = 201, description = "Record pending approval", body = CreatedRecord),
        (status = 400, description = "Validation errors", body = crate::error::ErrorResponse)
    )
)]
pub async fn save_returned_status(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(entry): Json<ReturnEntry>,
) -> AppResult<(StatusCode, Json<CreatedRecord>)> {
    submit(&state, &claims, RecordPayload::Return(entry)).await
}

/// Record upgrades made to a building
#[utoipa::path(
    post,
    path = "/assets/addBuildingUpgrades",
    tag = "assets",
    security(("bearer_auth" = [])),
    request_body = BuildingUpgradeEntry,
    responses(
        (status = 201, description = "Record pending approval", body = CreatedRecord),
        (status = 400, description = "Validation errors", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_building_upgrades(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(entry): Json<BuildingUpgradeEntry>,
) -> AppResult<(StatusCode, Json<CreatedRecord>)> {
    submit(&state, &claims, RecordPayload::BuildingUpgrade(entry)).await
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesQuery {
    pub asset_type: AssetType,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesResponse {
    pub asset_type: AssetType,
    /// Selectable categories, ending with the "Others" entry
    pub categories: Vec<String>,
}

/// Categories offered by the entry forms for an asset type
#[utoipa::path(
    get,
    path = "/assets/categories",
    tag = "assets",
    security(("bearer_auth" = [])),
    params(CategoriesQuery),
    responses(
        (status = 200, description = "Category list", body = CategoriesResponse)
    )
)]
pub async fn categories(
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<CategoriesQuery>,
) -> Json<CategoriesResponse> {
    let categories = query
        .asset_type
        .categories()
        .iter()
        .copied()
        .chain(std::iter::once(OTHERS))
        .map(str::to_string)
        .collect();
    Json(CategoriesResponse {
        asset_type: query.asset_type,
        categories,
    })
}

/// Items currently held in store
#[utoipa::path(
    get,
    path = "/assets/getStoreItems",
    tag = "assets",
    security(("bearer_auth" = [])),
    params(StockQuery),
    responses(
        (status = 200, description = "Store items", body = Vec<StoreItem>)
    )
)]
pub async fn get_store_items(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<StockQuery>,
) -> AppResult<Json<Vec<StoreItem>>> {
    claims.require_asset_type(query.asset_type)?;
    Ok(Json(state.services.assets.store_items(&query).await?))
}

/// Units and identifiers available in store for one item
#[utoipa::path(
    get,
    path = "/assets/getStoreItemDetails",
    tag = "assets",
    security(("bearer_auth" = [])),
    params(StockQuery),
    responses(
        (status = 200, description = "Available quantity", body = AvailableQuantity),
        (status = 400, description = "Item not identified", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_store_item_details(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<StockQuery>,
) -> AppResult<Json<AvailableQuantity>> {
    claims.require_asset_type(query.asset_type)?;
    Ok(Json(state.services.assets.store_item_details(&query).await?))
}

/// Returned units waiting to be serviced
#[utoipa::path(
    get,
    path = "/assets/getServicableItems",
    tag = "assets",
    security(("bearer_auth" = [])),
    params(StockQuery),
    responses(
        (status = 200, description = "Servicable items", body = Vec<ReturnedItem>)
    )
)]
pub async fn get_servicable_items(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<StockQuery>,
) -> AppResult<Json<Vec<ReturnedItem>>> {
    claims.require_asset_type(query.asset_type)?;
    Ok(Json(state.services.assets.servicable_items(&query).await?))
}

/// Quantity and identifiers marked for disposal
#[utoipa::path(
    get,
    path = "/assets/getAvailableDisposableQuantity",
    tag = "assets",
    security(("bearer_auth" = [])),
    params(StockQuery),
    responses(
        (status = 200, description = "Disposable quantity", body = AvailableQuantity)
    )
)]
pub async fn get_available_disposable_quantity(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<StockQuery>,
) -> AppResult<Json<AvailableQuantity>> {
    claims.require_asset_type(query.asset_type)?;
    Ok(Json(state.services.assets.available_disposable_quantity(&query).await?))
}

/// Issued units at a location that can be returned
#[utoipa::path(
    get,
    path = "/assets/getStoreItemsForReturn",
    tag = "assets",
    security(("bearer_auth" = [])),
    params(StockQuery),
    responses(
        (status = 200, description = "Issued items at the location", body = Vec<IssuedItem>),
        (status = 400, description = "Location missing", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_store_items_for_return(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<StockQuery>,
) -> AppResult<Json<Vec<IssuedItem>>> {
    claims.require_asset_type(query.asset_type)?;
    Ok(Json(state.services.assets.store_items_for_return(&query).await?))
}

/// Saved returns plus issued rows still open for return
#[utoipa::path(
    get,
    path = "/assets/getReturnedAssets",
    tag = "assets",
    security(("bearer_auth" = [])),
    params(ReturnedAssetsQuery),
    responses(
        (status = 200, description = "Returned asset rows", body = Vec<ReturnedAssetRow>)
    )
)]
pub async fn get_returned_assets(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<ReturnedAssetsQuery>,
) -> AppResult<Json<Vec<ReturnedAssetRow>>> {
    claims.require_asset_type(query.asset_type)?;
    Ok(Json(state.services.assets.returned_assets(&query).await?))
}

/// Approved upgrades of a building
#[utoipa::path(
    get,
    path = "/assets/getBuildingUpgrades",
    tag = "assets",
    security(("bearer_auth" = [])),
    params(BuildingUpgradesQuery),
    responses(
        (status = 200, description = "Building upgrades", body = Vec<Upgrade>)
    )
)]
pub async fn get_building_upgrades(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<BuildingUpgradesQuery>,
) -> AppResult<Json<Vec<Upgrade>>> {
    Ok(Json(state.services.assets.building_upgrades(&query.sub_category).await?))
}
