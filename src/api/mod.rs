//! API handlers for the CASFOS REST endpoints

pub mod approvals;
pub mod assets;
pub mod faculty;
pub mod health;
pub mod openapi;
pub mod reports;
pub mod uploads;
pub mod users;

use axum::{
    async_trait,
    extract::{DefaultBodyLimit, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Multipart bodies carry the file plus a few small text fields
    let upload_limit = DefaultBodyLimit::max(state.config.uploads.max_size_bytes + 64 * 1024);

    let assets = Router::new()
        // Entry
        .route("/storeTempAsset", post(assets::store_temp_asset))
        .route("/storeTempIssue", post(assets::store_temp_issue))
        .route("/storeTempService", post(assets::store_temp_service))
        .route("/storeTempMaintenance", post(assets::store_temp_maintenance))
        .route("/storeTempDisposal", post(assets::store_temp_disposal))
        .route("/storeTempBuildingDisposal", post(assets::store_temp_building_disposal))
        .route("/saveReturnedStatus", post(assets::save_returned_status))
        .route("/addBuildingUpgrades", post(assets::add_building_upgrades))
        // Lookups
        .route("/categories", get(assets::categories))
        .route("/getStoreItems", get(assets::get_store_items))
        .route("/getStoreItemDetails", get(assets::get_store_item_details))
        .route("/getServicableItems", get(assets::get_servicable_items))
        .route("/getAvailableDisposableQuantity", get(assets::get_available_disposable_quantity))
        .route("/getStoreItemsForReturn", get(assets::get_store_items_for_return))
        .route("/getReturnedAssets", get(assets::get_returned_assets))
        .route("/getBuildingUpgrades", get(assets::get_building_upgrades))
        // Files
        .route(
            "/uploadFile",
            post(uploads::upload_file).layer(upload_limit.clone()),
        )
        .route(
            "/uploadSignedReturnedReceipt",
            post(uploads::upload_signed_returned_receipt).layer(upload_limit),
        )
        .route("/storeReturnedReceipt", post(uploads::store_returned_receipt))
        // Workflow
        .route("/pending", get(approvals::list_pending))
        .route("/records/:id", get(approvals::get_record))
        .route("/records/:id/approve", post(approvals::approve_record))
        .route("/records/:id/reject", post(approvals::reject_record))
        .route("/rejected", get(approvals::list_rejected))
        .route("/rejected/:id", get(approvals::get_rejected))
        .route("/rejected/:id/resubmit", post(approvals::resubmit_rejected))
        // Reports
        .route("/filterPurchase", post(reports::filter_purchase))
        .route("/filterStoreIssue", post(reports::filter_store_issue))
        .route("/filterServiceReturn", post(reports::filter_service_return))
        .route("/filterDisposal", post(reports::filter_disposal))
        .route("/filterDeadStock", post(reports::filter_dead_stock))
        .route("/updateDeadStockQuantities", post(reports::update_dead_stock_quantities))
        .route("/export/:tab", post(reports::export));

    let api = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Users
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        .route("/users/me", get(users::me))
        .route("/users/registrations", get(users::list_registrations))
        .route("/users/:id/approve", post(users::approve_user))
        .route("/users/:id/reject", post(users::reject_user))
        // Faculty
        .route("/faculty", get(faculty::list_faculty).post(faculty::create_faculty))
        .route("/faculty/:id", get(faculty::get_faculty).put(faculty::update_faculty))
        .route("/faculty/:id/approve", post(faculty::approve_faculty))
        .route("/faculty/:id/reject", post(faculty::reject_faculty))
        .nest("/assets", assets);

    let uploads_dir = ServeDir::new(&state.config.uploads.dir);
    let uploads_prefix = state.config.uploads.public_prefix.trim_end_matches('/').to_string();

    Router::new()
        .nest("/api", api)
        .nest_service(&uploads_prefix, uploads_dir)
        .with_state(state)
        .merge(openapi::create_openapi_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
