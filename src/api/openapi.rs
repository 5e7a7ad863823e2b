//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{approvals, assets, faculty, health, reports, uploads, users};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CASFOS API",
        version = "1.0.0",
        description = "Asset and Faculty Management REST API"
    ),
    servers(
        (url = "/api", description = "API")
    ),
    modifiers(&BearerAuth),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Users
        users::register,
        users::login,
        users::me,
        users::list_registrations,
        users::approve_user,
        users::reject_user,
        // Asset entry and lookups
        assets::store_temp_asset,
        assets::store_temp_issue,
        assets::store_temp_service,
        assets::store_temp_maintenance,
        assets::store_temp_disposal,
        assets::store_temp_building_disposal,
        assets::save_returned_status,
        assets::add_building_upgrades,
        assets::categories,
        assets::get_store_items,
        assets::get_store_item_details,
        assets::get_servicable_items,
        assets::get_available_disposable_quantity,
        assets::get_store_items_for_return,
        assets::get_returned_assets,
        assets::get_building_upgrades,
        // Files
        uploads::upload_file,
        uploads::upload_signed_returned_receipt,
        uploads::store_returned_receipt,
        // Approvals
        approvals::list_pending,
        approvals::get_record,
        approvals::approve_record,
        approvals::reject_record,
        approvals::list_rejected,
        approvals::get_rejected,
        approvals::resubmit_rejected,
        // Reports
        reports::filter_purchase,
        reports::filter_store_issue,
        reports::filter_service_return,
        reports::filter_disposal,
        reports::filter_dead_stock,
        reports::update_dead_stock_quantities,
        reports::export,
        // Faculty
        faculty::create_faculty,
        faculty::list_faculty,
        faculty::get_faculty,
        faculty::update_faculty,
        faculty::approve_faculty,
        faculty::reject_faculty,
    ),
    components(
        schemas(
            // Users
            crate::models::user::Role,
            crate::models::user::User,
            crate::models::user::RegisterUser,
            crate::models::user::LoginRequest,
            crate::models::user::LoginResponse,
            crate::models::user::ApproveUser,
            // Shared enums
            crate::models::enums::AssetType,
            crate::models::enums::Condition,
            crate::models::enums::RecordStatus,
            crate::models::enums::RecordKind,
            crate::models::enums::FacultyType,
            // Asset records
            crate::models::asset::AssetItem,
            crate::models::asset::BuildingDetails,
            crate::models::asset::LandDetails,
            crate::models::asset::StoreEntry,
            crate::models::asset::IssueEntry,
            crate::models::maintenance::ServiceEntry,
            crate::models::maintenance::MaintenanceEntry,
            crate::models::disposal::ItemDisposal,
            crate::models::disposal::BuildingDisposal,
            crate::models::returned::ReturnEntry,
            crate::models::returned::ReturnedSource,
            crate::models::returned::ReturnedAssetRow,
            crate::models::returned::StoreReturnedReceipt,
            crate::models::upgrade::Upgrade,
            crate::models::upgrade::BuildingUpgradeEntry,
            crate::models::record::AssetRecordView,
            crate::models::record::RejectRequest,
            crate::models::record::CreatedRecord,
            crate::models::record::RejectedRecordView,
            crate::domain::Classification,
            crate::domain::RejectedForm,
            crate::domain::ActiveTab,
            assets::CategoriesResponse,
            // Stock
            crate::models::stock::ItemKey,
            crate::models::stock::StoreItem,
            crate::models::stock::IssuedItem,
            crate::models::stock::ReturnedItem,
            crate::models::stock::DeadStockItem,
            crate::models::stock::AvailableQuantity,
            crate::models::stock::DeadStockQuantityUpdate,
            // Files
            crate::services::uploads::UploadedFile,
            uploads::UploadForm,
            // Reports
            crate::domain::FilterTab,
            crate::domain::FilterPayload,
            crate::domain::SortDirection,
            crate::domain::export::ExportRequest,
            // Faculty
            crate::models::faculty::Publication,
            crate::models::faculty::Education,
            crate::models::faculty::CourseHandled,
            crate::models::faculty::Tour,
            crate::models::faculty::ExaminerDuty,
            crate::models::faculty::SpecialSession,
            crate::models::faculty::FacultyInput,
            crate::models::faculty::Faculty,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "Registration, login and account approval"),
        (name = "assets", description = "Asset entry and stock lookups"),
        (name = "files", description = "File uploads"),
        (name = "approvals", description = "Asset record approval workflow"),
        (name = "reports", description = "Asset reports and CSV export"),
        (name = "faculty", description = "Faculty register")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
