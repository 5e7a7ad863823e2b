//! File upload endpoints (multipart) and receipt attachment

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::Multipart;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::returned::StoreReturnedReceipt,
    services::uploads::UploadedFile,
    AppState,
};

use super::AuthenticatedUser;

/// Multipart body of the upload endpoints
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
    /// Return record the receipt belongs to (receipt upload only)
    #[schema(value_type = Option<i64>)]
    record_id: Option<i64>,
}

struct ReceivedFile {
    name: String,
    bytes: Vec<u8>,
}

/// Read the `file` part and any `recordId` part of a multipart body
async fn read_parts(mut multipart: Multipart) -> AppResult<(ReceivedFile, Option<i64>)> {
    let mut file = None;
    let mut record_id = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Upload(e.to_string()))?
    {
        match field.name() {
            Some("file") => {
                let name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Upload(e.to_string()))?;
                file = Some(ReceivedFile {
                    name,
                    bytes: bytes.to_vec(),
                });
            }
            Some("recordId") => {
                let text = field.text().await.map_err(|e| AppError::Upload(e.to_string()))?;
                let id = text
                    .trim()
                    .parse()
                    .map_err(|_| AppError::BadRequest(format!("'{}' is not a valid record id", text)))?;
                record_id = Some(id);
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::Upload("No file part in the request".to_string()))?;
    Ok((file, record_id))
}

/// Upload an attachment (bill, site plan, photo, document)
#[utoipa::path(
    post,
    path = "/assets/uploadFile",
    tag = "files",
    security(("bearer_auth" = [])),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File stored", body = UploadedFile),
        (status = 400, description = "Missing, empty, oversized or disallowed file", body = crate::error::ErrorResponse)
    )
)]
pub async fn upload_file(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<UploadedFile>)> {
    claims.require_asset_entry()?;
    let (file, _) = read_parts(multipart).await?;
    let uploaded = state.services.uploads.save(&file.name, &file.bytes).await?;
    Ok((StatusCode::CREATED, Json(uploaded)))
}

/// Upload a signed receipt and attach it to a return record
#[utoipa::path(
    post,
    path = "/assets/uploadSignedReturnedReceipt",
    tag = "files",
    security(("bearer_auth" = [])),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Receipt stored and attached", body = UploadedFile),
        (status = 400, description = "Invalid file or record", body = crate::error::ErrorResponse),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn upload_signed_returned_receipt(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<UploadedFile>)> {
    claims.require_asset_entry()?;
    let (file, record_id) = read_parts(multipart).await?;
    let record_id = record_id.ok_or_else(|| AppError::BadRequest("recordId is required".to_string()))?;

    let uploaded = state.services.uploads.save(&file.name, &file.bytes).await?;
    let receipt = StoreReturnedReceipt {
        record_id,
        signed_receipt_url: uploaded.url.clone(),
    };
    state
        .services
        .assets
        .store_returned_receipt(&receipt, &claims)
        .await?;

    Ok((StatusCode::CREATED, Json(uploaded)))
}

/// Attach an already uploaded receipt to a return record
#[utoipa::path(
    post,
    path = "/assets/storeReturnedReceipt",
    tag = "files",
    security(("bearer_auth" = [])),
    request_body = StoreReturnedReceipt,
    responses(
        (status = 204, description = "Receipt attached"),
        (status = 400, description = "Record is not a return", body = crate::error::ErrorResponse),
        (status = 403, description = "No access to the record's asset type"),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn store_returned_receipt(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<StoreReturnedReceipt>,
) -> AppResult<StatusCode> {
    claims.require_asset_entry()?;
    state.services.assets.store_returned_receipt(&data, &claims).await?;
    Ok(StatusCode::NO_CONTENT)
}
