//! Generic asset record: one row of `asset_records` carrying any lifecycle payload

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::{
    asset::{IssueEntry, StoreEntry},
    disposal::{BuildingDisposal, ItemDisposal},
    enums::{AssetType, RecordKind, RecordStatus},
    maintenance::{MaintenanceEntry, ServiceEntry},
    returned::ReturnEntry,
    upgrade::BuildingUpgradeEntry,
};
use crate::domain::{Classification, RejectedForm};
use crate::error::{AppError, AppResult};

/// Payload of an asset record, tagged by its kind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordPayload {
    Store(StoreEntry),
    Issue(IssueEntry),
    Service(ServiceEntry),
    Maintenance(MaintenanceEntry),
    Return(ReturnEntry),
    ItemDisposal(ItemDisposal),
    BuildingDisposal(BuildingDisposal),
    BuildingUpgrade(BuildingUpgradeEntry),
}

impl RecordPayload {
    pub fn kind(&self) -> RecordKind {
        match self {
            RecordPayload::Store(_) => RecordKind::Store,
            RecordPayload::Issue(_) => RecordKind::Issue,
            RecordPayload::Service(_) => RecordKind::Service,
            RecordPayload::Maintenance(_) => RecordKind::Maintenance,
            RecordPayload::Return(_) => RecordKind::Return,
            RecordPayload::ItemDisposal(_) => RecordKind::ItemDisposal,
            RecordPayload::BuildingDisposal(_) => RecordKind::BuildingDisposal,
            RecordPayload::BuildingUpgrade(_) => RecordKind::BuildingUpgrade,
        }
    }

    pub fn asset_type(&self) -> AssetType {
        match self {
            RecordPayload::Store(e) => e.asset_type,
            RecordPayload::Issue(e) => e.asset_type,
            RecordPayload::Service(e) => e.asset_type,
            RecordPayload::Maintenance(e) => e.asset_type,
            RecordPayload::Return(e) => e.asset_type,
            RecordPayload::ItemDisposal(e) => e.asset_type,
            RecordPayload::BuildingDisposal(e) => e.asset_type,
            RecordPayload::BuildingUpgrade(e) => e.asset_type,
        }
    }

    pub fn asset_category(&self) -> &str {
        match self {
            RecordPayload::Store(e) => &e.asset_category,
            RecordPayload::Issue(e) => &e.asset_category,
            RecordPayload::Service(e) => &e.asset_category,
            RecordPayload::Maintenance(e) => &e.asset_category,
            RecordPayload::Return(e) => &e.asset_category,
            RecordPayload::ItemDisposal(e) => &e.asset_category,
            RecordPayload::BuildingDisposal(e) => &e.asset_category,
            RecordPayload::BuildingUpgrade(e) => &e.asset_category,
        }
    }

    pub fn sub_category(&self) -> Option<&str> {
        match self {
            RecordPayload::Store(e) => e.sub_category.as_deref(),
            RecordPayload::Issue(e) => e.sub_category.as_deref(),
            RecordPayload::Service(e) => e.sub_category.as_deref(),
            RecordPayload::Maintenance(e) => e.sub_category.as_deref(),
            RecordPayload::Return(e) => e.sub_category.as_deref(),
            RecordPayload::ItemDisposal(e) => e.sub_category.as_deref(),
            RecordPayload::BuildingDisposal(e) => e.sub_category.as_deref(),
            RecordPayload::BuildingUpgrade(e) => Some(e.sub_category.as_str()),
        }
    }

    /// Item name for single-item records
    pub fn item_name(&self) -> Option<&str> {
        match self {
            RecordPayload::Issue(e) => Some(&e.item_name),
            RecordPayload::Service(e) => Some(&e.item_name),
            RecordPayload::Return(e) => Some(&e.item_name),
            RecordPayload::ItemDisposal(e) => Some(&e.item_name),
            _ => None,
        }
    }

    /// Date used by report range filters
    pub fn record_date(&self) -> Option<NaiveDate> {
        match self {
            RecordPayload::Store(e) => e.purchase_date.or(Some(e.entry_date)),
            RecordPayload::Issue(e) => Some(e.issued_date),
            RecordPayload::Service(e) => e.service_date,
            RecordPayload::Maintenance(e) => e.year_of_maintenance,
            RecordPayload::Return(e) => e.returned_date,
            RecordPayload::ItemDisposal(e) => e.condemnation_date,
            RecordPayload::BuildingDisposal(e) => e.date,
            RecordPayload::BuildingUpgrade(e) => {
                e.upgrades.iter().filter_map(|u| u.date_of_completion).max()
            }
        }
    }

    /// Resolve "Others" selections and recompute derived fields
    pub fn normalize(&mut self) {
        match self {
            RecordPayload::Store(e) => e.normalize(),
            RecordPayload::ItemDisposal(e) => e.normalize(),
            RecordPayload::Issue(e) => trim_ids(&mut e.item_ids),
            RecordPayload::Service(e) => trim_ids(&mut e.item_ids),
            RecordPayload::Return(e) => trim_ids(&mut e.item_ids),
            _ => {}
        }
    }

    /// Parse a client document as a payload of the given kind
    pub fn parse(kind: RecordKind, mut doc: Value) -> AppResult<Self> {
        match doc {
            Value::Object(ref mut map) => {
                for key in ["id", "kind", "rejected", "rejectedRemarks", "status"] {
                    map.remove(key);
                }
                map.insert("kind".into(), Value::String(kind.as_str().to_string()));
            }
            _ => return Err(AppError::BadRequest("Record must be a JSON object".to_string())),
        }
        serde_json::from_value(doc)
            .map_err(|e| AppError::BadRequest(format!("Invalid {} record: {}", kind, e)))
    }

    pub fn to_value(&self) -> AppResult<Value> {
        serde_json::to_value(self)
            .map_err(|e| AppError::Internal(format!("Failed to encode record payload: {}", e)))
    }

    pub fn from_value(value: Value) -> AppResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| AppError::Internal(format!("Failed to decode record payload: {}", e)))
    }
}

fn trim_ids(ids: &mut Vec<String>) {
    for id in ids.iter_mut() {
        *id = id.trim().to_string();
    }
    ids.retain(|id| !id.is_empty());
}

/// Internal row structure for `asset_records` queries
#[derive(Debug, Clone, FromRow)]
pub struct AssetRecordRow {
    pub id: i64,
    pub kind: String,
    pub status: String,
    pub remark: Option<String>,
    pub payload: sqlx::types::Json<Value>,
    pub entered_by: String,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stored asset record
#[derive(Debug, Clone)]
pub struct AssetRecord {
    pub id: i64,
    pub kind: RecordKind,
    pub status: RecordStatus,
    pub remark: Option<String>,
    pub payload: RecordPayload,
    pub entered_by: String,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<AssetRecordRow> for AssetRecord {
    type Error = AppError;

    fn try_from(row: AssetRecordRow) -> Result<Self, Self::Error> {
        Ok(AssetRecord {
            id: row.id,
            kind: row.kind.parse().map_err(AppError::Internal)?,
            status: row.status.parse().map_err(AppError::Internal)?,
            remark: row.remark,
            payload: RecordPayload::from_value(row.payload.0)?,
            entered_by: row.entered_by,
            reviewed_by: row.reviewed_by,
            reviewed_at: row.reviewed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl AssetRecord {
    /// Flat document of the record as the entry forms see it: payload fields plus
    /// the rejection marker and remark.
    pub fn document(&self) -> AppResult<Value> {
        let mut value = self.payload.to_value()?;
        if let Value::Object(ref mut map) = value {
            map.remove("kind");
            map.insert("id".into(), Value::from(self.id));
            map.insert(
                "rejected".into(),
                Value::Bool(self.status == RecordStatus::Rejected),
            );
            if let Some(ref remark) = self.remark {
                map.insert("rejectedRemarks".into(), Value::String(remark.clone()));
            }
        }
        Ok(value)
    }
}

/// Record as returned by the API
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecordView {
    pub id: i64,
    pub kind: RecordKind,
    pub status: RecordStatus,
    pub remark: Option<String>,
    pub entered_by: String,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// Record fields (camelCase), without the kind tag
    #[schema(value_type = Object)]
    pub data: Value,
}

impl TryFrom<&AssetRecord> for AssetRecordView {
    type Error = AppError;

    fn try_from(record: &AssetRecord) -> Result<Self, Self::Error> {
        let mut data = record.payload.to_value()?;
        if let Value::Object(ref mut map) = data {
            map.remove("kind");
        }
        Ok(AssetRecordView {
            id: record.id,
            kind: record.kind,
            status: record.status,
            remark: record.remark.clone(),
            entered_by: record.entered_by.clone(),
            reviewed_by: record.reviewed_by.clone(),
            reviewed_at: record.reviewed_at,
            created_at: record.created_at,
            data,
        })
    }
}

/// Pending / rejected record listing parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordQuery {
    pub kind: Option<RecordKind>,
    pub asset_type: Option<AssetType>,
}

/// Rejection request (remark is mandatory)
#[derive(Debug, Deserialize, validator::Validate, ToSchema)]
pub struct RejectRequest {
    #[validate(length(min = 1, message = "A remark is required to reject a record"))]
    pub remark: String,
}

/// Identifier of a freshly stored record
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRecord {
    pub id: i64,
    pub status: RecordStatus,
    pub message: String,
}

/// Rejected record with the entry form that should re-populate it
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectedRecordView {
    pub id: i64,
    pub kind: RecordKind,
    pub remark: Option<String>,
    pub classification: Classification,
    /// Flat record document, including `rejected` and `rejectedRemarks`
    #[schema(value_type = Object)]
    pub document: Value,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ResubmitQuery {
    /// Form the corrected record was entered in; defaults to the record's own kind
    pub form: Option<RejectedForm>,
}
