//! Returned assets and the issued rows eligible to be returned

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use utoipa::{IntoParams, ToSchema};

use super::enums::{AssetType, Condition, RecordStatus};

/// Marks issued items as returned with a condition
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnEntry {
    pub asset_type: AssetType,
    pub asset_category: String,
    pub item_name: String,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub sub_category: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub item_description: Option<String>,
    /// Location the items were issued to
    pub location: String,
    pub quantity: i32,
    #[serde(default)]
    pub item_ids: Vec<String>,
    pub condition: Condition,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub returned_date: Option<NaiveDate>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub signed_receipt_url: Option<String>,
}

/// Where a row of the returned-assets view comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReturnedSource {
    /// A return record already saved
    Returned,
    /// An issued row that can still be marked returned
    Issued,
}

/// One row of the returned-assets view (union of both sources)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnedAssetRow {
    pub source: ReturnedSource,
    /// Record id for returned rows, issued row id otherwise
    pub id: i64,
    pub asset_type: AssetType,
    pub asset_category: String,
    pub item_name: String,
    pub sub_category: Option<String>,
    pub item_description: Option<String>,
    pub location: String,
    pub quantity: i32,
    /// Returned identifiers, or identifiers still available at the location
    pub item_ids: Vec<String>,
    pub condition: Option<Condition>,
    pub status: Option<RecordStatus>,
    pub signed_receipt_url: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnedAssetsQuery {
    pub asset_type: AssetType,
    pub asset_category: Option<String>,
    pub status: Option<RecordStatus>,
}

/// Attach a signed receipt to a saved return record
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreReturnedReceipt {
    pub record_id: i64,
    pub signed_receipt_url: String,
}
