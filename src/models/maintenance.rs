//! Service (item-level) and maintenance (building-level) records

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use utoipa::ToSchema;

use super::enums::AssetType;

/// Servicing of returned items marked "To Be Serviced"
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEntry {
    pub asset_type: AssetType,
    pub asset_category: String,
    pub item_name: String,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub sub_category: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub item_description: Option<String>,
    /// Serviced quantity; for Permanent items it must match `item_ids`
    pub quantity: i32,
    #[serde(default)]
    pub item_ids: Vec<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub service_no: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub service_date: Option<NaiveDate>,
    #[serde(default)]
    pub service_amount: Option<Decimal>,
}

/// Maintenance work on a building
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceEntry {
    pub asset_type: AssetType,
    pub asset_category: String,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub sub_category: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub building_no: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub year_of_maintenance: Option<NaiveDate>,
    #[serde(default)]
    pub cost: Option<Decimal>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub description: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub custody: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub agency: Option<String>,
}
