//! Building upgrade records

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use utoipa::{IntoParams, ToSchema};

use super::enums::{AssetType, BUILDING};

/// One upgrade carried out on a building
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Upgrade {
    pub year: i32,
    #[serde(default)]
    pub estimate: Option<Decimal>,
    #[serde(default)]
    pub approved_estimate: Option<Decimal>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub date_of_completion: Option<NaiveDate>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default, rename = "defectliabiliyPeriod")]
    pub defect_liability_period: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub execution_agency: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub date_of_handover: Option<NaiveDate>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub document_url: Option<String>,
}

/// Upgrades submitted for a building, keyed by its sub category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuildingUpgradeEntry {
    #[serde(default = "default_asset_type")]
    pub asset_type: AssetType,
    #[serde(default = "default_category")]
    pub asset_category: String,
    pub sub_category: String,
    pub upgrades: Vec<Upgrade>,
}

fn default_asset_type() -> AssetType {
    AssetType::Permanent
}

fn default_category() -> String {
    BUILDING.to_string()
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuildingUpgradesQuery {
    pub sub_category: String,
}
