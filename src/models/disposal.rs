//! Disposal records (item-level and building-level)

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use utoipa::ToSchema;

use super::enums::AssetType;

/// Disposal of returned items marked "To Be Disposed"
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemDisposal {
    pub asset_type: AssetType,
    pub asset_category: String,
    pub item_name: String,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub sub_category: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub item_description: Option<String>,
    pub quantity: i32,
    #[serde(default)]
    pub item_ids: Vec<String>,
    #[serde(default)]
    pub purchase_value: Option<Decimal>,
    #[serde(default)]
    pub book_value: Option<Decimal>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub inspection_date: Option<NaiveDate>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub condemnation_date: Option<NaiveDate>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub disposal_value: Option<Decimal>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub method_of_disposal: Option<String>,
    /// Free text used when `method_of_disposal` is "Others"
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub other_method: Option<String>,
}

impl ItemDisposal {
    pub fn normalize(&mut self) {
        if let Some(method) = self.method_of_disposal.take() {
            self.method_of_disposal =
                Some(super::resolve_others(&method, self.other_method.as_deref()));
        }
        self.other_method = None;
        self.item_ids = self.item_ids.iter().map(|id| id.trim().to_string()).collect();
    }
}

/// Condemnation and demolition of a building
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuildingDisposal {
    pub asset_type: AssetType,
    pub asset_category: String,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub sub_category: Option<String>,
    #[serde(default)]
    pub condemnation_year: Option<i32>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub certificate_obtained: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub authority: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub date_of_reference_url: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub agency: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub agency_reference_number: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub demolition_period: Option<String>,
    #[serde(default)]
    pub demolition_estimate: Option<Decimal>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub method_of_disposal: Option<String>,
}
