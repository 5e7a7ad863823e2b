//! Asset intake (store/purchase) and issue records

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use utoipa::ToSchema;

use super::enums::AssetType;

/// One purchased line of an intake record
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetItem {
    pub item_name: String,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub sub_category: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub item_description: Option<String>,
    pub quantity_received: i32,
    pub unit_price: Decimal,
    /// Recomputed as quantity x unit price on normalization; unset when that overflows
    #[serde(default)]
    pub total_price: Option<Decimal>,
    /// Whether a per-unit identifier is entered for every received unit
    #[serde(default)]
    pub show_id_inputs: bool,
    #[serde(default)]
    pub item_ids: Vec<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub amc_from_date: Option<NaiveDate>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub amc_to_date: Option<NaiveDate>,
    #[serde(default)]
    pub amc_cost: Option<Decimal>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub amc_photo_url: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub warranty_number: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub warranty_valid_upto: Option<NaiveDate>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub warranty_photo_url: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub item_photo_url: Option<String>,
}

impl AssetItem {
    /// Recompute derived fields and drop identifiers when they are not collected
    pub fn normalize(&mut self) {
        self.total_price = self.unit_price.checked_mul(Decimal::from(self.quantity_received));
        if self.show_id_inputs {
            self.item_ids = self.item_ids.iter().map(|id| id.trim().to_string()).collect();
        } else {
            self.item_ids.clear();
        }
    }
}

/// Construction metadata carried by Building intake records
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuildingDetails {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub location: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub building_type: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub building_no: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub plinth_area: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub status: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub date_of_construction: Option<NaiveDate>,
    #[serde(default)]
    pub cost_of_construction: Option<Decimal>,
    #[serde(default)]
    pub approved_estimate: Option<Decimal>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub approved_building_plan_url: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub kmz_or_kml_file_url: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Possession metadata carried by Land intake records
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LandDetails {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub location: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub status: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub date_of_possession: Option<NaiveDate>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub controller_or_custody: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub details: Option<String>,
}

/// Asset intake (purchase / receipt) record
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreEntry {
    pub asset_type: AssetType,
    pub asset_category: String,
    /// Free text used when `asset_category` is "Others"
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub other_category: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub sub_category: Option<String>,
    pub entry_date: NaiveDate,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub purchase_date: Option<NaiveDate>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub supplier_name: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub supplier_address: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub source: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub mode_of_purchase: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub bill_no: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub received_by: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub bill_photo_url: Option<String>,
    #[serde(default)]
    pub items: Vec<AssetItem>,
    #[serde(default)]
    pub building: Option<BuildingDetails>,
    #[serde(default)]
    pub land: Option<LandDetails>,
}

impl StoreEntry {
    /// Category after substituting the "Others" free text
    pub fn effective_category(&self) -> String {
        super::resolve_others(&self.asset_category, self.other_category.as_deref())
    }

    pub fn normalize(&mut self) {
        self.asset_category = self.effective_category();
        self.other_category = None;
        for item in &mut self.items {
            item.normalize();
        }
    }

    /// Every identifier carried by the record's items
    pub fn item_ids(&self) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .flat_map(|item| item.item_ids.iter().map(String::as_str))
    }
}

/// Issue of store items to a location or person
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueEntry {
    pub asset_type: AssetType,
    pub asset_category: String,
    pub item_name: String,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub sub_category: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub item_description: Option<String>,
    pub issued_to: String,
    pub location: String,
    pub issued_date: NaiveDate,
    pub quantity: i32,
    #[serde(default)]
    pub item_ids: Vec<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub acknowledgement_url: Option<String>,
}
