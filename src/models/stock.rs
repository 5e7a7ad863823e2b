//! Stock ledger rows: store, issued, returned and dead stock

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::enums::AssetType;

/// Identity of an item across the stock ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemKey {
    pub asset_type: AssetType,
    pub asset_category: String,
    pub item_name: String,
    pub sub_category: Option<String>,
    pub item_description: Option<String>,
}

impl ItemKey {
    /// Sub category as stored in the ledger (blank when absent)
    pub fn sub(&self) -> &str {
        self.sub_category.as_deref().unwrap_or("")
    }

    /// Description as stored in the ledger (blank when absent)
    pub fn description(&self) -> &str {
        self.item_description.as_deref().unwrap_or("")
    }
}

impl std::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.asset_category, self.item_name)?;
        if let Some(sub) = self.sub_category.as_deref().filter(|s| !s.is_empty()) {
            write!(f, " ({})", sub)?;
        }
        Ok(())
    }
}

/// Items currently held in store
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreItem {
    pub id: i64,
    pub asset_type: String,
    pub asset_category: String,
    pub item_name: String,
    pub sub_category: String,
    pub item_description: String,
    pub in_stock: i32,
    pub item_ids: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

/// Items issued to a location
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssuedItem {
    pub id: i64,
    pub store_item_id: i64,
    pub asset_type: String,
    pub asset_category: String,
    pub item_name: String,
    pub sub_category: String,
    pub item_description: String,
    pub location: String,
    pub issued_to: Option<String>,
    pub quantity: i32,
    pub item_ids: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

/// Returned items awaiting service, disposal or exchange
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnedItem {
    pub id: i64,
    pub store_item_id: i64,
    pub asset_type: String,
    pub asset_category: String,
    pub item_name: String,
    pub sub_category: String,
    pub item_description: String,
    pub condition: String,
    pub quantity: i32,
    pub item_ids: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

/// Dead stock register entry
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeadStockItem {
    pub id: i64,
    pub store_item_id: i64,
    pub asset_type: String,
    pub asset_category: String,
    pub item_name: String,
    pub sub_category: String,
    pub item_description: String,
    pub overall_quantity: i32,
    pub servicable_quantity: i32,
    pub condemned_quantity: i32,
    pub method_of_disposal: Option<String>,
    pub remarks: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Lookup parameters shared by the stock endpoints
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockQuery {
    pub asset_type: AssetType,
    pub asset_category: Option<String>,
    pub item_name: Option<String>,
    pub sub_category: Option<String>,
    pub item_description: Option<String>,
    pub location: Option<String>,
}

/// Quantity and identifiers available for an operation
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailableQuantity {
    pub available: i32,
    pub item_ids: Vec<String>,
}

/// One dead-stock quantity update
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeadStockQuantityUpdate {
    pub id: i64,
    pub servicable_quantity: i32,
    pub condemned_quantity: i32,
    pub remarks: Option<String>,
}
