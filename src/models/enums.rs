//! Shared domain enums

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Sentinel select values that are replaced by a paired free-text field
pub const OTHERS: &str = "Others";
pub const OTHER: &str = "Other";

/// Returns true when a select value is one of the "Others" sentinels
pub fn is_others(value: &str) -> bool {
    value == OTHERS || value == OTHER
}

// ---------------------------------------------------------------------------
// AssetType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum AssetType {
    Permanent,
    Consumable,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Permanent => "Permanent",
            AssetType::Consumable => "Consumable",
        }
    }

    /// Categories offered for this asset type (excluding the "Others" sentinel)
    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            AssetType::Permanent => PERMANENT_CATEGORIES,
            AssetType::Consumable => CONSUMABLE_CATEGORIES,
        }
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AssetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Permanent" => Ok(AssetType::Permanent),
            "Consumable" => Ok(AssetType::Consumable),
            _ => Err(format!("Invalid asset type: {}", s)),
        }
    }
}

pub const BUILDING: &str = "Building";
pub const LAND: &str = "Land";

const PERMANENT_CATEGORIES: &[&str] = &[
    "Furniture",
    "Vehicle",
    BUILDING,
    "Instruments",
    "Sports and Goods",
    "Curtains",
    "Electrical",
    "Electronics",
    "Photograph Items",
    LAND,
    "ICT Goods",
];

const CONSUMABLE_CATEGORIES: &[&str] = &[
    "Stationery",
    "Sanitory Items",
    "Sports Goods",
    "Fabrics",
    "Electrical",
    "Instruments",
    "Furniture",
    "Miscellaneous",
];

/// Shape of an intake record, selected by its category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryShape {
    Building,
    Land,
    Items,
}

impl CategoryShape {
    pub fn of(category: &str) -> Self {
        match category {
            BUILDING => CategoryShape::Building,
            LAND => CategoryShape::Land,
            _ => CategoryShape::Items,
        }
    }
}

pub fn is_building(category: &str) -> bool {
    category == BUILDING
}

// ---------------------------------------------------------------------------
// Condition
// ---------------------------------------------------------------------------

/// Condition of a returned asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Condition {
    Good,
    #[serde(rename = "To Be Serviced")]
    ToBeServiced,
    #[serde(rename = "To Be Disposed")]
    ToBeDisposed,
    #[serde(rename = "To Be Exchanged")]
    ToBeExchanged,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Good => "Good",
            Condition::ToBeServiced => "To Be Serviced",
            Condition::ToBeDisposed => "To Be Disposed",
            Condition::ToBeExchanged => "To Be Exchanged",
        }
    }
}

impl std::str::FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Good" => Ok(Condition::Good),
            "To Be Serviced" => Ok(Condition::ToBeServiced),
            "To Be Disposed" => Ok(Condition::ToBeDisposed),
            "To Be Exchanged" => Ok(Condition::ToBeExchanged),
            _ => Err(format!("Invalid condition: {}", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// RecordStatus
// ---------------------------------------------------------------------------

/// Approval status persisted with every record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Pending,
    Approved,
    Rejected,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Pending => "pending",
            RecordStatus::Approved => "approved",
            RecordStatus::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for RecordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RecordStatus::Pending),
            "approved" => Ok(RecordStatus::Approved),
            "rejected" => Ok(RecordStatus::Rejected),
            _ => Err(format!("Invalid record status: {}", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// RecordKind
// ---------------------------------------------------------------------------

/// Kind of asset record stored in `asset_records`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Store,
    Issue,
    Service,
    Maintenance,
    Return,
    ItemDisposal,
    BuildingDisposal,
    BuildingUpgrade,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Store => "store",
            RecordKind::Issue => "issue",
            RecordKind::Service => "service",
            RecordKind::Maintenance => "maintenance",
            RecordKind::Return => "return",
            RecordKind::ItemDisposal => "item_disposal",
            RecordKind::BuildingDisposal => "building_disposal",
            RecordKind::BuildingUpgrade => "building_upgrade",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "store" => Ok(RecordKind::Store),
            "issue" => Ok(RecordKind::Issue),
            "service" => Ok(RecordKind::Service),
            "maintenance" => Ok(RecordKind::Maintenance),
            "return" => Ok(RecordKind::Return),
            "item_disposal" => Ok(RecordKind::ItemDisposal),
            "building_disposal" => Ok(RecordKind::BuildingDisposal),
            "building_upgrade" => Ok(RecordKind::BuildingUpgrade),
            _ => Err(format!("Invalid record kind: {}", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// FacultyType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FacultyType {
    Internal,
    External,
}

impl FacultyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FacultyType::Internal => "internal",
            FacultyType::External => "external",
        }
    }
}

impl std::str::FromStr for FacultyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "internal" => Ok(FacultyType::Internal),
            "external" => Ok(FacultyType::External),
            _ => Err(format!("Invalid faculty type: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_wire_names() {
        let json = serde_json::to_string(&Condition::ToBeServiced).unwrap();
        assert_eq!(json, "\"To Be Serviced\"");
        let parsed: Condition = serde_json::from_str("\"To Be Exchanged\"").unwrap();
        assert_eq!(parsed, Condition::ToBeExchanged);
    }

    #[test]
    fn test_category_lists() {
        assert!(AssetType::Permanent.categories().contains(&"Building"));
        assert!(!AssetType::Consumable.categories().contains(&"Land"));
        assert_eq!(CategoryShape::of("Land"), CategoryShape::Land);
        assert_eq!(CategoryShape::of("Furniture"), CategoryShape::Items);
    }
}
