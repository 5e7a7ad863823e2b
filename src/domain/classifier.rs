//! Routes a rejected record back to the entry form it came from.
//!
//! Records are classified by which discriminating fields they carry, using a
//! fixed first-match list. The order is a hard contract: a document matching
//! several predicates (e.g. a service number on a Building record with
//! upgrades) is resolved by the earliest rule. Rules 2 and 3 overlap for
//! Building records carrying both disposal and custody fields; the disposal
//! form wins.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::models::enums::{RecordKind, BUILDING};

/// Entry form that re-populates a rejected record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RejectedForm {
    Service,
    BuildingDisposal,
    Maintenance,
    ItemDisposal,
    BuildingUpgrade,
    Store,
}

/// Tab of the entry screen hosting a form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ActiveTab {
    Store,
    Issue,
    Serviced,
    Returned,
    Disposable,
    BuildingUpgrade,
}

impl RejectedForm {
    /// Kind of record the form submits
    pub fn kind(&self) -> RecordKind {
        match self {
            RejectedForm::Service => RecordKind::Service,
            RejectedForm::BuildingDisposal => RecordKind::BuildingDisposal,
            RejectedForm::Maintenance => RecordKind::Maintenance,
            RejectedForm::ItemDisposal => RecordKind::ItemDisposal,
            RejectedForm::BuildingUpgrade => RecordKind::BuildingUpgrade,
            RejectedForm::Store => RecordKind::Store,
        }
    }

    pub fn tab(&self) -> ActiveTab {
        match self {
            RejectedForm::Service | RejectedForm::Maintenance => ActiveTab::Serviced,
            RejectedForm::BuildingDisposal | RejectedForm::ItemDisposal => ActiveTab::Disposable,
            RejectedForm::BuildingUpgrade => ActiveTab::BuildingUpgrade,
            RejectedForm::Store => ActiveTab::Store,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub form: RejectedForm,
    pub tab: ActiveTab,
    /// Show the "editing a rejected record" banner
    pub editing_rejected: bool,
}

const SERVICE_FIELDS: &[&str] = &["serviceNo", "serviceDate", "serviceAmount"];
const BUILDING_DISPOSAL_FIELDS: &[&str] = &["condemnationYear", "certificateObtained", "authority"];
const ITEM_DISPOSAL_FIELDS: &[&str] = &["purchaseValue", "bookValue", "inspectionDate"];

/// A field is present when it exists and is not null, blank or an empty array
fn present(doc: &Value, field: &str) -> bool {
    match doc.get(field) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(_) => true,
    }
}

fn any_present(doc: &Value, fields: &[&str]) -> bool {
    fields.iter().any(|field| present(doc, field))
}

fn is_building(doc: &Value) -> bool {
    doc.get("assetCategory").and_then(Value::as_str) == Some(BUILDING)
}

fn is_rejected(doc: &Value) -> bool {
    match doc.get("rejected") {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true") || s == "rejected",
        _ => doc.get("status").and_then(Value::as_str) == Some("rejected"),
    }
}

/// Classify a record document (camelCase fields) into its entry form
pub fn classify(doc: &Value) -> Classification {
    let building = is_building(doc);

    let (form, editing_rejected) = if any_present(doc, SERVICE_FIELDS) {
        (RejectedForm::Service, false)
    } else if building && any_present(doc, BUILDING_DISPOSAL_FIELDS) {
        (RejectedForm::BuildingDisposal, false)
    } else if building && is_rejected(doc) && present(doc, "custody") {
        (RejectedForm::Maintenance, true)
    } else if any_present(doc, ITEM_DISPOSAL_FIELDS) {
        (RejectedForm::ItemDisposal, false)
    } else if building && present(doc, "upgrades") {
        (RejectedForm::BuildingUpgrade, false)
    } else {
        (RejectedForm::Store, false)
    };

    Classification {
        form,
        tab: form.tab(),
        editing_rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_service_number_routes_to_service() {
        let c = classify(&json!({ "serviceNo": "SRV-12" }));
        assert_eq!(c.form, RejectedForm::Service);
        assert_eq!(c.tab, ActiveTab::Serviced);
    }

    #[test]
    fn test_building_upgrades_route_to_upgrade_form() {
        let c = classify(&json!({
            "assetCategory": "Building",
            "subCategory": "Hostel",
            "upgrades": [{ "year": 2021 }],
        }));
        assert_eq!(c.form, RejectedForm::BuildingUpgrade);
        assert_eq!(c.tab, ActiveTab::BuildingUpgrade);
    }

    #[test]
    fn test_default_is_store() {
        let c = classify(&json!({ "assetType": "Consumable", "assetCategory": "Stationery" }));
        assert_eq!(c.form, RejectedForm::Store);
        assert!(!c.editing_rejected);
    }

    #[test]
    fn test_service_rule_wins_over_upgrade_rule() {
        let c = classify(&json!({
            "assetCategory": "Building",
            "serviceDate": "2024-03-01",
            "upgrades": [{ "year": 2020 }],
        }));
        assert_eq!(c.form, RejectedForm::Service);
    }

    #[test]
    fn test_building_disposal_wins_over_maintenance() {
        let c = classify(&json!({
            "assetCategory": "Building",
            "rejected": true,
            "custody": "CPWD",
            "authority": "Collector",
        }));
        assert_eq!(c.form, RejectedForm::BuildingDisposal);
    }

    #[test]
    fn test_rejected_building_with_custody_is_maintenance() {
        let c = classify(&json!({
            "assetCategory": "Building",
            "rejected": true,
            "custody": "CPWD",
        }));
        assert_eq!(c.form, RejectedForm::Maintenance);
        assert!(c.editing_rejected);

        let not_rejected = classify(&json!({ "assetCategory": "Building", "custody": "CPWD" }));
        assert_eq!(not_rejected.form, RejectedForm::Store);
    }

    #[test]
    fn test_item_disposal_fields() {
        let c = classify(&json!({ "assetCategory": "Furniture", "bookValue": 1200 }));
        assert_eq!(c.form, RejectedForm::ItemDisposal);
        assert_eq!(c.tab, ActiveTab::Disposable);
    }

    #[test]
    fn test_blank_and_empty_fields_are_absent() {
        let c = classify(&json!({
            "assetCategory": "Building",
            "serviceNo": "",
            "serviceAmount": null,
            "upgrades": [],
        }));
        assert_eq!(c.form, RejectedForm::Store);
    }

    #[test]
    fn test_upgrades_ignored_outside_building() {
        let c = classify(&json!({ "assetCategory": "Land", "upgrades": [{ "year": 2019 }] }));
        assert_eq!(c.form, RejectedForm::Store);
    }
}
