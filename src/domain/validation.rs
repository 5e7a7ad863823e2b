//! Form validators.
//!
//! Each form has its own rules. A validator never stops at the first problem:
//! every message is collected and reported together.

use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::error::{AppError, AppResult};
use crate::models::{
    enums::{is_building, is_others, AssetType, CategoryShape},
    AssetItem, BuildingDisposal, BuildingUpgradeEntry, FacultyInput, IssueEntry, ItemDisposal,
    MaintenanceEntry, RecordPayload, ReturnEntry, ServiceEntry, StoreEntry,
};

/// True when `date` is strictly after `today` (both taken at midnight)
pub fn is_future_date(date: NaiveDate, today: NaiveDate) -> bool {
    date > today
}

/// Text variant used for raw form input: blank or unparsable input is never
/// in the future. Accepts `YYYY-MM-DD` optionally followed by a time part.
pub fn is_future_date_str(input: &str, today: NaiveDate) -> bool {
    let input = input.trim();
    let day = input.get(..10).unwrap_or(input);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map(|date| is_future_date(date, today))
        .unwrap_or(false)
}

/// Identifiers appearing at least twice, each reported once in first-seen order.
/// Comparison is case-sensitive; blank entries are ignored.
pub fn find_duplicate_ids<'a, I>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for id in ids {
        if id.trim().is_empty() {
            continue;
        }
        *counts.entry(id).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(id, _)| id.to_string())
        .collect()
}

/// Collects validation messages for one form submission
#[derive(Debug, Default)]
pub struct Report {
    messages: Vec<String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn check(&mut self, ok: bool, message: impl Into<String>) {
        if !ok {
            self.push(message);
        }
    }

    pub fn require_text(&mut self, value: Option<&str>, label: &str) {
        if value.map(str::trim).unwrap_or_default().is_empty() {
            self.push(format!("{} is required", label));
        }
    }

    /// Select field that may still hold an unresolved "Others" sentinel
    pub fn require_choice(&mut self, value: Option<&str>, label: &str) {
        match value.map(str::trim) {
            None | Some("") => self.push(format!("{} is required", label)),
            Some(v) if is_others(v) => self.push(format!("Please specify the {}", label.to_lowercase())),
            Some(_) => {}
        }
    }

    pub fn require_positive(&mut self, value: i32, label: &str) {
        if value <= 0 {
            self.push(format!("{} must be greater than zero", label));
        }
    }

    pub fn require_amount(&mut self, value: Option<Decimal>, label: &str) {
        match value {
            None => self.push(format!("{} is required", label)),
            Some(v) if v <= Decimal::ZERO => {
                self.push(format!("{} must be greater than zero", label))
            }
            Some(_) => {}
        }
    }

    pub fn non_negative(&mut self, value: Option<Decimal>, label: &str) {
        if matches!(value, Some(v) if v < Decimal::ZERO) {
            self.push(format!("{} cannot be negative", label));
        }
    }

    pub fn not_future(&mut self, date: Option<NaiveDate>, label: &str, today: NaiveDate) {
        if matches!(date, Some(d) if is_future_date(d, today)) {
            self.push(format!("{} cannot be in the future", label));
        }
    }

    pub fn require_past_date(&mut self, date: Option<NaiveDate>, label: &str, today: NaiveDate) {
        if date.is_none() {
            self.push(format!("{} is required", label));
        }
        self.not_future(date, label, today);
    }

    /// Identifier rules for Permanent quantities: one non-blank ID per unit
    pub fn unit_ids(&mut self, ids: &[String], quantity: i32, prefix: &str) {
        if ids.iter().any(|id| id.trim().is_empty()) {
            self.push(format!("{}item IDs cannot be empty", prefix));
        }
        if quantity > 0 && ids.len() != quantity as usize {
            self.push(format!(
                "{}quantity ({}) must match the number of item IDs ({})",
                prefix,
                quantity,
                ids.len()
            ));
        }
    }

    /// Movement of Permanent units: identifiers are optional, but when given
    /// there is one per unit and none repeats
    pub fn moved_ids(&mut self, ids: &[String], quantity: i32) {
        if ids.is_empty() {
            return;
        }
        self.unit_ids(ids, quantity, "");
        self.no_duplicates(ids.iter().map(String::as_str));
    }

    pub fn no_duplicates<'a, I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let duplicates = find_duplicate_ids(ids);
        if !duplicates.is_empty() {
            self.push(format!("Duplicate item IDs found: {}", duplicates.join(", ")));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_result(self) -> AppResult<()> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(AppError::InvalidRecord(self.messages))
        }
    }
}

fn check_category(report: &mut Report, asset_type: AssetType, category: &str) {
    report.require_choice(Some(category), "Asset category");
    if asset_type == AssetType::Consumable && CategoryShape::of(category) != CategoryShape::Items {
        report.push(format!("{} is not a valid category for {} assets", category, asset_type));
    }
}

fn validate_store_item(report: &mut Report, item: &AssetItem, n: usize, asset_type: AssetType, today: NaiveDate) {
    let prefix = format!("Item {}: ", n);
    if item.item_name.trim().is_empty() {
        report.push(format!("{}item name is required", prefix));
    }
    if item.quantity_received <= 0 {
        report.push(format!("{}quantity received must be greater than zero", prefix));
    }
    if item.unit_price <= Decimal::ZERO {
        report.push(format!("{}unit price must be greater than zero", prefix));
    }
    if item.unit_price.checked_mul(Decimal::from(item.quantity_received)).is_none() {
        report.push(format!("{}total price is too large", prefix));
    }
    if let (Some(from), Some(to)) = (item.amc_from_date, item.amc_to_date) {
        if from > to {
            report.push(format!("{}AMC From Date must be on or before AMC To Date", prefix));
        }
    }
    report.non_negative(item.amc_cost, &format!("{}AMC cost", prefix));
    report.not_future(item.amc_from_date, &format!("{}AMC From Date", prefix), today);
    if asset_type == AssetType::Permanent && item.show_id_inputs {
        report.unit_ids(&item.item_ids, item.quantity_received, &prefix);
    }
}

pub fn validate_store(entry: &StoreEntry, today: NaiveDate) -> AppResult<()> {
    let mut report = Report::new();
    let category = entry.effective_category();
    check_category(&mut report, entry.asset_type, &category);
    report.not_future(Some(entry.entry_date), "Entry date", today);

    match CategoryShape::of(&category) {
        CategoryShape::Building => {
            report.check(entry.building.is_some(), "Building details are required");
            report.check(entry.items.is_empty(), "Items are not allowed for Building records");
            report.check(entry.land.is_none(), "Land details are not allowed for Building records");
            report.require_text(entry.sub_category.as_deref(), "Sub category");
            if let Some(ref building) = entry.building {
                report.not_future(building.date_of_construction, "Date of construction", today);
                report.non_negative(building.cost_of_construction, "Cost of construction");
            }
        }
        CategoryShape::Land => {
            report.check(entry.land.is_some(), "Land details are required");
            report.check(entry.items.is_empty(), "Items are not allowed for Land records");
            report.check(entry.building.is_none(), "Building details are not allowed for Land records");
            report.require_text(entry.sub_category.as_deref(), "Sub category");
            if let Some(ref land) = entry.land {
                report.not_future(land.date_of_possession, "Date of possession", today);
            }
        }
        CategoryShape::Items => {
            report.check(
                entry.building.is_none() && entry.land.is_none(),
                "Building or land details are only allowed for the Building and Land categories",
            );
            report.require_past_date(entry.purchase_date, "Purchase date", today);
            report.require_text(entry.supplier_name.as_deref(), "Supplier name");
            if entry.items.is_empty() {
                report.push("At least one item is required");
            }
            for (i, item) in entry.items.iter().enumerate() {
                validate_store_item(&mut report, item, i + 1, entry.asset_type, today);
            }
            if entry.asset_type == AssetType::Permanent {
                report.no_duplicates(
                    entry
                        .items
                        .iter()
                        .filter(|item| item.show_id_inputs)
                        .flat_map(|item| item.item_ids.iter().map(String::as_str)),
                );
            }
        }
    }

    report.into_result()
}

pub fn validate_issue(entry: &IssueEntry, today: NaiveDate) -> AppResult<()> {
    let mut report = Report::new();
    check_category(&mut report, entry.asset_type, &entry.asset_category);
    report.require_text(Some(&entry.item_name), "Item name");
    report.require_text(Some(&entry.issued_to), "Issued to");
    report.require_text(Some(&entry.location), "Location");
    report.require_positive(entry.quantity, "Quantity");
    report.not_future(Some(entry.issued_date), "Issued date", today);
    if entry.asset_type == AssetType::Permanent {
        report.moved_ids(&entry.item_ids, entry.quantity);
    }
    report.into_result()
}

pub fn validate_service(entry: &ServiceEntry, today: NaiveDate) -> AppResult<()> {
    let mut report = Report::new();
    check_category(&mut report, entry.asset_type, &entry.asset_category);
    report.require_text(Some(&entry.item_name), "Item name");
    report.require_text(entry.service_no.as_deref(), "Service number");
    report.require_past_date(entry.service_date, "Service date", today);
    report.require_amount(entry.service_amount, "Service amount");
    report.require_positive(entry.quantity, "Quantity");
    if entry.asset_type == AssetType::Permanent {
        report.moved_ids(&entry.item_ids, entry.quantity);
    }
    report.into_result()
}

pub fn validate_maintenance(entry: &MaintenanceEntry, today: NaiveDate) -> AppResult<()> {
    let mut report = Report::new();
    report.check(
        is_building(&entry.asset_category),
        "Maintenance can only be recorded for buildings",
    );
    report.require_text(entry.sub_category.as_deref(), "Sub category");
    report.require_past_date(entry.year_of_maintenance, "Year of maintenance", today);
    report.require_amount(entry.cost, "Cost");
    report.require_text(entry.custody.as_deref(), "Custody");
    report.into_result()
}

pub fn validate_item_disposal(entry: &ItemDisposal, today: NaiveDate) -> AppResult<()> {
    let mut report = Report::new();
    check_category(&mut report, entry.asset_type, &entry.asset_category);
    report.require_text(Some(&entry.item_name), "Item name");
    report.require_positive(entry.quantity, "Quantity");
    if entry.asset_type == AssetType::Permanent && !is_building(&entry.asset_category) {
        report.check(
            entry.item_ids.len() == entry.quantity.max(0) as usize,
            format!(
                "Quantity ({}) must equal the number of selected item IDs ({})",
                entry.quantity,
                entry.item_ids.len()
            ),
        );
        report.no_duplicates(entry.item_ids.iter().map(String::as_str));
    }
    report.non_negative(entry.purchase_value, "Purchase value");
    report.non_negative(entry.book_value, "Book value");
    report.non_negative(entry.disposal_value, "Disposal value");
    report.not_future(entry.inspection_date, "Inspection date", today);
    report.not_future(entry.condemnation_date, "Condemnation date", today);
    report.require_choice(entry.method_of_disposal.as_deref(), "Method of disposal");
    report.into_result()
}

pub fn validate_building_disposal(entry: &BuildingDisposal, today: NaiveDate) -> AppResult<()> {
    let mut report = Report::new();
    report.check(
        is_building(&entry.asset_category),
        "Building disposal can only be recorded for buildings",
    );
    report.require_text(entry.sub_category.as_deref(), "Sub category");
    match entry.condemnation_year {
        None => report.push("Condemnation year is required"),
        Some(year) if year > today.year() => report.push("Condemnation year cannot be in the future"),
        Some(_) => {}
    }
    report.not_future(entry.date, "Date", today);
    report.non_negative(entry.demolition_estimate, "Demolition estimate");
    report.require_choice(entry.method_of_disposal.as_deref(), "Method of disposal");
    report.into_result()
}

pub fn validate_return(entry: &ReturnEntry, today: NaiveDate) -> AppResult<()> {
    let mut report = Report::new();
    check_category(&mut report, entry.asset_type, &entry.asset_category);
    report.require_text(Some(&entry.item_name), "Item name");
    report.require_text(Some(&entry.location), "Location");
    report.require_positive(entry.quantity, "Quantity");
    report.not_future(entry.returned_date, "Returned date", today);
    if entry.asset_type == AssetType::Permanent {
        report.moved_ids(&entry.item_ids, entry.quantity);
    }
    report.into_result()
}

pub fn validate_upgrades(entry: &BuildingUpgradeEntry, today: NaiveDate) -> AppResult<()> {
    let mut report = Report::new();
    report.check(
        is_building(&entry.asset_category),
        "Upgrades can only be recorded for buildings",
    );
    report.require_text(Some(&entry.sub_category), "Sub category");
    if entry.upgrades.is_empty() {
        report.push("At least one upgrade is required");
    }
    for (i, upgrade) in entry.upgrades.iter().enumerate() {
        let n = i + 1;
        if upgrade.year > today.year() {
            report.push(format!("Upgrade {}: year cannot be in the future", n));
        }
        report.non_negative(upgrade.estimate, &format!("Upgrade {}: estimate", n));
        report.non_negative(upgrade.approved_estimate, &format!("Upgrade {}: approved estimate", n));
        report.not_future(upgrade.date_of_completion, &format!("Upgrade {}: date of completion", n), today);
        report.not_future(upgrade.date_of_handover, &format!("Upgrade {}: date of handover", n), today);
        if let (Some(done), Some(handover)) = (upgrade.date_of_completion, upgrade.date_of_handover) {
            report.check(
                handover >= done,
                format!("Upgrade {}: date of handover must not precede completion", n),
            );
        }
    }
    report.into_result()
}

pub fn validate_faculty(input: &FacultyInput, today: NaiveDate) -> AppResult<()> {
    let mut report = Report::new();
    report.require_text(Some(&input.name), "Name");
    report.not_future(input.date_of_birth, "Date of birth", today);
    report.not_future(input.date_of_joining, "Date of joining", today);
    if let (Some(joined), Some(relieved)) = (input.date_of_joining, input.date_of_relieve) {
        report.check(relieved >= joined, "Date of relieve must not precede date of joining");
    }
    if let Some(year) = input.year_of_allotment {
        report.check(year <= today.year(), "Year of allotment cannot be in the future");
    }
    for (i, course) in input.courses_handled.iter().enumerate() {
        if let (Some(from), Some(to)) = (course.from_date, course.to_date) {
            report.check(to >= from, format!("Course {}: end date must not precede start date", i + 1));
        }
    }
    report.into_result()
}

/// Validate any asset record payload with the rules of its form
pub fn validate_payload(payload: &RecordPayload, today: NaiveDate) -> AppResult<()> {
    match payload {
        RecordPayload::Store(e) => validate_store(e, today),
        RecordPayload::Issue(e) => validate_issue(e, today),
        RecordPayload::Service(e) => validate_service(e, today),
        RecordPayload::Maintenance(e) => validate_maintenance(e, today),
        RecordPayload::Return(e) => validate_return(e, today),
        RecordPayload::ItemDisposal(e) => validate_item_disposal(e, today),
        RecordPayload::BuildingDisposal(e) => validate_building_disposal(e, today),
        RecordPayload::BuildingUpgrade(e) => validate_upgrades(e, today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::asset::BuildingDetails;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn messages(result: AppResult<()>) -> Vec<String> {
        match result {
            Err(AppError::InvalidRecord(messages)) => messages,
            other => panic!("expected invalid record, got {:?}", other),
        }
    }

    fn store_entry(items: Vec<AssetItem>) -> StoreEntry {
        StoreEntry {
            asset_type: AssetType::Permanent,
            asset_category: "Furniture".to_string(),
            other_category: None,
            sub_category: None,
            entry_date: today(),
            purchase_date: Some(today()),
            supplier_name: Some("Sri Traders".to_string()),
            supplier_address: None,
            source: None,
            mode_of_purchase: None,
            bill_no: None,
            received_by: None,
            bill_photo_url: None,
            items,
            building: None,
            land: None,
        }
    }

    fn item(quantity: i32, ids: &[&str]) -> AssetItem {
        AssetItem {
            item_name: "Chair".to_string(),
            quantity_received: quantity,
            unit_price: Decimal::from(1500),
            show_id_inputs: !ids.is_empty(),
            item_ids: ids.iter().map(|s| s.to_string()).collect(),
            ..AssetItem::default()
        }
    }

    #[test]
    fn test_future_date() {
        let t = today();
        assert!(is_future_date(t.succ_opt().unwrap(), t));
        assert!(!is_future_date(t, t));
        assert!(!is_future_date(t.pred_opt().unwrap(), t));
    }

    #[test]
    fn test_future_date_str() {
        let t = today();
        assert!(is_future_date_str("2024-06-16", t));
        assert!(is_future_date_str("2024-06-16T00:00:00.000Z", t));
        assert!(!is_future_date_str("2024-06-15", t));
        assert!(!is_future_date_str("", t));
        assert!(!is_future_date_str("   ", t));
        assert!(!is_future_date_str("not a date", t));
    }

    #[test]
    fn test_duplicate_ids() {
        let dups = find_duplicate_ids(["A1", "B2", "A1", "", "  ", "", "B2", "A1", "c3", "C3"]);
        assert_eq!(dups, vec!["A1".to_string(), "B2".to_string()]);
        assert!(find_duplicate_ids(["x", "X", ""]).is_empty());
        assert!(find_duplicate_ids(Vec::<&str>::new()).is_empty());
    }

    #[test]
    fn test_store_duplicate_ids_rejected() {
        let entry = store_entry(vec![item(2, &["A1", "A1"])]);
        let msgs = messages(validate_store(&entry, today()));
        assert!(msgs.iter().any(|m| m.contains("Duplicate item IDs") && m.contains("A1")));
    }

    #[test]
    fn test_store_duplicates_across_items() {
        let entry = store_entry(vec![item(1, &["T-9"]), item(1, &["T-9"])]);
        let msgs = messages(validate_store(&entry, today()));
        assert_eq!(msgs, vec!["Duplicate item IDs found: T-9".to_string()]);
    }

    #[test]
    fn test_store_collects_every_message() {
        let mut entry = store_entry(vec![item(0, &[])]);
        entry.supplier_name = None;
        entry.purchase_date = Some(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap());
        entry.items[0].unit_price = Decimal::ZERO;
        let msgs = messages(validate_store(&entry, today()));
        assert_eq!(msgs.len(), 4, "{:?}", msgs);
        assert!(msgs.contains(&"Purchase date cannot be in the future".to_string()));
        assert!(msgs.contains(&"Supplier name is required".to_string()));
    }

    #[test]
    fn test_store_id_count_must_match_quantity() {
        let entry = store_entry(vec![item(3, &["A1", "A2"])]);
        let msgs = messages(validate_store(&entry, today()));
        assert_eq!(msgs, vec!["Item 1: quantity (3) must match the number of item IDs (2)".to_string()]);
    }

    #[test]
    fn test_store_total_price_overflow() {
        let mut payload = RecordPayload::parse(
            crate::models::RecordKind::Store,
            serde_json::json!({
                "assetType": "Permanent",
                "assetCategory": "Furniture",
                "entryDate": "2024-06-01",
                "purchaseDate": "2024-06-01",
                "supplierName": "Sri Traders",
                "items": [{
                    "itemName": "Chair",
                    "quantityReceived": 2,
                    "unitPrice": "79228162514264337593543950335"
                }]
            }),
        )
        .unwrap();
        payload.normalize();

        let RecordPayload::Store(ref entry) = payload else {
            panic!("expected a store record");
        };
        assert!(entry.items[0].total_price.is_none());
        let msgs = messages(validate_payload(&payload, today()));
        assert_eq!(msgs, vec!["Item 1: total price is too large".to_string()]);
    }

    #[test]
    fn test_permanent_units_without_ids_move_through_stock() {
        let intake = store_entry(vec![item(2, &[])]);
        assert!(validate_store(&intake, today()).is_ok());

        let issue: IssueEntry = serde_json::from_value(serde_json::json!({
            "assetType": "Permanent",
            "assetCategory": "Furniture",
            "itemName": "Chair",
            "issuedTo": "Hostel Warden",
            "location": "Hostel",
            "issuedDate": "2024-06-10",
            "quantity": 2,
            "itemIds": []
        }))
        .unwrap();
        assert!(validate_issue(&issue, today()).is_ok());

        let ret: ReturnEntry = serde_json::from_value(serde_json::json!({
            "assetType": "Permanent",
            "assetCategory": "Furniture",
            "itemName": "Chair",
            "location": "Hostel",
            "quantity": 1,
            "condition": "Good"
        }))
        .unwrap();
        assert!(validate_return(&ret, today()).is_ok());

        let mut partial = issue.clone();
        partial.item_ids = vec!["A1".to_string()];
        let msgs = messages(validate_issue(&partial, today()));
        assert_eq!(msgs, vec!["quantity (2) must match the number of item IDs (1)".to_string()]);
    }

    #[test]
    fn test_store_building_shape() {
        let mut entry = store_entry(vec![item(1, &[])]);
        entry.asset_category = "Building".to_string();
        entry.sub_category = Some("Hostel".to_string());
        let msgs = messages(validate_store(&entry, today()));
        assert!(msgs.contains(&"Building details are required".to_string()));
        assert!(msgs.contains(&"Items are not allowed for Building records".to_string()));

        entry.items.clear();
        entry.building = Some(BuildingDetails::default());
        assert!(validate_store(&entry, today()).is_ok());
    }

    #[test]
    fn test_amc_window() {
        let mut it = item(1, &[]);
        it.amc_from_date = NaiveDate::from_ymd_opt(2024, 5, 1);
        it.amc_to_date = NaiveDate::from_ymd_opt(2024, 4, 1);
        let msgs = messages(validate_store(&store_entry(vec![it]), today()));
        assert!(msgs[0].contains("AMC From Date"));
    }

    fn disposal(quantity: i32, ids: &[&str], category: &str) -> ItemDisposal {
        ItemDisposal {
            asset_type: AssetType::Permanent,
            asset_category: category.to_string(),
            item_name: "Projector".to_string(),
            sub_category: None,
            item_description: None,
            quantity,
            item_ids: ids.iter().map(|s| s.to_string()).collect(),
            purchase_value: None,
            book_value: None,
            inspection_date: None,
            condemnation_date: None,
            remark: None,
            disposal_value: None,
            method_of_disposal: Some("Auction".to_string()),
            other_method: None,
        }
    }

    #[test]
    fn test_disposal_quantity_must_match_ids() {
        assert!(validate_item_disposal(&disposal(2, &["P1", "P2"], "Electronics"), today()).is_ok());

        let msgs = messages(validate_item_disposal(&disposal(3, &["P1", "P2"], "Electronics"), today()));
        assert_eq!(msgs, vec!["Quantity (3) must equal the number of selected item IDs (2)".to_string()]);

        let mut consumable = disposal(5, &[], "Stationery");
        consumable.asset_type = AssetType::Consumable;
        assert!(validate_item_disposal(&consumable, today()).is_ok());
    }

    #[test]
    fn test_disposal_unresolved_others() {
        let mut d = disposal(1, &["P1"], "Electronics");
        d.method_of_disposal = Some("Others".to_string());
        let msgs = messages(validate_item_disposal(&d, today()));
        assert_eq!(msgs, vec!["Please specify the method of disposal".to_string()]);
    }

    #[test]
    fn test_maintenance_requires_building_and_custody() {
        let entry = MaintenanceEntry {
            asset_type: AssetType::Permanent,
            asset_category: "Furniture".to_string(),
            sub_category: Some("Hostel".to_string()),
            building_no: None,
            year_of_maintenance: Some(today()),
            cost: Some(Decimal::from(20000)),
            description: None,
            custody: None,
            agency: None,
        };
        let msgs = messages(validate_maintenance(&entry, today()));
        assert_eq!(msgs.len(), 2);
    }

    #[test]
    fn test_faculty_dates() {
        let input: FacultyInput = serde_json::from_value(serde_json::json!({
            "name": "R. Kumar",
            "facultyType": "internal",
            "dateOfJoining": "2020-01-01",
            "dateOfRelieve": "2019-12-31",
            "email": "",
        }))
        .unwrap();
        assert!(input.email.is_none());
        let msgs = messages(validate_faculty(&input, today()));
        assert_eq!(msgs, vec!["Date of relieve must not precede date of joining".to_string()]);
    }
}
