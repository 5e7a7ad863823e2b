//! Report columns and CSV export.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::filter::{FilterPayload, FilterTab};
use super::sort::{display_value, ColumnKind, SortDirection};
use crate::error::{AppError, AppResult};

/// Export request: the tab's filters plus the visible sort
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    #[serde(flatten)]
    pub filters: FilterPayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,
    #[serde(default)]
    pub sort_direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub key: &'static str,
    pub header: &'static str,
    pub kind: ColumnKind,
}

const fn text(key: &'static str, header: &'static str) -> Column {
    Column { key, header, kind: ColumnKind::Text }
}

const fn number(key: &'static str, header: &'static str) -> Column {
    Column { key, header, kind: ColumnKind::Number }
}

const fn date(key: &'static str, header: &'static str) -> Column {
    Column { key, header, kind: ColumnKind::Date }
}

const PURCHASE: &[Column] = &[
    text("assetType", "Asset Type"),
    text("assetCategory", "Asset Category"),
    text("subCategory", "Sub Category"),
    text("itemName", "Item Name"),
    text("itemDescription", "Item Description"),
    date("entryDate", "Entry Date"),
    date("purchaseDate", "Purchase Date"),
    text("supplierName", "Supplier Name"),
    text("source", "Source"),
    text("modeOfPurchase", "Mode of Purchase"),
    text("billNo", "Bill No"),
    text("receivedBy", "Received By"),
    number("quantityReceived", "Quantity Received"),
    number("unitPrice", "Unit Price"),
    number("totalPrice", "Total Price"),
    text("itemIds", "Item IDs"),
];

const STORE_ISSUE: &[Column] = &[
    text("assetType", "Asset Type"),
    text("assetCategory", "Asset Category"),
    text("subCategory", "Sub Category"),
    text("itemName", "Item Name"),
    text("itemDescription", "Item Description"),
    text("location", "Location"),
    text("issuedTo", "Issued To"),
    number("quantity", "Quantity"),
    text("itemIds", "Item IDs"),
];

const SERVICE_RETURN: &[Column] = &[
    text("recordType", "Record Type"),
    text("assetType", "Asset Type"),
    text("assetCategory", "Asset Category"),
    text("subCategory", "Sub Category"),
    text("itemName", "Item Name"),
    text("itemDescription", "Item Description"),
    text("location", "Location"),
    text("condition", "Condition"),
    number("quantity", "Quantity"),
    text("itemIds", "Item IDs"),
    text("serviceNo", "Service No"),
    date("serviceDate", "Service Date"),
    number("serviceAmount", "Service Amount"),
    date("returnedDate", "Returned Date"),
];

const DISPOSAL: &[Column] = &[
    text("assetType", "Asset Type"),
    text("assetCategory", "Asset Category"),
    text("subCategory", "Sub Category"),
    text("itemName", "Item Name"),
    text("itemDescription", "Item Description"),
    number("quantity", "Quantity"),
    text("itemIds", "Item IDs"),
    number("purchaseValue", "Purchase Value"),
    number("bookValue", "Book Value"),
    date("inspectionDate", "Inspection Date"),
    date("condemnationDate", "Condemnation Date"),
    number("disposalValue", "Disposal Value"),
    text("methodOfDisposal", "Method of Disposal"),
    text("remark", "Remark"),
];

const DEAD_STOCK: &[Column] = &[
    text("assetType", "Asset Type"),
    text("assetCategory", "Asset Category"),
    text("subCategory", "Sub Category"),
    text("itemName", "Item Name"),
    text("itemDescription", "Item Description"),
    number("overallQuantity", "Overall Quantity"),
    number("servicableQuantity", "Servicable Quantity"),
    number("condemnedQuantity", "Condemned Quantity"),
    text("methodOfDisposal", "Method of Disposal"),
    text("remarks", "Remarks"),
];

/// Visible columns of a report tab, in display order
pub fn columns(tab: FilterTab) -> &'static [Column] {
    match tab {
        FilterTab::Purchase => PURCHASE,
        FilterTab::StoreIssue => STORE_ISSUE,
        FilterTab::ServiceReturn => SERVICE_RETURN,
        FilterTab::Disposal => DISPOSAL,
        FilterTab::DeadStock => DEAD_STOCK,
    }
}

/// Comparison kind of a column; unknown keys compare as text
pub fn column_kind(tab: FilterTab, key: &str) -> ColumnKind {
    columns(tab)
        .iter()
        .find(|c| c.key == key)
        .map(|c| c.kind)
        .unwrap_or(ColumnKind::Text)
}

/// Render rows as CSV with a header line
pub fn to_csv(tab: FilterTab, rows: &[Value]) -> AppResult<Vec<u8>> {
    let columns = columns(tab);
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(columns.iter().map(|c| c.header))
        .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))?;

    for row in rows {
        writer
            .write_record(columns.iter().map(|c| display_value(row.get(c.key))))
            .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV flush failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_csv_mirrors_visible_columns() {
        let rows = vec![json!({
            "assetType": "Permanent",
            "assetCategory": "Furniture",
            "itemName": "Chair, wooden",
            "location": "Hostel",
            "quantity": 4,
            "itemIds": ["C1", "C2"],
            "internalNote": "not exported",
        })];
        let csv = String::from_utf8(to_csv(FilterTab::StoreIssue, &rows).unwrap()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Asset Type,Asset Category,Sub Category,Item Name,Item Description,Location,Issued To,Quantity,Item IDs")
        );
        assert_eq!(
            lines.next(),
            Some("Permanent,Furniture,,\"Chair, wooden\",,Hostel,,4,\"C1, C2\"")
        );
        assert!(!csv.contains("not exported"));
    }

    #[test]
    fn test_column_kinds() {
        assert_eq!(column_kind(FilterTab::Purchase, "unitPrice"), ColumnKind::Number);
        assert_eq!(column_kind(FilterTab::Purchase, "billDate"), ColumnKind::Text);
        assert_eq!(column_kind(FilterTab::Disposal, "inspectionDate"), ColumnKind::Date);
    }
}
