//! Report filters: typed form fields in, flat filter payload out.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::enums::{is_others, AssetType, CategoryShape, Condition};

/// Report tabs and the query endpoint serving each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum FilterTab {
    Purchase,
    StoreIssue,
    ServiceReturn,
    Disposal,
    DeadStock,
}

impl FilterTab {
    pub const ALL: [FilterTab; 5] = [
        FilterTab::Purchase,
        FilterTab::StoreIssue,
        FilterTab::ServiceReturn,
        FilterTab::Disposal,
        FilterTab::DeadStock,
    ];

    pub fn endpoint(&self) -> &'static str {
        match self {
            FilterTab::Purchase => "filterPurchase",
            FilterTab::StoreIssue => "filterStoreIssue",
            FilterTab::ServiceReturn => "filterServiceReturn",
            FilterTab::Disposal => "filterDisposal",
            FilterTab::DeadStock => "filterDeadStock",
        }
    }

    fn applies(&self, field: FilterField) -> bool {
        use FilterField::*;
        match field {
            AssetType | AssetCategory | SubCategory | ItemName | ItemDescription => true,
            SupplierName | Source | ModeOfPurchase => *self == FilterTab::Purchase,
            Location => matches!(self, FilterTab::StoreIssue | FilterTab::ServiceReturn),
            Condition => *self == FilterTab::ServiceReturn,
            MethodOfDisposal => matches!(self, FilterTab::Disposal | FilterTab::DeadStock),
            FromDate | ToDate => matches!(
                self,
                FilterTab::Purchase | FilterTab::ServiceReturn | FilterTab::Disposal
            ),
        }
    }
}

impl std::str::FromStr for FilterTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterTab::ALL
            .into_iter()
            .find(|tab| {
                tab.endpoint().eq_ignore_ascii_case(s)
                    || tab.endpoint().trim_start_matches("filter").eq_ignore_ascii_case(s)
            })
            .ok_or_else(|| format!("Unknown report: {}", s))
    }
}

/// Individual filter inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterField {
    AssetType,
    AssetCategory,
    SubCategory,
    ItemName,
    ItemDescription,
    SupplierName,
    Source,
    ModeOfPurchase,
    Location,
    Condition,
    MethodOfDisposal,
    FromDate,
    ToDate,
}

impl FilterField {
    /// Free-text search inputs wait for typing to settle before querying
    pub fn is_debounced(&self) -> bool {
        matches!(self, FilterField::ItemName | FilterField::SupplierName)
    }
}

/// A select input with an "Others" escape to a free-text field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub value: String,
    pub other: String,
}

impl Choice {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            other: String::new(),
        }
    }

    pub fn with_other(value: impl Into<String>, other: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            other: other.into(),
        }
    }

    /// Outgoing value: the free text replaces an "Others" selection
    pub fn resolve(&self) -> Option<String> {
        let value = self.value.trim();
        if value.is_empty() {
            return None;
        }
        if is_others(value) {
            let other = self.other.trim();
            return (!other.is_empty()).then(|| other.to_string());
        }
        Some(value.to_string())
    }
}

/// Filter inputs of one report tab, as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterForm {
    pub asset_type: Option<AssetType>,
    pub asset_category: Choice,
    pub sub_category: Choice,
    pub item_name: String,
    pub item_description: String,
    pub supplier_name: String,
    pub source: Choice,
    pub mode_of_purchase: Choice,
    pub location: Choice,
    pub condition: Option<Condition>,
    pub method_of_disposal: Choice,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

/// Flat filter sent to a report endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<AssetType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode_of_purchase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method_of_disposal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<NaiveDate>,
}

fn text(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Build the outgoing payload for `tab` from the form.
///
/// Fields that do not apply to the tab are dropped. Building and Land records
/// carry no items, so item name and description are never sent for them.
pub fn build_payload(tab: FilterTab, form: &FilterForm) -> FilterPayload {
    let keep = |field: FilterField| tab.applies(field);
    let asset_category = form.asset_category.resolve();
    let itemless = asset_category
        .as_deref()
        .map(|c| CategoryShape::of(c) != CategoryShape::Items)
        .unwrap_or(false);

    FilterPayload {
        asset_type: form.asset_type,
        asset_category,
        sub_category: form.sub_category.resolve(),
        item_name: (!itemless).then(|| text(&form.item_name)).flatten(),
        item_description: (!itemless).then(|| text(&form.item_description)).flatten(),
        supplier_name: keep(FilterField::SupplierName).then(|| text(&form.supplier_name)).flatten(),
        source: keep(FilterField::Source).then(|| form.source.resolve()).flatten(),
        mode_of_purchase: keep(FilterField::ModeOfPurchase)
            .then(|| form.mode_of_purchase.resolve())
            .flatten(),
        location: keep(FilterField::Location).then(|| form.location.resolve()).flatten(),
        condition: keep(FilterField::Condition).then_some(form.condition).flatten(),
        method_of_disposal: keep(FilterField::MethodOfDisposal)
            .then(|| form.method_of_disposal.resolve())
            .flatten(),
        from_date: keep(FilterField::FromDate).then_some(form.from_date).flatten(),
        to_date: keep(FilterField::ToDate).then_some(form.to_date).flatten(),
    }
}

impl FilterPayload {
    /// Exact (case-insensitive) match for select filters
    pub fn select_matches(filter: Option<&str>, value: Option<&str>) -> bool {
        match filter {
            None => true,
            Some(f) => value.map(|v| v.trim().eq_ignore_ascii_case(f.trim())).unwrap_or(false),
        }
    }

    /// Substring (case-insensitive) match for free-text filters
    pub fn text_matches(filter: Option<&str>, value: Option<&str>) -> bool {
        match filter {
            None => true,
            Some(f) => value
                .map(|v| v.to_lowercase().contains(&f.trim().to_lowercase()))
                .unwrap_or(false),
        }
    }

    pub fn date_matches(&self, date: Option<NaiveDate>) -> bool {
        if self.from_date.is_none() && self.to_date.is_none() {
            return true;
        }
        match date {
            None => false,
            Some(d) => {
                self.from_date.map(|from| d >= from).unwrap_or(true)
                    && self.to_date.map(|to| d <= to).unwrap_or(true)
            }
        }
    }

    /// Item identity filters shared by every tab
    pub fn item_matches(
        &self,
        asset_category: &str,
        sub_category: Option<&str>,
        item_name: Option<&str>,
        item_description: Option<&str>,
    ) -> bool {
        Self::select_matches(self.asset_category.as_deref(), Some(asset_category))
            && Self::select_matches(self.sub_category.as_deref(), sub_category)
            && Self::text_matches(self.item_name.as_deref(), item_name)
            && Self::text_matches(self.item_description.as_deref(), item_description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn purchase_form() -> FilterForm {
        FilterForm {
            asset_type: Some(AssetType::Permanent),
            item_name: "Chair".to_string(),
            supplier_name: " Sri ".to_string(),
            location: Choice::new("Hostel"),
            ..FilterForm::default()
        }
    }

    #[test]
    fn test_others_is_replaced_by_free_text() {
        let mut form = purchase_form();
        form.source = Choice::with_other("Others", "Donation by alumni");
        form.mode_of_purchase = Choice::with_other("GeM", "ignored");
        let payload = build_payload(FilterTab::Purchase, &form);
        assert_eq!(payload.source.as_deref(), Some("Donation by alumni"));
        assert_eq!(payload.mode_of_purchase.as_deref(), Some("GeM"));
        assert_eq!(payload.supplier_name.as_deref(), Some("Sri"));
    }

    #[test]
    fn test_blank_other_text_sends_nothing() {
        assert_eq!(Choice::with_other("Other", "  ").resolve(), None);
        assert_eq!(Choice::new("").resolve(), None);
    }

    #[test]
    fn test_building_drops_item_name() {
        let mut form = purchase_form();
        let payload = build_payload(FilterTab::Purchase, &form);
        assert_eq!(payload.item_name.as_deref(), Some("Chair"));

        form.asset_category = Choice::new("Building");
        let payload = build_payload(FilterTab::Purchase, &form);
        assert_eq!(payload.asset_category.as_deref(), Some("Building"));
        assert_eq!(payload.item_name, None);
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("itemName").is_none());
    }

    #[test]
    fn test_fields_outside_tab_are_dropped() {
        let payload = build_payload(FilterTab::Purchase, &purchase_form());
        assert_eq!(payload.location, None);
        let payload = build_payload(FilterTab::StoreIssue, &purchase_form());
        assert_eq!(payload.location.as_deref(), Some("Hostel"));
        assert_eq!(payload.supplier_name, None);
    }

    #[test]
    fn test_tab_from_endpoint_name() {
        assert_eq!("filterDeadStock".parse::<FilterTab>(), Ok(FilterTab::DeadStock));
        assert_eq!("purchase".parse::<FilterTab>(), Ok(FilterTab::Purchase));
        assert!("filterEverything".parse::<FilterTab>().is_err());
    }

    #[test]
    fn test_matching_helpers() {
        let payload = FilterPayload {
            item_name: Some("chair".into()),
            from_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..FilterPayload::default()
        };
        assert!(payload.item_matches("Furniture", None, Some("Office Chair"), None));
        assert!(!payload.item_matches("Furniture", None, Some("Table"), None));
        assert!(payload.date_matches(NaiveDate::from_ymd_opt(2024, 3, 1)));
        assert!(!payload.date_matches(NaiveDate::from_ymd_opt(2023, 12, 31)));
        assert!(!payload.date_matches(None));
    }
}
