//! Report queries: flat rows per tab, filtered server-side

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    domain::{
        export::{self, ExportRequest},
        sort, FilterPayload, FilterTab,
    },
    error::{AppError, AppResult},
    models::{
        enums::{CategoryShape, RecordKind},
        record::{AssetRecord, RecordPayload},
        stock::{DeadStockItem, DeadStockQuantityUpdate},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
}

fn to_object<T: Serialize>(value: &T) -> AppResult<Map<String, Value>> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::Internal("Report row is not an object".to_string())),
        Err(e) => Err(AppError::Internal(format!("Failed to encode report row: {}", e))),
    }
}

/// Record payload as a flat row (kind tag replaced by the record id)
fn record_row(record: &AssetRecord, record_type: Option<&str>) -> AppResult<Map<String, Value>> {
    let mut row = to_object(&record.payload)?;
    row.remove("kind");
    row.insert("id".into(), Value::from(record.id));
    if let Some(t) = record_type {
        row.insert("recordType".into(), Value::String(t.to_string()));
    }
    Ok(row)
}

fn text(row: &Map<String, Value>, key: &str) -> Option<String> {
    row.get(key).and_then(Value::as_str).map(str::to_string)
}

impl ReportsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Rows of a report tab matching the filters
    pub async fn filter(&self, tab: FilterTab, filters: &FilterPayload) -> AppResult<Vec<Value>> {
        let rows = match tab {
            FilterTab::Purchase => self.purchase(filters).await?,
            FilterTab::StoreIssue => self.store_issue(filters).await?,
            FilterTab::ServiceReturn => self.service_return(filters).await?,
            FilterTab::Disposal => self.disposal(filters).await?,
            FilterTab::DeadStock => self.dead_stock(filters).await?,
        };
        tracing::debug!(tab = tab.endpoint(), rows = rows.len(), "report filtered");
        Ok(rows.into_iter().map(Value::Object).collect())
    }

    /// Filter, sort and render a tab as CSV
    pub async fn export(&self, tab: FilterTab, request: &ExportRequest) -> AppResult<Vec<u8>> {
        let mut rows = self.filter(tab, &request.filters).await?;
        if let Some(ref key) = request.sort_key {
            sort::sort_rows(&mut rows, key, export::column_kind(tab, key), request.sort_direction);
        }
        export::to_csv(tab, &rows)
    }

    pub async fn update_dead_stock(&self, updates: &[DeadStockQuantityUpdate]) -> AppResult<Vec<DeadStockItem>> {
        if updates.is_empty() {
            return Err(AppError::Validation("No dead stock updates given".to_string()));
        }
        self.repository.stock.update_dead_stock(updates).await
    }

    async fn purchase(&self, f: &FilterPayload) -> AppResult<Vec<Map<String, Value>>> {
        let records = self
            .repository
            .records
            .list_approved(&[RecordKind::Store], f.asset_type)
            .await?;

        let mut rows = Vec::new();
        for record in &records {
            let RecordPayload::Store(entry) = &record.payload else {
                continue;
            };
            if !FilterPayload::select_matches(f.source.as_deref(), entry.source.as_deref())
                || !FilterPayload::select_matches(f.mode_of_purchase.as_deref(), entry.mode_of_purchase.as_deref())
                || !FilterPayload::text_matches(f.supplier_name.as_deref(), entry.supplier_name.as_deref())
                || !f.date_matches(record.payload.record_date())
            {
                continue;
            }

            let mut base = record_row(record, None)?;
            base.remove("items");

            match CategoryShape::of(&entry.asset_category) {
                CategoryShape::Building | CategoryShape::Land => {
                    if !f.item_matches(&entry.asset_category, entry.sub_category.as_deref(), None, None) {
                        continue;
                    }
                    for section in ["building", "land"] {
                        if let Some(Value::Object(details)) = base.remove(section) {
                            base.extend(details);
                        }
                    }
                    rows.push(base);
                }
                CategoryShape::Items => {
                    base.remove("building");
                    base.remove("land");
                    for item in &entry.items {
                        let sub = item.sub_category.as_deref().or(entry.sub_category.as_deref());
                        if !f.item_matches(
                            &entry.asset_category,
                            sub,
                            Some(&item.item_name),
                            item.item_description.as_deref(),
                        ) {
                            continue;
                        }
                        let mut row = base.clone();
                        row.extend(to_object(item)?);
                        if let Some(sub) = sub {
                            row.insert("subCategory".into(), Value::String(sub.to_string()));
                        }
                        rows.push(row);
                    }
                }
            }
        }
        Ok(rows)
    }

    async fn store_issue(&self, f: &FilterPayload) -> AppResult<Vec<Map<String, Value>>> {
        let mut rows = Vec::new();

        let in_store = self.repository.stock.all_in_store(f.asset_type).await?;
        for item in &in_store {
            let mut row = to_object(item)?;
            row.insert("location".into(), Value::String("Store".to_string()));
            row.insert("quantity".into(), Value::from(item.in_stock));
            rows.push(row);
        }
        for item in &self.repository.stock.all_issued(f.asset_type).await? {
            rows.push(to_object(item)?);
        }

        rows.retain(|row| {
            f.item_matches(
                row.get("assetCategory").and_then(Value::as_str).unwrap_or_default(),
                text(row, "subCategory").as_deref(),
                text(row, "itemName").as_deref(),
                text(row, "itemDescription").as_deref(),
            ) && FilterPayload::select_matches(f.location.as_deref(), text(row, "location").as_deref())
        });
        Ok(rows)
    }

    async fn service_return(&self, f: &FilterPayload) -> AppResult<Vec<Map<String, Value>>> {
        let records = self
            .repository
            .records
            .list_approved(&[RecordKind::Service, RecordKind::Return], f.asset_type)
            .await?;

        let mut rows = Vec::new();
        for record in &records {
            let (record_type, location, condition) = match &record.payload {
                RecordPayload::Service(_) => ("Service", None, None),
                RecordPayload::Return(e) => ("Return", Some(e.location.as_str()), Some(e.condition.as_str())),
                _ => continue,
            };
            if f.location.is_some() && !FilterPayload::select_matches(f.location.as_deref(), location) {
                continue;
            }
            if let Some(wanted) = f.condition {
                if condition != Some(wanted.as_str()) {
                    continue;
                }
            }
            if !f.date_matches(record.payload.record_date())
                || !f.item_matches(
                    record.payload.asset_category(),
                    record.payload.sub_category(),
                    record.payload.item_name(),
                    record_description(&record.payload),
                )
            {
                continue;
            }
            rows.push(record_row(record, Some(record_type))?);
        }
        Ok(rows)
    }

    async fn disposal(&self, f: &FilterPayload) -> AppResult<Vec<Map<String, Value>>> {
        let records = self
            .repository
            .records
            .list_approved(&[RecordKind::ItemDisposal, RecordKind::BuildingDisposal], f.asset_type)
            .await?;

        let mut rows = Vec::new();
        for record in &records {
            let method = match &record.payload {
                RecordPayload::ItemDisposal(e) => e.method_of_disposal.as_deref(),
                RecordPayload::BuildingDisposal(e) => e.method_of_disposal.as_deref(),
                _ => continue,
            };
            if !FilterPayload::select_matches(f.method_of_disposal.as_deref(), method)
                || !f.date_matches(record.payload.record_date())
                || !f.item_matches(
                    record.payload.asset_category(),
                    record.payload.sub_category(),
                    record.payload.item_name(),
                    record_description(&record.payload),
                )
            {
                continue;
            }
            rows.push(record_row(record, None)?);
        }
        Ok(rows)
    }

    async fn dead_stock(&self, f: &FilterPayload) -> AppResult<Vec<Map<String, Value>>> {
        let items = self.repository.stock.dead_stock(f.asset_type).await?;
        let mut rows = Vec::new();
        for item in &items {
            let sub = (!item.sub_category.is_empty()).then_some(item.sub_category.as_str());
            let description = (!item.item_description.is_empty()).then_some(item.item_description.as_str());
            if !f.item_matches(&item.asset_category, sub, Some(&item.item_name), description)
                || !FilterPayload::select_matches(
                    f.method_of_disposal.as_deref(),
                    item.method_of_disposal.as_deref(),
                )
            {
                continue;
            }
            rows.push(to_object(item)?);
        }
        Ok(rows)
    }
}

fn record_description(payload: &RecordPayload) -> Option<&str> {
    match payload {
        RecordPayload::Service(e) => e.item_description.as_deref(),
        RecordPayload::Return(e) => e.item_description.as_deref(),
        RecordPayload::ItemDisposal(e) => e.item_description.as_deref(),
        RecordPayload::Issue(e) => e.item_description.as_deref(),
        _ => None,
    }
}
