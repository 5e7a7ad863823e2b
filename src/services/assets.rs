//! Asset entry, lookups and rejected-record handling

use chrono::Local;
use serde_json::Value;
use sqlx::PgConnection;

use crate::{
    domain::{
        classify,
        lifecycle::{ApprovalAction, ApprovalState},
        validation::validate_payload,
        RejectedForm,
    },
    error::{AppError, AppResult},
    models::{
        enums::{AssetType, Condition, RecordKind, RecordStatus},
        record::{AssetRecord, CreatedRecord, RecordPayload, RejectedRecordView},
        returned::{ReturnedAssetRow, ReturnedAssetsQuery, ReturnedSource, StoreReturnedReceipt},
        stock::{AvailableQuantity, IssuedItem, ItemKey, ReturnedItem, StockQuery, StoreItem},
        upgrade::Upgrade,
        user::UserClaims,
    },
    repository::{records::RecordsRepository, Repository},
};

#[derive(Clone)]
pub struct AssetsService {
    repository: Repository,
}

fn key_of(query: &StockQuery) -> AppResult<ItemKey> {
    let required = |value: &Option<String>, label: &str| {
        value
            .clone()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::Validation(format!("{} is required", label)))
    };
    Ok(ItemKey {
        asset_type: query.asset_type,
        asset_category: required(&query.asset_category, "Asset category")?,
        item_name: required(&query.item_name, "Item name")?,
        sub_category: query.sub_category.clone(),
        item_description: query.item_description.clone(),
    })
}

/// Unit identifiers of an intake record must not already be recorded elsewhere.
///
/// Takes the identifier lock, so the caller inserts within the same transaction.
async fn check_ids_unused(
    conn: &mut PgConnection,
    payload: &RecordPayload,
    exclude: Option<i64>,
) -> AppResult<()> {
    let RecordPayload::Store(entry) = payload else {
        return Ok(());
    };
    let ids: Vec<String> = entry.item_ids().map(str::to_string).collect();
    if ids.is_empty() {
        return Ok(());
    }
    RecordsRepository::lock_item_ids(&mut *conn).await?;
    let taken = RecordsRepository::item_ids_in_use(&mut *conn, &ids, exclude).await?;
    if !taken.is_empty() {
        return Err(AppError::Conflict(format!(
            "Item IDs already recorded: {}",
            taken.join(", ")
        )));
    }
    Ok(())
}

fn blank_to_none(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

impl AssetsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Normalize, validate and store a record as pending approval
    pub async fn submit(&self, mut payload: RecordPayload, entered_by: &str) -> AppResult<CreatedRecord> {
        payload.normalize();
        validate_payload(&payload, Local::now().date_naive())?;

        let mut tx = self.repository.pool.begin().await?;
        check_ids_unused(&mut *tx, &payload, None).await?;
        let record = RecordsRepository::insert(&mut *tx, &payload, entered_by).await?;
        tx.commit().await?;

        tracing::info!(
            record_id = record.id,
            kind = %record.kind,
            entered_by,
            "asset record submitted for approval"
        );

        Ok(CreatedRecord {
            id: record.id,
            status: record.status,
            message: "Record submitted for approval".to_string(),
        })
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub async fn store_items(&self, query: &StockQuery) -> AppResult<Vec<StoreItem>> {
        self.repository.stock.store_items(query).await
    }

    /// Units and identifiers available in store for one item
    pub async fn store_item_details(&self, query: &StockQuery) -> AppResult<AvailableQuantity> {
        let key = key_of(query)?;
        let item = self.repository.stock.store_item(&key).await?;
        Ok(item
            .map(|i| AvailableQuantity {
                available: i.in_stock,
                item_ids: i.item_ids,
            })
            .unwrap_or(AvailableQuantity {
                available: 0,
                item_ids: Vec::new(),
            }))
    }

    /// Returned units waiting to be serviced
    pub async fn servicable_items(&self, query: &StockQuery) -> AppResult<Vec<ReturnedItem>> {
        self.repository
            .stock
            .returned_items(query, Some(Condition::ToBeServiced))
            .await
    }

    /// Returned units marked for disposal, summed over the matching rows
    pub async fn available_disposable_quantity(&self, query: &StockQuery) -> AppResult<AvailableQuantity> {
        let rows = self
            .repository
            .stock
            .returned_items(query, Some(Condition::ToBeDisposed))
            .await?;
        Ok(AvailableQuantity {
            available: rows.iter().map(|r| r.quantity).sum(),
            item_ids: rows.into_iter().flat_map(|r| r.item_ids).collect(),
        })
    }

    /// Issued units at a location that can be returned
    pub async fn store_items_for_return(&self, query: &StockQuery) -> AppResult<Vec<IssuedItem>> {
        if query.location.as_deref().map(str::trim).unwrap_or("").is_empty() {
            return Err(AppError::Validation("Location is required".to_string()));
        }
        self.repository.stock.issued_items(query).await
    }

    /// Saved return records plus issued rows still open for return
    pub async fn returned_assets(&self, query: &ReturnedAssetsQuery) -> AppResult<Vec<ReturnedAssetRow>> {
        let statuses = match query.status {
            Some(status) => vec![status],
            None => vec![RecordStatus::Pending, RecordStatus::Approved, RecordStatus::Rejected],
        };

        let mut rows = Vec::new();
        for status in statuses {
            let records = self
                .repository
                .records
                .list(
                    status,
                    Some(RecordKind::Return),
                    Some(std::slice::from_ref(&query.asset_type)),
                )
                .await?;
            for record in records {
                let RecordPayload::Return(entry) = record.payload else {
                    continue;
                };
                if query
                    .asset_category
                    .as_deref()
                    .is_some_and(|c| c != entry.asset_category)
                {
                    continue;
                }
                rows.push(ReturnedAssetRow {
                    source: ReturnedSource::Returned,
                    id: record.id,
                    asset_type: entry.asset_type,
                    asset_category: entry.asset_category,
                    item_name: entry.item_name,
                    sub_category: entry.sub_category,
                    item_description: entry.item_description,
                    location: entry.location,
                    quantity: entry.quantity,
                    item_ids: entry.item_ids,
                    condition: Some(entry.condition),
                    status: Some(record.status),
                    signed_receipt_url: entry.signed_receipt_url,
                });
            }
        }

        if query.status.is_none() {
            let stock_query = StockQuery {
                asset_type: query.asset_type,
                asset_category: query.asset_category.clone(),
                item_name: None,
                sub_category: None,
                item_description: None,
                location: None,
            };
            for issued in self.repository.stock.issued_items(&stock_query).await? {
                rows.push(ReturnedAssetRow {
                    source: ReturnedSource::Issued,
                    id: issued.id,
                    asset_type: query.asset_type,
                    asset_category: issued.asset_category,
                    item_name: issued.item_name,
                    sub_category: blank_to_none(issued.sub_category),
                    item_description: blank_to_none(issued.item_description),
                    location: issued.location,
                    quantity: issued.quantity,
                    item_ids: issued.item_ids,
                    condition: None,
                    status: None,
                    signed_receipt_url: None,
                });
            }
        }

        Ok(rows)
    }

    /// Upgrade history of one building, in approval order
    pub async fn building_upgrades(&self, sub_category: &str) -> AppResult<Vec<Upgrade>> {
        let records = self.repository.records.building_upgrades(sub_category).await?;
        Ok(records
            .into_iter()
            .filter_map(|r| match r.payload {
                RecordPayload::BuildingUpgrade(entry) => Some(entry.upgrades),
                _ => None,
            })
            .flatten()
            .collect())
    }

    /// Attach a signed receipt to a saved return record
    pub async fn store_returned_receipt(
        &self,
        data: &StoreReturnedReceipt,
        claims: &UserClaims,
    ) -> AppResult<()> {
        if data.signed_receipt_url.trim().is_empty() {
            return Err(AppError::Validation("Signed receipt is required".to_string()));
        }
        let mut tx = self.repository.pool.begin().await?;
        let mut record = RecordsRepository::lock_by_id(&mut *tx, data.record_id).await?;
        claims.require_asset_type(record.payload.asset_type())?;
        match record.payload {
            RecordPayload::Return(ref mut entry) => {
                entry.signed_receipt_url = Some(data.signed_receipt_url.trim().to_string());
            }
            _ => {
                return Err(AppError::BadRequest(format!(
                    "Record {} is not a return record",
                    data.record_id
                )))
            }
        }
        RecordsRepository::update_payload(&mut *tx, record.id, &record.payload).await?;
        tx.commit().await?;
        Ok(())
    }

    // =========================================================================
    // Rejected records
    // =========================================================================

    pub async fn rejected(&self, kind: Option<RecordKind>, access: Option<&[AssetType]>) -> AppResult<Vec<AssetRecord>> {
        self.repository.records.list(RecordStatus::Rejected, kind, access).await
    }

    /// Rejected record routed to the form that re-populates it
    pub async fn rejected_view(&self, id: i64, claims: &UserClaims) -> AppResult<RejectedRecordView> {
        let record = self.repository.records.get_by_id(id).await?;
        claims.require_asset_type(record.payload.asset_type())?;
        if record.status != RecordStatus::Rejected {
            return Err(AppError::NotFound(format!("Rejected record {} not found", id)));
        }
        let document = record.document()?;
        let classification = classify(&document);
        if classification.form.kind() != record.kind {
            tracing::warn!(
                record_id = id,
                kind = %record.kind,
                form = ?classification.form,
                "rejected record classified into a different form than its kind"
            );
        }
        Ok(RejectedRecordView {
            id: record.id,
            kind: record.kind,
            remark: record.remark,
            classification,
            document,
        })
    }

    /// Replace a rejected record by its corrected version, pending approval again.
    ///
    /// The rejected copy is deleted and the new record inserted in one transaction.
    pub async fn resubmit(
        &self,
        id: i64,
        form: Option<RejectedForm>,
        doc: Value,
        claims: &UserClaims,
    ) -> AppResult<CreatedRecord> {
        let mut tx = self.repository.pool.begin().await?;
        let record = RecordsRepository::lock_by_id(&mut *tx, id).await?;
        claims.require_asset_type(record.payload.asset_type())?;

        ApprovalState::from_parts(record.status, record.remark.as_deref())
            .apply(ApprovalAction::Resubmit)?;

        let kind = form.map(|f| f.kind()).unwrap_or(record.kind);
        let mut payload = RecordPayload::parse(kind, doc)?;
        claims.require_asset_type(payload.asset_type())?;
        payload.normalize();
        validate_payload(&payload, Local::now().date_naive())?;
        check_ids_unused(&mut *tx, &payload, Some(id)).await?;

        RecordsRepository::delete(&mut *tx, id).await?;
        let created = RecordsRepository::insert(&mut *tx, &payload, &claims.sub).await?;
        tx.commit().await?;

        tracing::info!(
            rejected_id = id,
            record_id = created.id,
            kind = %created.kind,
            "rejected record resubmitted"
        );

        Ok(CreatedRecord {
            id: created.id,
            status: created.status,
            message: "Record resubmitted for approval".to_string(),
        })
    }
}
