//! Approval workflow for asset records.
//!
//! Approving a record applies its stock movement in the same transaction
//! that flips its status, so a failed movement leaves the record pending.

use sqlx::PgConnection;

use crate::{
    domain::lifecycle::{ApprovalAction, ApprovalState},
    error::AppResult,
    models::{
        enums::{CategoryShape, Condition, RecordKind, RecordStatus},
        record::{AssetRecord, AssetRecordView, RecordPayload},
        stock::ItemKey,
        user::UserClaims,
        AssetType,
    },
    repository::{records::RecordsRepository, stock::StockRepository, Repository},
};

#[derive(Clone)]
pub struct ApprovalsService {
    repository: Repository,
}

fn key(
    asset_type: AssetType,
    asset_category: &str,
    item_name: &str,
    sub_category: Option<&str>,
    item_description: Option<&str>,
) -> ItemKey {
    ItemKey {
        asset_type,
        asset_category: asset_category.to_string(),
        item_name: item_name.to_string(),
        sub_category: sub_category.map(str::to_string),
        item_description: item_description.map(str::to_string),
    }
}

/// Apply the stock movement of an approved record
async fn apply_stock(conn: &mut PgConnection, payload: &RecordPayload) -> AppResult<()> {
    match payload {
        RecordPayload::Store(e) => {
            if CategoryShape::of(&e.asset_category) != CategoryShape::Items {
                return Ok(());
            }
            for item in &e.items {
                let k = key(
                    e.asset_type,
                    &e.asset_category,
                    &item.item_name,
                    item.sub_category.as_deref().or(e.sub_category.as_deref()),
                    item.item_description.as_deref(),
                );
                StockRepository::add_to_store(&mut *conn, &k, item.quantity_received, &item.item_ids)
                    .await?;
            }
        }
        RecordPayload::Issue(e) => {
            let k = key(
                e.asset_type,
                &e.asset_category,
                &e.item_name,
                e.sub_category.as_deref(),
                e.item_description.as_deref(),
            );
            let store_id = StockRepository::take_from_store(&mut *conn, &k, e.quantity, &e.item_ids).await?;
            StockRepository::add_issued(
                &mut *conn,
                store_id,
                &k,
                &e.location,
                Some(e.issued_to.as_str()),
                e.quantity,
                &e.item_ids,
            )
            .await?;
        }
        RecordPayload::Return(e) => {
            let k = key(
                e.asset_type,
                &e.asset_category,
                &e.item_name,
                e.sub_category.as_deref(),
                e.item_description.as_deref(),
            );
            let store_id = StockRepository::store_item_id(&mut *conn, &k).await?;
            StockRepository::take_issued(&mut *conn, store_id, &e.location, e.quantity, &e.item_ids).await?;
            if e.condition == Condition::Good {
                StockRepository::add_to_store(&mut *conn, &k, e.quantity, &e.item_ids).await?;
            } else {
                StockRepository::add_returned(&mut *conn, store_id, &k, e.condition, e.quantity, &e.item_ids)
                    .await?;
            }
        }
        RecordPayload::Service(e) => {
            let k = key(
                e.asset_type,
                &e.asset_category,
                &e.item_name,
                e.sub_category.as_deref(),
                e.item_description.as_deref(),
            );
            let store_id = StockRepository::store_item_id(&mut *conn, &k).await?;
            StockRepository::take_returned(
                &mut *conn,
                store_id,
                Condition::ToBeServiced,
                e.quantity,
                &e.item_ids,
            )
            .await?;
            StockRepository::add_to_store(&mut *conn, &k, e.quantity, &e.item_ids).await?;
        }
        RecordPayload::ItemDisposal(e) => {
            let k = key(
                e.asset_type,
                &e.asset_category,
                &e.item_name,
                e.sub_category.as_deref(),
                e.item_description.as_deref(),
            );
            let store_id = StockRepository::store_item_id(&mut *conn, &k).await?;
            StockRepository::take_returned(
                &mut *conn,
                store_id,
                Condition::ToBeDisposed,
                e.quantity,
                &e.item_ids,
            )
            .await?;
            StockRepository::add_dead_stock(
                &mut *conn,
                store_id,
                &k,
                e.quantity,
                e.method_of_disposal.as_deref(),
            )
            .await?;
        }
        RecordPayload::Maintenance(_)
        | RecordPayload::BuildingDisposal(_)
        | RecordPayload::BuildingUpgrade(_) => {}
    }
    Ok(())
}

impl ApprovalsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Pending records visible to the reviewer (restricted to granted asset types)
    pub async fn pending(
        &self,
        claims: &UserClaims,
        kind: Option<RecordKind>,
        asset_type: Option<AssetType>,
    ) -> AppResult<Vec<AssetRecord>> {
        let scope = claims.asset_scope(asset_type)?;
        self.repository
            .records
            .list(RecordStatus::Pending, kind, scope.as_deref())
            .await
    }

    pub async fn get(&self, id: i64) -> AppResult<AssetRecord> {
        self.repository.records.get_by_id(id).await
    }

    pub async fn approve(&self, id: i64, reviewer: &UserClaims) -> AppResult<AssetRecordView> {
        self.transition(id, ApprovalAction::Approve, reviewer).await
    }

    pub async fn reject(&self, id: i64, remark: &str, reviewer: &UserClaims) -> AppResult<AssetRecordView> {
        self.transition(
            id,
            ApprovalAction::Reject {
                remark: remark.to_string(),
            },
            reviewer,
        )
        .await
    }

    async fn transition(&self, id: i64, action: ApprovalAction, reviewer: &UserClaims) -> AppResult<AssetRecordView> {
        let approving = action == ApprovalAction::Approve;
        let mut tx = self.repository.pool.begin().await?;

        let mut record = RecordsRepository::lock_by_id(&mut *tx, id).await?;
        reviewer.require_asset_type(record.payload.asset_type())?;

        let next = ApprovalState::from_parts(record.status, record.remark.as_deref()).apply(action)?;

        if approving {
            apply_stock(&mut *tx, &record.payload).await?;
        }

        RecordsRepository::set_status(&mut *tx, id, next.status(), next.remark(), &reviewer.sub).await?;
        tx.commit().await?;

        tracing::info!(
            record_id = id,
            kind = %record.kind,
            status = next.status().as_str(),
            reviewer = %reviewer.sub,
            "asset record reviewed"
        );

        record.status = next.status();
        record.remark = next.remark().map(str::to_string);
        record.reviewed_by = Some(reviewer.sub.clone());
        record.reviewed_at = Some(chrono::Utc::now());
        AssetRecordView::try_from(&record)
    }
}
