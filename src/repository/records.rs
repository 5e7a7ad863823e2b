//! Asset records repository

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{AssetType, RecordKind, RecordStatus},
        record::{AssetRecord, AssetRecordRow, RecordPayload},
    },
};

/// Advisory lock key held while unit identifiers are checked and inserted
const ITEM_IDS_LOCK: i64 = 0x4341_5346_4f53;

const COLUMNS: &str =
    "id, kind, status, remark, payload, entered_by, reviewed_by, reviewed_at, created_at, updated_at";

#[derive(Clone)]
pub struct RecordsRepository {
    pool: Pool<Postgres>,
}

impl RecordsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a pending record
    pub async fn insert(
        conn: &mut PgConnection,
        payload: &RecordPayload,
        entered_by: &str,
    ) -> AppResult<AssetRecord> {
        let row = sqlx::query_as::<_, AssetRecordRow>(&format!(
            r#"
            INSERT INTO asset_records (kind, status, asset_type, payload, entered_by)
            VALUES ($1, 'pending', $2, $3, $4)
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(payload.kind().as_str())
        .bind(payload.asset_type().as_str())
        .bind(sqlx::types::Json(payload.to_value()?))
        .bind(entered_by)
        .fetch_one(conn)
        .await?;

        row.try_into()
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<AssetRecord> {
        sqlx::query_as::<_, AssetRecordRow>(&format!(
            "SELECT {} FROM asset_records WHERE id = $1",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Record {} not found", id)))?
        .try_into()
    }

    /// Fetch a record and lock it for the rest of the transaction
    pub async fn lock_by_id(conn: &mut PgConnection, id: i64) -> AppResult<AssetRecord> {
        sqlx::query_as::<_, AssetRecordRow>(&format!(
            "SELECT {} FROM asset_records WHERE id = $1 FOR UPDATE",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Record {} not found", id)))?
        .try_into()
    }

    /// Records with a given status, newest first
    pub async fn list(
        &self,
        status: RecordStatus,
        kind: Option<RecordKind>,
        asset_types: Option<&[AssetType]>,
    ) -> AppResult<Vec<AssetRecord>> {
        let mut conditions = vec!["status = $1".to_string()];
        let mut idx = 2;

        if kind.is_some() {
            conditions.push(format!("kind = ${}", idx));
            idx += 1;
        }
        if asset_types.is_some() {
            conditions.push(format!("asset_type = ANY(${})", idx));
        }

        let query = format!(
            "SELECT {} FROM asset_records WHERE {} ORDER BY created_at DESC, id DESC",
            COLUMNS,
            conditions.join(" AND ")
        );

        let mut builder = sqlx::query_as::<_, AssetRecordRow>(&query).bind(status.as_str());
        if let Some(kind) = kind {
            builder = builder.bind(kind.as_str());
        }
        if let Some(types) = asset_types {
            let names: Vec<&str> = types.iter().map(AssetType::as_str).collect();
            builder = builder.bind(names);
        }

        builder
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(AssetRecord::try_from)
            .collect()
    }

    /// Approved records of the given kinds, oldest first
    pub async fn list_approved(
        &self,
        kinds: &[RecordKind],
        asset_type: Option<AssetType>,
    ) -> AppResult<Vec<AssetRecord>> {
        let kinds: Vec<&str> = kinds.iter().map(RecordKind::as_str).collect();
        let rows = sqlx::query_as::<_, AssetRecordRow>(&format!(
            r#"
            SELECT {} FROM asset_records
            WHERE status = 'approved' AND kind = ANY($1)
              AND ($2::TEXT IS NULL OR asset_type = $2)
            ORDER BY created_at, id
            "#,
            COLUMNS
        ))
        .bind(kinds)
        .bind(asset_type.map(|t| t.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(AssetRecord::try_from).collect()
    }

    pub async fn set_status(
        conn: &mut PgConnection,
        id: i64,
        status: RecordStatus,
        remark: Option<&str>,
        reviewed_by: &str,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE asset_records
            SET status = $2, remark = $3, reviewed_by = $4, reviewed_at = NOW(), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(remark)
        .bind(reviewed_by)
        .execute(conn)
        .await?;
        Ok(())
    }

    pub async fn update_payload(
        conn: &mut PgConnection,
        id: i64,
        payload: &RecordPayload,
    ) -> AppResult<()> {
        sqlx::query("UPDATE asset_records SET payload = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(sqlx::types::Json(payload.to_value()?))
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn delete(conn: &mut PgConnection, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM asset_records WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Record {} not found", id)));
        }
        Ok(())
    }

    /// Unit identifiers already recorded by live (pending or approved) intake records
    /// Serialize intake of unit identifiers until the caller's transaction ends
    pub async fn lock_item_ids(conn: &mut PgConnection) -> AppResult<()> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(ITEM_IDS_LOCK)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn item_ids_in_use(
        conn: &mut PgConnection,
        ids: &[String],
        exclude: Option<i64>,
    ) -> AppResult<Vec<String>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let taken = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT unit_id
            FROM asset_records r,
                 jsonb_array_elements(r.payload->'items') AS item,
                 jsonb_array_elements_text(item->'itemIds') AS unit_id
            WHERE r.kind = 'store'
              AND r.status <> 'rejected'
              AND ($2::BIGINT IS NULL OR r.id <> $2)
              AND unit_id = ANY($1)
            ORDER BY unit_id
            "#,
        )
        .bind(ids)
        .bind(exclude)
        .fetch_all(conn)
        .await?;
        Ok(taken)
    }

    /// Approved upgrade records of one building
    pub async fn building_upgrades(&self, sub_category: &str) -> AppResult<Vec<AssetRecord>> {
        let rows = sqlx::query_as::<_, AssetRecordRow>(&format!(
            r#"
            SELECT {} FROM asset_records
            WHERE kind = 'building_upgrade' AND status = 'approved'
              AND payload->>'subCategory' = $1
            ORDER BY created_at, id
            "#,
            COLUMNS
        ))
        .bind(sub_category)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(AssetRecord::try_from).collect()
    }
}
