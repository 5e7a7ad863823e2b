//! Stock ledger repository: store, issued, returned and dead stock tables

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{AssetType, Condition},
        stock::{
            DeadStockItem, DeadStockQuantityUpdate, IssuedItem, ItemKey, ReturnedItem, StockQuery,
            StoreItem,
        },
    },
};

/// Remove `quantity` units (and the given identifiers) from a holding.
///
/// `ids` is either empty or names every unit moved. Without identifiers only
/// the holding's unidentified units can be taken.
///
/// Returns the remaining quantity and identifiers.
pub fn withdraw(
    available: i32,
    held: &[String],
    quantity: i32,
    ids: &[String],
    what: &str,
) -> AppResult<(i32, Vec<String>)> {
    if quantity <= 0 {
        return Err(AppError::Validation("Quantity must be greater than 0".to_string()));
    }
    if quantity > available {
        return Err(AppError::BusinessRule(format!(
            "Insufficient quantity for {}: {} available, {} requested",
            what, available, quantity
        )));
    }
    if ids.is_empty() {
        let unidentified = available.saturating_sub(held.len() as i32).max(0);
        if quantity > unidentified {
            return Err(AppError::BusinessRule(format!(
                "Item IDs are required for {}: only {} units are held without IDs",
                what, unidentified
            )));
        }
        return Ok((available - quantity, held.to_vec()));
    }
    if ids.len() != quantity as usize {
        return Err(AppError::Validation(format!(
            "Quantity ({}) must match the number of item IDs ({})",
            quantity,
            ids.len()
        )));
    }
    let missing: Vec<&str> = ids
        .iter()
        .filter(|id| !held.contains(id))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        return Err(AppError::BusinessRule(format!(
            "Item IDs not available for {}: {}",
            what,
            missing.join(", ")
        )));
    }
    let remaining = held.iter().filter(|id| !ids.contains(id)).cloned().collect();
    Ok((available - quantity, remaining))
}

const STORE_COLUMNS: &str =
    "id, asset_type, asset_category, item_name, sub_category, item_description, in_stock, item_ids, updated_at";

const ISSUED_COLUMNS: &str = "id, store_item_id, asset_type, asset_category, item_name, sub_category, \
     item_description, location, issued_to, quantity, item_ids, updated_at";

const RETURNED_COLUMNS: &str = "id, store_item_id, asset_type, asset_category, item_name, sub_category, \
     item_description, condition, quantity, item_ids, updated_at";

const DEAD_STOCK_COLUMNS: &str = "id, store_item_id, asset_type, asset_category, item_name, sub_category, \
     item_description, overall_quantity, servicable_quantity, condemned_quantity, method_of_disposal, \
     remarks, updated_at";

/// WHERE clause for the item identity filters of a stock query, starting at `$start`
fn stock_conditions(query: &StockQuery, start: usize) -> (Vec<String>, usize) {
    let mut conditions = vec![format!("asset_type = ${}", start)];
    let mut idx = start + 1;
    for (value, column) in [
        (&query.asset_category, "asset_category"),
        (&query.item_name, "item_name"),
        (&query.sub_category, "sub_category"),
        (&query.item_description, "item_description"),
    ] {
        if value.is_some() {
            conditions.push(format!("{} = ${}", column, idx));
            idx += 1;
        }
    }
    (conditions, idx)
}

macro_rules! bind_stock_query {
    ($builder:expr, $query:expr) => {{
        let mut builder = $builder.bind($query.asset_type.as_str());
        for value in [
            &$query.asset_category,
            &$query.item_name,
            &$query.sub_category,
            &$query.item_description,
        ]
        .into_iter()
        .flatten()
        {
            builder = builder.bind(value.clone());
        }
        builder
    }};
}

#[derive(Clone)]
pub struct StockRepository {
    pool: Pool<Postgres>,
}

impl StockRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Store rows with units in stock
    pub async fn store_items(&self, query: &StockQuery) -> AppResult<Vec<StoreItem>> {
        let (conditions, _) = stock_conditions(query, 1);
        let sql = format!(
            "SELECT {} FROM store_items WHERE {} AND in_stock > 0 ORDER BY asset_category, item_name",
            STORE_COLUMNS,
            conditions.join(" AND ")
        );
        let builder = bind_stock_query!(sqlx::query_as::<_, StoreItem>(&sql), query);
        Ok(builder.fetch_all(&self.pool).await?)
    }

    pub async fn store_item(&self, key: &ItemKey) -> AppResult<Option<StoreItem>> {
        let row = sqlx::query_as::<_, StoreItem>(&format!(
            r#"
            SELECT {} FROM store_items
            WHERE asset_type = $1 AND asset_category = $2 AND item_name = $3
              AND sub_category = $4 AND item_description = $5
            "#,
            STORE_COLUMNS
        ))
        .bind(key.asset_type.as_str())
        .bind(&key.asset_category)
        .bind(&key.item_name)
        .bind(key.sub())
        .bind(key.description())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Issued rows, optionally restricted to one location
    pub async fn issued_items(&self, query: &StockQuery) -> AppResult<Vec<IssuedItem>> {
        let (mut conditions, idx) = stock_conditions(query, 1);
        if query.location.is_some() {
            conditions.push(format!("location = ${}", idx));
        }
        let sql = format!(
            "SELECT {} FROM issued_items WHERE {} AND quantity > 0 ORDER BY location, item_name",
            ISSUED_COLUMNS,
            conditions.join(" AND ")
        );
        let mut builder = bind_stock_query!(sqlx::query_as::<_, IssuedItem>(&sql), query);
        if let Some(ref location) = query.location {
            builder = builder.bind(location);
        }
        Ok(builder.fetch_all(&self.pool).await?)
    }

    /// Returned rows, optionally restricted to one condition
    pub async fn returned_items(
        &self,
        query: &StockQuery,
        condition: Option<Condition>,
    ) -> AppResult<Vec<ReturnedItem>> {
        let (mut conditions, idx) = stock_conditions(query, 1);
        if condition.is_some() {
            conditions.push(format!("condition = ${}", idx));
        }
        let sql = format!(
            "SELECT {} FROM returned_items WHERE {} AND quantity > 0 ORDER BY item_name",
            RETURNED_COLUMNS,
            conditions.join(" AND ")
        );
        let mut builder = bind_stock_query!(sqlx::query_as::<_, ReturnedItem>(&sql), query);
        if let Some(condition) = condition {
            builder = builder.bind(condition.as_str());
        }
        Ok(builder.fetch_all(&self.pool).await?)
    }

    pub async fn dead_stock(&self, asset_type: Option<AssetType>) -> AppResult<Vec<DeadStockItem>> {
        let rows = sqlx::query_as::<_, DeadStockItem>(&format!(
            r#"
            SELECT {} FROM dead_stock
            WHERE ($1::TEXT IS NULL OR asset_type = $1)
            ORDER BY asset_category, item_name
            "#,
            DEAD_STOCK_COLUMNS
        ))
        .bind(asset_type.map(|t| t.as_str()))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Every issued row, for the store/issue report
    pub async fn all_issued(&self, asset_type: Option<AssetType>) -> AppResult<Vec<IssuedItem>> {
        let rows = sqlx::query_as::<_, IssuedItem>(&format!(
            r#"
            SELECT {} FROM issued_items
            WHERE quantity > 0 AND ($1::TEXT IS NULL OR asset_type = $1)
            ORDER BY location, item_name
            "#,
            ISSUED_COLUMNS
        ))
        .bind(asset_type.map(|t| t.as_str()))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Every store row with units in stock, for the store/issue report
    pub async fn all_in_store(&self, asset_type: Option<AssetType>) -> AppResult<Vec<StoreItem>> {
        let rows = sqlx::query_as::<_, StoreItem>(&format!(
            r#"
            SELECT {} FROM store_items
            WHERE in_stock > 0 AND ($1::TEXT IS NULL OR asset_type = $1)
            ORDER BY asset_category, item_name
            "#,
            STORE_COLUMNS
        ))
        .bind(asset_type.map(|t| t.as_str()))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Set the servicable/condemned split of dead stock rows, all or nothing
    pub async fn update_dead_stock(&self, updates: &[DeadStockQuantityUpdate]) -> AppResult<Vec<DeadStockItem>> {
        let mut tx = self.pool.begin().await?;
        let mut updated = Vec::with_capacity(updates.len());

        for update in updates {
            let row = sqlx::query_as::<_, DeadStockItem>(&format!(
                "SELECT {} FROM dead_stock WHERE id = $1 FOR UPDATE",
                DEAD_STOCK_COLUMNS
            ))
            .bind(update.id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Dead stock entry {} not found", update.id)))?;

            if update.servicable_quantity < 0 || update.condemned_quantity < 0 {
                return Err(AppError::Validation("Quantities cannot be negative".to_string()));
            }
            if update.servicable_quantity + update.condemned_quantity > row.overall_quantity {
                return Err(AppError::Validation(format!(
                    "Servicable ({}) plus condemned ({}) exceeds overall quantity ({}) for {}",
                    update.servicable_quantity,
                    update.condemned_quantity,
                    row.overall_quantity,
                    row.item_name
                )));
            }

            let row = sqlx::query_as::<_, DeadStockItem>(&format!(
                r#"
                UPDATE dead_stock
                SET servicable_quantity = $2, condemned_quantity = $3,
                    remarks = COALESCE($4, remarks), updated_at = NOW()
                WHERE id = $1
                RETURNING {}
                "#,
                DEAD_STOCK_COLUMNS
            ))
            .bind(update.id)
            .bind(update.servicable_quantity)
            .bind(update.condemned_quantity)
            .bind(&update.remarks)
            .fetch_one(&mut *tx)
            .await?;
            updated.push(row);
        }

        tx.commit().await?;
        Ok(updated)
    }

    // =========================================================================
    // Ledger movements (run inside the approval transaction)
    // =========================================================================

    /// Add units to store, creating the row on first receipt. Returns the row id.
    pub async fn add_to_store(
        conn: &mut PgConnection,
        key: &ItemKey,
        quantity: i32,
        ids: &[String],
    ) -> AppResult<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO store_items
                (asset_type, asset_category, item_name, sub_category, item_description, in_stock, item_ids)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (asset_type, asset_category, item_name, sub_category, item_description)
            DO UPDATE SET in_stock = store_items.in_stock + EXCLUDED.in_stock,
                          item_ids = store_items.item_ids || EXCLUDED.item_ids,
                          updated_at = NOW()
            RETURNING id
            "#,
        )
        .bind(key.asset_type.as_str())
        .bind(&key.asset_category)
        .bind(&key.item_name)
        .bind(key.sub())
        .bind(key.description())
        .bind(quantity)
        .bind(ids)
        .fetch_one(conn)
        .await?;
        Ok(id)
    }

    /// Take units out of store. Returns the store row id.
    pub async fn take_from_store(
        conn: &mut PgConnection,
        key: &ItemKey,
        quantity: i32,
        ids: &[String],
    ) -> AppResult<i64> {
        let row = sqlx::query_as::<_, StoreItem>(&format!(
            r#"
            SELECT {} FROM store_items
            WHERE asset_type = $1 AND asset_category = $2 AND item_name = $3
              AND sub_category = $4 AND item_description = $5
            FOR UPDATE
            "#,
            STORE_COLUMNS
        ))
        .bind(key.asset_type.as_str())
        .bind(&key.asset_category)
        .bind(&key.item_name)
        .bind(key.sub())
        .bind(key.description())
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::BusinessRule(format!("{} is not held in store", key)))?;

        let (left, remaining) = withdraw(row.in_stock, &row.item_ids, quantity, ids, &key.to_string())?;

        sqlx::query("UPDATE store_items SET in_stock = $2, item_ids = $3, updated_at = NOW() WHERE id = $1")
            .bind(row.id)
            .bind(left)
            .bind(remaining)
            .execute(conn)
            .await?;
        Ok(row.id)
    }

    /// Store row id of an item, which must already have been received
    pub async fn store_item_id(conn: &mut PgConnection, key: &ItemKey) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT id FROM store_items
            WHERE asset_type = $1 AND asset_category = $2 AND item_name = $3
              AND sub_category = $4 AND item_description = $5
            "#,
        )
        .bind(key.asset_type.as_str())
        .bind(&key.asset_category)
        .bind(&key.item_name)
        .bind(key.sub())
        .bind(key.description())
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::BusinessRule(format!("{} was never received in store", key)))
    }

    pub async fn add_issued(
        conn: &mut PgConnection,
        store_item_id: i64,
        key: &ItemKey,
        location: &str,
        issued_to: Option<&str>,
        quantity: i32,
        ids: &[String],
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO issued_items
                (store_item_id, asset_type, asset_category, item_name, sub_category, item_description,
                 location, issued_to, quantity, item_ids)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (store_item_id, location)
            DO UPDATE SET quantity = issued_items.quantity + EXCLUDED.quantity,
                          item_ids = issued_items.item_ids || EXCLUDED.item_ids,
                          issued_to = COALESCE(EXCLUDED.issued_to, issued_items.issued_to),
                          updated_at = NOW()
            "#,
        )
        .bind(store_item_id)
        .bind(key.asset_type.as_str())
        .bind(&key.asset_category)
        .bind(&key.item_name)
        .bind(key.sub())
        .bind(key.description())
        .bind(location)
        .bind(issued_to)
        .bind(quantity)
        .bind(ids)
        .execute(conn)
        .await?;
        Ok(())
    }

    pub async fn take_issued(
        conn: &mut PgConnection,
        store_item_id: i64,
        location: &str,
        quantity: i32,
        ids: &[String],
    ) -> AppResult<()> {
        let row = sqlx::query_as::<_, IssuedItem>(&format!(
            "SELECT {} FROM issued_items WHERE store_item_id = $1 AND location = $2 FOR UPDATE",
            ISSUED_COLUMNS
        ))
        .bind(store_item_id)
        .bind(location)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::BusinessRule(format!("Nothing issued to {}", location)))?;

        let what = format!("{} at {}", row.item_name, location);
        let (left, remaining) = withdraw(row.quantity, &row.item_ids, quantity, ids, &what)?;

        sqlx::query("UPDATE issued_items SET quantity = $2, item_ids = $3, updated_at = NOW() WHERE id = $1")
            .bind(row.id)
            .bind(left)
            .bind(remaining)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn add_returned(
        conn: &mut PgConnection,
        store_item_id: i64,
        key: &ItemKey,
        condition: Condition,
        quantity: i32,
        ids: &[String],
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO returned_items
                (store_item_id, asset_type, asset_category, item_name, sub_category, item_description,
                 condition, quantity, item_ids)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (store_item_id, condition)
            DO UPDATE SET quantity = returned_items.quantity + EXCLUDED.quantity,
                          item_ids = returned_items.item_ids || EXCLUDED.item_ids,
                          updated_at = NOW()
            "#,
        )
        .bind(store_item_id)
        .bind(key.asset_type.as_str())
        .bind(&key.asset_category)
        .bind(&key.item_name)
        .bind(key.sub())
        .bind(key.description())
        .bind(condition.as_str())
        .bind(quantity)
        .bind(ids)
        .execute(conn)
        .await?;
        Ok(())
    }

    pub async fn take_returned(
        conn: &mut PgConnection,
        store_item_id: i64,
        condition: Condition,
        quantity: i32,
        ids: &[String],
    ) -> AppResult<()> {
        let row = sqlx::query_as::<_, ReturnedItem>(&format!(
            "SELECT {} FROM returned_items WHERE store_item_id = $1 AND condition = $2 FOR UPDATE",
            RETURNED_COLUMNS
        ))
        .bind(store_item_id)
        .bind(condition.as_str())
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| {
            AppError::BusinessRule(format!("No returned units marked {}", condition.as_str()))
        })?;

        let what = format!("{} ({})", row.item_name, condition.as_str());
        let (left, remaining) = withdraw(row.quantity, &row.item_ids, quantity, ids, &what)?;

        sqlx::query("UPDATE returned_items SET quantity = $2, item_ids = $3, updated_at = NOW() WHERE id = $1")
            .bind(row.id)
            .bind(left)
            .bind(remaining)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn add_dead_stock(
        conn: &mut PgConnection,
        store_item_id: i64,
        key: &ItemKey,
        quantity: i32,
        method_of_disposal: Option<&str>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO dead_stock
                (store_item_id, asset_type, asset_category, item_name, sub_category, item_description,
                 overall_quantity, method_of_disposal)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (store_item_id)
            DO UPDATE SET overall_quantity = dead_stock.overall_quantity + EXCLUDED.overall_quantity,
                          method_of_disposal = COALESCE(EXCLUDED.method_of_disposal, dead_stock.method_of_disposal),
                          updated_at = NOW()
            "#,
        )
        .bind(store_item_id)
        .bind(key.asset_type.as_str())
        .bind(&key.asset_category)
        .bind(&key.item_name)
        .bind(key.sub())
        .bind(key.description())
        .bind(quantity)
        .bind(method_of_disposal)
        .execute(conn)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_withdraw_removes_ids() {
        let (left, remaining) =
            withdraw(3, &ids(&["A1", "A2", "A3"]), 2, &ids(&["A1", "A3"]), "Chair").unwrap();
        assert_eq!(left, 1);
        assert_eq!(remaining, ids(&["A2"]));
    }

    #[test]
    fn test_withdraw_rejects_overdraw() {
        let err = withdraw(1, &[], 2, &[], "Paper").unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(ref m) if m.contains("1 available, 2 requested")));
    }

    #[test]
    fn test_withdraw_rejects_unknown_ids() {
        let err = withdraw(2, &ids(&["A1"]), 1, &ids(&["B9"]), "Chair").unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(ref m) if m.contains("B9")));
    }

    #[test]
    fn test_withdraw_units_without_ids() {
        // received without IDs: store -> issued -> back to store
        let (in_store, held) = withdraw(2, &[], 2, &[], "Chair").unwrap();
        assert_eq!((in_store, held.len()), (0, 0));
        let (still_issued, held) = withdraw(2, &[], 1, &[], "Chair at Hostel").unwrap();
        assert_eq!(still_issued, 1);
        assert!(held.is_empty());
    }

    #[test]
    fn test_withdraw_mixed_holding() {
        let held = ids(&["A1", "A2"]);
        let (left, remaining) = withdraw(5, &held, 3, &[], "Chair").unwrap();
        assert_eq!(left, 2);
        assert_eq!(remaining, held);

        let err = withdraw(5, &held, 4, &[], "Chair").unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(ref m) if m.contains("only 3 units")));
    }

    #[test]
    fn test_withdraw_id_count_must_match() {
        let err = withdraw(3, &ids(&["A1", "A2", "A3"]), 2, &ids(&["A1"]), "Chair").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_stock_conditions_numbering() {
        let query = StockQuery {
            asset_type: AssetType::Permanent,
            asset_category: Some("Furniture".into()),
            item_name: None,
            sub_category: Some("Chairs".into()),
            item_description: None,
            location: Some("Hostel".into()),
        };
        let (conditions, next) = stock_conditions(&query, 1);
        assert_eq!(
            conditions,
            vec!["asset_type = $1", "asset_category = $2", "sub_category = $3"]
        );
        assert_eq!(next, 4);
    }
}
