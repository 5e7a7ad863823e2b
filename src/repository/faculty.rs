//! Faculty repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::RecordStatus,
        faculty::{Faculty, FacultyInput, FacultyQuery, FacultyRow},
    },
};

const COLUMNS: &str = "id, status, remark, entered_by, reviewed_by, payload, created_at, updated_at";

#[derive(Clone)]
pub struct FacultyRepository {
    pool: Pool<Postgres>,
}

impl FacultyRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &FacultyInput, entered_by: &str) -> AppResult<Faculty> {
        sqlx::query_as::<_, FacultyRow>(&format!(
            r#"
            INSERT INTO faculty (name, faculty_type, cadre, status, payload, entered_by)
            VALUES ($1, $2, $3, 'pending', $4, $5)
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(input.name.trim())
        .bind(input.faculty_type.as_str())
        .bind(&input.cadre)
        .bind(sqlx::types::Json(input))
        .bind(entered_by)
        .fetch_one(&self.pool)
        .await?
        .try_into()
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Faculty> {
        sqlx::query_as::<_, FacultyRow>(&format!("SELECT {} FROM faculty WHERE id = $1", COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Faculty {} not found", id)))?
            .try_into()
    }

    /// Search with optional filters; the name filter matches substrings
    pub async fn list(&self, query: &FacultyQuery) -> AppResult<Vec<Faculty>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.name.is_some() {
            conditions.push(format!("name ILIKE ${}", idx));
            idx += 1;
        }
        if query.faculty_type.is_some() {
            conditions.push(format!("faculty_type = ${}", idx));
            idx += 1;
        }
        if query.cadre.is_some() {
            conditions.push(format!("cadre = ${}", idx));
            idx += 1;
        }
        if query.status.is_some() {
            conditions.push(format!("status = ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!("SELECT {} FROM faculty {} ORDER BY name, id", COLUMNS, where_clause);
        let mut builder = sqlx::query_as::<_, FacultyRow>(&sql);
        if let Some(ref name) = query.name {
            builder = builder.bind(format!("%{}%", name.trim()));
        }
        if let Some(faculty_type) = query.faculty_type {
            builder = builder.bind(faculty_type.as_str());
        }
        if let Some(ref cadre) = query.cadre {
            builder = builder.bind(cadre);
        }
        if let Some(status) = query.status {
            builder = builder.bind(status.as_str());
        }

        builder
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Faculty::try_from)
            .collect()
    }

    /// Replace the editable fields; the record goes back to pending review
    pub async fn update(&self, id: i64, input: &FacultyInput) -> AppResult<Faculty> {
        sqlx::query_as::<_, FacultyRow>(&format!(
            r#"
            UPDATE faculty
            SET name = $2, faculty_type = $3, cadre = $4, payload = $5,
                status = 'pending', remark = NULL, reviewed_by = NULL, reviewed_at = NULL,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(id)
        .bind(input.name.trim())
        .bind(input.faculty_type.as_str())
        .bind(&input.cadre)
        .bind(sqlx::types::Json(input))
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Faculty {} not found", id)))?
        .try_into()
    }

    pub async fn set_status(
        &self,
        id: i64,
        status: RecordStatus,
        remark: Option<&str>,
        reviewed_by: &str,
    ) -> AppResult<Faculty> {
        sqlx::query_as::<_, FacultyRow>(&format!(
            r#"
            UPDATE faculty
            SET status = $2, remark = $3, reviewed_by = $4, reviewed_at = NOW(), updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(remark)
        .bind(reviewed_by)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Faculty {} not found", id)))?
        .try_into()
    }
}
