//! Users repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{AssetType, RecordStatus},
        user::{Role, User, UserRow},
    },
};

const COLUMNS: &str = "id, username, password_hash, role, access, status, remark, created_at";

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<User> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {} FROM users WHERE id = $1", COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))?
            .try_into()
    }

    /// Get user by username (case-insensitive)
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE LOWER(username) = LOWER($1)",
            COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .map(User::try_from)
        .transpose()
    }

    pub async fn username_exists(&self, username: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(username) = LOWER($1))",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
        status: RecordStatus,
        access: &[AssetType],
    ) -> AppResult<User> {
        let access: Vec<&str> = access.iter().map(AssetType::as_str).collect();
        sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (username, password_hash, role, status, access)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(username)
        .bind(password_hash)
        .bind(role.as_str())
        .bind(status.as_str())
        .bind(access)
        .fetch_one(&self.pool)
        .await?
        .try_into()
    }

    /// Registrations with a given status, oldest first
    pub async fn list_by_status(&self, status: RecordStatus) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE status = $1 ORDER BY created_at, id",
            COLUMNS
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(User::try_from)
        .collect()
    }

    pub async fn set_status(
        &self,
        id: i64,
        status: RecordStatus,
        remark: Option<&str>,
        access: &[AssetType],
    ) -> AppResult<User> {
        let access: Vec<&str> = access.iter().map(AssetType::as_str).collect();
        sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users SET status = $2, remark = $3, access = $4
            WHERE id = $1
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(remark)
        .bind(access)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))?
        .try_into()
    }
}
