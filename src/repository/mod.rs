//! Repository layer for database operations

pub mod faculty;
pub mod records;
pub mod stock;
pub mod users;

use sqlx::{Pool, Postgres};

use crate::error::AppResult;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub records: records::RecordsRepository,
    pub stock: stock::StockRepository,
    pub users: users::UsersRepository,
    pub faculty: faculty::FacultyRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            records: records::RecordsRepository::new(pool.clone()),
            stock: stock::StockRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            faculty: faculty::FacultyRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round-trip to the database
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
