//! Faculty register service

use chrono::Local;
use validator::Validate;

use crate::{
    domain::{
        lifecycle::{ApprovalAction, ApprovalState},
        validation::validate_faculty,
    },
    error::AppResult,
    models::faculty::{Faculty, FacultyInput, FacultyQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct FacultyService {
    repository: Repository,
}

impl FacultyService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    fn check(input: &FacultyInput) -> AppResult<()> {
        input.validate()?;
        validate_faculty(input, Local::now().date_naive())
    }

    pub async fn create(&self, input: &FacultyInput, entered_by: &str) -> AppResult<Faculty> {
        Self::check(input)?;
        let faculty = self.repository.faculty.create(input, entered_by).await?;
        tracing::info!(faculty_id = faculty.id, entered_by, "faculty record submitted");
        Ok(faculty)
    }

    pub async fn list(&self, query: &FacultyQuery) -> AppResult<Vec<Faculty>> {
        self.repository.faculty.list(query).await
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Faculty> {
        self.repository.faculty.get_by_id(id).await
    }

    /// Edits send the record back for verification
    pub async fn update(&self, id: i64, input: &FacultyInput) -> AppResult<Faculty> {
        Self::check(input)?;
        self.repository.faculty.update(id, input).await
    }

    pub async fn approve(&self, id: i64, reviewer: &str) -> AppResult<Faculty> {
        self.review(id, ApprovalAction::Approve, reviewer).await
    }

    pub async fn reject(&self, id: i64, remark: &str, reviewer: &str) -> AppResult<Faculty> {
        self.review(
            id,
            ApprovalAction::Reject {
                remark: remark.to_string(),
            },
            reviewer,
        )
        .await
    }

    async fn review(&self, id: i64, action: ApprovalAction, reviewer: &str) -> AppResult<Faculty> {
        let current = self.repository.faculty.get_by_id(id).await?;
        let next = ApprovalState::from_parts(current.status, current.remark.as_deref()).apply(action)?;
        let faculty = self
            .repository
            .faculty
            .set_status(id, next.status(), next.remark(), reviewer)
            .await?;
        tracing::info!(faculty_id = id, status = next.status().as_str(), reviewer, "faculty record reviewed");
        Ok(faculty)
    }
}
