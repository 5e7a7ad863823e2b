//! Faculty records

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::{FacultyType, RecordStatus};
use crate::error::{AppError, AppResult};

#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub title: String,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub journal: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub degree: String,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub year_of_passing: Option<i32>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseHandled {
    pub course_name: String,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub batch: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub from_date: Option<NaiveDate>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub to_date: Option<NaiveDate>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub place: String,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub from_date: Option<NaiveDate>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub to_date: Option<NaiveDate>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExaminerDuty {
    pub batch: String,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpecialSession {
    pub topic: String,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub institution: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Editable faculty fields (create and update body)
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FacultyInput {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub faculty_type: FacultyType,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub cadre: Option<String>,
    #[serde(default)]
    pub year_of_allotment: Option<i32>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub date_of_joining: Option<NaiveDate>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub date_of_relieve: Option<NaiveDate>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[validate(email(message = "Invalid email format"))]
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub email: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub mobile_number: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub communication_address: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub permanent_address: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub photograph: Option<String>,
    #[serde(default)]
    pub publications: Vec<Publication>,
    #[serde(default)]
    pub education_details: Vec<Education>,
    #[serde(default)]
    pub courses_handled: Vec<CourseHandled>,
    #[serde(default)]
    pub tours_attended: Vec<Tour>,
    #[serde(default)]
    pub examiner: Vec<ExaminerDuty>,
    #[serde(default)]
    pub special_sessions: Vec<SpecialSession>,
    #[serde(default)]
    pub other_responsibilities: Vec<String>,
}

/// Internal row structure for faculty queries
#[derive(Debug, Clone, FromRow)]
pub struct FacultyRow {
    pub id: i64,
    pub status: String,
    pub remark: Option<String>,
    pub entered_by: String,
    pub reviewed_by: Option<String>,
    pub payload: sqlx::types::Json<FacultyInput>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stored faculty record
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
    pub id: i64,
    pub status: RecordStatus,
    pub remark: Option<String>,
    pub entered_by: String,
    pub reviewed_by: Option<String>,
    #[serde(flatten)]
    pub details: FacultyInput,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<FacultyRow> for Faculty {
    type Error = AppError;

    fn try_from(row: FacultyRow) -> AppResult<Self> {
        Ok(Faculty {
            id: row.id,
            status: row.status.parse().map_err(AppError::Internal)?,
            remark: row.remark,
            entered_by: row.entered_by,
            reviewed_by: row.reviewed_by,
            details: row.payload.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Faculty search parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FacultyQuery {
    pub name: Option<String>,
    pub faculty_type: Option<FacultyType>,
    pub cadre: Option<String>,
    pub status: Option<RecordStatus>,
}
