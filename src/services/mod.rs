//! Business logic services

pub mod approvals;
pub mod assets;
pub mod faculty;
pub mod reports;
pub mod uploads;
pub mod users;

use crate::{
    config::{AuthConfig, UploadsConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub assets: assets::AssetsService,
    pub approvals: approvals::ApprovalsService,
    pub reports: reports::ReportsService,
    pub faculty: faculty::FacultyService,
    pub users: users::UsersService,
    pub uploads: uploads::UploadsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig, uploads_config: UploadsConfig) -> Self {
        Self {
            assets: assets::AssetsService::new(repository.clone()),
            approvals: approvals::ApprovalsService::new(repository.clone()),
            reports: reports::ReportsService::new(repository.clone()),
            faculty: faculty::FacultyService::new(repository.clone()),
            users: users::UsersService::new(repository.clone(), auth_config),
            uploads: uploads::UploadsService::new(uploads_config),
            repository,
        }
    }
}
