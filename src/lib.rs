//! CASFOS asset and faculty management server
//!
//! REST JSON API for recording, approving and reporting on the institution's
//! assets (purchases, issues, returns, servicing, disposal, building upgrades)
//! and its faculty register, plus a typed client with report session state.

use std::sync::Arc;

pub mod api;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod session;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
