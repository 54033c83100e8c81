//! Library backend
//!
//! A REST JSON service managing patron accounts, books, checkouts, book copies,
//! categories, notifications and wait lists. Every entity shares one generic
//! gateway, service and resource.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
