//! Autoshop appointment server
//!
//! Computes bookable slots of repair-shop mechanics from their work regimes,
//! reports workload and free start times, and books, moves and cancels
//! appointments over a REST JSON API.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod dates;
pub mod error;
pub mod models;
pub mod repository;
pub mod scheduling;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
