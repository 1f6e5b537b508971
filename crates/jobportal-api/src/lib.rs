//! Axum HTTP API server for job postings.
//!
//! This crate provides:
//! - REST routes for the job CRUD and search operations
//! - Per-IP rate limiting, request IDs, and request logging
//! - Prometheus metrics
//! - Environment-driven configuration and graceful shutdown

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::JobService;
pub use state::AppState;
