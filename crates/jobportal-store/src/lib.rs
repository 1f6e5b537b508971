//! MongoDB persistence for job postings.
//!
//! This crate provides:
//! - A typed repository over the `jobs` collection
//! - The search aggregation pipeline (salary filter, company join, ranking)
//! - The `JobStore` trait the service layer programs against
//! - Store configuration and error types

pub mod client;
pub mod error;
pub mod jobs;
pub mod metrics;
pub mod search;

pub use client::{MongoStore, StoreConfig};
pub use error::{StoreError, StoreResult};
#[cfg(feature = "mock")]
pub use jobs::MockJobStore;
pub use jobs::{JobRepository, JobStore};
