//! Shared data models for the job portal backend.
//!
//! This crate provides Serde-serializable types for:
//! - Job postings and their salary ranges
//! - Create and partial-update payloads
//! - Search queries

pub mod job;
pub mod search;

pub use job::{start_of_day, Job, JobDraft, JobId, JobUpdate, Salary};
pub use search::SearchQuery;
