//! Job posting models.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

/// Unique identifier for a job posting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Salary range attached to a posting.
///
/// Both bounds are required whenever a salary is present. The bounds are not
/// required to be ordered; inverted ranges are stored as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Salary {
    pub min: i64,
    pub max: i64,
}

/// A persisted job posting.
///
/// The in-store representation: `id` maps to the `_id` document key and
/// `created_at` is stored as a native BSON datetime so the search pipeline
/// can compare it server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "_id")]
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub job_type: String,
    pub salary: Salary,
    #[serde(default)]
    pub benefits: Vec<String>,
    /// Pass-through bag of attributes not modeled by this service.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extras: HashMap<String, serde_json::Value>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

/// Truncate a timestamp to 00:00:00 UTC of its day.
///
/// Creation defaults and the search recency window both key off this.
pub fn start_of_day(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time of day")
        .and_utc()
}

/// Create payload for a job posting.
///
/// Text fields deserialize to empty strings when absent so a missing field
/// surfaces as a validation failure instead of a deserialization error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct JobDraft {
    #[serde(default)]
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "company is required"))]
    pub company: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "location is required"))]
    pub location: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "job_type is required"))]
    pub job_type: String,
    #[validate(required(message = "salary is required"))]
    pub salary: Option<Salary>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub extras: HashMap<String, serde_json::Value>,
    /// Defaults to the start of the creation day when not supplied.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl JobDraft {
    /// Validate the draft and turn it into a persistable posting.
    ///
    /// Fills the generated ID and the `created_at` default (start of the
    /// day of `now`).
    pub fn try_into_job(self, now: DateTime<Utc>) -> Result<Job, ValidationErrors> {
        self.validate()?;

        let Some(salary) = self.salary else {
            // validate() already rejects this; keep the error path total.
            let mut errors = ValidationErrors::new();
            errors.add("salary", ValidationError::new("required"));
            return Err(errors);
        };

        Ok(Job {
            id: JobId::new(),
            title: self.title,
            company: self.company,
            location: self.location,
            description: self.description,
            job_type: self.job_type,
            salary,
            benefits: self.benefits,
            extras: self.extras,
            created_at: self.created_at.unwrap_or_else(|| start_of_day(now)),
        })
    }
}

/// Partial update for a job posting. Only supplied fields are merged into
/// the stored record; the ID is never updatable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub job_type: Option<String>,
    pub salary: Option<Salary>,
    pub benefits: Option<Vec<String>>,
    pub extras: Option<HashMap<String, serde_json::Value>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl JobUpdate {
    /// True when no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.company.is_none()
            && self.location.is_none()
            && self.description.is_none()
            && self.job_type.is_none()
            && self.salary.is_none()
            && self.benefits.is_none()
            && self.extras.is_none()
            && self.created_at.is_none()
    }
}
