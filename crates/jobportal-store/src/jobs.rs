//! Typed repository for job postings.

use async_trait::async_trait;
use bson::{doc, Document};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};
use tracing::info;

use jobportal_models::{Job, JobId, JobUpdate, SearchQuery};

use crate::error::StoreResult;
use crate::metrics::record_op;
use crate::search::build_pipeline;

/// Collection holding the postings.
pub const JOBS_COLLECTION: &str = "jobs";

/// Persistence operations for job postings.
///
/// The service layer talks to this trait so tests can substitute a double
/// for the live collection.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Persist a new posting.
    async fn insert(&self, job: &Job) -> StoreResult<()>;

    /// One page of postings in the store's retrieval order.
    async fn find_page(&self, skip: u64, limit: i64) -> StoreResult<Vec<Job>>;

    /// Look up a posting; `Ok(None)` when the id is unknown.
    async fn find_by_id(&self, id: &JobId) -> StoreResult<Option<Job>>;

    /// Merge the supplied fields into a posting, returning the post-image.
    async fn update(&self, id: &JobId, patch: &JobUpdate) -> StoreResult<Option<Job>>;

    /// Remove a posting, returning what was removed.
    async fn delete(&self, id: &JobId) -> StoreResult<Option<Job>>;

    /// Remove every posting, returning how many there were.
    async fn delete_all(&self) -> StoreResult<u64>;

    /// Ranked search, see [`crate::search`].
    async fn search(&self, query: &SearchQuery) -> StoreResult<Vec<Job>>;

    /// Store connectivity check.
    async fn ping(&self) -> StoreResult<()>;
}

/// Repository over the `jobs` collection.
#[derive(Clone)]
pub struct JobRepository {
    db: Database,
    jobs: Collection<Job>,
}

impl JobRepository {
    pub fn new(db: Database) -> Self {
        let jobs = db.collection(JOBS_COLLECTION);
        Self { db, jobs }
    }
}

#[async_trait]
impl JobStore for JobRepository {
    async fn insert(&self, job: &Job) -> StoreResult<()> {
        let result: StoreResult<()> = async {
            self.jobs.insert_one(job).await?;
            Ok(())
        }
        .await;
        record_op("insert", outcome(&result));

        if result.is_ok() {
            info!(job_id = %job.id, "Stored job posting");
        }
        result
    }

    async fn find_page(&self, skip: u64, limit: i64) -> StoreResult<Vec<Job>> {
        let result: StoreResult<Vec<Job>> = async {
            let cursor = self.jobs.find(doc! {}).skip(skip).limit(limit).await?;
            Ok(cursor.try_collect().await?)
        }
        .await;
        record_op("find_page", outcome(&result));
        result
    }

    async fn find_by_id(&self, id: &JobId) -> StoreResult<Option<Job>> {
        let result: StoreResult<Option<Job>> = async {
            Ok(self.jobs.find_one(doc! { "_id": id.as_str() }).await?)
        }
        .await;
        record_op("find_by_id", outcome(&result));
        result
    }

    async fn update(&self, id: &JobId, patch: &JobUpdate) -> StoreResult<Option<Job>> {
        // An empty $set is rejected by the server; an empty patch is a
        // merge of nothing, so read the record back instead.
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }

        let result: StoreResult<Option<Job>> = async {
            let set = set_document(patch)?;
            let updated = self
                .jobs
                .find_one_and_update(doc! { "_id": id.as_str() }, doc! { "$set": set })
                .return_document(ReturnDocument::After)
                .await?;
            Ok(updated)
        }
        .await;
        record_op("update", outcome(&result));
        result
    }

    async fn delete(&self, id: &JobId) -> StoreResult<Option<Job>> {
        let result: StoreResult<Option<Job>> = async {
            Ok(self
                .jobs
                .find_one_and_delete(doc! { "_id": id.as_str() })
                .await?)
        }
        .await;
        record_op("delete", outcome(&result));
        result
    }

    async fn delete_all(&self) -> StoreResult<u64> {
        let result: StoreResult<u64> = async {
            let deleted = self.jobs.delete_many(doc! {}).await?;
            Ok(deleted.deleted_count)
        }
        .await;
        record_op("delete_all", outcome(&result));

        if let Ok(count) = &result {
            info!(count, "Removed all job postings");
        }
        result
    }

    async fn search(&self, query: &SearchQuery) -> StoreResult<Vec<Job>> {
        let result: StoreResult<Vec<Job>> = async {
            let pipeline = build_pipeline(query, Utc::now());
            let mut cursor = self.jobs.aggregate(pipeline).await?;

            let mut jobs = Vec::new();
            while let Some(document) = cursor.try_next().await? {
                jobs.push(bson::from_document(document)?);
            }
            Ok(jobs)
        }
        .await;
        record_op("search", outcome(&result));
        result
    }

    async fn ping(&self) -> StoreResult<()> {
        let result: StoreResult<()> = async {
            self.db.run_command(doc! { "ping": 1 }).await?;
            Ok(())
        }
        .await;
        record_op("ping", outcome(&result));
        result
    }
}

fn outcome<T>(result: &StoreResult<T>) -> &'static str {
    if result.is_ok() {
        "ok"
    } else {
        "error"
    }
}

/// Build the `$set` document for a partial update: exactly the supplied
/// fields, nothing else.
fn set_document(patch: &JobUpdate) -> StoreResult<Document> {
    let mut set = Document::new();

    if let Some(title) = &patch.title {
        set.insert("title", title.clone());
    }
    if let Some(company) = &patch.company {
        set.insert("company", company.clone());
    }
    if let Some(location) = &patch.location {
        set.insert("location", location.clone());
    }
    if let Some(description) = &patch.description {
        set.insert("description", description.clone());
    }
    if let Some(job_type) = &patch.job_type {
        set.insert("job_type", job_type.clone());
    }
    if let Some(salary) = &patch.salary {
        set.insert("salary", doc! { "min": salary.min, "max": salary.max });
    }
    if let Some(benefits) = &patch.benefits {
        set.insert("benefits", benefits.clone());
    }
    if let Some(extras) = &patch.extras {
        set.insert("extras", bson::to_bson(extras)?);
    }
    if let Some(created_at) = patch.created_at {
        set.insert("created_at", bson::DateTime::from_chrono(created_at));
    }

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobportal_models::Salary;
    use std::collections::HashMap;

    #[test]
    fn test_set_document_contains_only_supplied_fields() {
        let patch = JobUpdate {
            title: Some("Staff Engineer".to_string()),
            ..JobUpdate::default()
        };

        let set = set_document(&patch).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get_str("title").unwrap(), "Staff Engineer");
    }

    #[test]
    fn test_set_document_nested_salary() {
        let patch = JobUpdate {
            salary: Some(Salary {
                min: 50_000,
                max: 90_000,
            }),
            ..JobUpdate::default()
        };

        let set = set_document(&patch).unwrap();
        assert_eq!(
            set.get_document("salary").unwrap(),
            &doc! { "min": 50_000_i64, "max": 90_000_i64 }
        );
    }

    #[test]
    fn test_set_document_extras_passthrough() {
        let mut extras = HashMap::new();
        extras.insert("remote_work".to_string(), serde_json::json!(true));

        let patch = JobUpdate {
            extras: Some(extras),
            ..JobUpdate::default()
        };

        let set = set_document(&patch).unwrap();
        let stored = set.get_document("extras").unwrap();
        assert!(stored.get_bool("remote_work").unwrap());
    }

    #[test]
    fn test_set_document_empty_patch() {
        let set = set_document(&JobUpdate::default()).unwrap();
        assert!(set.is_empty());
    }
}
