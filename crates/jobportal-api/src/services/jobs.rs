//! Job posting service: create/read/update/delete and ranked search.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use jobportal_models::{Job, JobDraft, JobId, JobUpdate, SearchQuery};
use jobportal_store::JobStore;

use crate::error::{ApiError, ApiResult};

/// Orchestrates job posting operations against the document store.
///
/// Every failure is logged with the operation name and identifier before it
/// propagates unchanged; nothing is retried. The single exception is
/// [`JobService::shutdown_cleanup`], which only logs.
#[derive(Clone)]
pub struct JobService {
    store: Arc<dyn JobStore>,
}

impl JobService {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    /// Validate and persist a new job posting.
    ///
    /// The stored record gets a generated UUID id, and `created_at`
    /// defaults to the start of the creation day when the draft carries
    /// none.
    pub async fn create(&self, draft: JobDraft) -> ApiResult<Job> {
        let job = draft.try_into_job(Utc::now()).map_err(|e| {
            warn!(error = %e, "create: invalid job payload");
            ApiError::from(e)
        })?;

        self.store.insert(&job).await.map_err(|e| {
            error!(job_id = %job.id, error = %e, "create: store insert failed");
            ApiError::from(e)
        })?;

        info!(job_id = %job.id, title = %job.title, "Created job posting");
        Ok(job)
    }

    /// One page of postings. `page` and `limit` are 1-based.
    pub async fn find_all(&self, page: u64, limit: u64) -> ApiResult<Vec<Job>> {
        if page < 1 || limit < 1 {
            return Err(ApiError::bad_request("page and limit must both be >= 1"));
        }

        let skip = (page - 1).saturating_mul(limit);
        self.store
            .find_page(skip, limit.min(i64::MAX as u64) as i64)
            .await
            .map_err(|e| {
                error!(page, limit, error = %e, "find_all: store query failed");
                ApiError::from(e)
            })
    }

    /// Look up a posting. A missing id is `Ok(None)`, never an error.
    pub async fn find_by_id(&self, id: &JobId) -> ApiResult<Option<Job>> {
        self.store.find_by_id(id).await.map_err(|e| {
            error!(job_id = %id, error = %e, "find_by_id: store query failed");
            ApiError::from(e)
        })
    }

    /// Merge the supplied fields into a posting; `Ok(None)` when the id
    /// does not match. Fields not present in the patch are left untouched.
    pub async fn update(&self, id: &JobId, patch: JobUpdate) -> ApiResult<Option<Job>> {
        let updated = self.store.update(id, &patch).await.map_err(|e| {
            error!(job_id = %id, error = %e, "update: store update failed");
            ApiError::from(e)
        })?;

        if let Some(job) = &updated {
            info!(job_id = %job.id, "Updated job posting");
        }
        Ok(updated)
    }

    /// Remove a posting, returning what was removed.
    pub async fn delete(&self, id: &JobId) -> ApiResult<Option<Job>> {
        let deleted = self.store.delete(id).await.map_err(|e| {
            error!(job_id = %id, error = %e, "delete: store delete failed");
            ApiError::from(e)
        })?;

        if deleted.is_some() {
            info!(job_id = %id, "Deleted job posting");
        }
        Ok(deleted)
    }

    /// Remove every posting, returning the count.
    pub async fn delete_all(&self) -> ApiResult<u64> {
        let count = self.store.delete_all().await.map_err(|e| {
            error!(error = %e, "delete_all: store delete failed");
            ApiError::from(e)
        })?;

        info!(count, "Deleted all job postings");
        Ok(count)
    }

    /// Ranked search: salary-filtered candidates sorted by
    /// `(is_full_time, is_recent, salary.max, company_job_count)`,
    /// all descending.
    pub async fn search(&self, query: &SearchQuery) -> ApiResult<Vec<Job>> {
        self.store.search(query).await.map_err(|e| {
            error!(salary = ?query.salary, error = %e, "search: store aggregation failed");
            ApiError::from(e)
        })
    }

    /// Store connectivity check for readiness probes.
    pub async fn ping(&self) -> ApiResult<()> {
        self.store.ping().await.map_err(ApiError::from)
    }

    /// Remove every stored posting as part of process shutdown.
    ///
    /// Failures are logged and swallowed: shutdown must not hang on the
    /// store. Only invoked when `PURGE_ON_SHUTDOWN` is set.
    pub async fn shutdown_cleanup(&self) {
        match self.store.delete_all().await {
            Ok(count) => info!(count, "Shutdown cleanup removed all job postings"),
            Err(e) => error!(error = %e, "Shutdown cleanup failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use jobportal_models::{start_of_day, Salary};
    use jobportal_store::MockJobStore;

    fn draft() -> JobDraft {
        JobDraft {
            title: "Software Engineer".to_string(),
            company: "Tech Corp".to_string(),
            location: "New York, NY".to_string(),
            description: "A job for a software engineer.".to_string(),
            job_type: "full-time".to_string(),
            salary: Some(Salary {
                min: 80_000,
                max: 120_000,
            }),
            benefits: Vec::new(),
            extras: Default::default(),
            created_at: None,
        }
    }

    fn service(mock: MockJobStore) -> JobService {
        JobService::new(Arc::new(mock))
    }

    #[tokio::test]
    async fn test_create_never_reaches_store_on_invalid_payload() {
        // No expectations: any store call panics the test.
        let svc = service(MockJobStore::new());

        let mut d = draft();
        d.description = String::new();

        let err = svc.create(d).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_fills_id_and_created_at() {
        let mut mock = MockJobStore::new();
        mock.expect_insert()
            .withf(|job| {
                !job.id.as_str().is_empty() && job.created_at == start_of_day(job.created_at)
            })
            .times(1)
            .returning(|_| Ok(()));

        let created = service(mock).create(draft()).await.unwrap();
        assert_eq!(created.title, "Software Engineer");
    }

    #[tokio::test]
    async fn test_find_all_rejects_non_positive_page_or_limit() {
        let svc = service(MockJobStore::new());

        assert!(matches!(
            svc.find_all(0, 10).await.unwrap_err(),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            svc.find_all(1, 0).await.unwrap_err(),
            ApiError::BadRequest(_)
        ));
    }

    #[tokio::test]
    async fn test_find_all_skips_earlier_pages() {
        let mut mock = MockJobStore::new();
        mock.expect_find_page()
            .withf(|&skip, &limit| skip == 10 && limit == 10)
            .times(1)
            .returning(|_, _| Ok(Vec::new()));

        let page = service(mock).find_all(2, 10).await.unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_update_on_unknown_id_is_none() {
        let mut mock = MockJobStore::new();
        mock.expect_update().returning(|_, _| Ok(None));

        let result = service(mock)
            .update(&JobId::from_string("missing"), JobUpdate::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_all_returns_count() {
        let mut mock = MockJobStore::new();
        mock.expect_delete_all().returning(|| Ok(5));

        assert_eq!(service(mock).delete_all().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_search_preserves_store_order() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let full_time = draft().try_into_job(now).unwrap();

        let mut part_time_draft = draft();
        part_time_draft.job_type = "part-time".to_string();
        part_time_draft.salary = Some(Salary {
            min: 40_000,
            max: 95_000,
        });
        let part_time = part_time_draft.try_into_job(now).unwrap();

        let ranked = vec![full_time.clone(), part_time.clone()];
        let mut mock = MockJobStore::new();
        mock.expect_search()
            .withf(|query| query.salary == Some(60_000))
            .returning(move |_| Ok(ranked.clone()));

        let results = service(mock)
            .search(&SearchQuery {
                salary: Some(60_000),
            })
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, full_time.id);
        assert_eq!(results[1].id, part_time.id);
    }

    #[tokio::test]
    async fn test_shutdown_cleanup_swallows_store_failures() {
        let mut mock = MockJobStore::new();
        mock.expect_delete_all().returning(|| {
            Err(jobportal_store::StoreError::BsonDecode(
                bson::from_bson::<i32>(bson::Bson::String("nope".into())).unwrap_err(),
            ))
        });

        // Must not panic or propagate.
        service(mock).shutdown_cleanup().await;
    }
}
