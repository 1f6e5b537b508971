//! Search aggregation pipeline.
//!
//! Builds the server-side pipeline that filters postings by a target salary,
//! joins the companies collection for per-company posting counts, computes
//! the ranking signals, and sorts by the composite ranking key.

use bson::{doc, Document};
use chrono::{DateTime, Duration, Utc};

use jobportal_models::{start_of_day, SearchQuery};

/// Postings created within this many days of the start of today are recent.
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Job type that ranks ahead of all others. Matched exactly.
pub const FULL_TIME_JOB_TYPE: &str = "full-time";

/// Companion collection joined for per-company posting counts.
pub const COMPANIES_COLLECTION: &str = "companies";

/// Instant below which a posting stops counting as recent.
pub fn recent_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    start_of_day(now) - Duration::days(RECENT_WINDOW_DAYS)
}

/// Build the aggregation pipeline for a search query.
///
/// Stage order matters: the salary filter runs first so the join and the
/// computed fields only touch candidate documents, and the final projection
/// strips everything the ranking added so the output is plain job
/// documents. The sort key is `(is_full_time, is_recent, salary.max,
/// company_job_count)`, all descending; ties beyond the last key keep
/// retrieval order.
pub fn build_pipeline(query: &SearchQuery, now: DateTime<Utc>) -> Vec<Document> {
    let mut pipeline = Vec::with_capacity(5);

    if let Some(salary) = query.salary {
        pipeline.push(doc! {
            "$match": {
                "salary.min": { "$lte": salary },
                "salary.max": { "$gte": salary },
            }
        });
    }

    pipeline.push(doc! {
        "$lookup": {
            "from": COMPANIES_COLLECTION,
            "localField": "company",
            "foreignField": "name",
            "as": "company_profile",
        }
    });

    let cutoff = bson::DateTime::from_chrono(recent_cutoff(now));
    pipeline.push(doc! {
        "$addFields": {
            // Unknown companies count as zero open postings.
            "company_job_count": { "$ifNull": [{ "$first": "$company_profile.job_count" }, 0] },
            "is_recent": { "$cond": [{ "$gte": ["$created_at", cutoff] }, 1, 0] },
            "is_full_time": { "$cond": [{ "$eq": ["$job_type", FULL_TIME_JOB_TYPE] }, 1, 0] },
        }
    });

    pipeline.push(doc! {
        "$sort": {
            "is_full_time": -1,
            "is_recent": -1,
            "salary.max": -1,
            "company_job_count": -1,
        }
    });

    pipeline.push(doc! {
        "$project": {
            "company_profile": 0,
            "company_job_count": 0,
            "is_recent": 0,
            "is_full_time": 0,
        }
    });

    pipeline
}
