//! Listing and type-ahead suggestions over the job store.
//!
//! An empty listing query matches every posting, while an empty suggestion fragment
//! yields no suggestions at all. List views default to showing everything; type-ahead
//! stays quiet until the user has typed something.

use serde::Deserialize;

use crate::errors::AppError;
use crate::jobs::store::{JobPredicate, JobQuery, JobStore, ScanOrder};
use crate::models::job::JobPosting;

/// Number of postings scanned for a suggestion request, and the cap on title suggestions.
pub const SUGGESTION_LIMIT: usize = 10;

/// `jobType` value meaning "no constraint".
pub const ANY_JOB_TYPE: &str = "Any";

/// Structured constraints accompanying a listing query.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilters {
    pub job_type: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
}

/// Postings whose title or company contains `query`, narrowed by `filters`, newest first.
pub async fn list_jobs(
    store: &dyn JobStore,
    query: &str,
    filters: &ListFilters,
) -> Result<Vec<JobPosting>, AppError> {
    let job_query = JobQuery {
        predicate: listing_predicate(query, filters),
        order: ScanOrder::NewestFirst,
        limit: None,
    };
    store.find_matching(&job_query).await
}

/// Up to ten distinct titles containing `fragment`.
pub async fn suggest_titles(
    store: &dyn JobStore,
    fragment: &str,
) -> Result<Vec<String>, AppError> {
    if fragment.is_empty() {
        return Ok(Vec::new());
    }
    let predicate = JobPredicate {
        title: Some(fragment.to_string()),
        ..Default::default()
    };
    let jobs = scan_for_suggestions(store, predicate).await?;
    let mut titles = distinct_in_order(jobs.into_iter().map(|j| j.title));
    titles.truncate(SUGGESTION_LIMIT);
    Ok(titles)
}

/// Distinct locations containing `fragment`, drawn from at most ten postings.
pub async fn suggest_locations(
    store: &dyn JobStore,
    fragment: &str,
) -> Result<Vec<String>, AppError> {
    if fragment.is_empty() {
        return Ok(Vec::new());
    }
    let predicate = JobPredicate {
        location: Some(fragment.to_string()),
        ..Default::default()
    };
    let jobs = scan_for_suggestions(store, predicate).await?;
    Ok(distinct_in_order(jobs.into_iter().map(|j| j.location)))
}

fn listing_predicate(query: &str, filters: &ListFilters) -> JobPredicate {
    JobPredicate {
        text: non_empty(Some(query)),
        job_type: non_empty(filters.job_type.as_deref())
            .filter(|t| !t.eq_ignore_ascii_case(ANY_JOB_TYPE)),
        company: non_empty(filters.company.as_deref()),
        location: non_empty(filters.location.as_deref()),
        title: None,
    }
}

async fn scan_for_suggestions(
    store: &dyn JobStore,
    predicate: JobPredicate,
) -> Result<Vec<JobPosting>, AppError> {
    store
        .find_matching(&JobQuery {
            predicate,
            order: ScanOrder::Insertion,
            limit: Some(SUGGESTION_LIMIT),
        })
        .await
}

/// Case-sensitive de-duplication keeping first occurrences.
fn distinct_in_order(values: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::memory_store::MemoryJobStore;
    use crate::models::job::NewJobPosting;

    fn posting(title: &str, company: &str, location: &str, job_type: &str) -> NewJobPosting {
        NewJobPosting {
            title: title.into(),
            company: company.into(),
            location: location.into(),
            job_type: Some(job_type.into()),
            hr_email: "hr@example.test".into(),
            ..Default::default()
        }
    }

    async fn seeded(jobs: Vec<NewJobPosting>) -> MemoryJobStore {
        let store = MemoryJobStore::new();
        for job in jobs {
            store.insert(job, "hr-1").await.unwrap();
        }
        store
    }

    async fn acme_store() -> MemoryJobStore {
        seeded(vec![
            posting("Backend Engineer", "Acme", "Berlin", "Full-time"),
            posting("Frontend Dev", "Acme", "Remote", "Full-time"),
        ])
        .await
    }

    fn titles(jobs: &[JobPosting]) -> Vec<&str> {
        jobs.iter().map(|j| j.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_query_matches_title_case_insensitively() {
        let store = acme_store().await;
        let jobs = list_jobs(&store, "backend", &ListFilters::default())
            .await
            .unwrap();
        assert_eq!(titles(&jobs), vec!["Backend Engineer"]);
    }

    #[tokio::test]
    async fn test_query_matches_company() {
        let store = acme_store().await;
        let jobs = list_jobs(&store, "acme", &ListFilters::default())
            .await
            .unwrap();
        assert_eq!(jobs.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_query_lists_everything_newest_first() {
        let store = seeded(vec![
            posting("One", "A", "X", "Full-time"),
            posting("Two", "B", "Y", "Contract"),
            posting("Three", "C", "Z", "Part-time"),
        ])
        .await;
        let jobs = list_jobs(&store, "", &ListFilters::default())
            .await
            .unwrap();
        assert_eq!(titles(&jobs), vec!["Three", "Two", "One"]);
        assert!(jobs.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[tokio::test]
    async fn test_job_type_filter_combines_with_query() {
        let store = seeded(vec![
            posting("Platform Engineer", "Acme", "Berlin", "Backend"),
            posting("Platform Engineer", "Acme", "Berlin", "Frontend"),
            posting("Designer", "Acme", "Berlin", "Backend"),
        ])
        .await;
        let filters = ListFilters {
            job_type: Some("Backend".into()),
            ..Default::default()
        };
        let jobs = list_jobs(&store, "engineer", &filters).await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].job_type, "Backend");
        assert_eq!(jobs[0].title, "Platform Engineer");
    }

    #[tokio::test]
    async fn test_any_job_type_is_ignored() {
        let store = acme_store().await;
        let filters = ListFilters {
            job_type: Some(ANY_JOB_TYPE.into()),
            ..Default::default()
        };
        assert_eq!(list_jobs(&store, "", &filters).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_any_job_type_ignores_case() {
        let store = acme_store().await;
        for any in ["any", "ANY", "aNy"] {
            let filters = ListFilters {
                job_type: Some(any.into()),
                ..Default::default()
            };
            assert_eq!(list_jobs(&store, "", &filters).await.unwrap().len(), 2);
        }
    }

    #[tokio::test]
    async fn test_empty_filter_strings_are_ignored() {
        let store = acme_store().await;
        let filters = ListFilters {
            job_type: Some(String::new()),
            company: Some(String::new()),
            location: Some(String::new()),
        };
        assert_eq!(list_jobs(&store, "", &filters).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_company_and_location_filters_are_substrings() {
        let store = seeded(vec![
            posting("Dev", "Acme Corp", "Berlin, DE", "Full-time"),
            posting("Dev", "Acme Corp", "Paris, FR", "Full-time"),
            posting("Dev", "Globex", "Berlin, DE", "Full-time"),
        ])
        .await;
        let filters = ListFilters {
            company: Some("acme".into()),
            location: Some("BERLIN".into()),
            ..Default::default()
        };
        let jobs = list_jobs(&store, "", &filters).await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].company, "Acme Corp");
        assert_eq!(jobs[0].location, "Berlin, DE");
    }

    #[tokio::test]
    async fn test_empty_fragment_suggests_nothing() {
        let store = acme_store().await;
        assert!(suggest_titles(&store, "").await.unwrap().is_empty());
        assert!(suggest_locations(&store, "").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_suggest_titles_in_insertion_order() {
        let store = acme_store().await;
        let titles = suggest_titles(&store, "e").await.unwrap();
        assert_eq!(titles, vec!["Backend Engineer", "Frontend Dev"]);
    }

    #[tokio::test]
    async fn test_suggest_titles_deduplicates_case_sensitively() {
        let store = seeded(vec![
            posting("Data Engineer", "A", "X", "Full-time"),
            posting("Data Engineer", "B", "X", "Full-time"),
            posting("data engineer", "C", "X", "Full-time"),
        ])
        .await;
        let titles = suggest_titles(&store, "DATA").await.unwrap();
        assert_eq!(titles, vec!["Data Engineer", "data engineer"]);
    }

    #[tokio::test]
    async fn test_suggest_titles_only_match_on_title() {
        let store = acme_store().await;
        assert!(suggest_titles(&store, "acme").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_suggest_titles_capped_and_contain_fragment() {
        let jobs = (0..25)
            .map(|i| posting(&format!("Engineer {i}"), "Acme", "Remote", "Full-time"))
            .collect();
        let store = seeded(jobs).await;
        let titles = suggest_titles(&store, "ENG").await.unwrap();
        assert_eq!(titles.len(), SUGGESTION_LIMIT);
        assert_eq!(titles[0], "Engineer 0");
        for title in &titles {
            assert!(title.to_lowercase().contains("eng"));
        }
    }

    #[tokio::test]
    async fn test_suggest_locations_dedupes_within_scan() {
        let mut jobs: Vec<NewJobPosting> = (0..9)
            .map(|_| posting("Dev", "Acme", "Berlin", "Full-time"))
            .collect();
        jobs.push(posting("Dev", "Acme", "Bern", "Full-time"));
        // Beyond the ten-posting scan window.
        jobs.push(posting("Dev", "Acme", "Bergen", "Full-time"));
        let store = seeded(jobs).await;
        let locations = suggest_locations(&store, "ber").await.unwrap();
        assert_eq!(locations, vec!["Berlin", "Bern"]);
    }

    #[test]
    fn test_distinct_in_order() {
        let values = ["b", "a", "b", "B", "a"].map(String::from);
        assert_eq!(distinct_in_order(values), vec!["b", "a", "B"]);
    }

    #[test]
    fn test_listing_predicate_normalizes_filters() {
        let filters = ListFilters {
            job_type: Some("Any".into()),
            company: Some("".into()),
            location: Some("Oslo".into()),
        };
        let p = listing_predicate("", &filters);
        assert_eq!(
            p,
            JobPredicate {
                location: Some("Oslo".into()),
                ..Default::default()
            }
        );
    }
}
