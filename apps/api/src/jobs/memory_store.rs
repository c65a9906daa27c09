use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::store::{JobQuery, JobStore, ScanOrder};
use crate::models::job::{JobPosting, NewJobPosting};

/// Process-local job store. Records are kept in insertion order.
#[derive(Default)]
pub struct MemoryJobStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    jobs: Vec<JobPosting>,
    next_seq: i64,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn insert(&self, job: NewJobPosting, posted_by: &str) -> Result<JobPosting, AppError> {
        job.validate()?;
        let mut inner = self.inner.write().await;
        inner.next_seq += 1;
        let posting = JobPosting {
            id: Uuid::new_v4(),
            job_type: job.job_type_or_default(),
            salary: job.salary_or_none(),
            status: job.status.unwrap_or_default(),
            title: job.title,
            company: job.company,
            location: job.location,
            description: job.description,
            hr_email: job.hr_email,
            posted_by: posted_by.to_string(),
            created_at: Utc::now(),
            seq: inner.next_seq,
        };
        inner.jobs.push(posting.clone());
        Ok(posting)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<JobPosting>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn find_matching(&self, query: &JobQuery) -> Result<Vec<JobPosting>, AppError> {
        let inner = self.inner.read().await;
        let mut matched: Vec<JobPosting> = inner
            .jobs
            .iter()
            .filter(|j| query.predicate.matches(j))
            .cloned()
            .collect();
        if query.order == ScanOrder::NewestFirst {
            sort_newest_first(&mut matched);
        }
        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }
        Ok(matched)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;
        let before = inner.jobs.len();
        inner.jobs.retain(|j| j.id != id);
        Ok(inner.jobs.len() != before)
    }
}

/// `created_at` descending, then `seq` descending.
pub fn sort_newest_first(jobs: &mut [JobPosting]) {
    jobs.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.seq.cmp(&a.seq))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::store::JobPredicate;
    use crate::models::job::JobStatus;
    use chrono::Duration;

    fn new_job(title: &str) -> NewJobPosting {
        NewJobPosting {
            title: title.into(),
            company: "Acme".into(),
            location: "Remote".into(),
            hr_email: "hr@acme.test".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_identity_and_defaults() {
        let store = MemoryJobStore::new();
        let job = store.insert(new_job("Backend Engineer"), "user-1").await.unwrap();
        assert_eq!(job.posted_by, "user-1");
        assert_eq!(job.status, JobStatus::Active);
        assert_eq!(job.job_type, "Full-time");
        assert_eq!(store.find_by_id(job.id).await.unwrap(), Some(job));
    }

    #[tokio::test]
    async fn test_insert_rejects_missing_required_field() {
        let store = MemoryJobStore::new();
        let mut job = new_job("Backend Engineer");
        job.hr_email.clear();
        let err = store.insert(job, "user-1").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(store
            .find_matching(&JobQuery::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let store = MemoryJobStore::new();
        let a = store.insert(new_job("A"), "u").await.unwrap();
        let b = store.insert(new_job("A"), "u").await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_delete_reports_absence() {
        let store = MemoryJobStore::new();
        let job = store.insert(new_job("A"), "u").await.unwrap();
        assert!(store.delete_by_id(job.id).await.unwrap());
        assert!(!store.delete_by_id(job.id).await.unwrap());
        assert!(store.find_by_id(job.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insertion_order_and_limit() {
        let store = MemoryJobStore::new();
        for title in ["first", "second", "third"] {
            store.insert(new_job(title), "u").await.unwrap();
        }
        let query = JobQuery {
            predicate: JobPredicate::default(),
            order: ScanOrder::Insertion,
            limit: Some(2),
        };
        let titles: Vec<String> = store
            .find_matching(&query)
            .await
            .unwrap()
            .into_iter()
            .map(|j| j.title)
            .collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_newest_first_breaks_ties_by_insertion() {
        let store = MemoryJobStore::new();
        for title in ["first", "second", "third"] {
            store.insert(new_job(title), "u").await.unwrap();
        }
        let titles: Vec<String> = store
            .find_matching(&JobQuery::default())
            .await
            .unwrap()
            .into_iter()
            .map(|j| j.title)
            .collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
    }

    #[test]
    fn test_sort_newest_first_uses_timestamp_before_seq() {
        let now = Utc::now();
        let make = |title: &str, created_at, seq| JobPosting {
            id: Uuid::new_v4(),
            title: title.into(),
            company: "Acme".into(),
            location: "Remote".into(),
            job_type: "Full-time".into(),
            salary: None,
            description: String::new(),
            hr_email: "hr@acme.test".into(),
            status: JobStatus::Active,
            posted_by: "u".into(),
            created_at,
            seq,
        };
        let mut jobs = vec![
            make("old", now - Duration::days(2), 3),
            make("new", now, 1),
            make("mid", now - Duration::days(1), 2),
        ];
        sort_newest_first(&mut jobs);
        let titles: Vec<&str> = jobs.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "mid", "old"]);
    }
}
