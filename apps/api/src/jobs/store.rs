use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::{JobPosting, NewJobPosting};

/// Predicate over postings. Every present field must hold (AND); `None` means unconstrained.
/// All text comparisons are case-insensitive literal substring tests, except `job_type`
/// which is a case-insensitive exact match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobPredicate {
    /// Must appear in `title` OR `company`.
    pub text: Option<String>,
    pub job_type: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub title: Option<String>,
}

impl JobPredicate {
    pub fn matches(&self, job: &JobPosting) -> bool {
        let text_ok = self
            .text
            .as_deref()
            .map_or(true, |t| contains_ci(&job.title, t) || contains_ci(&job.company, t));
        let type_ok = self
            .job_type
            .as_deref()
            .map_or(true, |t| job.job_type.to_lowercase() == t.to_lowercase());
        text_ok
            && type_ok
            && self.company.as_deref().map_or(true, |c| contains_ci(&job.company, c))
            && self.location.as_deref().map_or(true, |l| contains_ci(&job.location, l))
            && self.title.as_deref().map_or(true, |t| contains_ci(&job.title, t))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanOrder {
    /// `created_at` descending, later inserts first on ties.
    #[default]
    NewestFirst,
    /// Oldest insert first.
    Insertion,
}

#[derive(Debug, Clone, Default)]
pub struct JobQuery {
    pub predicate: JobPredicate,
    pub order: ScanOrder,
    pub limit: Option<usize>,
}

/// Persistence seam for job postings.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Validates, assigns id and creation time, and stores the posting.
    async fn insert(&self, job: NewJobPosting, posted_by: &str) -> Result<JobPosting, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<JobPosting>, AppError>;

    async fn find_matching(&self, query: &JobQuery) -> Result<Vec<JobPosting>, AppError>;

    /// Returns `true` when a posting was removed.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, AppError>;
}

pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::JobStatus;
    use chrono::Utc;

    fn job(title: &str, company: &str, location: &str, job_type: &str) -> JobPosting {
        JobPosting {
            id: Uuid::new_v4(),
            title: title.into(),
            company: company.into(),
            location: location.into(),
            job_type: job_type.into(),
            salary: None,
            description: String::new(),
            hr_email: "hr@example.test".into(),
            status: JobStatus::Active,
            posted_by: "u1".into(),
            created_at: Utc::now(),
            seq: 1,
        }
    }

    #[test]
    fn test_empty_predicate_matches_everything() {
        assert!(JobPredicate::default().matches(&job("A", "B", "C", "Contract")));
    }

    #[test]
    fn test_text_matches_title_or_company() {
        let p = JobPredicate {
            text: Some("ACME".into()),
            ..Default::default()
        };
        assert!(p.matches(&job("Frontend Dev", "Acme", "Paris", "Full-time")));
        assert!(p.matches(&job("Acme tooling lead", "Globex", "Paris", "Full-time")));
        assert!(!p.matches(&job("Frontend Dev", "Globex", "Acme City", "Full-time")));
    }

    #[test]
    fn test_filters_combine_with_and() {
        let p = JobPredicate {
            text: Some("engineer".into()),
            job_type: Some("backend".into()),
            location: Some("berlin".into()),
            ..Default::default()
        };
        assert!(p.matches(&job("Backend Engineer", "Acme", "Berlin", "Backend")));
        assert!(!p.matches(&job("Backend Engineer", "Acme", "Munich", "Backend")));
        assert!(!p.matches(&job("Backend Engineer", "Acme", "Berlin", "Full-time")));
    }

    #[test]
    fn test_job_type_is_exact_not_substring() {
        let p = JobPredicate {
            job_type: Some("time".into()),
            ..Default::default()
        };
        assert!(!p.matches(&job("A", "B", "C", "Full-time")));
    }

    #[test]
    fn test_pattern_characters_are_literal() {
        let p = JobPredicate {
            text: Some("c.+".into()),
            ..Default::default()
        };
        assert!(!p.matches(&job("C developer", "B", "C", "Contract")));
        assert!(p.matches(&job("Senior C.+ hacker", "B", "C", "Contract")));
    }
}
