use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

pub const DEFAULT_JOB_TYPE: &str = "Full-time";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum JobStatus {
    #[default]
    Active,
    Closed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Active => "Active",
            JobStatus::Closed => "Closed",
        }
    }

    /// Unknown stored values read back as `Active`.
    pub fn from_stored(value: &str) -> Self {
        match value {
            "Closed" => JobStatus::Closed,
            _ => JobStatus::Active,
        }
    }
}

/// A single job listing as stored and as served over the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub salary: Option<String>,
    pub description: String,
    pub hr_email: String,
    pub status: JobStatus,
    pub posted_by: String,
    pub created_at: DateTime<Utc>,
    /// Insertion counter, tie-breaker for equal timestamps.
    #[serde(skip)]
    pub seq: i64,
}

/// Submission body for `POST /api/jobs`.
/// `id`, `postedBy` and `createdAt` are not accepted from the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJobPosting {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hr_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
}

impl NewJobPosting {
    /// Rejects submissions with a blank required field.
    pub fn validate(&self) -> Result<(), AppError> {
        let required = [
            ("title", &self.title),
            ("company", &self.company),
            ("location", &self.location),
            ("hrEmail", &self.hr_email),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Missing required field(s): {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }

    pub fn job_type_or_default(&self) -> String {
        self.job_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_JOB_TYPE)
            .to_string()
    }

    pub fn salary_or_none(&self) -> Option<String> {
        self.salary
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    }
}
