//! Typed HTTP client for the job board API.
//!
//! Authenticated calls take a [`Credential`] argument. The client itself holds no token,
//! so one instance can serve many callers.

use bytes::Bytes;
use reqwest::{multipart, Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::jobs::handlers::JobListResponse;
use crate::models::job::{JobPosting, NewJobPosting};
use crate::resumes::handlers::UploadResponse;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => StatusCode::from_u16(*status).ok(),
            ClientError::Http(e) => e.status(),
        }
    }
}

/// A bearer token for one caller.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Query for [`JobBoardClient::list_jobs`]. Empty fields are omitted.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListJobsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct JobBoardClient {
    http: Client,
    base_url: String,
}

impl JobBoardClient {
    /// `base_url` is the server root, e.g. `http://localhost:5001`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    pub async fn list_jobs(&self, params: &ListJobsParams) -> Result<Vec<JobPosting>, ClientError> {
        let response = self.http.get(self.url("/jobs")).query(params).send().await?;
        let list: JobListResponse = decode(response).await?;
        Ok(list.data)
    }

    pub async fn get_job(&self, id: Uuid) -> Result<JobPosting, ClientError> {
        let response = self.http.get(self.url(&format!("/jobs/{id}"))).send().await?;
        decode(response).await
    }

    pub async fn suggest_jobs(&self, fragment: &str) -> Result<Vec<String>, ClientError> {
        self.suggest("/jobs/suggest-jobs", fragment).await
    }

    pub async fn suggest_locations(&self, fragment: &str) -> Result<Vec<String>, ClientError> {
        self.suggest("/jobs/suggest-locations", fragment).await
    }

    pub async fn create_job(
        &self,
        credential: &Credential,
        job: &NewJobPosting,
    ) -> Result<JobPosting, ClientError> {
        let response = self
            .http
            .post(self.url("/jobs"))
            .bearer_auth(&credential.0)
            .json(job)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn delete_job(&self, credential: &Credential, id: Uuid) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/jobs/{id}")))
            .bearer_auth(&credential.0)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    /// Uploads a résumé and returns the name it was stored under.
    pub async fn upload_resume(
        &self,
        file_name: &str,
        data: Vec<u8>,
    ) -> Result<String, ClientError> {
        let part = multipart::Part::bytes(data).file_name(file_name.to_string());
        // Raw UTF-8 file names, as browsers send them.
        let form = multipart::Form::new()
            .percent_encode_noop()
            .part("resume", part);
        let response = self
            .http
            .post(self.url("/jobs/upload-resume"))
            .multipart(form)
            .send()
            .await?;
        let uploaded: UploadResponse = decode(response).await?;
        Ok(uploaded.file_path)
    }

    pub async fn fetch_resume(&self, name: &str) -> Result<Bytes, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/jobs/resume/{name}")))
            .send()
            .await?;
        Ok(check(response).await?.bytes().await?)
    }

    async fn suggest(&self, path: &str, fragment: &str) -> Result<Vec<String>, ClientError> {
        let response = self
            .http
            .get(self.url(path))
            .query(&[("q", fragment)])
            .send()
            .await?;
        decode(response).await
    }
}

async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    Ok(check(response).await?.json().await?)
}
