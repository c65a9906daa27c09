use std::path::PathBuf;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;

/// Byte storage for uploaded résumés, keyed by generated name.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn put(&self, name: &str, data: Bytes, content_type: &str) -> Result<(), AppError>;

    /// `None` when nothing is stored under `name`.
    async fn get(&self, name: &str) -> Result<Option<Bytes>, AppError>;
}

/// Files under a local directory.
pub struct DiskResumeStore {
    dir: PathBuf,
}

impl DiskResumeStore {
    /// Creates the directory if it does not exist yet.
    pub async fn open(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        if !tokio::fs::try_exists(&dir).await? {
            tokio::fs::create_dir_all(&dir).await?;
            info!("Created upload directory {}", dir.display());
        }
        Ok(Self { dir })
    }
}

#[async_trait]
impl ResumeStore for DiskResumeStore {
    async fn put(&self, name: &str, data: Bytes, _content_type: &str) -> Result<(), AppError> {
        tokio::fs::write(self.dir.join(name), &data)
            .await
            .map_err(|e| AppError::Storage(format!("write {name}: {e}")))
    }

    async fn get(&self, name: &str) -> Result<Option<Bytes>, AppError> {
        match tokio::fs::read(self.dir.join(name)).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Storage(format!("read {name}: {e}"))),
        }
    }
}

/// Objects in an S3-compatible bucket under the `resumes/` prefix.
pub struct S3ResumeStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ResumeStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    fn key(name: &str) -> String {
        format!("resumes/{name}")
    }
}

#[async_trait]
impl ResumeStore for S3ResumeStore {
    async fn put(&self, name: &str, data: Bytes, content_type: &str) -> Result<(), AppError> {
        let key = Self::key(name);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;
        info!("Uploaded résumé to s3://{}/{}", self.bucket, key);
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Option<Bytes>, AppError> {
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(Self::key(name))
            .send()
            .await;
        let output = match result {
            Ok(output) => output,
            Err(err) => {
                if err
                    .as_service_error()
                    .map(|se| se.is_no_such_key())
                    .unwrap_or(false)
                {
                    return Ok(None);
                }
                return Err(AppError::Storage(format!("S3 download failed: {err}")));
            }
        };
        let data = output
            .body
            .collect()
            .await
            .map_err(|e| AppError::Storage(format!("S3 body read failed: {e}")))?;
        Ok(Some(data.into_bytes()))
    }
}
