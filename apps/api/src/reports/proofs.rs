//! Blob storage for uploaded salary proofs (pay slips, contracts).

use std::collections::HashMap;

use async_trait::async_trait;
use axum::{
    extract::Multipart,
    http::header,
    response::{IntoResponse, Response},
};
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

const PROOF_PREFIX: &str = "salary_proofs";

pub fn report_proof_key(report_id: Uuid) -> String {
    format!("{PROOF_PREFIX}/reports/{report_id}/{}", Uuid::new_v4())
}

pub fn profile_proof_key(profile_id: i64) -> String {
    format!("{PROOF_PREFIX}/profiles/{profile_id}/{}", Uuid::new_v4())
}

#[async_trait]
pub trait ProofStorage: Send + Sync {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), AppError>;

    /// `None` when nothing is stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<StoredProof>, AppError>;
}

pub struct S3ProofStorage {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ProofStorage {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl ProofStorage for S3ProofStorage {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), AppError> {
        let size = body.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        info!("Uploaded {size} byte proof to s3://{}/{}", self.bucket, key);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<StoredProof>, AppError> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    return Ok(None);
                }
                return Err(AppError::Storage(format!(
                    "S3 download failed: {service_error}"
                )));
            }
        };

        let content_type = output
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let body = output
            .body
            .collect()
            .await
            .map_err(|e| AppError::Storage(format!("S3 download failed: {e}")))?
            .into_bytes();

        Ok(Some(StoredProof { body, content_type }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredProof {
    pub body: Bytes,
    pub content_type: String,
}

/// Served back as the raw file.
impl IntoResponse for StoredProof {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

/// Loads the proof a verification points at. Missing key or missing object
/// is `NotFound`.
pub async fn fetch_proof(
    storage: &dyn ProofStorage,
    proof_key: Option<&str>,
    owner: &str,
) -> Result<StoredProof, AppError> {
    let key = proof_key.ok_or_else(|| AppError::NotFound(format!("{owner} has no proof")))?;
    storage
        .get(key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Proof {key} is missing from storage")))
}

/// Keeps proofs in memory. Used when no bucket is configured.
#[derive(Default)]
pub struct InMemoryProofStorage {
    objects: RwLock<HashMap<String, StoredProof>>,
}

impl InMemoryProofStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProofStorage for InMemoryProofStorage {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), AppError> {
        self.objects.write().await.insert(
            key.to_string(),
            StoredProof {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<StoredProof>, AppError> {
        Ok(self.objects.read().await.get(key).cloned())
    }
}

/// A file pulled out of a multipart upload.
pub struct UploadedFile {
    pub body: Bytes,
    pub content_type: String,
}

/// Reads the `file` part of a multipart body, enforcing the upload size limit.
pub async fn read_proof_file(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let body = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        if body.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }
        if body.len() > max_bytes {
            return Err(AppError::Validation(format!(
                "Uploaded file exceeds {max_bytes} bytes"
            )));
        }
        return Ok(UploadedFile { body, content_type });
    }

    Err(AppError::Validation(
        "Multipart field 'file' is required".to_string(),
    ))
}
