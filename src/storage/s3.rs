/// S3 implementation of the media store adapter.
use crate::config::StorageConfig;
use crate::error::{AppError, Result};
use crate::storage::MediaStorage;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use std::time::Duration;

pub struct S3MediaStorage {
    client: Client,
    bucket: String,
    public_base_url: String,
    request_timeout: Duration,
}

impl S3MediaStorage {
    /// Build the client from ambient AWS credentials plus service config.
    /// A custom endpoint (MinIO, localstack) switches to path-style
    /// addressing.
    pub async fn from_config(cfg: &StorageConfig) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &cfg.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        let client = Client::from_conf(builder.build());

        tracing::info!(bucket = %cfg.bucket, "S3 media storage initialized");

        Self {
            client,
            bucket: cfg.bucket.clone(),
            public_base_url: cfg.public_base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(cfg.request_timeout_secs),
        }
    }
}

#[async_trait]
impl MediaStorage for S3MediaStorage {
    async fn upload(&self, key: &str, data: Bytes, content_type: &str) -> Result<String> {
        let put = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send();

        tokio::time::timeout(self.request_timeout, put)
            .await
            .map_err(|_| AppError::Storage(format!("upload of {key} timed out")))?
            .map_err(|e| AppError::Storage(format!("upload of {key} failed: {e}")))?;

        Ok(self.public_url(key))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let del = self
            .client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send();

        tokio::time::timeout(self.request_timeout, del)
            .await
            .map_err(|_| AppError::Storage(format!("delete of {key} timed out")))?
            .map_err(|e| AppError::Storage(format!("delete of {key} failed: {e}")))?;

        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}
