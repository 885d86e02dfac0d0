use async_trait::async_trait;
use aws_sdk_s3 as s3;
use aws_sdk_s3::{error::DisplayErrorContext, primitives::ByteStream};

use crate::{
    forms::UploadedFile,
    services::media::{MediaError, ObjectStorage},
};

/// Bucket on an S3-compatible object store with a public read URL.
#[derive(Clone)]
pub struct S3ObjectStorage {
    client: s3::Client,
    bucket: String,
    public_url: String,
}

impl S3ObjectStorage {
    pub fn new(client: s3::Client, bucket: &str, public_url: &str) -> Self {
        Self {
            client,
            bucket: bucket.to_string(),
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn upload(&self, path: &str, file: &UploadedFile) -> Result<(), MediaError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .content_type(&file.content_type)
            .body(ByteStream::from(file.data.to_vec()))
            .send()
            .await
            .map_err(|e| MediaError::Storage(DisplayErrorContext(&e).to_string()))?;

        tracing::info!("Uploaded {} to {}/{}", file.file_name, self.bucket, path);

        Ok(())
    }

    async fn remove(&self, paths: &[String]) -> Result<(), MediaError> {
        let mut failed = Vec::new();

        for key in paths {
            if let Err(e) = self
                .client
                .delete_object()
                .bucket(&self.bucket)
                .key(key)
                .send()
                .await
            {
                tracing::warn!(
                    "Failed to delete {}/{}: {}",
                    self.bucket,
                    key,
                    DisplayErrorContext(&e)
                );
                failed.push(key.as_str());
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(MediaError::Storage(format!(
                "could not delete {} of {} object(s): {}",
                failed.len(),
                paths.len(),
                failed.join(", ")
            )))
        }
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_url, path)
    }
}
