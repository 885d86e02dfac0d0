use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, de::DeserializeOwned};
use sha1::{Digest, Sha1};

use crate::{
    config::CloudinaryConfig,
    forms::UploadedFile,
    services::media::{CdnAsset, MediaCdn, MediaError},
};

const CLOUDINARY_API_URL: &str = "https://api.cloudinary.com/v1_1";

/// Signs an upload API call: `k=v` pairs in key order joined by `&`, secret appended, SHA-1 hex.
pub fn sign_params(api_secret: &str, params: &BTreeMap<&str, String>) -> String {
    let joined = params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Clone)]
pub struct CloudinaryClient {
    http: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl CloudinaryClient {
    pub fn new(config: &CloudinaryConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/{}/image/{}", CLOUDINARY_API_URL, self.cloud_name, action)
    }

    fn signed(&self, mut params: BTreeMap<&'static str, String>) -> BTreeMap<&'static str, String> {
        params.insert("timestamp", chrono::Utc::now().timestamp().to_string());
        let signature = sign_params(&self.api_secret, &params);
        params.insert("api_key", self.api_key.clone());
        params.insert("signature", signature);
        params
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, MediaError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = response
            .json::<ErrorEnvelope>()
            .await
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| status.to_string());

        Err(MediaError::Rejected(message))
    }
}

#[async_trait]
impl MediaCdn for CloudinaryClient {
    async fn upload(&self, file: &UploadedFile, folder: &str) -> Result<CdnAsset, MediaError> {
        let params = self.signed(BTreeMap::from([("folder", folder.to_string())]));

        let part = Part::bytes(file.data.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)?;

        let form = params
            .into_iter()
            .fold(Form::new().part("file", part), |form, (key, value)| {
                form.text(key, value)
            });

        let response = self
            .http
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;

        let asset: CdnAsset = Self::read_json(response).await?;
        tracing::info!("Uploaded {} to CDN as {}", file.file_name, asset.public_id);

        Ok(asset)
    }

    async fn destroy(&self, public_id: &str) -> Result<(), MediaError> {
        let params = self.signed(BTreeMap::from([("public_id", public_id.to_string())]));

        let response = self
            .http
            .post(self.endpoint("destroy"))
            .form(&params)
            .send()
            .await?;

        let outcome: DestroyResponse = Self::read_json(response).await?;

        match outcome.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(MediaError::Rejected(format!(
                "destroy of {} returned '{}'",
                public_id, other
            ))),
        }
    }
}
