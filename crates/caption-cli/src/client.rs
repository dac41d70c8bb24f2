//! HTTP client for the relay's `/caption` endpoint

use std::path::Path;

use anyhow::{bail, Context, Result};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use url::Url;

/// Talks to a running relay
pub struct RelayClient {
    client: reqwest::Client,
    base_url: Url,
}

impl RelayClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid relay URL: {}", base_url))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
        })
    }

    /// Upload the file at `path` as the `image` field and return the JSON answer
    pub async fn caption_file(&self, path: &Path) -> Result<Value> {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read image: {}", path.display()))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        tracing::debug!(file = %path.display(), size = data.len(), "Uploading image");
        self.caption_bytes(data, file_name).await
    }

    /// Upload raw bytes as the `image` field
    pub async fn caption_bytes(&self, data: Vec<u8>, file_name: String) -> Result<Value> {
        let url = self.base_url.join("/caption")?;
        let form = Form::new().part("image", Part::bytes(data).file_name(file_name));

        let response = self
            .client
            .post(url.clone())
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("Failed to reach relay at {}", url))?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            bail!("Relay returned HTTP {}: {}", status.as_u16(), body);
        }

        serde_json::from_str(&body).context("Relay returned a non-JSON body")
    }
}
