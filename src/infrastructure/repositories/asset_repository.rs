use async_trait::async_trait;
use std::time::Duration;

/// Repository for media referenced by URL
#[async_trait]
pub trait AssetRepository: Send + Sync {
    /// Download the resource at `url`.
    ///
    /// Any transport failure, non-success status, timeout or oversized body is
    /// an error; the message identifies it as a fetch failure.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, String>;
}

/// Plain HTTP(S) download, bounded in time and size
pub struct HttpAssetRepository {
    http_client: reqwest::Client,
    max_bytes: usize,
}

impl HttpAssetRepository {
    pub fn new(timeout: Duration, max_bytes: usize) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            max_bytes,
        })
    }

    fn too_large(&self) -> String {
        format!("failed to fetch image: body exceeds {} bytes", self.max_bytes)
    }
}

#[async_trait]
impl AssetRepository for HttpAssetRepository {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, String> {
        tracing::info!(url = %url, "Fetching remote image");

        let mut response = self.http_client.get(url).send().await.map_err(|e| {
            tracing::error!(error = %e, url = %url, "Image request failed");
            format!("failed to fetch image: {}", e)
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = %status, url = %url, "Image request rejected");
            return Err(format!("failed to fetch image: {}", status.as_u16()));
        }

        if let Some(length) = response.content_length() {
            if length > self.max_bytes as u64 {
                tracing::error!(content_length = length, url = %url, "Image too large");
                return Err(self.too_large());
            }
        }

        // Content-Length may be absent or wrong, so the streamed total is checked too
        let mut bytes = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| format!("failed to fetch image: {}", e))?
        {
            if bytes.len() + chunk.len() > self.max_bytes {
                tracing::error!(url = %url, "Image body exceeded limit while streaming");
                return Err(self.too_large());
            }
            bytes.extend_from_slice(&chunk);
        }

        tracing::debug!(url = %url, image_size = bytes.len(), "Remote image fetched");

        Ok(bytes)
    }
}
