//! Google Cloud Storage upload client.
//!
//! Single-shot media upload via the JSON API. No retry, no resumable
//! sessions — uploads either complete or fail in one request.

use anyhow::Result;
use serde::Deserialize;
use tracing::info;

use crate::auth::TokenSource;

#[derive(Clone)]
pub struct GcsClient {
    bucket: String,
    tokens: TokenSource,
    client: reqwest::Client,
}

impl GcsClient {
    pub fn new(bucket: String, tokens: TokenSource, client: reqwest::Client) -> Self {
        Self {
            bucket,
            tokens,
            client,
        }
    }

    /// Upload raw bytes as `object_name` and return the `gs://` URI.
    pub async fn upload(&self, object_name: &str, data: Vec<u8>) -> Result<String> {
        let token = self.tokens.access_token(&self.client).await?;
        let url = upload_url(&self.bucket, object_name);

        info!(
            "GcsClient: uploading {} ({} bytes) to bucket {}",
            object_name,
            data.len(),
            self.bucket
        );

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .header("Content-Type", "application/pdf")
            .body(data)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("GCS upload error ({}): {}", status, text);
        }

        #[derive(Deserialize)]
        struct ObjectInfo {
            name: String,
        }

        let info: ObjectInfo = resp.json().await?;
        let gs_uri = format!("gs://{}/{}", self.bucket, info.name);
        info!("GcsClient: uploaded {}", gs_uri);
        Ok(gs_uri)
    }
}

fn upload_url(bucket: &str, object_name: &str) -> String {
    format!(
        "https://storage.googleapis.com/upload/storage/v1/b/{}/o?uploadType=media&name={}",
        bucket,
        urlencoding::encode(object_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_url_encodes_object_name() {
        let url = upload_url("legal-doc-bucket", "lease agreement.pdf");
        assert_eq!(
            url,
            "https://storage.googleapis.com/upload/storage/v1/b/legal-doc-bucket/o?uploadType=media&name=lease%20agreement.pdf"
        );
    }

    #[test]
    fn upload_url_passes_safe_chars() {
        let url = upload_url("b", "contract-v2.pdf");
        assert!(url.ends_with("name=contract-v2.pdf"));
    }
}
