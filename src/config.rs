//! Application configuration.
//!
//! Everything is loaded from the environment once at startup and handed to
//! request handlers through `AppState` — no module-level client globals.

use anyhow::{Context, Result};

/// Configuration for the whole service, constructed once in `main`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// GCP project that owns the bucket and the Document AI processor.
    pub project_id: String,
    /// Document AI location, e.g. `us` or `eu`.
    pub docai_location: String,
    /// Document AI processor id.
    pub docai_processor_id: String,
    /// GCS bucket receiving uploaded PDFs.
    pub bucket: String,
    /// Path to the service-account key JSON file.
    pub sa_key_path: String,
    /// Origin allowed by CORS (the frontend).
    pub frontend_origin: String,
    /// Socket address the server binds to.
    pub bind_addr: String,
}

impl AppConfig {
    /// Load from environment variables. Required: `GCP_PROJECT_ID`,
    /// `DOCAI_PROCESSOR_ID`, `GCS_BUCKET`, `GOOGLE_SA_KEY_PATH`.
    pub fn from_env() -> Result<Self> {
        let project_id = std::env::var("GCP_PROJECT_ID")
            .context("GCP_PROJECT_ID environment variable not set")?;
        let docai_processor_id = std::env::var("DOCAI_PROCESSOR_ID")
            .context("DOCAI_PROCESSOR_ID environment variable not set")?;
        let bucket =
            std::env::var("GCS_BUCKET").context("GCS_BUCKET environment variable not set")?;
        let sa_key_path = std::env::var("GOOGLE_SA_KEY_PATH")
            .context("GOOGLE_SA_KEY_PATH environment variable not set")?;

        let docai_location = std::env::var("DOCAI_LOCATION").unwrap_or_else(|_| "us".to_string());
        let frontend_origin = std::env::var("FRONTEND_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        Ok(Self {
            project_id,
            docai_location,
            docai_processor_id,
            bucket,
            sa_key_path,
            frontend_origin,
            bind_addr,
        })
    }

    /// Fully-qualified processor resource name used in `:process` requests.
    pub fn processor_name(&self) -> String {
        format!(
            "projects/{}/locations/{}/processors/{}",
            self.project_id, self.docai_location, self.docai_processor_id
        )
    }

    /// Regional Document AI API endpoint.
    pub fn docai_endpoint(&self) -> String {
        format!("https://{}-documentai.googleapis.com", self.docai_location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AppConfig {
        AppConfig {
            project_id: "demo-project".to_string(),
            docai_location: "us".to_string(),
            docai_processor_id: "abc123".to_string(),
            bucket: "legal-doc-bucket".to_string(),
            sa_key_path: "/tmp/key.json".to_string(),
            frontend_origin: "http://localhost:3000".to_string(),
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }

    #[test]
    fn processor_name_includes_triple() {
        let config = sample();
        assert_eq!(
            config.processor_name(),
            "projects/demo-project/locations/us/processors/abc123"
        );
    }

    #[test]
    fn endpoint_is_regional() {
        let config = sample();
        assert_eq!(config.docai_endpoint(), "https://us-documentai.googleapis.com");
    }
}
