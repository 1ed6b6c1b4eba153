//! Document submission and the top-level analysis boundary.
//!
//! [`DocumentProcessor`] is the seam between orchestration and the external
//! service, so tests can substitute a stub. [`analyze_document`] validates
//! input before any network call and converts every failure into the uniform
//! [`AnalysisOutcome`] envelope — no raw error reaches the endpoint layer.

use anyhow::Result;
use serde_json::json;
use tracing::{error, info};

use crate::auth::TokenSource;
use crate::config::AppConfig;
use crate::docai::document::{Document, ProcessResponse};
use crate::docai::normalize::{normalize, AnalysisOutcome};

pub const GCS_URI_PREFIX: &str = "gs://";
const PDF_MIME: &str = "application/pdf";

/// Async seam over the external document-analysis service.
#[async_trait::async_trait]
pub trait DocumentProcessor: Send + Sync {
    async fn process(&self, gcs_uri: &str, mime_type: &str) -> Result<Document>;
}

/// Real Document AI client bound to one project/location/processor triple.
pub struct DocAiProcessor {
    endpoint: String,
    processor_name: String,
    tokens: TokenSource,
    client: reqwest::Client,
}

impl DocAiProcessor {
    pub fn new(config: &AppConfig, tokens: TokenSource, client: reqwest::Client) -> Self {
        Self {
            endpoint: config.docai_endpoint(),
            processor_name: config.processor_name(),
            tokens,
            client,
        }
    }
}

#[async_trait::async_trait]
impl DocumentProcessor for DocAiProcessor {
    async fn process(&self, gcs_uri: &str, mime_type: &str) -> Result<Document> {
        let token = self.tokens.access_token(&self.client).await?;
        let url = format!("{}/v1/{}:process", self.endpoint, self.processor_name);

        let body = json!({
            "gcsDocument": {
                "gcsUri": gcs_uri,
                "mimeType": mime_type,
            }
        });

        info!("DocAiProcessor: submitting {} to {}", gcs_uri, self.processor_name);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("Document AI error ({}): {}", status, text);
        }

        let parsed: ProcessResponse = resp.json().await?;
        parsed
            .document
            .ok_or_else(|| anyhow::anyhow!("Document AI response contained no document"))
    }
}

/// Submit a stored PDF and normalize the response.
///
/// Validation failures short-circuit before the processor is touched.
pub async fn analyze_document(
    processor: &dyn DocumentProcessor,
    gcs_uri: &str,
) -> AnalysisOutcome {
    let uri = gcs_uri.trim();
    if uri.is_empty() {
        return AnalysisOutcome::failure("No GCS URI provided");
    }
    if !uri.starts_with(GCS_URI_PREFIX) {
        return AnalysisOutcome::failure(format!(
            "Invalid GCS URI (expected {} prefix): {}",
            GCS_URI_PREFIX, uri
        ));
    }

    match processor.process(uri, PDF_MIME).await {
        Ok(document) => AnalysisOutcome::from_analysis(normalize(&document)),
        Err(e) => {
            error!("Document analysis failed for {}: {:#}", uri, e);
            AnalysisOutcome::failure(format!("Document analysis failed: {:#}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docai::document::{FormField, Layout, Page, TextAnchor, TextSegment, Token};
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Stub processor recording whether the network seam was crossed.
    struct StubProcessor {
        called: AtomicBool,
        document: Document,
    }

    impl StubProcessor {
        fn returning(document: Document) -> Self {
            Self {
                called: AtomicBool::new(false),
                document,
            }
        }
    }

    #[async_trait::async_trait]
    impl DocumentProcessor for StubProcessor {
        async fn process(&self, _gcs_uri: &str, _mime_type: &str) -> Result<Document> {
            self.called.store(true, Ordering::SeqCst);
            Ok(self.document.clone())
        }
    }

    struct FailingProcessor;

    #[async_trait::async_trait]
    impl DocumentProcessor for FailingProcessor {
        async fn process(&self, _gcs_uri: &str, _mime_type: &str) -> Result<Document> {
            anyhow::bail!("quota exceeded")
        }
    }

    fn whole_text_anchor(len: u64) -> Option<Layout> {
        Some(Layout {
            text_anchor: Some(TextAnchor {
                text_segments: vec![TextSegment {
                    start_index: Some(0),
                    end_index: Some(len),
                }],
            }),
        })
    }

    #[tokio::test]
    async fn invalid_prefix_fails_before_any_call() {
        let stub = StubProcessor::returning(Document::default());
        let outcome = analyze_document(&stub, "https://bucket/file.pdf").await;

        assert!(!outcome.success);
        assert!(outcome.error.as_deref().unwrap().contains("gs://"));
        assert!(!stub.called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn empty_uri_fails_with_empty_collections() {
        let stub = StubProcessor::returning(Document::default());
        let outcome = analyze_document(&stub, "").await;

        assert!(!outcome.success);
        assert!(!outcome.error.as_deref().unwrap().is_empty());
        assert!(outcome.full_text.is_empty());
        assert!(outcome.pages.is_empty());
        assert!(outcome.form_fields.is_empty());
        assert_eq!(outcome.confidence_score, None);
        assert!(!stub.called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn service_error_becomes_failure_envelope() {
        let outcome = analyze_document(&FailingProcessor, "gs://bucket/file.pdf").await;

        assert!(!outcome.success);
        assert!(outcome.error.as_deref().unwrap().contains("quota exceeded"));
        assert!(outcome.pages.is_empty());
    }

    #[tokio::test]
    async fn single_page_document_round_trips() {
        let text = "Tenant: Alice".to_string();
        let len = text.chars().count() as u64;
        let document = Document {
            text,
            pages: vec![Page {
                page_number: 1,
                tokens: vec![Token {
                    layout: whole_text_anchor(len),
                }],
                form_fields: vec![FormField {
                    field_name: Some(Layout {
                        text_anchor: Some(TextAnchor {
                            text_segments: vec![TextSegment {
                                start_index: Some(0),
                                end_index: Some(6),
                            }],
                        }),
                    }),
                    field_value: Some(Layout {
                        text_anchor: Some(TextAnchor {
                            text_segments: vec![TextSegment {
                                start_index: Some(8),
                                end_index: Some(13),
                            }],
                        }),
                    }),
                }],
                image_quality_scores: None,
            }],
        };

        let stub = StubProcessor::returning(document);
        let outcome = analyze_document(&stub, "gs://bucket/file.pdf").await;

        assert!(outcome.success);
        assert_eq!(outcome.error, None);
        assert_eq!(outcome.pages[0].text, outcome.full_text);
        assert_eq!(outcome.form_fields.len(), 1);
        assert_eq!(outcome.form_fields[0].page, 1);
        assert_eq!(outcome.form_fields[0].name, "Tenant");
        assert_eq!(outcome.form_fields[0].value, "Alice");
    }
}
