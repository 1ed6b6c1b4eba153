//! Response normalization: hierarchical Document AI output → page-indexed
//! analysis structure.
//!
//! A pure, single-pass transform. Both field views (per-page groups and the
//! flat page-tagged list) derive from the same underlying fields, so neither
//! drops nor duplicates entries.

use serde::{Deserialize, Serialize};

use crate::docai::anchor::anchored_text;
use crate::docai::document::Document;

/// A resolved (name, value) form-field pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedField {
    pub name: String,
    pub value: String,
}

/// One page's reconstructed text and fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageAnalysis {
    pub page_number: u32,
    pub text: String,
    pub form_fields: Vec<NamedField>,
}

/// A form field tagged with its originating page number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedField {
    pub page: u32,
    pub name: String,
    pub value: String,
}

/// Normalized analysis of a single document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    pub full_text: String,
    pub pages: Vec<PageAnalysis>,
    pub form_fields: Vec<TaggedField>,
    pub confidence_score: Option<f64>,
}

/// Uniform result envelope returned to callers: either the full analysis
/// with `success: true`, or empty collections plus an error message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub full_text: String,
    pub pages: Vec<PageAnalysis>,
    pub form_fields: Vec<TaggedField>,
    pub confidence_score: Option<f64>,
    pub success: bool,
    pub error: Option<String>,
}

impl AnalysisOutcome {
    pub fn from_analysis(analysis: DocumentAnalysis) -> Self {
        Self {
            full_text: analysis.full_text,
            pages: analysis.pages,
            form_fields: analysis.form_fields,
            confidence_score: analysis.confidence_score,
            success: true,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            full_text: String::new(),
            pages: Vec::new(),
            form_fields: Vec::new(),
            confidence_score: None,
            success: false,
            error: Some(message.into()),
        }
    }
}

/// Reshape a Document AI response into the page-indexed structure.
///
/// Page text is best-effort: every token's anchor is resolved against the
/// shared buffer and the pieces are joined with single spaces. The
/// confidence score is the first page quality score present, `None` if the
/// service attached none.
pub fn normalize(document: &Document) -> DocumentAnalysis {
    let text = &document.text;

    let mut pages = Vec::with_capacity(document.pages.len());
    let mut flat_fields = Vec::new();

    for page in &document.pages {
        let page_text = page
            .tokens
            .iter()
            .map(|token| {
                anchored_text(
                    token.layout.as_ref().and_then(|l| l.text_anchor.as_ref()),
                    text,
                )
            })
            .collect::<Vec<_>>()
            .join(" ");

        let mut page_fields = Vec::with_capacity(page.form_fields.len());
        for field in &page.form_fields {
            let name = anchored_text(
                field
                    .field_name
                    .as_ref()
                    .and_then(|l| l.text_anchor.as_ref()),
                text,
            );
            let value = anchored_text(
                field
                    .field_value
                    .as_ref()
                    .and_then(|l| l.text_anchor.as_ref()),
                text,
            );

            flat_fields.push(TaggedField {
                page: page.page_number,
                name: name.clone(),
                value: value.clone(),
            });
            page_fields.push(NamedField { name, value });
        }

        pages.push(PageAnalysis {
            page_number: page.page_number,
            text: page_text,
            form_fields: page_fields,
        });
    }

    let confidence_score = document
        .pages
        .iter()
        .filter_map(|p| p.image_quality_scores.as_ref())
        .find_map(|scores| scores.quality_score);

    DocumentAnalysis {
        full_text: text.clone(),
        pages,
        form_fields: flat_fields,
        confidence_score,
    }
}
