//! Raw Document AI response model (private to the adapter's concerns).
//!
//! Only the fields the normalizer consumes are modeled. Everything that can
//! be absent in a response is `Option` or defaulted, so a sparse or partial
//! document still deserializes. The API serializes int64 offsets as JSON
//! strings, so segment indices accept either a string or a number.

use serde::{Deserialize, Deserializer};

/// Envelope of a `processors/{id}:process` call.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessResponse {
    pub document: Option<Document>,
}

/// The analyzed document: shared text buffer plus page annotations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default)]
    pub page_number: u32,
    #[serde(default)]
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub form_fields: Vec<FormField>,
    #[serde(default)]
    pub image_quality_scores: Option<ImageQualityScores>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    #[serde(default)]
    pub layout: Option<Layout>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    #[serde(default)]
    pub field_name: Option<Layout>,
    #[serde(default)]
    pub field_value: Option<Layout>,
}

/// Visual element layout; only the text anchor matters here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    #[serde(default)]
    pub text_anchor: Option<TextAnchor>,
}

/// Offsets into the document's shared text buffer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnchor {
    #[serde(default)]
    pub text_segments: Vec<TextSegment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSegment {
    #[serde(default, deserialize_with = "int64_opt")]
    pub start_index: Option<u64>,
    #[serde(default, deserialize_with = "int64_opt")]
    pub end_index: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageQualityScores {
    #[serde(default)]
    pub quality_score: Option<f64>,
}

/// Accept an int64 offset serialized either as a JSON number or a string.
fn int64_opt<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u64),
        Str(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Num(n)) => Ok(Some(n)),
        Some(Raw::Str(s)) => s
            .parse::<u64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
