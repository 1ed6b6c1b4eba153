//! Google Document AI adapter.
//!
//! [`document`] models the raw `:process` response, [`anchor`] resolves
//! text-offset spans against the shared text buffer, [`normalize`] reshapes
//! the hierarchical response into the page-indexed output, and [`client`]
//! owns submission plus the top-level success/failure boundary.

pub mod anchor;
pub mod client;
pub mod document;
pub mod normalize;

pub use client::{analyze_document, DocAiProcessor, DocumentProcessor};
pub use normalize::AnalysisOutcome;
