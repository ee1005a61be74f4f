//! Output types: the documents a run produces and the run statistics.

use crate::source::Meta;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Extracted text plus metadata. One per successfully converted source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// SHA-256 hex digest of `content` and `meta`.
    pub id: String,
    /// Extracted text; empty when the PDF has no extractable text.
    pub content: String,
    #[serde(default)]
    pub meta: Meta,
}

impl Document {
    /// A document without metadata.
    pub fn new(content: impl Into<String>) -> Self {
        Self::with_meta(content, Meta::new())
    }

    /// A document with metadata. The id is derived from both.
    pub fn with_meta(content: impl Into<String>, meta: Meta) -> Self {
        let content = content.into();
        let id = document_id(&content, &meta);
        Self { id, content, meta }
    }
}

// `Meta` is a BTreeMap-backed map, so its JSON form is key-ordered and stable.
fn document_id(content: &str, meta: &Meta) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hasher.update([0u8]);
    hasher.update(serde_json::Value::Object(meta.clone()).to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Result of a [`crate::convert::PdfToDocument::run`] call.
///
/// Serialises as `{"documents": [...]}`; the stats stay out of the record.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionOutput {
    /// Converted documents, in input order minus skipped sources.
    pub documents: Vec<Document>,
    #[serde(skip)]
    pub stats: ConversionStats,
}

/// Counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Sources passed to the run.
    pub total_sources: usize,
    /// Sources that produced a document (including empty ones).
    pub converted: usize,
    /// Sources that were logged and skipped.
    pub skipped: usize,
    /// Converted sources whose content came out blank.
    pub empty: usize,
    pub duration_ms: u64,
}
