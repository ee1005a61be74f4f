//! Progress-callback trait for per-source conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::convert::PdfToDocumentBuilder::progress_callback`] to receive
//! events as the component works through its sources. Skipped sources are
//! reported here as well as in the log, so callers can collect them without
//! scraping log output.
//!
//! # Example
//!
//! ```rust
//! use edgequake_pdf2doc::{ConversionProgressCallback, PdfToDocument, SourceError};
//! use std::sync::{Arc, Mutex};
//!
//! #[derive(Default)]
//! struct SkipCollector {
//!     skipped: Mutex<Vec<String>>,
//! }
//!
//! impl ConversionProgressCallback for SkipCollector {
//!     fn on_source_skipped(&self, _n: usize, _total: usize, error: &SourceError) {
//!         self.skipped.lock().unwrap().push(error.input().to_string());
//!     }
//! }
//!
//! let collector = Arc::new(SkipCollector::default());
//! let converter = PdfToDocument::builder()
//!     .progress_callback(collector.clone())
//!     .build();
//! let output = converter.run(["missing.pdf"]).unwrap();
//! assert!(output.documents.is_empty());
//! assert_eq!(*collector.skipped.lock().unwrap(), vec!["missing.pdf".to_string()]);
//! ```

use crate::error::SourceError;
use std::sync::Arc;

/// Called by the component as it processes each source.
///
/// Sources are processed sequentially, but the component itself may be
/// shared across threads, so implementations must be `Send + Sync`. All
/// methods have default no-op implementations.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before any source is read.
    fn on_run_start(&self, total_sources: usize) {
        let _ = total_sources;
    }

    /// Called before a source is read.
    ///
    /// # Arguments
    /// * `source_num`    — 1-indexed position in the input list
    /// * `total_sources` — number of sources in the run
    fn on_source_start(&self, source_num: usize, total_sources: usize) {
        let _ = (source_num, total_sources);
    }

    /// Called when a source produced a document.
    ///
    /// # Arguments
    /// * `source_num`    — 1-indexed position in the input list
    /// * `total_sources` — number of sources in the run
    /// * `content_len`   — byte length of the extracted text (0 for empty documents)
    fn on_source_complete(&self, source_num: usize, total_sources: usize, content_len: usize) {
        let _ = (source_num, total_sources, content_len);
    }

    /// Called when a source was skipped.
    fn on_source_skipped(&self, source_num: usize, total_sources: usize, error: &SourceError) {
        let _ = (source_num, total_sources, error);
    }

    /// Called once after every source has been attempted.
    ///
    /// # Arguments
    /// * `total_sources` — number of sources in the run
    /// * `converted`     — sources that produced a document
    fn on_run_complete(&self, total_sources: usize, converted: usize) {
        let _ = (total_sources, converted);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in the component.
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
