//! # edgequake-pdf2doc
//!
//! Convert PDF files and in-memory byte streams into text documents with
//! metadata, ready for an indexing or RAG pipeline.
//!
//! ## Why this crate?
//!
//! Pipelines ingest PDFs from many places: paths on disk, blobs fetched from
//! object storage, uploads held in memory. This crate gives them one
//! component, [`PdfToDocument`], that accepts any mix of those, extracts the
//! text with [lopdf](https://docs.rs/lopdf), attaches metadata, and keeps
//! going when an individual file is missing or broken.
//!
//! ## Pipeline Overview
//!
//! ```text
//! sources (paths / byte streams) + metadata
//!  │
//!  ├─ 1. Input    read bytes, check %PDF header, open lopdf reader
//!  ├─ 2. Convert  built-in extraction or a custom PdfConverter
//!  ├─ 3. Polish   per-page cleanup (line endings, invisible chars)
//!  ├─ 4. Merge    byte-stream meta < per-call meta
//!  └─ 5. Output   {"documents": [...]}, unreadable sources logged and skipped
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdf2doc::{Meta, PdfToDocument};
//! use serde_json::json;
//!
//! let converter = PdfToDocument::new();
//! let mut meta = Meta::new();
//! meta.insert("language".into(), json!("en"));
//!
//! let output = converter.run_with_meta(["paper.pdf", "report.pdf"], meta)?;
//! for doc in &output.documents {
//!     println!("{} → {} chars", doc.meta["file_path"], doc.content.len());
//! }
//! # Ok::<(), edgequake_pdf2doc::Pdf2DocError>(())
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2doc` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-pdf2doc = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod source;
pub mod strategy;

#[cfg(test)]
mod testing;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ComponentConfig, ConverterConfig, ConverterData, InitParameters, PageSelection};
pub use convert::{PdfToDocument, PdfToDocumentBuilder};
pub use error::{ConverterError, Pdf2DocError, SourceError};
pub use output::{ConversionOutput, ConversionStats, Document};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use source::{ByteStream, Meta, MetaInput, Source};
pub use strategy::{
    ConverterFactory, ConverterFromConfig, ConverterRegistry, DefaultConverter, PdfConverter,
    DEFAULT_PAGE_BREAK,
};

// Re-export the PDF library so custom converters name the same `Document` type.
pub use lopdf;
