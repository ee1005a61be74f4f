//! Error types for the edgequake-pdf2doc library.
//!
//! Three error types reflect three distinct failure modes:
//!
//! * [`Pdf2DocError`] — **Fatal**: the caller misused the component
//!   (metadata list of the wrong length, configuration record for another
//!   component, unregistered converter type). Returned as `Err(Pdf2DocError)`
//!   and never logged-and-skipped.
//!
//! * [`SourceError`] — **Non-fatal**: a single source could not be read or
//!   parsed. The run logs it, skips the source and carries on with the rest
//!   of the batch.
//!
//! * [`ConverterError`] — what a [`crate::strategy::PdfConverter`] returns
//!   when it cannot turn an opened PDF into a document. The component wraps
//!   it into [`SourceError::ConversionFailed`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-pdf2doc library.
///
/// Per-source failures use [`SourceError`] and never surface here.
#[derive(Debug, Error)]
pub enum Pdf2DocError {
    // ── Run contract errors ───────────────────────────────────────────────
    /// A per-source metadata list was given whose length differs from the
    /// number of sources.
    #[error(
        "The length of the metadata list must match the number of sources \
(got {meta} metadata entries for {sources} sources)"
    )]
    MetaLengthMismatch { sources: usize, meta: usize },

    // ── Config errors ─────────────────────────────────────────────────────
    /// The configuration record describes a different component.
    #[error("Configuration record has type '{found}', expected '{expected}'")]
    UnexpectedComponentType { expected: String, found: String },

    /// The configuration record names a converter type nobody registered.
    #[error(
        "Unknown converter type '{type_name}'\n\
Register it with ConverterRegistry::register before loading the configuration."
    )]
    UnknownConverterType { type_name: String },

    /// A registered converter rejected its configuration payload.
    #[error("Invalid data for converter '{type_name}': {detail}")]
    InvalidConverterConfig { type_name: String, detail: String },

    /// A page selection string could not be parsed.
    #[error("Invalid page selection '{input}': {detail}")]
    InvalidPageSelection { input: String, detail: String },

    /// The configuration record itself is malformed.
    #[error("Invalid configuration record: {0}")]
    InvalidConfig(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output JSON file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single source.
///
/// The `Display` text is exactly what the component logs when it skips the
/// source, so it always names the offending input.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum SourceError {
    /// The source could not be read (missing file, permission denied).
    #[error("Could not read {input}. Skipping it. Error: {detail}")]
    Unreadable { input: String, detail: String },

    /// The bytes do not start with a PDF header.
    #[error(
        "Could not read {input} and convert it to Document, skipping. \
Not a PDF (first bytes: {magic:?})"
    )]
    NotAPdf { input: String, magic: Vec<u8> },

    /// The PDF library could not parse the bytes.
    #[error("Could not read {input} and convert it to Document, skipping. {detail}")]
    CorruptPdf { input: String, detail: String },

    /// The converter strategy failed on an otherwise readable PDF.
    #[error("Could not read {input} and convert it to Document, skipping. {detail}")]
    ConversionFailed { input: String, detail: String },
}

impl SourceError {
    /// The source label this error refers to.
    pub fn input(&self) -> &str {
        match self {
            SourceError::Unreadable { input, .. }
            | SourceError::NotAPdf { input, .. }
            | SourceError::CorruptPdf { input, .. }
            | SourceError::ConversionFailed { input, .. } => input,
        }
    }
}

/// Error returned by a converter strategy.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// The PDF library failed while walking the document.
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Strategy-specific failure.
    #[error("{0}")]
    Failed(String),
}
