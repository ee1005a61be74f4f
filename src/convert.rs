//! The `PdfToDocument` component: PDFs in, text documents out.
//!
//! ## Per-source isolation
//!
//! Each source goes through resolve → open → convert → merge on its own and
//! yields a `Result<Document, SourceError>`. The run folds those results:
//! documents are collected in input order, errors are logged as warnings and
//! dropped. Only contract violations (a metadata list of the wrong length)
//! make the run itself fail, and they are detected before any source is read.
//!
//! ## Metadata precedence
//!
//! Per source, the byte stream's metadata (including `file_path` for path
//! sources) overlaid by the per-call metadata. Whatever metadata the
//! converter put on its document is discarded.

use crate::config::{ComponentConfig, ConverterConfig, InitParameters};
use crate::error::{Pdf2DocError, SourceError};
use crate::output::{ConversionOutput, ConversionStats, Document};
use crate::pipeline::input;
use crate::progress::ProgressCallback;
use crate::source::{Meta, MetaInput, Source};
use crate::strategy::{ConverterRegistry, DefaultConverter, PdfConverter};
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Converts PDF sources into [`Document`]s.
///
/// # Example
/// ```rust,no_run
/// use edgequake_pdf2doc::{ByteStream, PdfToDocument, Source};
///
/// let converter = PdfToDocument::new();
/// let bytes = std::fs::read("report.pdf").unwrap();
/// let output = converter
///     .run(vec![Source::from("paper.pdf"), Source::from(ByteStream::new(bytes))])
///     .unwrap();
/// for doc in &output.documents {
///     println!("{} chars", doc.content.len());
/// }
/// ```
#[derive(Clone, Default)]
pub struct PdfToDocument {
    converter: Option<Arc<dyn PdfConverter>>,
    progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for PdfToDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfToDocument")
            .field("converter", &self.converter.as_ref().map(|c| c.type_name()))
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl PdfToDocument {
    /// Type name recorded in configuration records.
    pub const TYPE_NAME: &'static str = "edgequake_pdf2doc::convert::PdfToDocument";

    /// A component using the built-in extraction.
    pub fn new() -> Self {
        Self::default()
    }

    /// A component delegating page-to-text conversion to `converter`.
    pub fn with_converter(converter: Arc<dyn PdfConverter>) -> Self {
        Self {
            converter: Some(converter),
            progress_callback: None,
        }
    }

    /// Create a new builder for `PdfToDocument`.
    pub fn builder() -> PdfToDocumentBuilder {
        PdfToDocumentBuilder {
            component: Self::default(),
        }
    }

    /// The custom strategy, or `None` when the built-in extraction is used.
    pub fn converter(&self) -> Option<&Arc<dyn PdfConverter>> {
        self.converter.as_ref()
    }

    // ── Configuration round-trip ─────────────────────────────────────────

    /// Serialisable form of this component.
    ///
    /// The progress callback is runtime-only and is not recorded.
    pub fn to_config(&self) -> ComponentConfig {
        ComponentConfig {
            type_name: Self::TYPE_NAME.to_string(),
            init_parameters: InitParameters {
                converter: self.converter.as_ref().map(|c| ConverterConfig {
                    type_name: c.type_name().to_string(),
                    data: c.to_config(),
                }),
            },
        }
    }

    /// Rebuild a component from its configuration record.
    ///
    /// # Errors
    /// - [`Pdf2DocError::UnexpectedComponentType`] if the record is for another component
    /// - [`Pdf2DocError::UnknownConverterType`] if the strategy type is not in `registry`
    /// - whatever the strategy's own `from_config` returns
    pub fn from_config(
        config: &ComponentConfig,
        registry: &ConverterRegistry,
    ) -> Result<Self, Pdf2DocError> {
        if config.type_name != Self::TYPE_NAME {
            return Err(Pdf2DocError::UnexpectedComponentType {
                expected: Self::TYPE_NAME.to_string(),
                found: config.type_name.clone(),
            });
        }

        let converter = config
            .init_parameters
            .converter
            .as_ref()
            .map(|c| registry.build(c))
            .transpose()?;

        Ok(Self {
            converter,
            progress_callback: None,
        })
    }

    /// The configuration record as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, Pdf2DocError> {
        serde_json::to_string_pretty(&self.to_config())
            .map_err(|e| Pdf2DocError::Internal(format!("config serialisation: {e}")))
    }

    /// Rebuild a component from a JSON configuration record.
    pub fn from_json(json: &str, registry: &ConverterRegistry) -> Result<Self, Pdf2DocError> {
        let config: ComponentConfig =
            serde_json::from_str(json).map_err(|e| Pdf2DocError::InvalidConfig(e.to_string()))?;
        Self::from_config(&config, registry)
    }

    // ── Run ──────────────────────────────────────────────────────────────

    /// Convert sources without per-call metadata.
    pub fn run<I, S>(&self, sources: I) -> Result<ConversionOutput, Pdf2DocError>
    where
        I: IntoIterator<Item = S>,
        S: Into<Source>,
    {
        self.run_with_meta(sources, MetaInput::None)
    }

    /// Convert sources, overlaying per-call metadata on each document.
    ///
    /// # Returns
    /// `Ok(ConversionOutput)` even when some sources were skipped; compare
    /// `output.stats.skipped` or watch the progress callback to detect it.
    ///
    /// # Errors
    /// Returns [`Pdf2DocError::MetaLengthMismatch`] when a per-source
    /// metadata list does not match the number of sources.
    pub fn run_with_meta<I, S>(
        &self,
        sources: I,
        meta: impl Into<MetaInput>,
    ) -> Result<ConversionOutput, Pdf2DocError>
    where
        I: IntoIterator<Item = S>,
        S: Into<Source>,
    {
        let start = Instant::now();
        let sources: Vec<Source> = sources.into_iter().map(Into::into).collect();
        let meta_list = meta.into().normalize(sources.len())?;
        let total = sources.len();
        info!("Starting conversion of {} source(s)", total);

        if let Some(ref cb) = self.progress_callback {
            cb.on_run_start(total);
        }

        let fallback = DefaultConverter::default();
        let converter: &dyn PdfConverter = match self.converter {
            Some(ref c) => c.as_ref(),
            None => &fallback,
        };

        let mut documents = Vec::with_capacity(total);
        let mut stats = ConversionStats {
            total_sources: total,
            ..ConversionStats::default()
        };

        for (idx, (source, call_meta)) in sources.iter().zip(&meta_list).enumerate() {
            let source_num = idx + 1;
            if let Some(ref cb) = self.progress_callback {
                cb.on_source_start(source_num, total);
            }

            match convert_source(converter, source, call_meta) {
                Ok(doc) => {
                    if doc.content.trim().is_empty() {
                        stats.empty += 1;
                    }
                    if let Some(ref cb) = self.progress_callback {
                        cb.on_source_complete(source_num, total, doc.content.len());
                    }
                    documents.push(doc);
                }
                Err(e) => {
                    warn!("{}", e);
                    if let Some(ref cb) = self.progress_callback {
                        cb.on_source_skipped(source_num, total, &e);
                    }
                    stats.skipped += 1;
                }
            }
        }

        stats.converted = documents.len();
        stats.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Conversion complete: {}/{} sources, {} skipped, {}ms",
            stats.converted, total, stats.skipped, stats.duration_ms
        );

        if let Some(ref cb) = self.progress_callback {
            cb.on_run_complete(total, stats.converted);
        }

        Ok(ConversionOutput { documents, stats })
    }

    /// Run and write `{"documents": [...]}` to `output_path`.
    ///
    /// Uses atomic write (temp file + rename) to prevent partial files.
    pub fn run_to_file<I, S>(
        &self,
        sources: I,
        meta: impl Into<MetaInput>,
        output_path: impl AsRef<Path>,
    ) -> Result<ConversionStats, Pdf2DocError>
    where
        I: IntoIterator<Item = S>,
        S: Into<Source>,
    {
        let output = self.run_with_meta(sources, meta)?;
        let path = output_path.as_ref();
        let write_err = |e: std::io::Error| Pdf2DocError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        };

        let json = serde_json::to_vec_pretty(&output)
            .map_err(|e| Pdf2DocError::Internal(format!("output serialisation: {e}")))?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(write_err)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(&json).map_err(write_err)?;
        tmp.persist(path).map_err(|e| write_err(e.error))?;

        debug!("Wrote {} documents to {}", output.documents.len(), path.display());
        Ok(output.stats)
    }
}

/// Convert one source; every failure is a [`SourceError`] naming it.
fn convert_source(
    converter: &dyn PdfConverter,
    source: &Source,
    call_meta: &Meta,
) -> Result<Document, SourceError> {
    let label = source.to_string();
    let stream = input::resolve_source(source)?;
    let reader = input::open_reader(&stream.data, &label)?;

    let doc = converter
        .convert(&reader)
        .map_err(|e| SourceError::ConversionFailed {
            input: label.clone(),
            detail: e.to_string(),
        })?;

    if doc.content.trim().is_empty() {
        warn!(
            "PdfToDocument could not extract text from the file {}. Returning an empty document.",
            label
        );
    }

    let meta = input::merge_meta([&stream.meta, call_meta]);
    debug!("Converted {}: {} chars", label, doc.content.len());
    Ok(Document::with_meta(doc.content, meta))
}

/// Builder for [`PdfToDocument`].
#[derive(Debug)]
pub struct PdfToDocumentBuilder {
    component: PdfToDocument,
}

impl PdfToDocumentBuilder {
    pub fn converter(mut self, converter: Arc<dyn PdfConverter>) -> Self {
        self.component.converter = Some(converter);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.component.progress_callback = Some(cb);
        self
    }

    pub fn build(self) -> PdfToDocument {
        self.component
    }
}
