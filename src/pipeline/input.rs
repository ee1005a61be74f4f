//! Input resolution: turn a [`Source`] into bytes and the bytes into a reader.
//!
//! Both steps fail with a [`SourceError`] naming the source, which the
//! component logs before skipping it. We check for the `%PDF` header before
//! handing the bytes to lopdf so that a stray text file reports what it is
//! rather than an obscure parser error.

use crate::error::SourceError;
use crate::source::{ByteStream, Meta, Source};
use tracing::debug;

/// How far into the buffer the `%PDF` header may start. Some producers
/// prepend junk before it; readers tolerate up to 1 KiB.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Resolve a source to a byte stream.
///
/// Path sources are read from disk and tagged with `file_path`; byte
/// streams are passed through unchanged.
pub fn resolve_source(source: &Source) -> Result<ByteStream, SourceError> {
    match source {
        Source::Path(path) => {
            let stream =
                ByteStream::from_file_path(path).map_err(|e| SourceError::Unreadable {
                    input: source.to_string(),
                    detail: e.to_string(),
                })?;
            debug!("Read {} bytes from {}", stream.data.len(), path.display());
            Ok(stream)
        }
        Source::Bytes(stream) => Ok(stream.clone()),
    }
}

/// Check whether the buffer carries a PDF header near its start.
pub fn has_pdf_header(data: &[u8]) -> bool {
    let window = &data[..data.len().min(HEADER_SEARCH_WINDOW)];
    window.windows(4).any(|w| w == b"%PDF")
}

/// Parse the bytes into a lopdf document.
///
/// `label` identifies the source in the returned error.
pub fn open_reader(data: &[u8], label: &str) -> Result<lopdf::Document, SourceError> {
    if !has_pdf_header(data) {
        return Err(SourceError::NotAPdf {
            input: label.to_string(),
            magic: data.iter().take(4).copied().collect(),
        });
    }

    let reader = lopdf::Document::load_mem(data).map_err(|e| SourceError::CorruptPdf {
        input: label.to_string(),
        detail: e.to_string(),
    })?;
    debug!(
        "Opened {}: PDF {} with {} pages",
        label,
        reader.version,
        reader.get_pages().len()
    );
    Ok(reader)
}

/// Merge metadata layers in precedence order; later layers win per key.
pub fn merge_meta<'a>(layers: impl IntoIterator<Item = &'a Meta>) -> Meta {
    let mut merged = Meta::new();
    for layer in layers {
        for (k, v) in layer {
            merged.insert(k.clone(), v.clone());
        }
    }
    merged
}
