//! Input types: where PDF content comes from and which metadata goes with it.
//!
//! A [`Source`] is either a path on disk or an in-memory [`ByteStream`].
//! Byte streams may carry their own metadata; per-call metadata is supplied
//! separately through [`MetaInput`] and wins on conflicting keys.

use crate::error::Pdf2DocError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Document metadata: string keys to arbitrary JSON values.
pub type Meta = serde_json::Map<String, serde_json::Value>;

/// Raw PDF bytes plus any metadata that travels with them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ByteStream {
    /// The PDF file content.
    pub data: Vec<u8>,
    /// Metadata attached to the bytes; per-call metadata overrides it.
    #[serde(default)]
    pub meta: Meta,
}

impl ByteStream {
    /// Wrap raw bytes without metadata.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            meta: Meta::new(),
        }
    }

    /// Wrap raw bytes with metadata.
    pub fn with_meta(data: impl Into<Vec<u8>>, meta: Meta) -> Self {
        Self {
            data: data.into(),
            meta,
        }
    }

    /// Read a file into a byte stream, recording its path as `file_path`.
    pub fn from_file_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let mut meta = Meta::new();
        meta.insert(
            "file_path".to_string(),
            serde_json::Value::String(path.to_string_lossy().into_owned()),
        );
        Ok(Self { data, meta })
    }
}

/// A reference to PDF content: a path on disk or bytes in memory.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Path(PathBuf),
    Bytes(ByteStream),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Path(p) => write!(f, "{}", p.display()),
            Source::Bytes(bs) => match bs.meta.get("file_path").and_then(|v| v.as_str()) {
                Some(path) => write!(f, "ByteStream({path})"),
                None => write!(f, "ByteStream({} bytes)", bs.data.len()),
            },
        }
    }
}

impl From<PathBuf> for Source {
    fn from(p: PathBuf) -> Self {
        Source::Path(p)
    }
}

impl From<&Path> for Source {
    fn from(p: &Path) -> Self {
        Source::Path(p.to_path_buf())
    }
}

impl From<&PathBuf> for Source {
    fn from(p: &PathBuf) -> Self {
        Source::Path(p.clone())
    }
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        Source::Path(PathBuf::from(s))
    }
}

impl From<String> for Source {
    fn from(s: String) -> Self {
        Source::Path(PathBuf::from(s))
    }
}

impl From<ByteStream> for Source {
    fn from(bs: ByteStream) -> Self {
        Source::Bytes(bs)
    }
}

/// Per-call metadata: nothing, one mapping for every source, or one per source.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MetaInput {
    #[default]
    None,
    /// Applied to every source.
    Shared(Meta),
    /// One mapping per source, in source order.
    PerSource(Vec<Meta>),
}

impl MetaInput {
    /// Expand into exactly `sources` mappings.
    ///
    /// A per-source list of the wrong length is a contract violation and
    /// aborts the run before any source is touched.
    pub fn normalize(self, sources: usize) -> Result<Vec<Meta>, Pdf2DocError> {
        match self {
            MetaInput::None => Ok(vec![Meta::new(); sources]),
            MetaInput::Shared(meta) => Ok(vec![meta; sources]),
            MetaInput::PerSource(list) => {
                if list.len() != sources {
                    return Err(Pdf2DocError::MetaLengthMismatch {
                        sources,
                        meta: list.len(),
                    });
                }
                Ok(list)
            }
        }
    }
}

impl From<Meta> for MetaInput {
    fn from(m: Meta) -> Self {
        MetaInput::Shared(m)
    }
}

impl From<Vec<Meta>> for MetaInput {
    fn from(v: Vec<Meta>) -> Self {
        MetaInput::PerSource(v)
    }
}

impl From<Option<Meta>> for MetaInput {
    fn from(m: Option<Meta>) -> Self {
        m.map_or(MetaInput::None, MetaInput::Shared)
    }
}
