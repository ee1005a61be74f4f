//! Pluggable converter strategies.
//!
//! A [`PdfConverter`] turns an opened PDF into exactly one [`Document`].
//! [`crate::convert::PdfToDocument`] uses the built-in [`DefaultConverter`]
//! unless a custom strategy is supplied at construction time.
//!
//! Strategies round-trip through configuration records: `to_config` gives the
//! data payload, and a [`ConverterRegistry`] maps the strategy's type name back
//! to a constructor. Registration is explicit; a record naming a type the
//! registry does not know is rejected instead of guessed at.
//!
//! # Example
//!
//! ```rust
//! use edgequake_pdf2doc::{ConverterData, ConverterError, ConverterFromConfig, ConverterRegistry,
//!     Document, Pdf2DocError, PdfConverter};
//!
//! struct TitleOnly;
//!
//! impl PdfConverter for TitleOnly {
//!     fn type_name(&self) -> &str {
//!         Self::TYPE_NAME
//!     }
//!     fn convert(&self, reader: &lopdf::Document) -> Result<Document, ConverterError> {
//!         Ok(Document::new(format!("{} pages", reader.get_pages().len())))
//!     }
//!     fn to_config(&self) -> ConverterData {
//!         ConverterData::new()
//!     }
//! }
//!
//! impl ConverterFromConfig for TitleOnly {
//!     const TYPE_NAME: &'static str = "my_app::TitleOnly";
//!     fn from_config(_data: &ConverterData) -> Result<Self, Pdf2DocError> {
//!         Ok(TitleOnly)
//!     }
//! }
//!
//! let mut registry = ConverterRegistry::default();
//! registry.register::<TitleOnly>();
//! assert!(registry.contains("my_app::TitleOnly"));
//! ```

use crate::config::{ConverterConfig, ConverterData, PageSelection};
use crate::error::{ConverterError, Pdf2DocError};
use crate::output::Document;
use crate::pipeline::extract;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Turns an opened PDF into a [`Document`].
///
/// Implementations must be `Send + Sync` so a configured component can be
/// shared across threads.
pub trait PdfConverter: Send + Sync {
    /// Fully-qualified type name recorded in configuration records.
    fn type_name(&self) -> &str;

    /// Convert the whole PDF into exactly one document.
    ///
    /// Only the content is used. The component replaces the document's
    /// metadata with the merged byte-stream and per-call metadata.
    fn convert(&self, reader: &lopdf::Document) -> Result<Document, ConverterError>;

    /// Data payload sufficient to rebuild an equivalent strategy.
    fn to_config(&self) -> ConverterData;
}

/// Reconstruction half of the strategy contract.
pub trait ConverterFromConfig: PdfConverter + Sized + 'static {
    /// Registry key; must equal what [`PdfConverter::type_name`] returns.
    const TYPE_NAME: &'static str;

    fn from_config(data: &ConverterData) -> Result<Self, Pdf2DocError>;
}

/// Builds a strategy from its configuration payload.
pub type ConverterFactory = fn(&ConverterData) -> Result<Arc<dyn PdfConverter>, Pdf2DocError>;

/// Maps strategy type names to constructors.
///
/// [`ConverterRegistry::default`] knows the built-in [`DefaultConverter`];
/// [`ConverterRegistry::empty`] knows nothing.
#[derive(Clone)]
pub struct ConverterRegistry {
    factories: HashMap<String, ConverterFactory>,
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register::<DefaultConverter>();
        registry
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ConverterRegistry")
            .field("types", &names)
            .finish()
    }
}

fn build_arc<T: ConverterFromConfig>(
    data: &ConverterData,
) -> Result<Arc<dyn PdfConverter>, Pdf2DocError> {
    Ok(Arc::new(T::from_config(data)?))
}

impl ConverterRegistry {
    /// A registry with no known strategies.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a strategy type under its `TYPE_NAME`.
    pub fn register<T: ConverterFromConfig>(&mut self) -> &mut Self {
        self.register_fn(T::TYPE_NAME, build_arc::<T>)
    }

    /// Register a constructor under an explicit type name.
    pub fn register_fn(
        &mut self,
        type_name: impl Into<String>,
        factory: ConverterFactory,
    ) -> &mut Self {
        self.factories.insert(type_name.into(), factory);
        self
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    /// Rebuild a strategy from its configuration record.
    pub fn build(&self, config: &ConverterConfig) -> Result<Arc<dyn PdfConverter>, Pdf2DocError> {
        let factory = self.factories.get(&config.type_name).ok_or_else(|| {
            Pdf2DocError::UnknownConverterType {
                type_name: config.type_name.clone(),
            }
        })?;
        factory(&config.data)
    }
}

// ── Built-in strategy ────────────────────────────────────────────────────

/// Page-break marker used by the built-in extraction: form feed.
pub const DEFAULT_PAGE_BREAK: char = '\u{000C}';

/// Built-in strategy: lopdf text extraction, one document per PDF, pages
/// separated by a page-break marker.
///
/// A component without a custom strategy uses `DefaultConverter::default()`
/// implicitly and records `null` in its configuration. Passing a configured
/// instance explicitly stores it like any other strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultConverter {
    /// Inserted between consecutive pages. Default: `'\u{000C}'`.
    pub page_break: char,
    /// Pages to extract. Default: all.
    pub pages: PageSelection,
}

impl Default for DefaultConverter {
    fn default() -> Self {
        Self {
            page_break: DEFAULT_PAGE_BREAK,
            pages: PageSelection::All,
        }
    }
}

impl DefaultConverter {
    pub fn with_page_break(mut self, page_break: char) -> Self {
        self.page_break = page_break;
        self
    }

    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }
}

impl PdfConverter for DefaultConverter {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn convert(&self, reader: &lopdf::Document) -> Result<Document, ConverterError> {
        let pages = extract::extract_pages(reader, &self.pages);
        Ok(Document::new(extract::join_pages(&pages, self.page_break)))
    }

    fn to_config(&self) -> ConverterData {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => ConverterData::new(),
        }
    }
}

impl ConverterFromConfig for DefaultConverter {
    const TYPE_NAME: &'static str = "edgequake_pdf2doc::strategy::DefaultConverter";

    fn from_config(data: &ConverterData) -> Result<Self, Pdf2DocError> {
        serde_json::from_value(serde_json::Value::Object(data.clone())).map_err(|e| {
            Pdf2DocError::InvalidConverterConfig {
                type_name: Self::TYPE_NAME.to_string(),
                detail: e.to_string(),
            }
        })
    }
}
