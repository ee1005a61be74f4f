//! Configuration records for the converter component.
//!
//! A [`ComponentConfig`] is the plain-data form of a
//! [`crate::convert::PdfToDocument`]: enough to persist it as JSON and rebuild
//! an equivalent component later. The pluggable strategy is stored as an
//! optional [`ConverterConfig`]; `None` (serialised as `null`) means the
//! built-in extraction is used implicitly.
//!
//! ```json
//! {"type": "edgequake_pdf2doc::convert::PdfToDocument",
//!  "init_parameters": {"converter": null}}
//! ```

use crate::error::Pdf2DocError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Data payload of a converter strategy.
pub type ConverterData = serde_json::Map<String, serde_json::Value>;

/// Serialisable form of a component instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentConfig {
    /// Fully-qualified component type name.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Constructor parameters. A missing key falls back to defaults.
    #[serde(default)]
    pub init_parameters: InitParameters,
}

/// Constructor parameters of [`crate::convert::PdfToDocument`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InitParameters {
    /// Custom strategy, or `None` for built-in extraction.
    #[serde(default)]
    pub converter: Option<ConverterConfig>,
}

/// Serialisable form of a converter strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Fully-qualified strategy type name, used as the registry key.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Whatever the strategy's `to_config` produced.
    pub data: ConverterData,
}

// ── Page selection ───────────────────────────────────────────────────────

/// Specifies which pages of the PDF the built-in extraction reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Extract all pages (default).
    #[default]
    All,
    /// Extract a single page (1-indexed).
    Single(usize),
    /// Extract a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Extract specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}

/// Parses `all`, `5`, `3-15` or `1,3,5`. Page numbers are 1-indexed.
impl FromStr for PageSelection {
    type Err = Pdf2DocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_ascii_lowercase();
        let invalid = |detail: String| Pdf2DocError::InvalidPageSelection {
            input: s.to_string(),
            detail,
        };
        let page = |p: &str| -> Result<usize, Pdf2DocError> {
            match p.trim().parse::<usize>() {
                Ok(0) => Err(invalid("pages are 1-indexed".into())),
                Ok(n) => Ok(n),
                Err(_) => Err(invalid(format!("'{}' is not a page number", p.trim()))),
            }
        };

        if input == "all" {
            Ok(PageSelection::All)
        } else if let Some((start, end)) = input.split_once('-') {
            let (start, end) = (page(start)?, page(end)?);
            if start > end {
                return Err(invalid(format!("range start {start} is after end {end}")));
            }
            Ok(PageSelection::Range(start, end))
        } else if input.contains(',') {
            input
                .split(',')
                .map(page)
                .collect::<Result<Vec<_>, _>>()
                .map(PageSelection::Set)
        } else {
            page(input.as_str()).map(PageSelection::Single)
        }
    }
}
