//! Pipeline stages for PDF-to-document conversion.
//!
//! Each submodule implements exactly one transformation step, so each is
//! testable on its own and the component in [`crate::convert`] only
//! sequences them.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ postprocess
//! (path/bytes)  (lopdf)    (cleanup)
//! ```
//!
//! 1. [`input`]   — read the source into a byte stream, check the PDF
//!    header and open a lopdf reader; also merges metadata layers
//! 2. [`extract`] — pull the text of each selected page and join pages with
//!    the page-break marker (used by the built-in strategy only)
//! 3. [`postprocess`] — deterministic per-page text cleanup

pub mod extract;
pub mod input;
pub mod postprocess;
