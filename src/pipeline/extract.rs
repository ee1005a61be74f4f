//! Built-in text extraction: read selected pages through lopdf and join them.
//!
//! A page whose text cannot be extracted (unsupported font encoding, broken
//! content stream) is not fatal: it is logged and contributes an empty
//! segment, so the page-break count still matches the page count.

use crate::config::PageSelection;
use crate::pipeline::postprocess;
use tracing::{debug, warn};

/// Extract the cleaned text of each selected page, in page order.
///
/// # Returns
/// A vector of `(page_number_1based, text)` tuples.
pub fn extract_pages(reader: &lopdf::Document, pages: &PageSelection) -> Vec<(u32, String)> {
    let page_numbers: Vec<u32> = reader.get_pages().keys().copied().collect();
    let total_pages = page_numbers.len();

    let mut results = Vec::with_capacity(total_pages);
    for idx in pages.to_indices(total_pages) {
        let page_num = page_numbers[idx];
        let text = match reader.extract_text(&[page_num]) {
            Ok(raw) => postprocess::clean_page_text(&raw),
            Err(e) => {
                warn!("Could not extract text from page {}: {}", page_num, e);
                String::new()
            }
        };
        debug!("Page {} → {} chars", page_num, text.len());
        results.push((page_num, text));
    }
    results
}

/// Join page texts with the page-break marker.
///
/// Returns an empty string when no page has any text, so a scanned PDF
/// yields `""` rather than a string of bare markers.
pub fn join_pages(pages: &[(u32, String)], page_break: char) -> String {
    if pages.iter().all(|(_, text)| text.trim().is_empty()) {
        return String::new();
    }
    pages
        .iter()
        .map(|(_, text)| text.as_str())
        .collect::<Vec<_>>()
        .join(page_break.to_string().as_str())
}
