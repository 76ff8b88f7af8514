use lopdf::Document;
use tracing::{debug, warn};

use super::{ExtractionError, PdfTextEngine};

/// Pure-Rust PDF text engine backed by `lopdf`
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfEngine;

impl LopdfEngine {
    /// Create a new engine
    pub fn new() -> Self {
        Self
    }
}

impl PdfTextEngine for LopdfEngine {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        let doc = Document::load_mem(bytes).map_err(|e| {
            warn!("lopdf rejected document ({} bytes): {}", bytes.len(), e);
            ExtractionError::InvalidPdf(e.to_string())
        })?;

        // get_pages is keyed by page number, so iteration is already in page order
        let pages = doc.get_pages();
        debug!("Loaded PDF with {} page(s)", pages.len());

        let mut texts = Vec::with_capacity(pages.len());
        for page_number in pages.keys() {
            let raw = doc
                .extract_text(&[*page_number])
                .map_err(|e| ExtractionError::Page {
                    page: *page_number,
                    message: e.to_string(),
                })?;
            texts.push(join_text_items(&raw));
        }

        Ok(texts)
    }
}

/// Join the text items of one page with single spaces.
///
/// lopdf reports every text object on its own line; blank lines are dropped.
pub fn join_text_items(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
