//! PDF access for uploaded medical records.
//!
//! The text engine is treated as an opaque collaborator: bytes in, one string
//! per page out. [`load_document_text`] stitches those pages into the single
//! document string the field extractor scans.

mod errors;
mod lopdf_engine;

#[cfg(any(test, feature = "mock"))]
pub mod fixtures;

pub use errors::ExtractionError;
pub use lopdf_engine::{join_text_items, LopdfEngine};

/// A page-by-page PDF text extraction engine
#[cfg_attr(test, mockall::automock)]
pub trait PdfTextEngine: Send + Sync {
    /// Short engine name used in logs and health reporting
    fn name(&self) -> &'static str;

    /// Extract the text of every page, in page order.
    ///
    /// Each returned string holds one page's text items joined by single spaces.
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionError>;
}

/// Load a whole document as one string.
///
/// Every page is terminated by a newline so that page boundaries stay visible
/// to the extraction rules.
pub fn load_document_text(
    engine: &dyn PdfTextEngine,
    bytes: &[u8],
) -> Result<String, ExtractionError> {
    let pages = engine.extract_pages(bytes)?;
    tracing::debug!("{} returned {} page(s)", engine.name(), pages.len());

    let mut text = String::with_capacity(pages.iter().map(|p| p.len() + 1).sum());
    for page in pages {
        text.push_str(&page);
        text.push('\n');
    }
    Ok(text)
}
