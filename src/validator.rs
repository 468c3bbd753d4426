use crate::{CompareError, Result};
use lopdf::Document;

/// The four bytes every PDF file starts with: ASCII `%PDF`.
pub const PDF_MAGIC: [u8; 4] = [0x25, 0x50, 0x44, 0x46];

// ── Magic-number check ───────────────────────────────────────────────────────

/// Returns `true` when `buffer` starts with [`PDF_MAGIC`].
///
/// Buffers shorter than four bytes are rejected.
///
/// ```
/// assert!(pdfpixeldiff::validate(b"%PDF-1.7\n"));
/// assert!(!pdfpixeldiff::validate(b"not a pdf"));
/// assert!(!pdfpixeldiff::validate(b"%PD"));
/// ```
pub fn validate(buffer: &[u8]) -> bool {
    buffer.starts_with(&PDF_MAGIC)
}

// ── Structural check ─────────────────────────────────────────────────────────

/// Parse `buffer` with lopdf and confirm the mandatory document elements are
/// present. Returns the number of pages on success.
///
/// A buffer without the magic prefix is rejected before parsing.
pub fn validate_structure(buffer: &[u8]) -> Result<usize> {
    if !validate(buffer) {
        return Err(CompareError::InvalidPdf("missing %PDF header".into()));
    }

    let document = Document::load_mem(buffer)?;
    StructureValidator::new(&document).page_count()
}

// This is an internal type. Callers use `validate_structure`.
struct StructureValidator<'a> {
    document: &'a Document,
}

impl<'a> StructureValidator<'a> {
    fn new(document: &'a Document) -> Self {
        Self { document }
    }

    /// lopdf has already parsed the cross-reference table and object graph;
    /// here we just assert that the elements a renderer needs are present.
    fn page_count(&self) -> Result<usize> {
        self.document
            .catalog()
            .map_err(|e| CompareError::InvalidPdf(format!("missing or invalid catalog: {e}")))?;

        if self.document.trailer.is_empty() {
            return Err(CompareError::InvalidPdf("missing trailer dictionary".into()));
        }

        let pages = self.document.get_pages().len();
        if pages == 0 {
            return Err(CompareError::InvalidPdf("document has no pages".into()));
        }

        Ok(pages)
    }
}
