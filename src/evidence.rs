use crate::{AttachmentSink, PageImage, Result};
use image::ImageFormat;
use std::io::Cursor;

/// Content type attached to every page image.
pub const PNG_CONTENT_TYPE: &str = "image/png";

// ── EvidenceReporter ─────────────────────────────────────────────────────────

/// Packages the images of a differing page as attachments.
pub struct EvidenceReporter<'a, S: AttachmentSink + ?Sized> {
    sink: &'a S,
}

impl<'a, S: AttachmentSink + ?Sized> EvidenceReporter<'a, S> {
    /// Create a reporter that sends every attachment to `sink`.
    pub fn new(sink: &'a S) -> Self {
        Self { sink }
    }

    /// Emit `"Expected page N"`, `"Actual page N"` and `"Pixel diff page N"`
    /// (in that order) for the 1-based `page_number`.
    ///
    /// The three images are encoded in parallel; all three reach the sink
    /// before this returns.
    pub fn report(
        &self,
        page_number: usize,
        expected: &PageImage,
        actual: &PageImage,
        diff: &PageImage,
    ) -> Result<()> {
        let (expected_png, (actual_png, diff_png)) = rayon::join(
            || encode_png(expected),
            || rayon::join(|| encode_png(actual), || encode_png(diff)),
        );

        self.sink.attach(
            &format!("Expected page {page_number}"),
            expected_png?,
            PNG_CONTENT_TYPE,
        )?;
        self.sink.attach(
            &format!("Actual page {page_number}"),
            actual_png?,
            PNG_CONTENT_TYPE,
        )?;
        self.sink.attach(
            &format!("Pixel diff page {page_number}"),
            diff_png?,
            PNG_CONTENT_TYPE,
        )?;

        tracing::debug!(page = page_number, "reported pixel diff evidence");
        Ok(())
    }
}

/// Encode a page as PNG bytes.
///
/// PNG cannot hold an image without area, so a page with zero width or
/// height is encoded as a single transparent pixel.
pub fn encode_png(page: &PageImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    if page.width() == 0 || page.height() == 0 {
        PageImage::new(1, 1).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    } else {
        page.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    }
    Ok(bytes)
}
