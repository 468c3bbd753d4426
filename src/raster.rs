use crate::Result;

/// One rasterized page: width × height pixels, row-major RGBA8.
pub type PageImage = image::RgbaImage;

/// Every page of one document, in physical page order.
pub type PageSet = Vec<PageImage>;

// ── Rasterizer ────────────────────────────────────────────────────────────────

/// Converts a document buffer into its pages.
///
/// This crate never renders PDFs itself; callers plug in a renderer (see
/// `PdfiumRasterizer` behind the `pdfium` feature) or any closure with the
/// right shape:
///
/// ```
/// use pdfpixeldiff::{PageImage, PageSet, PdfComparator};
///
/// let blank = |_: &[u8]| -> pdfpixeldiff::Result<PageSet> { Ok(vec![PageImage::new(8, 8)]) };
/// let comparator = PdfComparator::new(blank);
/// ```
///
/// Both documents of a comparison are rasterized at the same time from
/// different threads, hence the `Sync` bound.
pub trait Rasterizer: Sync {
    /// Render every page of `document`, in order.
    ///
    /// Returns [`crate::CompareError::Rasterization`] when the body cannot be
    /// decoded.
    fn rasterize(&self, document: &[u8]) -> Result<PageSet>;
}

impl<F> Rasterizer for F
where
    F: Fn(&[u8]) -> Result<PageSet> + Sync,
{
    fn rasterize(&self, document: &[u8]) -> Result<PageSet> {
        self(document)
    }
}
