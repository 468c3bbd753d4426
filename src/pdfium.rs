use crate::{CompareError, PageSet, Rasterizer, Result};
use pdfium_render::prelude::*;
use std::path::PathBuf;

/// PDF points per inch.
const POINTS_PER_INCH: f32 = 72.0;

// ── PdfiumRasterizer ─────────────────────────────────────────────────────────

/// Renders documents with a PDFium shared library.
///
/// ```no_run
/// use pdfpixeldiff::{PdfComparator, PdfiumRasterizer};
///
/// let rasterizer = PdfiumRasterizer::new().with_dpi(150.0);
/// let comparator = PdfComparator::new(rasterizer);
/// ```
#[derive(Debug, Clone)]
pub struct PdfiumRasterizer {
    dpi: f32,
    library_dir: Option<PathBuf>,
}

impl Default for PdfiumRasterizer {
    fn default() -> Self {
        Self {
            dpi: 96.0,
            library_dir: None,
        }
    }
}

impl PdfiumRasterizer {
    /// 96 DPI, PDFium from the system library path.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dpi(mut self, dpi: f32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Load the PDFium library from `dir` instead of the system path.
    pub fn with_library_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.library_dir = Some(dir.into());
        self
    }

    pub fn dpi(&self) -> f32 {
        self.dpi
    }

    fn bind(&self) -> Result<Pdfium> {
        let bindings = match &self.library_dir {
            Some(dir) => {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
            }
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| CompareError::Rasterization(format!("cannot load PDFium: {e}")))?;

        Ok(Pdfium::new(bindings))
    }
}

impl Rasterizer for PdfiumRasterizer {
    fn rasterize(&self, document: &[u8]) -> Result<PageSet> {
        let pdfium = self.bind()?;
        let document = pdfium
            .load_pdf_from_byte_slice(document, None)
            .map_err(|e| CompareError::Rasterization(format!("cannot load document: {e}")))?;

        let scale = self.dpi / POINTS_PER_INCH;
        let mut pages = Vec::with_capacity(usize::from(document.pages().len()));

        for (i, page) in document.pages().iter().enumerate() {
            let config = PdfRenderConfig::new()
                .set_target_width((page.width().value * scale).round() as i32)
                .set_target_height((page.height().value * scale).round() as i32)
                .render_form_data(true)
                .render_annotations(true);

            let bitmap = page.render_with_config(&config).map_err(|e| {
                CompareError::Rasterization(format!("cannot render page {}: {e}", i + 1))
            })?;

            pages.push(bitmap.as_image().to_rgba8());
        }

        tracing::debug!(pages = pages.len(), dpi = self.dpi, "rendered document");
        Ok(pages)
    }
}
