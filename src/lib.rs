//! # pdfpixeldiff
//!
//! A Rust library for checking that two PDF documents render to identical
//! pages, and for collecting visual evidence when they don't.
//!
//! ## What this crate does
//!
//! 1. **Validate input** — both buffers must start with the `%PDF` magic bytes
//!    (and optionally parse as a structurally valid document).
//! 2. **Rasterize** — both documents are rendered concurrently through a
//!    caller-supplied [`Rasterizer`].
//! 3. **Diff pages** — pages are paired by index and compared pixel by pixel.
//! 4. **Report evidence** — for every differing page the expected, actual and
//!    pixel-diff images are PNG-encoded and handed to an [`AttachmentSink`].
//!
//! Every expected failure (bad input, page-count mismatch, rasterization
//! failure, differing pixels) comes back as a [`ComparisonVerdict`] with
//! `pass == false`. Only sink or encoding faults are returned as `Err`.
//!
//! ## Quick example
//!
//! ```no_run
//! use pdfpixeldiff::{MemorySink, PageImage, PdfComparator};
//!
//! # fn render(_: &[u8]) -> pdfpixeldiff::Result<Vec<PageImage>> { Ok(vec![]) }
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let comparator = PdfComparator::new(render);
//! let sink = MemorySink::new();
//!
//! let actual = std::fs::read("actual.pdf")?;
//! let expected = std::fs::read("expected.pdf")?;
//! let verdict = comparator.compare(&actual, &expected, &sink)?;
//!
//! if !verdict.pass {
//!     println!("{}", verdict.message);
//!     for attachment in sink.attachments() {
//!         println!("  {} — {} bytes", attachment.name, attachment.payload.len());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

mod comparator;
mod evidence;
#[cfg(feature = "pdfium")]
mod pdfium;
mod pixel_diff;
mod raster;
mod sink;
mod validator;
mod verdict;

pub use comparator::PdfComparator;
pub use evidence::{encode_png, EvidenceReporter, PNG_CONTENT_TYPE};
#[cfg(feature = "pdfium")]
pub use pdfium::PdfiumRasterizer;
pub use pixel_diff::{diff, full_frame_diff, PixelDiff};
pub use raster::{PageImage, PageSet, Rasterizer};
pub use sink::{Attachment, AttachmentSink, DirectorySink, MemorySink};
pub use validator::{validate, validate_structure, PDF_MAGIC};
pub use verdict::{ComparisonVerdict, FailureKind, Side};

// ── Configuration ────────────────────────────────────────────────────────────

/// What to do when two pages at the same index rasterize to different sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DimensionPolicy {
    /// Treat the page as differing everywhere: it is listed in the verdict
    /// message and its evidence is reported like any other differing page.
    #[default]
    FlagPage,

    /// Stop at the first mismatched page and fail the whole comparison with a
    /// dimension-mismatch message.
    FailComparison,
}

/// Runtime configuration for [`PdfComparator`].
#[derive(Debug, Clone, Default)]
pub struct CompareConfig {
    /// Largest per-channel difference that still counts as a matching pixel.
    /// `0` means exact equality.
    pub channel_tolerance: u8,

    /// Policy for pages whose raster dimensions differ.
    pub dimension_policy: DimensionPolicy,

    /// When `true`, buffers that pass the magic-byte check are also parsed
    /// with lopdf and must contain a catalog, at least one page and a trailer.
    pub structural_check: bool,

    /// When `true`, per-page pixel diffs run on the rayon thread pool.
    /// Evidence is still reported in ascending page order.
    pub parallel_pages: bool,
}

// ── Error type ───────────────────────────────────────────────────────────────

/// Faults that abort a comparison instead of producing a verdict.
#[derive(Error, Debug)]
pub enum CompareError {
    /// A filesystem I/O error occurred (e.g. while writing evidence to disk).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A page image could not be encoded as PNG.
    #[error("Failed to encode page image: {0}")]
    Encode(#[from] image::ImageError),

    /// A custom attachment sink rejected an attachment.
    #[error("Attachment sink error: {0}")]
    Sink(String),

    /// A rasterizer could not decode or render a document.
    #[error("Rasterization failed: {0}")]
    Rasterization(String),

    /// The input bytes do not form a structurally valid PDF document.
    #[error("Invalid PDF: {0}")]
    InvalidPdf(String),

    /// The underlying lopdf parser returned an error.
    #[error("PDF parse error: {0}")]
    ParseError(#[from] lopdf::Error),
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, CompareError>;
