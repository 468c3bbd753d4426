use crate::evidence::EvidenceReporter;
use crate::pixel_diff::{diff, full_frame_diff, PixelDiff};
use crate::validator::{validate, validate_structure};
use crate::{
    AttachmentSink, CompareConfig, CompareError, ComparisonVerdict, DimensionPolicy, PageImage,
    PageSet, Rasterizer, Result, Side,
};
use rayon::prelude::*;

// ── PdfComparator ────────────────────────────────────────────────────────────

/// Entry point for visual comparison of two PDF documents.
///
/// # Creating a comparator
///
/// ```no_run
/// use pdfpixeldiff::{CompareConfig, DimensionPolicy, PageSet, PdfComparator};
///
/// # fn render(_: &[u8]) -> pdfpixeldiff::Result<PageSet> { Ok(vec![]) }
/// // Exact matching, flag pages whose sizes differ
/// let c = PdfComparator::new(render);
///
/// // With custom configuration
/// let cfg = CompareConfig {
///     channel_tolerance: 2,
///     dimension_policy: DimensionPolicy::FailComparison,
///     parallel_pages: true,
///     ..Default::default()
/// };
/// let c = PdfComparator::with_config(render, cfg);
/// ```
///
/// A comparator holds no state between calls; comparing the same inputs
/// twice yields the same verdict.
pub struct PdfComparator<R: Rasterizer> {
    rasterizer: R,
    config: CompareConfig,
}

impl<R: Rasterizer> PdfComparator<R> {
    // ── Constructors ──────────────────────────────────────────────────────────

    /// Create a comparator with the default [`CompareConfig`].
    pub fn new(rasterizer: R) -> Self {
        Self::with_config(rasterizer, CompareConfig::default())
    }

    /// Create a comparator with a custom [`CompareConfig`].
    pub fn with_config(rasterizer: R, config: CompareConfig) -> Self {
        Self { rasterizer, config }
    }

    // ── Comparison ────────────────────────────────────────────────────────────

    /// Compare `actual` against `expected` page by page.
    ///
    /// Invalid input, rasterization failures, page-count mismatches and pixel
    /// differences all produce `Ok` with `pass == false`. For every differing
    /// page, three PNG attachments are sent to `sink` before the next page is
    /// reported. `Err` is returned only when the sink or the PNG encoder
    /// fails.
    pub fn compare<S: AttachmentSink + ?Sized>(
        &self,
        actual: &[u8],
        expected: &[u8],
        sink: &S,
    ) -> Result<ComparisonVerdict> {
        let span = tracing::info_span!(
            "compare",
            actual_bytes = actual.len(),
            expected_bytes = expected.len()
        );
        let _guard = span.enter();

        if let Some(verdict) = self.check_format(actual, expected) {
            return Ok(verdict);
        }

        let (actual_pages, expected_pages) = rayon::join(
            || self.rasterizer.rasterize(actual),
            || self.rasterizer.rasterize(expected),
        );

        let actual_pages = match actual_pages {
            Ok(pages) => pages,
            Err(e) => return Ok(rasterization_failed(Side::Actual, e)),
        };
        let expected_pages = match expected_pages {
            Ok(pages) => pages,
            Err(e) => return Ok(rasterization_failed(Side::Expected, e)),
        };

        tracing::debug!(
            actual_pages = actual_pages.len(),
            expected_pages = expected_pages.len(),
            "rasterized both documents"
        );

        self.compare_pages(actual_pages, expected_pages, sink)
    }

    /// Compare page sets that were already rasterized.
    ///
    /// Same rules as [`compare`](Self::compare) from the page-count check
    /// onwards. The page sets are dropped before this returns.
    pub fn compare_pages<S: AttachmentSink + ?Sized>(
        &self,
        actual_pages: PageSet,
        expected_pages: PageSet,
        sink: &S,
    ) -> Result<ComparisonVerdict> {
        if actual_pages.len() != expected_pages.len() {
            tracing::warn!(
                actual = actual_pages.len(),
                expected = expected_pages.len(),
                "page count mismatch"
            );
            return Ok(ComparisonVerdict::page_count_mismatch(
                actual_pages.len(),
                expected_pages.len(),
            ));
        }

        // Parallel mode computes every diff up front; sequential mode keeps at
        // most one diff image alive at a time.
        let diffs: Box<dyn Iterator<Item = Option<PixelDiff>> + '_> = if self.config.parallel_pages {
            let computed: Vec<Option<PixelDiff>> = expected_pages
                .par_iter()
                .zip(actual_pages.par_iter())
                .map(|(expected, actual)| self.diff_page(expected, actual))
                .collect();
            Box::new(computed.into_iter())
        } else {
            Box::new(
                expected_pages
                    .iter()
                    .zip(actual_pages.iter())
                    .map(|(expected, actual)| self.diff_page(expected, actual)),
            )
        };

        let reporter = EvidenceReporter::new(sink);
        let mut failing_pages = Vec::new();

        // Every page is visited; a differing page never stops the loop.
        for (index, page_diff) in diffs.enumerate() {
            let expected = &expected_pages[index];
            let actual = &actual_pages[index];

            let Some(page_diff) = page_diff else {
                tracing::warn!(
                    page = index + 1,
                    actual = ?actual.dimensions(),
                    expected = ?expected.dimensions(),
                    "page dimension mismatch"
                );
                return Ok(ComparisonVerdict::dimension_mismatch(
                    index,
                    actual.dimensions(),
                    expected.dimensions(),
                ));
            };

            tracing::debug!(
                page = index + 1,
                differing_pixels = page_diff.differing_pixels,
                "compared page"
            );

            if let Some(diff_image) = page_diff.diff_image {
                failing_pages.push(index);
                reporter.report(index + 1, expected, actual, &diff_image)?;
            }
        }

        let verdict = ComparisonVerdict::from_failing_pages(failing_pages);
        tracing::info!(
            pass = verdict.pass,
            failing_pages = ?verdict.page_numbers(),
            "comparison finished"
        );
        Ok(verdict)
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// Returns a reference to the rasterizer.
    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    /// Returns a reference to the active [`CompareConfig`].
    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    /// Magic-byte check on both sides, then the optional structural check.
    /// Returns the failing verdict, if any.
    fn check_format(&self, actual: &[u8], expected: &[u8]) -> Option<ComparisonVerdict> {
        let sides = [(Side::Actual, actual), (Side::Expected, expected)];

        for (side, buffer) in sides {
            if !validate(buffer) {
                tracing::warn!(%side, "buffer does not start with %PDF");
                return Some(ComparisonVerdict::invalid_format(side, None));
            }
        }

        if self.config.structural_check {
            for (side, buffer) in sides {
                if let Err(e) = validate_structure(buffer) {
                    tracing::warn!(%side, error = %e, "structural check failed");
                    return Some(ComparisonVerdict::invalid_format(side, Some(e.to_string())));
                }
            }
        }

        None
    }

    /// `None` means the dimensions differ and the policy is to fail the
    /// whole comparison.
    fn diff_page(&self, expected: &PageImage, actual: &PageImage) -> Option<PixelDiff> {
        if expected.dimensions() == actual.dimensions() {
            return Some(diff(expected, actual, self.config.channel_tolerance));
        }

        match self.config.dimension_policy {
            DimensionPolicy::FlagPage => Some(full_frame_diff(expected, actual)),
            DimensionPolicy::FailComparison => None,
        }
    }
}

fn rasterization_failed(side: Side, error: CompareError) -> ComparisonVerdict {
    let reason = match error {
        CompareError::Rasterization(reason) => reason,
        other => other.to_string(),
    };
    tracing::warn!(%side, %reason, "rasterization failed");
    ComparisonVerdict::rasterization_failure(side, reason)
}
