use std::fmt;

/// Message prefix when one or more pages differ.
const PIXEL_DIFF_PREFIX: &str = "Pixel diff found on the following pages: ";

/// Message when either buffer fails the format check.
pub(crate) const INVALID_INPUT: &str = "input is not a recognized document";

// ── Side ─────────────────────────────────────────────────────────────────────

/// Which of the two documents something refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Actual,
    Expected,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Actual => "actual",
            Side::Expected => "expected",
        })
    }
}

// ── FailureKind ──────────────────────────────────────────────────────────────

/// Why a comparison did not pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// A buffer lacks the `%PDF` prefix or failed the structural check.
    InvalidFormat { side: Side },

    /// A rasterizer could not decode one of the documents.
    RasterizationFailure { side: Side, reason: String },

    /// The documents have a different number of pages.
    PageCountMismatch { actual: usize, expected: usize },

    /// Two pages at the same index have different raster sizes and the
    /// comparison was configured to fail on that.
    DimensionMismatch {
        page_index: usize,
        actual: (u32, u32),
        expected: (u32, u32),
    },

    /// One or more pages contain differing pixels.
    PixelDiff,
}

// ── ComparisonVerdict ────────────────────────────────────────────────────────

/// The outcome of [`crate::PdfComparator::compare`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonVerdict {
    /// `true` only when both documents are valid, have the same number of
    /// pages and no page differs.
    pub pass: bool,

    /// Empty on success, otherwise a human-readable summary.
    pub message: String,

    /// 0-based indices of pages with a pixel diff, ascending.
    pub failing_pages: Vec<usize>,

    /// Failure class; `None` exactly when `pass` is `true`.
    pub failure: Option<FailureKind>,
}

impl ComparisonVerdict {
    /// 1-based page numbers of the failing pages.
    pub fn page_numbers(&self) -> Vec<usize> {
        self.failing_pages.iter().map(|i| i + 1).collect()
    }

    pub(crate) fn invalid_format(side: Side, detail: Option<String>) -> Self {
        let message = match detail {
            Some(detail) => format!("{INVALID_INPUT} ({side}: {detail})"),
            None => INVALID_INPUT.to_owned(),
        };
        Self::failed(message, Vec::new(), FailureKind::InvalidFormat { side })
    }

    pub(crate) fn rasterization_failure(side: Side, reason: String) -> Self {
        Self::failed(
            format!("failed to rasterize {side} document: {reason}"),
            Vec::new(),
            FailureKind::RasterizationFailure { side, reason },
        )
    }

    pub(crate) fn page_count_mismatch(actual: usize, expected: usize) -> Self {
        Self::failed(
            format!("page count mismatch: actual={actual}, expected={expected}"),
            Vec::new(),
            FailureKind::PageCountMismatch { actual, expected },
        )
    }

    pub(crate) fn dimension_mismatch(
        page_index: usize,
        actual: (u32, u32),
        expected: (u32, u32),
    ) -> Self {
        Self::failed(
            format!(
                "page {} dimension mismatch: actual={}x{}, expected={}x{}",
                page_index + 1,
                actual.0,
                actual.1,
                expected.0,
                expected.1
            ),
            vec![page_index],
            FailureKind::DimensionMismatch {
                page_index,
                actual,
                expected,
            },
        )
    }

    /// Aggregate verdict once every page has been compared.
    pub(crate) fn from_failing_pages(failing_pages: Vec<usize>) -> Self {
        if failing_pages.is_empty() {
            return Self {
                pass: true,
                message: String::new(),
                failing_pages,
                failure: None,
            };
        }

        let mut message = String::from(PIXEL_DIFF_PREFIX);
        for index in &failing_pages {
            message.push_str(&format!("{}, ", index + 1));
        }
        Self::failed(message, failing_pages, FailureKind::PixelDiff)
    }

    fn failed(message: String, failing_pages: Vec<usize>, failure: FailureKind) -> Self {
        Self {
            pass: false,
            message,
            failing_pages,
            failure: Some(failure),
        }
    }
}
