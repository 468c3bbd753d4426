use crate::PageImage;
use image::Rgba;

/// Colour used for every mismatched pixel in a diff image.
const HIGHLIGHT: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// How much of the expected pixel survives in the faded context layer.
const FADE_ALPHA: f32 = 0.1;

// ── PixelDiff ────────────────────────────────────────────────────────────────

/// Result of comparing one pair of pages.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelDiff {
    /// Number of pixel positions that did not match.
    pub differing_pixels: u64,

    /// Highlight image, present only when `differing_pixels > 0`.
    pub diff_image: Option<PageImage>,
}

impl PixelDiff {
    /// Returns `true` when no pixel differs.
    pub fn is_identical(&self) -> bool {
        self.differing_pixels == 0
    }
}

// ── Comparison ───────────────────────────────────────────────────────────────

/// Compare two pages.
///
/// A pixel matches when every RGBA channel differs by at most `tolerance`.
/// Mismatched pixels are painted opaque red in the diff image; matched pixels
/// show a faded grayscale copy of `expected` so the highlights keep their
/// context.
///
/// Pages of different sizes never match: they are handed to
/// [`full_frame_diff`].
pub fn diff(expected: &PageImage, actual: &PageImage, tolerance: u8) -> PixelDiff {
    if expected.dimensions() != actual.dimensions() {
        return full_frame_diff(expected, actual);
    }

    let (width, height) = expected.dimensions();
    let mut canvas = PageImage::new(width, height);
    let mut differing_pixels = 0u64;

    for ((x, y, want), got) in expected.enumerate_pixels().zip(actual.pixels()) {
        if pixels_match(want, got, tolerance) {
            canvas.put_pixel(x, y, faded(want));
        } else {
            differing_pixels += 1;
            canvas.put_pixel(x, y, HIGHLIGHT);
        }
    }

    PixelDiff {
        differing_pixels,
        diff_image: (differing_pixels > 0).then_some(canvas),
    }
}

/// Diff for a pair of pages whose dimensions disagree.
///
/// The whole `max(width) × max(height)` frame is flagged. A frame with no
/// area still yields a 1×1 highlight so the page is always reported as
/// differing.
pub fn full_frame_diff(expected: &PageImage, actual: &PageImage) -> PixelDiff {
    let width = expected.width().max(actual.width()).max(1);
    let height = expected.height().max(actual.height()).max(1);

    PixelDiff {
        differing_pixels: u64::from(width) * u64::from(height),
        diff_image: Some(PageImage::from_pixel(width, height, HIGHLIGHT)),
    }
}

// ── Private helpers ──────────────────────────────────────────────────────────

fn pixels_match(a: &Rgba<u8>, b: &Rgba<u8>, tolerance: u8) -> bool {
    a.0.iter()
        .zip(b.0.iter())
        .all(|(&x, &y)| x.abs_diff(y) <= tolerance)
}

/// Luma of `pixel` blended towards white.
fn faded(pixel: &Rgba<u8>) -> Rgba<u8> {
    let [r, g, b, a] = pixel.0;
    let luma = 0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b);
    let alpha = FADE_ALPHA * f32::from(a) / 255.0;
    let value = (255.0 + (luma - 255.0) * alpha).round() as u8;
    Rgba([value, value, value, 255])
}
