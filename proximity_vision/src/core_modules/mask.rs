// THEORY:
// The `mask` module turns a color frame into a clean binary silhouette of the tracked
// hand. It is a two step process:
// 1.  **Thresholding**: every pixel is converted to HSV and tested against the active
//     `HsvRange`. Matches become 255, everything else 0. The result is a `GrayImage`
//     so it can be dumped straight to disk for tuning.
// 2.  **Morphology**: the raw mask is speckled with sensor noise and has ragged edges.
//     One erosion strips isolated specks, then two dilations regrow the surviving
//     region and close small gaps between fingers.
//
// Both morphological operators use a square structuring element. A square kernel is
// separable, so each pass is a horizontal sweep followed by a vertical sweep. Pixels
// beyond the image border simply do not take part: the border never erodes the mask
// and never grows it.

use crate::core_modules::hsv::{Hsv, HsvRange};
use image::{GrayImage, Luma, RgbImage};
use serde::{Deserialize, Serialize};

/// Pixel value of a foreground mask pixel.
pub const FOREGROUND: u8 = 255;
/// Pixel value of a background mask pixel.
pub const BACKGROUND: u8 = 0;

/// Tunables for the noise cleanup stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphologyConfig {
    /// Side length of the square structuring element, in pixels.
    pub kernel_size: u32,
    pub erode_iterations: u32,
    pub dilate_iterations: u32,
}

impl Default for MorphologyConfig {
    fn default() -> Self {
        Self {
            kernel_size: 5,
            erode_iterations: 1,
            dilate_iterations: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MorphOp {
    Erode,
    Dilate,
}

/// Builds a binary mask of every pixel whose HSV value falls inside `range`.
pub fn in_range(frame: &RgbImage, range: &HsvRange) -> GrayImage {
    let mut mask = GrayImage::new(frame.width(), frame.height());
    for (x, y, pixel) in frame.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        if range.contains(Hsv::from_rgb(r, g, b)) {
            mask.put_pixel(x, y, Luma([FOREGROUND]));
        }
    }
    mask
}

/// Shrinks the foreground: a pixel survives only if every in-bounds pixel under the
/// kernel is foreground.
pub fn erode(mask: &GrayImage, kernel_size: u32, iterations: u32) -> GrayImage {
    morph(mask, kernel_size, iterations, MorphOp::Erode)
}

/// Grows the foreground: a pixel turns on if any in-bounds pixel under the kernel is on.
pub fn dilate(mask: &GrayImage, kernel_size: u32, iterations: u32) -> GrayImage {
    morph(mask, kernel_size, iterations, MorphOp::Dilate)
}

/// Runs the configured erode-then-dilate cleanup.
pub fn clean(mask: &GrayImage, config: &MorphologyConfig) -> GrayImage {
    let eroded = erode(mask, config.kernel_size, config.erode_iterations);
    dilate(&eroded, config.kernel_size, config.dilate_iterations)
}

/// Number of foreground pixels in a mask.
pub fn count_foreground(mask: &GrayImage) -> usize {
    mask.pixels().filter(|p| p.0[0] != BACKGROUND).count()
}

fn morph(mask: &GrayImage, kernel_size: u32, iterations: u32, op: MorphOp) -> GrayImage {
    let mut current = mask.clone();
    if kernel_size <= 1 {
        return current;
    }
    for _ in 0..iterations {
        let horizontal = sweep(&current, kernel_size, op, Axis::Horizontal);
        current = sweep(&horizontal, kernel_size, op, Axis::Vertical);
    }
    current
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

/// One-dimensional min (erode) or max (dilate) filter along `axis`.
fn sweep(src: &GrayImage, kernel_size: u32, op: MorphOp, axis: Axis) -> GrayImage {
    let (width, height) = src.dimensions();
    let anchor = (kernel_size / 2) as i64;
    let mut dst = GrayImage::new(width, height);

    let len = match axis {
        Axis::Horizontal => width,
        Axis::Vertical => height,
    } as i64;

    for y in 0..height {
        for x in 0..width {
            let pos = match axis {
                Axis::Horizontal => x,
                Axis::Vertical => y,
            } as i64;
            let start = (pos - anchor).max(0);
            let end = (pos - anchor + kernel_size as i64 - 1).min(len - 1);

            let mut value = match op {
                MorphOp::Erode => FOREGROUND,
                MorphOp::Dilate => BACKGROUND,
            };
            for k in start..=end {
                let sample = match axis {
                    Axis::Horizontal => src.get_pixel(k as u32, y).0[0],
                    Axis::Vertical => src.get_pixel(x, k as u32).0[0],
                };
                value = match op {
                    MorphOp::Erode => value.min(sample),
                    MorphOp::Dilate => value.max(sample),
                };
            }
            dst.put_pixel(x, y, Luma([value]));
        }
    }
    dst
}
