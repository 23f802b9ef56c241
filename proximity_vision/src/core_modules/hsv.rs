// THEORY:
// The `hsv` module is the first stage of the tracker. It turns an RGB pixel into the
// hue/saturation/value triple that skin-tone thresholding works on, using the same
// 8-bit packing the camera tooling and trackbars speak:
//   • hue is stored as degrees / 2, so it fits 0..=179
//   • saturation and value are scaled to 0..=255
//
// Thresholding is a plain inclusive box test on all three channels. There is no hue
// wrap-around: a range whose lower hue is above its upper hue matches nothing, exactly
// like the interactive trackbars behave.

use serde::{Deserialize, Serialize};

/// Largest hue value in the 8-bit packing (359 degrees / 2, rounded down).
pub const HUE_MAX: u8 = 179;
/// Largest saturation or value.
pub const CHANNEL_MAX: u8 = 255;

/// A pixel in 8-bit HSV space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Hsv {
    /// Hue in half-degrees (0..=179).
    pub h: u8,
    /// Saturation (0..=255).
    pub s: u8,
    /// Value, the brightest channel (0..=255).
    pub v: u8,
}

impl Hsv {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }

    /// Converts an sRGB pixel into 8-bit HSV.
    pub fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        let r = red as f32;
        let g = green as f32;
        let b = blue as f32;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let chroma = max - min;

        let s = if max > 0.0 { (255.0 * chroma / max).round() } else { 0.0 };

        let hue_degrees = if chroma == 0.0 {
            0.0
        } else if max == r {
            60.0 * (g - b) / chroma
        } else if max == g {
            120.0 + 60.0 * (b - r) / chroma
        } else {
            240.0 + 60.0 * (r - g) / chroma
        };
        let hue_degrees = if hue_degrees < 0.0 { hue_degrees + 360.0 } else { hue_degrees };

        // 359.x degrees rounds up to 180, which is the same angle as 0.
        let mut h = (hue_degrees / 2.0).round() as u16;
        if h > HUE_MAX as u16 {
            h = 0;
        }

        Self {
            h: h as u8,
            s: s as u8,
            v: max as u8,
        }
    }
}

/// An inclusive box in HSV space.
///
/// When deserialized, any bound or channel left out falls back to the matching
/// channel of `HsvRange::default()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PartialHsvRange")]
pub struct HsvRange {
    pub lower: Hsv,
    pub upper: Hsv,
}

impl Default for HsvRange {
    /// A broad skin-tone band: reddish-orange hues, moderately saturated, not too dark.
    fn default() -> Self {
        Self {
            lower: Hsv::new(0, 48, 80),
            upper: Hsv::new(20, 255, 255),
        }
    }
}

impl HsvRange {
    pub const fn new(lower: Hsv, upper: Hsv) -> Self {
        Self { lower, upper }
    }

    /// Returns true when every channel of `hsv` lies within the bounds, inclusive.
    #[inline]
    pub fn contains(&self, hsv: Hsv) -> bool {
        (self.lower.h..=self.upper.h).contains(&hsv.h)
            && (self.lower.s..=self.upper.s).contains(&hsv.s)
            && (self.lower.v..=self.upper.v).contains(&hsv.v)
    }

    /// Clamps every hue bound into 0..=179. Trackbar positions and hand-written
    /// config files can both carry out-of-range hues.
    pub fn clamped(self) -> Self {
        let clamp = |hsv: Hsv| Hsv::new(hsv.h.min(HUE_MAX), hsv.s, hsv.v);
        Self {
            lower: clamp(self.lower),
            upper: clamp(self.upper),
        }
    }
}

/// A settings-file bound where every channel is optional.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
struct PartialHsv {
    h: Option<u8>,
    s: Option<u8>,
    v: Option<u8>,
}

impl PartialHsv {
    fn or(self, fallback: Hsv) -> Hsv {
        Hsv::new(
            self.h.unwrap_or(fallback.h),
            self.s.unwrap_or(fallback.s),
            self.v.unwrap_or(fallback.v),
        )
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
struct PartialHsvRange {
    lower: PartialHsv,
    upper: PartialHsv,
}

impl From<PartialHsvRange> for HsvRange {
    fn from(partial: PartialHsvRange) -> Self {
        let fallback = HsvRange::default();
        Self {
            lower: partial.lower.or(fallback.lower),
            upper: partial.upper.or(fallback.upper),
        }
    }
}
