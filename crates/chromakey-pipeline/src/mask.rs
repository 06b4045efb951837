//! Alpha mask construction from an HSV key range.
//!
//! Sensitivity widens a box around the key color in HSV space. Pixels
//! inside the box are keyed out (alpha 0), everything else is kept
//! (alpha 255). Hue is circular, so a box that crosses 0 or 179 gets a
//! second range on the far side.

use image::{GrayImage, Luma, RgbaImage};

use crate::color::{HUE_MAX, Hsv};
use crate::types::clamp_parameter;

/// Per-channel tolerance around the key color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tolerance {
    /// Allowed hue deviation.
    pub hue: i32,
    /// Allowed saturation deviation.
    pub saturation: i32,
    /// Allowed value deviation.
    pub value: i32,
}

impl Tolerance {
    /// Derive tolerances from a sensitivity value.
    ///
    /// Sensitivity is clamped to `0..=100`. Saturation and value always
    /// allow a base variance so a sensitivity of zero still absorbs
    /// compression noise.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_sensitivity(sensitivity: f64) -> Self {
        let t = clamp_parameter(sensitivity).trunc();
        Self {
            hue: (t * 0.6).trunc() as i32,
            saturation: (t * 1.5).trunc() as i32 + 20,
            value: (t * 1.5).trunc() as i32 + 40,
        }
    }
}

/// An inclusive box in 8-bit HSV space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvRange {
    /// Lower bounds `[h, s, v]`.
    pub lower: [i32; 3],
    /// Upper bounds `[h, s, v]`.
    pub upper: [i32; 3],
}

impl HsvRange {
    /// Whether `hsv` lies inside the box (bounds inclusive).
    #[must_use]
    pub fn contains(&self, hsv: Hsv) -> bool {
        let px = [i32::from(hsv.h), i32::from(hsv.s), i32::from(hsv.v)];
        (0..3).all(|c| self.lower[c] <= px[c] && px[c] <= self.upper[c])
    }
}

/// The one or two HSV boxes matched for `target` at `tol`.
#[must_use]
pub fn key_ranges(target: Hsv, tol: Tolerance) -> Vec<HsvRange> {
    let (h, s, v) = (
        i32::from(target.h),
        i32::from(target.s),
        i32::from(target.v),
    );
    let s_lo = s.saturating_sub(tol.saturation).max(0);
    let s_hi = s.saturating_add(tol.saturation).min(255);
    let v_lo = v.saturating_sub(tol.value).max(0);
    let v_hi = v.saturating_add(tol.value).min(255);
    let h_lo = h.saturating_sub(tol.hue);
    let h_hi = h.saturating_add(tol.hue);

    let mut ranges = vec![HsvRange {
        lower: [h_lo.max(0), s_lo, v_lo],
        upper: [h_hi.min(HUE_MAX), s_hi, v_hi],
    }];

    // A tolerance spanning the whole wheel already covers every hue.
    if h_lo < 0 && h_hi <= HUE_MAX {
        ranges.push(HsvRange {
            lower: [(HUE_MAX + h_lo).max(0), s_lo, v_lo],
            upper: [HUE_MAX, s_hi, v_hi],
        });
    } else if h_hi > HUE_MAX && h_lo >= 0 {
        ranges.push(HsvRange {
            lower: [0, s_lo, v_lo],
            upper: [(h_hi - HUE_MAX).min(HUE_MAX), s_hi, v_hi],
        });
    }

    ranges
}

/// Build the keep-mask for `image`: 0 where the pixel matches the key,
/// 255 elsewhere. The source alpha channel is ignored here.
#[must_use = "returns the alpha mask"]
pub fn alpha_mask(image: &RgbaImage, target: Hsv, tol: Tolerance) -> GrayImage {
    let ranges = key_ranges(target, tol);
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, _] = image.get_pixel(x, y).0;
        let hsv = Hsv::from_rgb(r, g, b);
        if ranges.iter().any(|range| range.contains(hsv)) {
            Luma([0])
        } else {
            Luma([255])
        }
    })
}
