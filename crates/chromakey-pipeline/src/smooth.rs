//! Edge feathering of the alpha mask.
//!
//! Smoothing selects an odd kernel size `k = trunc(smoothing / 5) * 2 + 1`
//! and blurs the mask with the Gaussian sigma conventionally paired with
//! that kernel size, `0.3 * ((k - 1) / 2 - 1) + 0.8`.

use image::GrayImage;

use crate::types::clamp_parameter;

/// Odd kernel size for a smoothing value, clamped to `0..=100`.
/// Ranges from 1 to 41.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn kernel_size(smoothing: f64) -> u32 {
    let smoothing = clamp_parameter(smoothing);
    if smoothing.is_nan() || smoothing <= 0.0 {
        return 1;
    }
    (smoothing / 5.0).trunc() as u32 * 2 + 1
}

/// Gaussian sigma matching an odd kernel size.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn sigma_for_kernel(kernel: u32) -> f32 {
    let half = (f64::from(kernel) - 1.0) * 0.5;
    0.3f64.mul_add(half - 1.0, 0.8) as f32
}

/// Blur the mask according to `smoothing`.
///
/// Values that yield a kernel of 1 (anything below 5) return the mask
/// unchanged.
#[must_use = "returns the feathered mask"]
pub fn feather(mask: &GrayImage, smoothing: f64) -> GrayImage {
    let kernel = kernel_size(smoothing);
    if kernel <= 1 {
        return mask.clone();
    }
    imageproc::filter::gaussian_blur_f32(mask, sigma_for_kernel(kernel))
}
