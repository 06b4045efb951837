//! Reference color sampling from the staged image.
//!
//! Clicks arrive in the canvas's on-screen coordinate space, which is
//! scaled relative to the intrinsic pixel grid whenever the layout
//! shrinks or stretches the canvas. Each axis is mapped independently
//! by `intrinsic / displayed` and floored to a pixel index.

use crate::types::{Dimensions, DisplayPoint, DisplaySize, ReferenceColor, RgbaImage};

/// Errors that can occur while sampling a pixel.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SampleError {
    /// No image is staged.
    #[error("no image is staged")]
    NotStaged,

    /// The click resolved to a pixel outside the staged image.
    #[error("sample point ({x}, {y}) is outside the {width}x{height} image")]
    OutOfBounds {
        /// Mapped horizontal coordinate (before flooring).
        x: f64,
        /// Mapped vertical coordinate (before flooring).
        y: f64,
        /// Intrinsic image width.
        width: u32,
        /// Intrinsic image height.
        height: u32,
    },
}

/// Encode an RGB triple as uppercase, zero-padded `#RRGGBB`.
#[must_use]
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02X}{g:02X}{b:02X}")
}

/// Map a display-space point to an intrinsic pixel index.
///
/// # Errors
///
/// Returns [`SampleError::OutOfBounds`] when the displayed size is not
/// positive or the mapped point falls outside the image.
pub fn to_intrinsic(
    point: DisplayPoint,
    displayed: DisplaySize,
    intrinsic: Dimensions,
) -> Result<(u32, u32), SampleError> {
    let width = f64::from(intrinsic.width);
    let height = f64::from(intrinsic.height);

    let (x, y) = if displayed.width > 0.0 && displayed.height > 0.0 {
        (
            point.x * (width / displayed.width),
            point.y * (height / displayed.height),
        )
    } else {
        (f64::NAN, f64::NAN)
    };

    let out_of_bounds = || SampleError::OutOfBounds {
        x,
        y,
        width: intrinsic.width,
        height: intrinsic.height,
    };

    let (fx, fy) = (x.floor(), y.floor());
    // NaN fails every comparison, so it lands here too.
    if !(fx >= 0.0 && fy >= 0.0 && fx < width && fy < height) {
        return Err(out_of_bounds());
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok((fx as u32, fy as u32))
}

/// Read the reference color under a display-space point.
///
/// Exactly one pixel is read; its alpha channel is ignored.
///
/// # Errors
///
/// Returns [`SampleError::OutOfBounds`] if the point maps outside
/// `pixels`.
pub fn sample_at(
    pixels: &RgbaImage,
    point: DisplayPoint,
    displayed: DisplaySize,
) -> Result<ReferenceColor, SampleError> {
    let intrinsic = Dimensions {
        width: pixels.width(),
        height: pixels.height(),
    };
    let (x, y) = to_intrinsic(point, displayed, intrinsic)?;
    let [r, g, b, _] = pixels.get_pixel(x, y).0;
    Ok(ReferenceColor::new(r, g, b))
}
