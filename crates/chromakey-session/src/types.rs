//! Shared value types for the keying session.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Re-export `RgbaImage` so downstream crates can reference the staged
/// pixel buffer without depending on `image` directly.
pub use image::RgbaImage;

/// Accepted range of the sensitivity slider.
pub const SENSITIVITY_RANGE: RangeInclusive<u32> = 0..=100;

/// Accepted range of the smoothing slider.
pub const SMOOTHING_RANGE: RangeInclusive<u32> = 0..=100;

/// Sensitivity before the user touches the slider.
pub const DEFAULT_SENSITIVITY: u32 = 50;

/// Smoothing before the user touches the slider.
pub const DEFAULT_SMOOTHING: u32 = 0;

/// The color the processing service keys out.
///
/// Only ever produced by a pixel read (or the default green). Displays
/// as its canonical `#RRGGBB` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl ReferenceColor {
    /// Pure green, the key color before any sampling.
    pub const DEFAULT: Self = Self::new(0, 255, 0);

    /// Create a color from its three channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Uppercase, zero-padded `#RRGGBB` form used on the wire and in the UI.
    #[must_use]
    pub fn hex(self) -> String {
        crate::sampler::rgb_to_hex(self.r, self.g, self.b)
    }
}

impl Default for ReferenceColor {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ReferenceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

/// The two tuning parameters forwarded to the processing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    /// How close a pixel must be to the reference color to be keyed out.
    pub sensitivity: u32,
    /// Edge feathering applied to the keyed region.
    pub smoothing: u32,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY,
            smoothing: DEFAULT_SMOOTHING,
        }
    }
}

/// Intrinsic image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// A point in the staged canvas's on-screen (CSS pixel) space, relative
/// to its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayPoint {
    /// Horizontal offset in CSS pixels.
    pub x: f64,
    /// Vertical offset in CSS pixels.
    pub y: f64,
}

impl DisplayPoint {
    /// Create a new display point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The size at which the staged canvas is currently laid out on screen.
///
/// May differ from the intrinsic [`Dimensions`] under responsive scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplaySize {
    /// Rendered width in CSS pixels.
    pub width: f64,
    /// Rendered height in CSS pixels.
    pub height: f64,
}

impl DisplaySize {
    /// Create a new display size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Monotonic sequence number attached to every processing request and
/// to the result it produces.
///
/// `RequestSeq::default()` (zero) is never issued; the first request
/// carries 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestSeq(u64);

impl RequestSeq {
    /// Wrap a raw sequence value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw sequence value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The sequence number following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RequestSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
