//! chromakey-pipeline: HSV color keying (sans-IO).
//!
//! Removes a key color from an image by writing an alpha mask:
//! decode -> HSV range match -> invert -> optional feathering ->
//! combine with source alpha -> PNG.
//!
//! This crate has **no I/O dependencies**. It operates on in-memory
//! byte slices; the HTTP front end lives in `chromakey-server`.

pub mod color;
pub mod mask;
pub mod smooth;
pub mod types;

use image::ImageEncoder;

pub use color::{Hsv, hex_to_hsv, parse_hex};
pub use mask::{HsvRange, Tolerance};
pub use types::{KeyConfig, KeyError};

/// Convenience alias for the RGBA buffers the pipeline works on.
pub use image::RgbaImage;

/// Key out `config.color` from an encoded image.
///
/// Takes raw image bytes (PNG, JPEG, BMP, WebP, GIF) and returns an RGBA
/// PNG of the same size in which matching pixels are transparent.
///
/// # Pipeline steps
///
/// 1. Decode the image to RGBA
/// 2. Convert the key color to HSV and derive tolerances from sensitivity
///    (sensitivity and smoothing are clamped to `0..=100`)
/// 3. Match every pixel against the (possibly wrapped) HSV range
/// 4. Feather the mask if smoothing is set
/// 5. AND the mask into the existing alpha channel
/// 6. Encode as PNG
///
/// # Errors
///
/// Returns [`KeyError::EmptyInput`] if `image_bytes` is empty,
/// [`KeyError::ImageDecode`] if the format is unrecognized,
/// [`KeyError::InvalidColor`] for a malformed key color,
/// [`KeyError::InvalidParameter`] for a non-finite number, and
/// [`KeyError::Encode`] if PNG encoding fails.
pub fn process(image_bytes: &[u8], config: &KeyConfig) -> Result<Vec<u8>, KeyError> {
    if image_bytes.is_empty() {
        return Err(KeyError::EmptyInput);
    }
    for (name, value) in [
        ("sensitivity", config.sensitivity),
        ("smoothing", config.smoothing),
    ] {
        if !value.is_finite() {
            return Err(KeyError::InvalidParameter { name, value });
        }
    }
    let target = color::hex_to_hsv(&config.color)?;

    let mut image = image::load_from_memory(image_bytes)?.to_rgba8();

    let tolerance = Tolerance::from_sensitivity(config.sensitivity);
    let alpha = mask::alpha_mask(&image, target, tolerance);
    let alpha = smooth::feather(&alpha, config.smoothing);

    for (pixel, keep) in image.pixels_mut().zip(alpha.pixels()) {
        pixel.0[3] &= keep.0[0];
    }

    encode_png(&image)
}

fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, KeyError> {
    let mut buf = Vec::new();
    image::codecs::png::PngEncoder::new(&mut buf)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| KeyError::Encode(e.to_string()))?;
    Ok(buf)
}
