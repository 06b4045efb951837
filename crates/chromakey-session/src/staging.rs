//! Image staging: accept an uploaded file, decode it, and derive the
//! transport encoding once.
//!
//! A [`StagedImage`] always holds both the decoded pixel buffer and the
//! `data:` URL of exactly those pixels. The PNG encoding is lossless, so
//! the bytes sent over the wire decode to the same pixels the user
//! samples from.

use std::sync::Arc;

use image::ImageEncoder;

use crate::data_url;
use crate::types::{Dimensions, RgbaImage};

/// Media type reported for files whose extension is not recognised.
const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// Extensions mapped to their image media types.
const IMAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("ico", "image/x-icon"),
    ("avif", "image/avif"),
];

/// Guess the declared media type of a file from its name.
#[must_use]
pub fn media_type_for_name(name: &str) -> &'static str {
    name.rsplit_once('.')
        .and_then(|(_, ext)| {
            IMAGE_EXTENSIONS
                .iter()
                .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        })
        .map_or(UNKNOWN_MEDIA_TYPE, |(_, media_type)| media_type)
}

/// Whether a declared media type indicates an image.
#[must_use]
pub fn is_image_media_type(media_type: &str) -> bool {
    media_type
        .trim()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}

/// A file handed over by the drop target or file picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// File name as reported by the browser.
    pub name: String,
    /// Declared media type, e.g. `image/png`.
    pub media_type: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Build an upload whose media type is guessed from the file name.
    #[must_use]
    pub fn from_name(name: String, bytes: Vec<u8>) -> Self {
        let media_type = media_type_for_name(&name).to_owned();
        Self {
            name,
            media_type,
            bytes,
        }
    }
}

/// Errors that prevent an upload from being staged.
///
/// None of these change session state.
#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    /// The declared media kind is not an image.
    #[error("{name} is not an image ({media_type}). Please upload a JPG, PNG or WEBP file.")]
    RejectedInput {
        /// Name of the rejected file.
        name: String,
        /// The media type it declared.
        media_type: String,
    },

    /// The file was empty.
    #[error("{0} is empty")]
    EmptyInput(String),

    /// The file claimed to be an image but could not be decoded.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// Re-encoding the decoded pixels for transport failed.
    #[error("failed to encode staged pixels: {0}")]
    Encode(String),
}

/// The currently staged picture.
#[derive(Debug, Clone)]
pub struct StagedImage {
    name: String,
    pixels: RgbaImage,
    png: Arc<[u8]>,
    encoded: Arc<str>,
}

impl StagedImage {
    /// Validate, decode, and encode an uploaded file.
    ///
    /// The pixel buffer keeps the image's intrinsic dimensions; nothing is
    /// downscaled.
    ///
    /// # Errors
    ///
    /// Returns [`StagingError::RejectedInput`] if the declared media type
    /// is not `image/*`, [`StagingError::EmptyInput`] for a zero-length
    /// file, [`StagingError::ImageDecode`] if decoding fails, and
    /// [`StagingError::Encode`] if the pixels cannot be re-encoded.
    pub fn decode(file: &UploadedFile) -> Result<Self, StagingError> {
        if !is_image_media_type(&file.media_type) {
            return Err(StagingError::RejectedInput {
                name: file.name.clone(),
                media_type: file.media_type.clone(),
            });
        }
        if file.bytes.is_empty() {
            return Err(StagingError::EmptyInput(file.name.clone()));
        }

        let pixels = image::load_from_memory(&file.bytes)?.to_rgba8();
        Self::from_pixels(file.name.clone(), pixels)
    }

    /// Stage an already-decoded pixel buffer.
    ///
    /// # Errors
    ///
    /// Returns [`StagingError::Encode`] if PNG encoding fails.
    pub fn from_pixels(name: String, pixels: RgbaImage) -> Result<Self, StagingError> {
        let mut png = Vec::new();
        image::codecs::png::PngEncoder::new(&mut png)
            .write_image(
                pixels.as_raw(),
                pixels.width(),
                pixels.height(),
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|e| StagingError::Encode(e.to_string()))?;

        let encoded = data_url::encode_png(&png);
        Ok(Self {
            name,
            pixels,
            png: png.into(),
            encoded: encoded.into(),
        })
    }

    /// Original file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The decoded RGBA pixels, at intrinsic size.
    #[must_use]
    pub const fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Intrinsic width and height.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.pixels.width(),
            height: self.pixels.height(),
        }
    }

    /// Lossless PNG encoding of [`pixels`](Self::pixels).
    #[must_use]
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    /// Shared handle to the PNG bytes, for handing to the display layer
    /// without copying.
    #[must_use]
    pub fn shared_png(&self) -> Arc<[u8]> {
        Arc::clone(&self.png)
    }

    /// The `data:` URL sent to the processing service.
    #[must_use]
    pub fn encoded(&self) -> Arc<str> {
        Arc::clone(&self.encoded)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn png_file(name: &str, width: u32, height: u32) -> UploadedFile {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            #[allow(clippy::cast_possible_truncation)]
            image::Rgba([x as u8, y as u8, 7, 255])
        });
        let mut buf = Vec::new();
        image::codecs::png::PngEncoder::new(&mut buf)
            .write_image(
                img.as_raw(),
                img.width(),
                img.height(),
                image::ExtendedColorType::Rgba8,
            )
            .unwrap();
        UploadedFile::from_name(name.to_owned(), buf)
    }

    #[test]
    fn media_type_from_extension() {
        assert_eq!(media_type_for_name("photo.JPG"), "image/jpeg");
        assert_eq!(media_type_for_name("shot.webp"), "image/webp");
        assert_eq!(
            media_type_for_name("notes.txt"),
            "application/octet-stream"
        );
        assert_eq!(
            media_type_for_name("no_extension"),
            "application/octet-stream"
        );
    }

    #[test]
    fn image_prefix_is_case_insensitive() {
        assert!(is_image_media_type("image/png"));
        assert!(is_image_media_type("IMAGE/webp"));
        assert!(!is_image_media_type("text/plain"));
        assert!(!is_image_media_type("imag"));
    }

    #[test]
    fn non_image_is_rejected() {
        let file = UploadedFile::from_name("readme.txt".into(), b"hello".to_vec());
        let err = StagedImage::decode(&file).unwrap_err();
        assert!(matches!(err, StagingError::RejectedInput { .. }), "{err}");
    }

    #[test]
    fn empty_image_is_rejected() {
        let file = UploadedFile::from_name("empty.png".into(), Vec::new());
        assert!(matches!(
            StagedImage::decode(&file),
            Err(StagingError::EmptyInput(_))
        ));
    }

    #[test]
    fn corrupt_image_fails_to_decode() {
        let file = UploadedFile::from_name("broken.png".into(), vec![0xFF, 0x00, 0x12]);
        assert!(matches!(
            StagedImage::decode(&file),
            Err(StagingError::ImageDecode(_))
        ));
    }

    #[test]
    fn staged_image_keeps_intrinsic_size() {
        let staged = StagedImage::decode(&png_file("big.png", 37, 11)).unwrap();
        assert_eq!(
            staged.dimensions(),
            Dimensions {
                width: 37,
                height: 11
            }
        );
        assert_eq!(staged.name(), "big.png");
    }

    #[test]
    fn encoded_form_decodes_to_identical_pixels() {
        let staged = StagedImage::decode(&png_file("exact.png", 9, 5)).unwrap();
        assert!(staged.encoded().starts_with(data_url::PNG_DATA_URL_PREFIX));

        let bytes = data_url::decode(&staged.encoded()).unwrap();
        assert_eq!(bytes, staged.png());
        let round = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(&round, staged.pixels());
    }
}
