//! Upload decoding and tensor conversion.

use std::path::Path;

use image::{ImageFormat, RgbImage};
use ndarray::Array4;

use crate::error::{Error, Result};

use super::{ImageTensor, TensorLayout};

/// File extensions accepted by the upload form.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// A decoded upload, always 8-bit RGB.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pixels: RgbImage,
}

impl UploadedImage {
    /// Decode an uploaded JPEG or PNG byte stream.
    ///
    /// The format is sniffed from the content, not taken from the filename.
    /// Alpha channels are dropped and grayscale or 16-bit sources are
    /// converted to 8-bit RGB.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the bytes are not a JPEG or PNG image or
    /// cannot be decoded.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let format = image::guess_format(bytes).map_err(|_| Error::Decode {
            reason: "unrecognized image format".to_string(),
        })?;

        if !matches!(format, ImageFormat::Jpeg | ImageFormat::Png) {
            return Err(Error::Decode {
                reason: format!("{format:?} images are not supported"),
            });
        }

        let img = image::load_from_memory_with_format(bytes, format).map_err(|e| Error::Decode {
            reason: e.to_string(),
        })?;

        Ok(Self {
            pixels: img.to_rgb8(),
        })
    }

    /// Wrap an already decoded RGB buffer.
    #[must_use]
    pub const fn from_rgb(pixels: RgbImage) -> Self {
        Self { pixels }
    }

    /// Original width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Original height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// The decoded pixels.
    #[must_use]
    pub const fn pixels(&self) -> &RgbImage {
        &self.pixels
    }
}

/// Reject filenames whose extension is not one of [`SUPPORTED_EXTENSIONS`].
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] for any other extension, or none.
pub fn check_extension(filename: &str) -> Result<()> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    match extension {
        Some(ext) if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(Error::UnsupportedFormat {
            filename: filename.to_string(),
        }),
    }
}

/// Convert an RGB image to a tensor normalized to [-1, 1].
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn image_to_tensor(img: &RgbImage, layout: TensorLayout) -> ImageTensor {
    let (width, height) = (img.width() as usize, img.height() as usize);

    let mut tensor = Array4::<f32>::zeros(layout.shape(width, height));

    for (x, y, pixel) in img.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        for (c, &value) in pixel.0.iter().enumerate() {
            // Normalize from [0, 255] to [-1, 1]
            let value = (f32::from(value) / 127.5) - 1.0;
            match layout {
                TensorLayout::Nchw => tensor[[0, c, y, x]] = value,
                TensorLayout::Nhwc => tensor[[0, y, x, c]] = value,
            }
        }
    }

    tensor
}
