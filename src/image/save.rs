//! Tensor denormalization and PNG encoding.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};

use crate::error::{Error, Result};

use super::{ImageTensor, TensorLayout};

/// Convert a normalized tensor back to an RGB image.
///
/// Values are mapped from [-1, 1] to [0, 255] with clamping.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] if the tensor is not a single RGB image
/// in the given layout.
#[allow(clippy::cast_possible_truncation)]
pub fn tensor_to_image(tensor: &ImageTensor, layout: TensorLayout) -> Result<RgbImage> {
    let (width, height) = layout.dims(tensor).ok_or_else(|| Error::ShapeMismatch {
        expected: format!("single RGB image in {layout:?} layout"),
        actual: format!("{:?}", tensor.shape()),
    })?;

    let img = ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
        let (x, y) = (x as usize, y as usize);
        let channel = |c: usize| match layout {
            TensorLayout::Nchw => tensor[[0, c, y, x]],
            TensorLayout::Nhwc => tensor[[0, y, x, c]],
        };
        Rgb([
            denormalize(channel(0)),
            denormalize(channel(1)),
            denormalize(channel(2)),
        ])
    });

    Ok(img)
}

/// Denormalize a value from [-1, 1] to [0, 255] with clamping.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn denormalize(value: f32) -> u8 {
    // Safe: clamped to [0, 255] range before casting
    let scaled = (value + 1.0) * 127.5;
    scaled.clamp(0.0, 255.0) as u8
}

/// Serialize an image as PNG bytes.
///
/// # Errors
///
/// Returns [`Error::Encode`] if the encoder fails.
pub fn encode_png(img: &RgbImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|source| Error::Encode { source })?;
    Ok(bytes)
}

/// Encode an image as a base64 PNG `data:` URI.
///
/// # Errors
///
/// Returns [`Error::Encode`] if the encoder fails.
pub fn to_data_uri(img: &RgbImage) -> Result<String> {
    let png = encode_png(img)?;
    Ok(format!(
        "data:image/png;base64,{}",
        BASE64_STANDARD.encode(png)
    ))
}

#[cfg(test)]
mod tests {
    use ndarray::Array4;

    use super::*;

    #[test]
    fn test_denormalize() {
        assert_eq!(denormalize(-1.0), 0);
        assert_eq!(denormalize(0.0), 127);
        assert_eq!(denormalize(1.0), 255);
    }

    #[test]
    fn test_denormalize_clamp() {
        assert_eq!(denormalize(-2.0), 0);
        assert_eq!(denormalize(2.0), 255);
    }

    #[test]
    fn test_tensor_to_image_layouts() {
        let mut nchw = Array4::<f32>::from_elem((1, 3, 2, 5), -1.0);
        nchw[[0, 0, 1, 4]] = 1.0;
        let img = tensor_to_image(&nchw, TensorLayout::Nchw).unwrap();
        assert_eq!(img.dimensions(), (5, 2));
        assert_eq!(img.get_pixel(4, 1), &Rgb([255, 0, 0]));

        let mut nhwc = Array4::<f32>::from_elem((1, 2, 5, 3), -1.0);
        nhwc[[0, 1, 4, 2]] = 1.0;
        let img = tensor_to_image(&nhwc, TensorLayout::Nhwc).unwrap();
        assert_eq!(img.dimensions(), (5, 2));
        assert_eq!(img.get_pixel(4, 1), &Rgb([0, 0, 255]));
    }

    #[test]
    fn test_tensor_to_image_rejects_bad_shape() {
        let tensor = Array4::<f32>::zeros((1, 4, 8, 8));
        let err = tensor_to_image(&tensor, TensorLayout::Nchw).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_png_is_lossless() {
        let img = RgbImage::from_fn(13, 7, |x, y| {
            Rgb([(x * 19) as u8, (y * 31) as u8, ((x + y) * 7) as u8])
        });
        let png = encode_png(&img).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgb8();

        assert_eq!(decoded, img);
    }

    #[test]
    fn test_data_uri_prefix() {
        let uri = to_data_uri(&RgbImage::new(2, 2)).unwrap();
        let payload = uri.strip_prefix("data:image/png;base64,").unwrap();

        let png = BASE64_STANDARD.decode(payload).unwrap();
        assert_eq!(&png[..4], b"\x89PNG");
    }
}
