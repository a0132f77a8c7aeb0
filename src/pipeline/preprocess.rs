//! Per-model input preparation.

use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::image::{image_to_tensor, ImageTensor};
use crate::model::StyleVariant;

/// Side length of the square Face2Paint works on.
pub const FACE2PAINT_SIZE: u32 = 512;

/// Smallest side the Hayao model accepts.
pub const MIN_STRIDE_SIDE: u32 = 256;

/// Sides passed to the Hayao model must be a multiple of this.
pub const STRIDE: u32 = 8;

/// Round a side length down to a size the Hayao model accepts.
///
/// Sides below [`MIN_STRIDE_SIDE`] are raised to it.
#[must_use]
pub const fn stride_size(side: u32) -> u32 {
    if side < MIN_STRIDE_SIDE {
        MIN_STRIDE_SIDE
    } else {
        side - side % STRIDE
    }
}

/// Crop the largest centred square out of `img`.
#[must_use]
pub fn center_crop_square(img: &RgbImage) -> RgbImage {
    let (width, height) = img.dimensions();
    let side = width.min(height);
    imageops::crop_imm(img, (width - side) / 2, (height - side) / 2, side, side).to_image()
}

/// Resize and normalize `img` into the tensor `variant` takes as input.
#[must_use]
pub fn prepare(variant: StyleVariant, img: &RgbImage) -> ImageTensor {
    let resized = match variant {
        StyleVariant::Face2Paint => imageops::resize(
            &center_crop_square(img),
            FACE2PAINT_SIZE,
            FACE2PAINT_SIZE,
            FilterType::Lanczos3,
        ),
        StyleVariant::Hayao => {
            let (width, height) = img.dimensions();
            let target = (stride_size(width), stride_size(height));
            if target == (width, height) {
                img.clone()
            } else {
                imageops::resize(img, target.0, target.1, FilterType::Triangle)
            }
        }
    };

    image_to_tensor(&resized, variant.layout())
}
