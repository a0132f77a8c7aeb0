//! Image decoding, tensor conversion, and encoding utilities.

mod load;
mod save;

pub(crate) use load::image_to_tensor;
pub use load::{check_extension, UploadedImage, SUPPORTED_EXTENSIONS};
pub use save::{denormalize, encode_png, tensor_to_image, to_data_uri};

use ndarray::Array4;

/// Image tensor with a batch of one. Values are normalized to [-1, 1].
///
/// The axis order depends on the model, see [`TensorLayout`].
pub type ImageTensor = Array4<f32>;

/// Number of channels in RGB images.
pub const RGB_CHANNELS: usize = 3;

/// Axis order a model expects for its image input and produces on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorLayout {
    /// (batch, channels, height, width)
    Nchw,
    /// (batch, height, width, channels)
    Nhwc,
}

impl TensorLayout {
    /// Shape of a single-image tensor in this layout.
    #[must_use]
    pub const fn shape(self, width: usize, height: usize) -> (usize, usize, usize, usize) {
        match self {
            Self::Nchw => (1, RGB_CHANNELS, height, width),
            Self::Nhwc => (1, height, width, RGB_CHANNELS),
        }
    }

    /// Read `(width, height)` back from a tensor in this layout.
    ///
    /// Returns `None` if the tensor is not a single RGB image.
    #[must_use]
    pub fn dims(self, tensor: &ImageTensor) -> Option<(usize, usize)> {
        let (batch, a, b, c) = tensor.dim();
        match self {
            Self::Nchw if batch == 1 && a == RGB_CHANNELS => Some((c, b)),
            Self::Nhwc if batch == 1 && c == RGB_CHANNELS => Some((b, a)),
            _ => None,
        }
    }
}
