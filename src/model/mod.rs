//! Stylization models: selection, loading, and inference.

mod device;
mod loader;
mod onnx;
mod variant;

pub use device::ExecutionDevice;
pub use loader::{resolve_model_path, ModelCache};
pub use onnx::OnnxModel;
pub use variant::StyleVariant;

use crate::error::Result;
use crate::image::ImageTensor;

/// A generator mapping a normalized image tensor to a stylized one.
///
/// Input and output use the tensor layout of the active [`StyleVariant`].
pub trait StyleModel: Send {
    /// Human-readable model name for logs.
    fn name(&self) -> &str;

    /// Run a single forward pass.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime fails or produces a malformed output.
    fn infer(&mut self, input: &ImageTensor) -> Result<ImageTensor>;
}
