//! ONNX Runtime backed stylization model.

use std::path::Path;

use ndarray::Array4;
use ort::session::Session;
use ort::value::Tensor;

use crate::error::{Error, Result};
use crate::image::ImageTensor;

use super::{ExecutionDevice, StyleModel};

/// A single-input, single-output image generator loaded from an ONNX file.
pub struct OnnxModel {
    name: String,
    session: Session,
}

impl OnnxModel {
    /// Load a model and bind it to `device`.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be created.
    pub fn load(path: &Path, device: ExecutionDevice) -> Result<Self> {
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        tracing::info!("Loading {name} on {device}");

        let load_error = |source| Error::ModelLoad {
            name: name.clone(),
            source,
        };

        let session = Session::builder()
            .map_err(load_error)?
            .with_execution_providers(device.providers())
            .map_err(load_error)?
            .commit_from_file(path)
            .map_err(load_error)?;

        tracing::debug!(
            "Model inputs: {:?}, outputs: {:?}",
            session.inputs.iter().map(|i| &i.name).collect::<Vec<_>>(),
            session.outputs.iter().map(|o| &o.name).collect::<Vec<_>>()
        );

        Ok(Self { name, session })
    }
}

impl StyleModel for OnnxModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn infer(&mut self, input: &ImageTensor) -> Result<ImageTensor> {
        let input_value =
            Tensor::from_array(input.clone()).map_err(|source| Error::Inference { source })?;

        let outputs = self
            .session
            .run(ort::inputs![input_value])
            .map_err(|source| Error::Inference { source })?;

        // Get first output
        let output = outputs
            .values()
            .next()
            .ok_or_else(|| Error::ShapeMismatch {
                expected: "image output".to_string(),
                actual: "no output".to_string(),
            })?;

        extract_array4(&output)
    }
}

/// Extract a 4D array from an ONNX value.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn extract_array4(value: &ort::value::ValueRef<'_>) -> Result<Array4<f32>> {
    let (shape_info, data) = value
        .try_extract_tensor::<f32>()
        .map_err(|source| Error::Inference { source })?;

    // Safe: tensor dimensions are always non-negative and within bounds
    let dims: Vec<usize> = shape_info.iter().map(|&x| x as usize).collect();

    if dims.len() != 4 {
        return Err(Error::ShapeMismatch {
            expected: "4D tensor".to_string(),
            actual: format!("{}D tensor", dims.len()),
        });
    }

    Array4::from_shape_vec((dims[0], dims[1], dims[2], dims[3]), data.to_vec()).map_err(|_| {
        Error::ShapeMismatch {
            expected: format!("{dims:?}"),
            actual: "reshape failed".to_string(),
        }
    })
}
