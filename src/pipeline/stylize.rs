//! The stylization service shared by all requests.

use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::config::ModelConfig;
use crate::error::{Error, Result};
use crate::image::{tensor_to_image, UploadedImage};
use crate::model::{resolve_model_path, ExecutionDevice, OnnxModel, StyleModel, StyleVariant};

use super::preprocess::prepare;
use super::ScaleSelection;

/// A loaded stylization model, created once at startup.
///
/// The underlying session needs exclusive access while it runs, so
/// concurrent [`Stylizer::stylize`] calls are serialized.
pub struct Stylizer {
    variant: StyleVariant,
    device: ExecutionDevice,
    model: Mutex<Box<dyn StyleModel>>,
}

impl Stylizer {
    /// Probe the execution device, locate (or download) the model, and load it.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the model cannot
    /// be found, downloaded, or loaded.
    pub fn load(config: &ModelConfig) -> Result<Self> {
        config.validate()?;

        tracing::info!("Initializing stylizer with config: {config:?}");

        let device = ExecutionDevice::probe(config.force_cpu);
        tracing::info!("Execution device: {device}");

        let path = resolve_model_path(config)?;
        let model = OnnxModel::load(&path, device)?;

        tracing::info!("Stylizer initialized successfully");

        Ok(Self::with_model(config.variant, device, Box::new(model)))
    }

    /// Wrap an already loaded model.
    #[must_use]
    pub fn with_model(
        variant: StyleVariant,
        device: ExecutionDevice,
        model: Box<dyn StyleModel>,
    ) -> Self {
        Self {
            variant,
            device,
            model: Mutex::new(model),
        }
    }

    /// The model variant being served.
    #[must_use]
    pub const fn variant(&self) -> StyleVariant {
        self.variant
    }

    /// The device inference runs on.
    #[must_use]
    pub const fn device(&self) -> ExecutionDevice {
        self.device
    }

    /// Stylize `image` and scale the model output by `scale`.
    ///
    /// The result is `scale` applied to the model's native output size;
    /// [`ScaleSelection::Original`] returns the output untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedScale`] if the variant does not offer
    /// `scale`, or an inference error if the model fails.
    pub fn stylize(&self, image: &UploadedImage, scale: ScaleSelection) -> Result<RgbImage> {
        if !self.variant.scales().contains(&scale) {
            return Err(Error::UnsupportedScale {
                label: scale.label().to_string(),
            });
        }

        let input = prepare(self.variant, image.pixels());

        let started = Instant::now();
        let output = {
            let mut model = self.model.lock().unwrap_or_else(PoisonError::into_inner);
            tracing::debug!("Running {} on input {:?}", model.name(), input.shape());
            model.infer(&input)?
        };
        tracing::debug!("Inference took {:?}", started.elapsed());

        let stylized = tensor_to_image(&output, self.variant.layout())?;

        if scale == ScaleSelection::Original {
            return Ok(stylized);
        }

        let (width, height) = scale.apply(stylized.dimensions());
        Ok(imageops::resize(
            &stylized,
            width,
            height,
            FilterType::Triangle,
        ))
    }
}
