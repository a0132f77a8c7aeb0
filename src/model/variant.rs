//! The stylization models this server can run.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::image::TensorLayout;
use crate::pipeline::ScaleSelection;

/// A pretrained AnimeGAN generator and the conventions around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleVariant {
    /// AnimeGANv2 `face_paint_512_v2`, as an ONNX export of the PyTorch
    /// generator.
    ///
    /// Works on a 512x512 centre crop.
    Face2Paint,
    /// AnimeGANv3 Hayao, a local ONNX export.
    ///
    /// Accepts any size rounded down to a multiple of 8.
    Hayao,
}

impl StyleVariant {
    /// Every variant, in the order shown in help output.
    pub const ALL: [Self; 2] = [Self::Face2Paint, Self::Hayao];

    /// Name used on the command line and in the health report.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Face2Paint => "face2paint",
            Self::Hayao => "hayao",
        }
    }

    /// Model filename, both in the working directory and in the cache.
    #[must_use]
    pub const fn filename(self) -> &'static str {
        match self {
            Self::Face2Paint => "face_paint_512_v2.onnx",
            Self::Hayao => "AnimeGANv3_Hayao_36.onnx",
        }
    }

    /// URL the model is downloaded from when no local copy exists.
    ///
    /// Neither generator is published upstream as ONNX, so there is no
    /// built-in download location. A URL comes from `--model-url`.
    #[must_use]
    pub const fn default_url(self) -> Option<&'static str> {
        match self {
            Self::Face2Paint | Self::Hayao => None,
        }
    }

    /// Approximate model size in bytes for progress indication.
    #[must_use]
    pub const fn approx_size(self) -> u64 {
        match self {
            Self::Face2Paint => 8_600_000, // ~8.6 MB
            Self::Hayao => 4_000_000,      // ~4 MB
        }
    }

    /// Tensor layout of the model's input and output.
    #[must_use]
    pub const fn layout(self) -> TensorLayout {
        match self {
            Self::Face2Paint => TensorLayout::Nchw,
            Self::Hayao => TensorLayout::Nhwc,
        }
    }

    /// Page title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Face2Paint => "AnimeGAN2 Face Stylizer",
            Self::Hayao => "AnimeGANv3 - Image Stylizer",
        }
    }

    /// Filename offered for the stylized download.
    #[must_use]
    pub const fn download_filename(self) -> &'static str {
        match self {
            Self::Face2Paint => "anime_output.png",
            Self::Hayao => "converted.png",
        }
    }

    /// Output scales offered in the scale selector.
    #[must_use]
    pub const fn scales(self) -> &'static [ScaleSelection] {
        match self {
            Self::Face2Paint => &[
                ScaleSelection::Original,
                ScaleSelection::OneAndHalf,
                ScaleSelection::Double,
                ScaleSelection::Triple,
            ],
            Self::Hayao => &[
                ScaleSelection::Original,
                ScaleSelection::Double,
                ScaleSelection::Half,
            ],
        }
    }

    /// Parse a scale label and check that this variant offers it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedScale`] for unknown labels and for scales
    /// this variant does not offer.
    pub fn parse_scale(self, label: &str) -> Result<ScaleSelection> {
        let scale: ScaleSelection = label.parse()?;
        if self.scales().contains(&scale) {
            Ok(scale)
        } else {
            Err(Error::UnsupportedScale {
                label: label.to_string(),
            })
        }
    }
}

impl fmt::Display for StyleVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StyleVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidParameter {
                name: "variant".to_string(),
                reason: format!("unknown model variant {s:?}, expected face2paint or hayao"),
            })
    }
}
