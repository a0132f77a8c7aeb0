//! # `animegan-serve`
//!
//! A single-page web UI that turns photos into anime-style images.
//!
//! An AnimeGAN generator is loaded once at startup as an ONNX session,
//! bound to a CUDA GPU when one is available and to the CPU otherwise.
//! Each upload is decoded, normalized into the tensor layout the model
//! expects, run through the generator, scaled to the requested output
//! size, and returned next to the original with a PNG download link.
//!
//! ## Example
//!
//! ```no_run
//! use animegan_serve::{ModelConfig, ScaleSelection, Stylizer, UploadedImage};
//!
//! # fn main() -> animegan_serve::Result<()> {
//! let stylizer = Stylizer::load(&ModelConfig::default())?;
//!
//! let photo = UploadedImage::decode(&std::fs::read("photo.jpg")?)?;
//! let anime = stylizer.stylize(&photo, ScaleSelection::Double)?;
//! std::fs::write("anime.png", animegan_serve::image::encode_png(&anime)?)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod image;
pub mod model;
pub mod pipeline;
pub mod server;

pub use config::{ModelConfig, ServerConfig};
pub use error::{Error, Result};
pub use image::UploadedImage;
pub use model::{ExecutionDevice, StyleVariant};
pub use pipeline::{ScaleSelection, Stylizer};
