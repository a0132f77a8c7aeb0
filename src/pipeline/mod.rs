//! Photo-to-anime stylization pipeline.

mod preprocess;
mod scale;
mod stylize;

pub use preprocess::{center_crop_square, prepare, stride_size, FACE2PAINT_SIZE};
pub use scale::ScaleSelection;
pub use stylize::Stylizer;
