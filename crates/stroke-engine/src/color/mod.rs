//! Color types
//!
//! - [`Rgb`]: 8-bit display color stored in every pixel buffer
//! - [`ColorModel`]: how stroke colors are averaged and blended

mod model;
mod rgb;

pub use model::{ColorModel, ModelColor};
pub use rgb::{ParseColorError, Rgb};
