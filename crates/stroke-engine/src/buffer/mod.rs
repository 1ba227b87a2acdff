//! Pixel storage: generic sample buffers and the transactional canvas.

mod canvas;
mod pixel_buffer;

pub use canvas::{Canvas, StrokeTransaction};
pub use pixel_buffer::{PixelBuffer, Window, WindowShape};
