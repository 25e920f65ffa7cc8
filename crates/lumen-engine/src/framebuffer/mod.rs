//! CPU-side pixel buffer.
//!
//! The display loop owns exactly one [`FrameBuffer`]. The fill stage writes
//! it, then the blitter mirrors it into a GPU texture. Colors are linear RGB.

mod buffer;

pub use buffer::{FrameBuffer, FrameBufferError};
