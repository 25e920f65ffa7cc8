//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (pipelines, textures, buffers) and record
//! into the encoder of the frame being presented.
//!
//! Convention:
//! - Quad geometry is in unit space (0..1, top-left origin, +Y down).
//! - The vertex shader maps it to NDC using a fit-scale uniform.

mod blit;
mod ctx;

pub use blit::{fit_scale, FrameBlitter};
pub use ctx::{RenderCtx, RenderTarget};
