//! Display context: wgpu instance, adapter, device, queue and the window's
//! swapchain.
//!
//! Acquisition happens once, in `Gpu::new`; any failure there is a
//! [`ContextError`] and ends the program.

mod error;
mod gpu;
mod init;
mod surface;

pub use error::{ContextError, SurfaceErrorAction};
pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
