//! Lumen engine crate.
//!
//! This crate owns the window, the GPU context and the framebuffer display
//! loop used by the viewer.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod framebuffer;
pub mod render;
