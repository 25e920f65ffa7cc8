//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop)
//! and the application that fills and displays frames.

mod app;
mod ctx;
mod phase;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
pub use phase::DisplayPhase;
