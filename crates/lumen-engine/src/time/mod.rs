//! Frame timing.
//!
//! One `FrameClock` per display loop; call `tick()` once per presented frame.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
