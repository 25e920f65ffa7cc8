use anyhow::Result;
use winit::event::WindowEvent;

use crate::device::Gpu;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// Callbacks run on the event-loop thread, in this order:
/// `on_context_ready` once, then `on_window_event`/`on_frame` until a close
/// request, then `on_exit` once.
pub trait App {
    /// Called once the window and GPU context exist.
    ///
    /// Build GPU resources here. An error terminates the runtime before the
    /// first frame.
    fn on_context_ready(&mut self, gpu: &Gpu<'_>) -> Result<()>;

    /// Called for window events, before the runtime handles them.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per redraw.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called once while terminating, before the GPU context is dropped.
    ///
    /// Release GPU resources here.
    fn on_exit(&mut self) {}
}
