use std::path::PathBuf;

use anyhow::{anyhow, Result};
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use lumen_engine::core::{App, AppControl, FrameCtx};
use lumen_engine::device::Gpu;
use lumen_engine::framebuffer::FrameBuffer;
use lumen_engine::render::{FrameBlitter, RenderCtx};
use lumen_obj::Scene;

use crate::fill::FrameFill;
use crate::snapshot;

/// Fills the framebuffer each frame and shows it full-window.
pub struct ViewerApp<F: FrameFill> {
    scene: Scene,
    frame: FrameBuffer,
    fill: F,
    /// Written once, after the first fill.
    snapshot: Option<PathBuf>,
    blitter: Option<FrameBlitter>,
}

impl<F: FrameFill> ViewerApp<F> {
    pub fn new(scene: Scene, frame: FrameBuffer, fill: F, snapshot: Option<PathBuf>) -> Self {
        Self {
            scene,
            frame,
            fill,
            snapshot,
            blitter: None,
        }
    }
}

impl<F: FrameFill> App for ViewerApp<F> {
    fn on_context_ready(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        let size = gpu.size();
        let rctx = RenderCtx::new(
            gpu.device(),
            gpu.queue(),
            gpu.surface_format(),
            (size.width, size.height),
        );
        self.blitter = Some(FrameBlitter::new(&rctx, self.frame.width(), self.frame.height())?);

        log::info!(
            "displaying {}x{} framebuffer on {} for {} mesh(es), {} triangle(s)",
            self.frame.width(),
            self.frame.height(),
            gpu.adapter_info().name,
            self.scene.meshes.len(),
            self.scene.triangle_count()
        );
        if let Some(bounds) = self.scene.bounds() {
            log::info!(
                "scene bounds: center {:?}, extent {:?}",
                bounds.center().to_array(),
                bounds.extent().to_array()
            );
        }
        Ok(())
    }

    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
            {
                AppControl::Exit
            }
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        self.fill.fill(&self.scene, &mut self.frame, ctx.time);

        if let Some(path) = self.snapshot.take() {
            match snapshot::save(&self.frame, &path) {
                Ok(()) => log::info!("wrote snapshot to {}", path.display()),
                Err(e) => {
                    ctx.runtime.fail(e);
                    return AppControl::Exit;
                }
            }
        }

        let Some(blitter) = self.blitter.as_mut() else {
            ctx.runtime.fail(anyhow!("frame requested before the blitter was built"));
            return AppControl::Exit;
        };

        if let Err(e) = blitter.upload(ctx.gpu.queue(), &self.frame) {
            ctx.runtime.fail(e.context("frame upload failed"));
            return AppControl::Exit;
        }

        ctx.present(|rctx, target| blitter.draw(rctx, target))
    }

    fn on_exit(&mut self) {
        // GPU objects go before the context that created them.
        self.blitter = None;
        log::debug!("viewer resources released");
    }
}
