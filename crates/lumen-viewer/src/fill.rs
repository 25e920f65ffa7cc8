use lumen_engine::framebuffer::FrameBuffer;
use lumen_engine::time::FrameTime;
use lumen_math::Vec3;
use lumen_obj::Scene;

/// Produces the pixels of one frame from a scene.
///
/// Implementations must overwrite every pixel of `frame`.
pub trait FrameFill {
    fn fill(&mut self, scene: &Scene, frame: &mut FrameBuffer, time: FrameTime);
}

/// Fixed screen-space gradient: red grows left to right, green top to
/// bottom, blue is constant. Ignores the scene and the clock.
#[derive(Debug, Copy, Clone, Default)]
pub struct GradientFill;

impl GradientFill {
    pub const BLUE: f32 = 0.25;
}

impl FrameFill for GradientFill {
    fn fill(&mut self, _scene: &Scene, frame: &mut FrameBuffer, _time: FrameTime) {
        let sx = step(frame.width());
        let sy = step(frame.height());
        frame.fill_with(|x, y| Vec3::new(x as f32 * sx, y as f32 * sy, Self::BLUE));
    }
}

/// Per-pixel increment so the last pixel lands on 1.0.
fn step(extent: u32) -> f32 {
    if extent > 1 {
        1.0 / (extent - 1) as f32
    } else {
        0.0
    }
}
