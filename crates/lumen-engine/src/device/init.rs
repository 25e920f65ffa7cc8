/// How the display context is acquired.
///
/// Every field has a portable default; the viewer only overrides
/// `present_mode` (`--no-vsync`).
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an `*Srgb` swapchain format when the surface offers one.
    ///
    /// Framebuffer colors are linear; an sRGB target encodes them on write.
    pub prefer_srgb: bool,

    /// Requested swap behavior. Falls back to `Fifo` when unsupported.
    pub present_mode: wgpu::PresentMode,

    /// Adapter selection hint.
    pub power_preference: wgpu::PowerPreference,

    /// Device limits. The framebuffer texture must fit `max_texture_dimension_2d`.
    pub required_limits: wgpu::Limits,

    /// Frames the presentation engine may queue ahead. A hint only.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            power_preference: wgpu::PowerPreference::default(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
