use std::path::Path;

use anyhow::{ensure, Context, Result};
use image::{ImageFormat, Rgb, RgbImage};

use lumen_engine::framebuffer::FrameBuffer;

/// Linear channel value to 8-bit sRGB. Out-of-range values are clamped and
/// NaN maps to 0.
fn encode_channel(linear: f32) -> u8 {
    if linear.is_nan() {
        return 0;
    }
    let c = linear.clamp(0.0, 1.0);
    let s = if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    };
    (s * 255.0).round() as u8
}

/// Converts the framebuffer to an 8-bit sRGB image.
pub fn to_rgb_image(frame: &FrameBuffer) -> RgbImage {
    let mut img = RgbImage::new(frame.width(), frame.height());
    for (px, c) in img.pixels_mut().zip(frame.pixels()) {
        *px = Rgb([encode_channel(c.x), encode_channel(c.y), encode_channel(c.z)]);
    }
    img
}

/// Image format for `path`, from its extension. Only PNG and PPM are written.
pub fn format_for(path: &Path) -> Result<ImageFormat> {
    let format = ImageFormat::from_path(path)
        .with_context(|| format!("cannot infer snapshot format from {}", path.display()))?;
    ensure!(
        matches!(format, ImageFormat::Png | ImageFormat::Pnm),
        "unsupported snapshot format {format:?} for {} (use .png or .ppm)",
        path.display()
    );
    Ok(format)
}

/// Writes the framebuffer to `path`. The format follows the extension.
pub fn save(frame: &FrameBuffer, path: &Path) -> Result<()> {
    let format = format_for(path)?;
    to_rgb_image(frame)
        .save_with_format(path, format)
        .with_context(|| format!("failed to write snapshot {}", path.display()))
}
