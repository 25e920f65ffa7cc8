use lumen_math::Vec3;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameBufferError {
    #[error("framebuffer dimensions must be non-zero, got {width}x{height}")]
    ZeroSize { width: u32, height: u32 },

    #[error("framebuffer {width}x{height} does not fit in memory")]
    TooLarge { width: u32, height: u32 },
}

/// Fixed-size, row-major grid of linear RGB colors.
///
/// Dimensions never change after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Vec3>,
}

impl FrameBuffer {
    /// Allocates a black buffer.
    pub fn new(width: u32, height: u32) -> Result<Self, FrameBufferError> {
        if width == 0 || height == 0 {
            return Err(FrameBufferError::ZeroSize { width, height });
        }
        // Allocations are capped at isize::MAX bytes.
        let len = (width as usize)
            .checked_mul(height as usize)
            .filter(|&n| {
                n.checked_mul(std::mem::size_of::<Vec3>())
                    .is_some_and(|bytes| bytes <= isize::MAX as usize)
            })
            .ok_or(FrameBufferError::TooLarge { width, height })?;
        Ok(Self {
            width,
            height,
            pixels: vec![Vec3::ZERO; len],
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Always `false`; kept for the `len`/`is_empty` pairing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    pub fn pixels(&self) -> &[Vec3] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Vec3> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Writes one pixel. Returns `false` (and writes nothing) when out of range.
    pub fn set(&mut self, x: u32, y: u32, color: Vec3) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.pixels[i] = color;
                true
            }
            None => false,
        }
    }

    /// Overwrites every pixel once, in row-major order.
    pub fn fill_with<F>(&mut self, mut shade: F)
    where
        F: FnMut(u32, u32) -> Vec3,
    {
        for (y, row) in self.rows_mut().enumerate() {
            for (x, px) in row.iter_mut().enumerate() {
                *px = shade(x as u32, y as u32);
            }
        }
    }

    /// Disjoint mutable rows, top to bottom.
    ///
    /// Each row can go to a different worker without further synchronization.
    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, Vec3> {
        self.pixels.chunks_exact_mut(self.width as usize)
    }

    /// Converts to RGBA texels (alpha 1) in `out`, reusing its allocation.
    pub fn write_texels(&self, out: &mut Vec<[f32; 4]>) {
        out.clear();
        out.extend(self.pixels.iter().map(|c| [c.x, c.y, c.z, 1.0]));
    }
}
