use crate::config::Rgba;
use crate::error::RasterError;

/// RGBA image with row-major, tightly packed pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaRaster {
    pub width: u32,
    pub height: u32,
    pub buf: Vec<u8>,
}

impl RgbaRaster {
    /// Create a raster filled with transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0; 4])
    }

    /// Create a raster with every pixel set to `color`.
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        let n = width as usize * height as usize;
        let buf = color.iter().copied().cycle().take(n * 4).collect();
        Self { width, height, buf }
    }

    /// Wrap existing RGBA bytes. `buf` must hold exactly `width * height * 4` bytes.
    pub fn from_buf(width: u32, height: u32, buf: Vec<u8>) -> Result<Self, RasterError> {
        check_len(width, height, buf.len())?;
        Ok(Self { width, height, buf })
    }

    /// Pixel at (x, y), or `None` outside the raster.
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixel(x, y))
    }

    /// Pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`. Use [`get`](Self::get) for a
    /// checked lookup.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} raster",
            self.width,
            self.height
        );
        self.pixel_at(y as usize * self.width as usize + x as usize)
    }

    /// Pixel of linear cell `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= width * height`.
    #[inline]
    pub fn pixel_at(&self, index: usize) -> Rgba {
        let o = index * 4;
        [self.buf[o], self.buf[o + 1], self.buf[o + 2], self.buf[o + 3]]
    }

    /// Iterate over all pixels in scan order.
    pub fn pixels(&self) -> impl Iterator<Item = Rgba> + '_ {
        self.buf.chunks_exact(4).map(|px| [px[0], px[1], px[2], px[3]])
    }
}

/// Ensure an RGBA buffer of `actual` bytes covers exactly `width x height` pixels.
pub fn check_len(width: u32, height: u32, actual: usize) -> Result<(), RasterError> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .unwrap_or(usize::MAX);
    if actual != expected {
        return Err(RasterError::LengthMismatch {
            width,
            height,
            expected,
            actual,
        });
    }
    Ok(())
}
