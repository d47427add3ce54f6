//! PNG reading and writing for board rasters.

use std::path::Path;

use anyhow::{Context, Result};
use bitgrid::raster::RgbaRaster;
use image::{ImageFormat, RgbaImage};

/// Write a raster as an 8-bit RGBA PNG.
pub fn write_rgba_png(path: &Path, raster: &RgbaRaster) -> Result<()> {
    let img = RgbaImage::from_raw(raster.width, raster.height, raster.buf.clone())
        .context("raster buffer does not match its dimensions")?;
    img.save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("writing PNG {}", path.display()))
}

/// Load any PNG as RGBA.
pub fn read_rgba_png(path: &Path) -> Result<RgbaRaster> {
    let img = image::open(path)
        .with_context(|| format!("failed to open image: {}", path.display()))?
        .into_rgba8();
    let (width, height) = img.dimensions();
    Ok(RgbaRaster::from_buf(width, height, img.into_raw())?)
}
