#[cfg(feature = "parallel")]
use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};
#[cfg(feature = "parallel")]
use rayon::slice::ParallelSliceMut;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bits::{self, BitIndex, BITS_PER_BYTE};
use crate::config::{BoardConfig, Palette};
use crate::error::DecodeError;
use crate::raster::{self, RgbaRaster};

/// RGBA bytes covered by one packed byte.
const CHUNK: usize = BITS_PER_BYTE * 4;

/// How the packed grid's length compared to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Coverage {
    /// Every cell was written.
    Exact,
    /// The grid ended early; the trailing `missing_cells` were not touched.
    Truncated { missing_cells: usize },
    /// The grid had `ignored_bytes` bytes past the end of the board.
    Overflow { ignored_bytes: usize },
}

/// Outcome of one unpack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnpackReport {
    /// Set cells encountered. Diagnostic only.
    pub set_count: usize,
    /// Cells whose pixel was written.
    pub cells_written: usize,
    pub coverage: Coverage,
}

/// A decoded board ready to present.
#[derive(Debug, Clone)]
pub struct Frame {
    pub raster: RgbaRaster,
    pub report: UnpackReport,
}

/// Fill `rgba` from the packed grid, one pixel per bit.
///
/// Cell `i` reads bit `i % 8` of byte `i / 8` and becomes the palette's set
/// or clear color. Only `min(cells, packed.len() * 8)` cells are written;
/// pixels past that keep whatever the caller initialized them to.
///
/// `rgba` must be exactly `width * height * 4` bytes, otherwise nothing is
/// written.
pub fn unpack_into(
    packed: &[u8],
    rgba: &mut [u8],
    config: &BoardConfig,
) -> Result<UnpackReport, DecodeError> {
    config.validate()?;
    raster::check_len(config.width, config.height, rgba.len())?;

    let cells = config.cells();
    let cells_written = cells.min(packed.len().saturating_mul(BITS_PER_BYTE));
    let rgba = &mut rgba[..cells_written * 4];
    let palette = config.palette;
    let fill = move |(px, &byte): (&mut [u8], &u8)| fill_byte(px, byte, &palette);

    #[cfg(feature = "parallel")]
    let set_count: usize = rgba
        .par_chunks_mut(CHUNK)
        .zip(packed.par_iter())
        .map(fill)
        .sum();

    #[cfg(not(feature = "parallel"))]
    let set_count: usize = rgba.chunks_mut(CHUNK).zip(packed.iter()).map(fill).sum();

    let coverage = coverage(packed.len(), cells, config.packed_len());
    match coverage {
        Coverage::Exact => {}
        Coverage::Truncated { missing_cells } => log::warn!(
            "packed grid of {} bytes is short for {}x{}: {} cells left blank",
            packed.len(),
            config.width,
            config.height,
            missing_cells
        ),
        Coverage::Overflow { ignored_bytes } => log::warn!(
            "packed grid of {} bytes is long for {}x{}: {} bytes ignored",
            packed.len(),
            config.width,
            config.height,
            ignored_bytes
        ),
    }
    log::debug!("{set_count} pixels set");

    Ok(UnpackReport {
        set_count,
        cells_written,
        coverage,
    })
}

/// Unpack into a freshly allocated raster. Unwritten pixels are transparent.
pub fn unpack(packed: &[u8], config: &BoardConfig) -> Result<Frame, DecodeError> {
    config.validate()?;
    let mut raster = RgbaRaster::new(config.width, config.height);
    let report = unpack_into(packed, &mut raster.buf, config)?;
    Ok(Frame { raster, report })
}

/// Write up to eight pixels for one packed byte, returning how many were set.
#[inline]
fn fill_byte(px: &mut [u8], byte: u8, palette: &Palette) -> usize {
    let mut set = 0;
    for (bit, out) in BitIndex::ALL.iter().zip(px.chunks_exact_mut(4)) {
        let is_set = bits::test_bit(byte, *bit);
        set += is_set as usize;
        out.copy_from_slice(&palette.color(is_set));
    }
    set
}

fn coverage(len: usize, cells: usize, expected_len: usize) -> Coverage {
    if len.saturating_mul(BITS_PER_BYTE) < cells {
        Coverage::Truncated {
            missing_cells: cells - len * BITS_PER_BYTE,
        }
    } else if len > expected_len {
        Coverage::Overflow {
            ignored_bytes: len - expected_len,
        }
    } else {
        Coverage::Exact
    }
}
