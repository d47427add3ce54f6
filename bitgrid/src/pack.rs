use crate::config::BoardConfig;
use crate::error::DecodeError;
use crate::grid::PackedGrid;
use crate::raster;

/// Inverse of unpacking: a pixel becomes a set cell iff its RGB equals the
/// palette's set color. Alpha is ignored.
pub fn pack_rgba(rgba: &[u8], config: &BoardConfig) -> Result<PackedGrid, DecodeError> {
    config.validate()?;
    raster::check_len(config.width, config.height, rgba.len())?;
    let set = config.palette.set;
    let grid = PackedGrid::from_cells(rgba.chunks_exact(4).map(|px| px[..3] == set[..3]));
    log::debug!("packed {} cells, {} set", grid.cells(), grid.count_set());
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RED, WHITE};
    use crate::unpack::unpack;

    #[test]
    fn pack_reverses_unpack() {
        let config = BoardConfig::new(5, 3);
        let original = PackedGrid::from_cells((0..15).map(|i| i % 3 == 0));
        let frame = unpack(original.as_bytes(), &config).unwrap();
        let packed = pack_rgba(&frame.raster.buf, &config).unwrap();
        assert_eq!(packed, original);
    }

    #[test]
    fn alpha_is_ignored() {
        let config = BoardConfig::new(2, 1);
        let mut rgba = Vec::new();
        rgba.extend_from_slice(&[255, 0, 0, 10]);
        rgba.extend_from_slice(&WHITE);
        let packed = pack_rgba(&rgba, &config).unwrap();
        assert_eq!(packed.get(0), Some(true));
        assert_eq!(packed.get(1), Some(false));
    }

    #[test]
    fn other_colors_are_clear() {
        let config = BoardConfig::new(3, 1);
        let rgba = [[254, 0, 0, 255], RED, [0, 0, 0, 255]].concat();
        let packed = pack_rgba(&rgba, &config).unwrap();
        assert_eq!(packed.as_bytes(), &[0b010]);
    }

    #[test]
    fn length_is_checked() {
        let config = BoardConfig::new(3, 1);
        assert!(matches!(
            pack_rgba(&[0; 8], &config),
            Err(DecodeError::Raster(_))
        ));
    }
}
