//! Snapshot text to pixels in one call.

use crate::config::BoardConfig;
use crate::error::DecodeError;
use crate::transport;
use crate::unpack::{self, Frame, UnpackReport};

/// Decode a base64 snapshot and unpack it into a new raster.
pub fn decode_board(text: &str, config: &BoardConfig) -> Result<Frame, DecodeError> {
    let packed = transport::decode(text)?;
    log::debug!("decoded {} snapshot bytes", packed.len());
    unpack::unpack(&packed, config)
}

/// Decode a base64 snapshot into a caller-owned RGBA buffer.
///
/// On a transport error the buffer is left untouched.
pub fn decode_board_into(
    text: &str,
    config: &BoardConfig,
    rgba: &mut [u8],
) -> Result<UnpackReport, DecodeError> {
    let packed = transport::decode(text)?;
    unpack::unpack_into(&packed, rgba, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RED, WHITE};
    use crate::error::TransportError;
    use crate::unpack::Coverage;

    #[test]
    fn decode_single_byte_board() {
        let frame = decode_board("BQ==", &BoardConfig::new(8, 1)).unwrap();
        assert_eq!(frame.report.set_count, 2);
        assert_eq!(frame.raster.pixel_at(0), RED);
        assert_eq!(frame.raster.pixel_at(1), WHITE);
        assert_eq!(frame.raster.pixel_at(2), RED);
    }

    #[test]
    fn malformed_text_leaves_buffer_untouched() {
        let mut rgba = vec![3u8; 32];
        let err = decode_board_into("not-valid-base64!!", &BoardConfig::new(8, 1), &mut rgba)
            .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Transport(TransportError::InvalidByte { .. })
        ));
        assert!(rgba.iter().all(|&b| b == 3));
    }

    #[test]
    fn short_snapshot_is_reported() {
        let frame = decode_board("/w==", &BoardConfig::new(4, 4)).unwrap();
        assert_eq!(frame.report.coverage, Coverage::Truncated { missing_cells: 8 });
        assert_eq!(frame.raster.pixel_at(8), [0, 0, 0, 0]);
    }
}
