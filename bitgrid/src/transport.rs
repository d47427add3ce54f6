//! Text-safe transport of packed grids: standard-alphabet base64.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

use crate::error::TransportError;

/// Standard alphabet. Padding is written on encode; on decode it may be
/// omitted entirely. Partial padding is caught by `check_padding`.
const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode a snapshot string into raw bytes.
///
/// Fails without producing any output when the input is not valid base64.
pub fn decode(text: &str) -> Result<Vec<u8>, TransportError> {
    check_padding(text)?;
    ENGINE.decode(text).map_err(TransportError::from)
}

/// Padded input must be a whole number of 4-symbol groups.
fn check_padding(text: &str) -> Result<(), TransportError> {
    let padded = text.ends_with('=');
    if padded && text.len() % 4 != 0 {
        return Err(TransportError::InvalidPadding);
    }
    Ok(())
}

/// Encode raw bytes as padded standard base64.
pub fn encode(bytes: &[u8]) -> String {
    ENGINE.encode(bytes)
}

impl From<base64::DecodeError> for TransportError {
    fn from(e: base64::DecodeError) -> Self {
        match e {
            base64::DecodeError::InvalidByte(offset, byte) => {
                TransportError::InvalidByte { offset, byte }
            }
            base64::DecodeError::InvalidLength(len) => TransportError::InvalidLength(len),
            base64::DecodeError::InvalidLastSymbol(offset, byte) => {
                TransportError::InvalidLastSymbol { offset, byte }
            }
            base64::DecodeError::InvalidPadding => TransportError::InvalidPadding,
        }
    }
}
