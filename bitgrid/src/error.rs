use thiserror::Error;

/// The encoded snapshot text is not valid standard base64.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("invalid character {byte:#04x} at offset {offset}")]
    InvalidByte { offset: usize, byte: u8 },

    #[error("invalid input length {0}")]
    InvalidLength(usize),

    #[error("invalid trailing symbol {byte:#04x} at offset {offset}")]
    InvalidLastSymbol { offset: usize, byte: u8 },

    #[error("invalid padding")]
    InvalidPadding,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("bit index {0} is outside 0..8")]
pub struct BitIndexError(pub u32);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RasterError {
    #[error("RGBA buffer length {actual} does not match {width}x{height}x4 = {expected}")]
    LengthMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("cell index {index} is outside a grid of {cells} cells")]
    CellOutOfRange { index: usize, cells: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("board dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },

    #[error("board {width}x{height} is too large to address")]
    TooLarge { width: u32, height: u32 },

    #[error("config error: {0}")]
    Parse(String),
}

/// Any failure of the composed decode-and-unpack pipeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed transport input: {0}")]
    Transport(#[from] TransportError),

    #[error("raster error: {0}")]
    Raster(#[from] RasterError),

    #[error("invalid board config: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("failed to start render thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("render thread stopped")]
    Stopped,
}
