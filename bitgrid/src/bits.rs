use crate::error::BitIndexError;

pub const BITS_PER_BYTE: usize = 8;

/// Position of a bit inside a byte, LSB-first: index 0 has value 1,
/// index 7 has value 128.
///
/// Construction is checked, so holding a `BitIndex` means the index is in `0..8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BitIndex(u8);

impl BitIndex {
    /// All eight indices in ascending order.
    pub const ALL: [BitIndex; 8] = [
        BitIndex(0),
        BitIndex(1),
        BitIndex(2),
        BitIndex(3),
        BitIndex(4),
        BitIndex(5),
        BitIndex(6),
        BitIndex(7),
    ];

    pub fn new(index: u32) -> Result<Self, BitIndexError> {
        if index < BITS_PER_BYTE as u32 {
            Ok(BitIndex(index as u8))
        } else {
            Err(BitIndexError(index))
        }
    }

    /// Bit index of linear cell `cell`.
    #[inline]
    pub fn of_cell(cell: usize) -> Self {
        BitIndex((cell % BITS_PER_BYTE) as u8)
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn mask(self) -> u8 {
        1 << self.0
    }
}

/// Test a single bit.
#[inline]
pub fn test_bit(byte: u8, bit: BitIndex) -> bool {
    byte & bit.mask() != 0
}

/// Checked bit test for callers holding a raw index.
pub fn bit_is_set(byte: u8, bit_index: u32) -> Result<bool, BitIndexError> {
    BitIndex::new(bit_index).map(|bit| test_bit(byte, bit))
}

#[inline]
pub fn set_bit(byte: u8, bit: BitIndex, value: bool) -> u8 {
    if value {
        byte | bit.mask()
    } else {
        byte & !bit.mask()
    }
}

#[inline]
pub fn toggle_bit(byte: u8, bit: BitIndex) -> u8 {
    byte ^ bit.mask()
}

/// Number of bytes needed to hold `cells` bits.
#[inline]
pub fn packed_len(cells: usize) -> usize {
    cells.div_ceil(BITS_PER_BYTE)
}
