use crate::bits::{self, BitIndex, BITS_PER_BYTE};
use crate::error::GridError;

/// A bit-per-cell board snapshot, LSB-first, row-major.
///
/// This is a builder for snapshots handed to the transport; it holds no
/// notion of authoritative state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedGrid {
    cells: usize,
    bytes: Vec<u8>,
}

impl PackedGrid {
    /// An all-clear grid of `cells` cells.
    pub fn new(cells: usize) -> Self {
        Self {
            cells,
            bytes: vec![0u8; bits::packed_len(cells)],
        }
    }

    /// Wrap received bytes. The cell count is whatever the bytes can hold.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            cells: bytes.len() * BITS_PER_BYTE,
            bytes,
        }
    }

    /// Pack a sequence of cell values in linear order.
    pub fn from_cells<I>(cells: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let mut bytes = Vec::new();
        let mut count = 0usize;
        for value in cells {
            if count % BITS_PER_BYTE == 0 {
                bytes.push(0);
            }
            if value {
                let last = bytes.len() - 1;
                bytes[last] = bits::set_bit(bytes[last], BitIndex::of_cell(count), true);
            }
            count += 1;
        }
        Self {
            cells: count,
            bytes,
        }
    }

    #[inline]
    pub fn cells(&self) -> usize {
        self.cells
    }

    /// Value of cell `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.cells {
            return None;
        }
        let byte = self.bytes[index / BITS_PER_BYTE];
        Some(bits::test_bit(byte, BitIndex::of_cell(index)))
    }

    pub fn set(&mut self, index: usize, value: bool) -> Result<(), GridError> {
        if index >= self.cells {
            return Err(GridError::CellOutOfRange {
                index,
                cells: self.cells,
            });
        }
        let byte = &mut self.bytes[index / BITS_PER_BYTE];
        *byte = bits::set_bit(*byte, BitIndex::of_cell(index), value);
        Ok(())
    }

    /// Number of set cells. Padding bits past `cells()` are not counted.
    pub fn count_set(&self) -> usize {
        let full = self.cells / BITS_PER_BYTE;
        let mut count: usize = self.bytes[..full]
            .iter()
            .map(|b| b.count_ones() as usize)
            .sum();
        let rem = self.cells % BITS_PER_BYTE;
        if rem > 0 {
            let mask = (1u8 << rem) - 1;
            count += (self.bytes[full] & mask).count_ones() as usize;
        }
        count
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
