//! Bit-level writer over a caller-owned byte buffer.

/// Writes the low `count` bits of `value` into `buffer`, most significant bit
/// first, starting at bit `position`. Returns `count` so callers can keep a
/// running bit position.
///
/// Bits outside `position..position + count` are left untouched. The caller
/// must make sure the buffer is large enough.
pub fn append_bits(buffer: &mut [u8], position: usize, value: u32, count: u8) -> usize {
    debug_assert!(count <= 32);
    for i in 0..usize::from(count) {
        let index = position + i;
        let writemask: u8 = 1 << (7 - (index & 7));
        let bit = (value >> (usize::from(count) - 1 - i)) & 1 != 0;
        let byte = &mut buffer[index >> 3];
        *byte = (*byte & !writemask) | if bit { writemask } else { 0 };
    }
    usize::from(count)
}

/// A write cursor over a byte buffer. Each append starts exactly where the
/// previous one ended.
pub struct BitBuffer<'a> {
    data: &'a mut [u8],
    length: usize,
}

impl<'a> BitBuffer<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self::at(buffer, 0)
    }

    /// Starts writing at an arbitrary bit offset, preserving earlier bits.
    pub fn at(buffer: &'a mut [u8], position: usize) -> Self {
        Self {
            data: buffer,
            length: position,
        }
    }

    /// Current bit position.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Capacity of the underlying buffer in bits.
    pub fn capacity(&self) -> usize {
        self.data.len() * 8
    }

    pub fn append_bits(&mut self, val: u32, len: u8) -> usize {
        let written = append_bits(self.data, self.length, val, len);
        self.length += written;
        written
    }
}
