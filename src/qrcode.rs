//! QR code encoding for the smallest symbol size.
//!
//! This module turns one segment of data into a 21x21 (version 1) module matrix:
//! terminator and padding up to the data capacity of the chosen error
//! correction level, a single Reed-Solomon block, the fixed function patterns,
//! format information, and masked data modules. All storage is caller-owned.

use log::{debug, trace};

use crate::bits::BitBuffer;
use crate::ecc::ReedSolomonGenerator;
use crate::error::QrError;
use crate::format::{decode_format_bits, format_bits};
use crate::layout::{classify, data_bit_position, ModuleKind, DIMENSION};
use crate::segment::{QrSegment, QrSegmentMode, MODE_TERMINATOR};

/// Codewords (data plus error correction) held by a 21x21 symbol.
pub const TOTAL_CODEWORDS: usize = 26;

/// Minimum length of the module buffer passed as `outbuffer`.
pub const BUFFER_LEN: usize = ((DIMENSION * DIMENSION) as usize + 7) / 8;

/// Minimum length of the scratch buffer passed as `tempbuffer`.
pub const SCRATCH_BUFFER_LEN: usize = TOTAL_CODEWORDS;

/// No quiet zone around the symbol.
pub const QUIET_NONE: i32 = 0;

/// The four-module quiet zone the standard asks for.
pub const QUIET_STANDARD: i32 = 4;

/// Pad codewords 0b11101100 and 0b00010001, repeated until capacity is filled.
const PAD_CODEWORDS: u32 = 0xec11;

/// A generated 21x21 QR Code symbol.
///
/// The symbol borrows the caller's module buffer, which holds one bit per
/// module in row-major order, most significant bit first. It is read-only once
/// generation has finished.
///
/// # Example
///
/// ```rust
/// use qrtiny::qrcode::{Mask, QrCode, QrCodeEcc, BUFFER_LEN, SCRATCH_BUFFER_LEN};
/// use qrtiny::segment::QrSegmentMode;
///
/// let mut tempbuffer = [0u8; SCRATCH_BUFFER_LEN];
/// let mut outbuffer = [0u8; BUFFER_LEN];
/// let qr = QrCode::encode_text(
///     "HELLO WORLD",
///     QrSegmentMode::Alphanumeric,
///     &mut tempbuffer,
///     &mut outbuffer,
///     QrCodeEcc::Low,
///     Mask::Pattern0,
/// ).unwrap();
///
/// assert_eq!(qr.size(), 21);
/// assert!(qr.get_module(0, 0));
/// assert!(!qr.get_module(-1, 0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QrCode<'a> {
    modules: &'a [u8],
}

impl<'a> QrCode<'a> {
    /// Encodes `text` as a single segment in the given mode.
    ///
    /// # Arguments
    ///
    /// * `text` - The text to encode.
    /// * `mode` - The segment mode; the caller picks it, there is no automatic selection.
    /// * `tempbuffer` - Scratch space, at least [`SCRATCH_BUFFER_LEN`] bytes.
    /// * `outbuffer` - Module buffer, at least [`BUFFER_LEN`] bytes.
    /// * `ecl` - Error correction level.
    /// * `mask` - Mask pattern applied to the data modules.
    ///
    /// # Errors
    ///
    /// [`QrError::InvalidCharacter`] if `text` does not fit `mode`,
    /// [`QrError::DataOverCapacity`] if the segment does not fit `ecl`, or
    /// [`QrError::BufferTooSmall`] for undersized buffers. `outbuffer` is left
    /// untouched on error.
    pub fn encode_text(
        text: &str,
        mode: QrSegmentMode,
        tempbuffer: &mut [u8],
        outbuffer: &'a mut [u8],
        ecl: QrCodeEcc,
        mask: Mask,
    ) -> Result<QrCode<'a>, QrError> {
        let seg = match mode {
            QrSegmentMode::Numeric => QrSegment::make_numeric(text)?,
            QrSegmentMode::Alphanumeric => QrSegment::make_alphanumeric(text)?,
            QrSegmentMode::Byte => QrSegment::make_bytes(text.as_bytes())?,
        };
        Self::encode_segment(&seg, tempbuffer, outbuffer, ecl, mask)
    }

    /// Encodes arbitrary bytes as a single byte-mode segment.
    pub fn encode_binary(
        data: &[u8],
        tempbuffer: &mut [u8],
        outbuffer: &'a mut [u8],
        ecl: QrCodeEcc,
        mask: Mask,
    ) -> Result<QrCode<'a>, QrError> {
        let seg = QrSegment::make_bytes(data)?;
        Self::encode_segment(&seg, tempbuffer, outbuffer, ecl, mask)
    }

    /// Writes `seg` at the start of `tempbuffer` and generates the symbol.
    pub fn encode_segment(
        seg: &QrSegment<'_>,
        tempbuffer: &mut [u8],
        outbuffer: &'a mut [u8],
        ecl: QrCodeEcc,
        mask: Mask,
    ) -> Result<QrCode<'a>, QrError> {
        check_buffer_len(tempbuffer, SCRATCH_BUFFER_LEN)?;
        let capacity = ecl.data_capacity_bits();
        let used = seg.bit_length();
        if used > capacity {
            return Err(QrError::DataOverCapacity(used, capacity));
        }
        let payload_bits = seg.write(tempbuffer, 0)?;
        Self::encode_payload(tempbuffer, payload_bits, outbuffer, ecl, mask)
    }

    /// Generates the symbol from segment data already written to `tempbuffer`.
    ///
    /// The first `payload_bits` bits of `tempbuffer` are taken as the encoded
    /// segment. The rest of the buffer is overwritten with the terminator,
    /// padding and error-correction codewords before the matrix is drawn.
    ///
    /// # Errors
    ///
    /// [`QrError::DataOverCapacity`] if `payload_bits` exceeds the data capacity
    /// of `ecl`; [`QrError::BufferTooSmall`] for undersized buffers.
    pub fn encode_payload(
        tempbuffer: &mut [u8],
        payload_bits: usize,
        outbuffer: &'a mut [u8],
        ecl: QrCodeEcc,
        mask: Mask,
    ) -> Result<QrCode<'a>, QrError> {
        check_buffer_len(tempbuffer, SCRATCH_BUFFER_LEN)?;
        check_buffer_len(outbuffer, BUFFER_LEN)?;

        let capacity = ecl.data_capacity_bits();
        if payload_bits > capacity {
            debug!("payload of {payload_bits} bits exceeds {capacity} bits at {ecl:?}");
            return Err(QrError::DataOverCapacity(payload_bits, capacity));
        }
        debug!("encoding {payload_bits} of {capacity} data bits at {ecl:?} with {mask:?}");

        let datalen = ecl.data_codewords();
        let codewords = &mut tempbuffer[..TOTAL_CODEWORDS];
        pad_data_codewords(&mut codewords[..datalen], payload_bits);

        let (data, ecc) = codewords.split_at_mut(datalen);
        ecl.generator().compute_remainder(data, ecc);
        trace!("data codewords {data:02x?}, ecc codewords {ecc:02x?}");

        let modules = &mut outbuffer[..BUFFER_LEN];
        draw_modules(modules, codewords, ecl, mask);
        Ok(QrCode { modules })
    }

    /// Wraps a module buffer produced by an earlier generation call.
    pub fn from_modules(modules: &'a [u8]) -> Result<QrCode<'a>, QrError> {
        check_buffer_len(modules, BUFFER_LEN)?;
        Ok(QrCode {
            modules: &modules[..BUFFER_LEN],
        })
    }

    /// Returns this QR Code's size in modules, always 21.
    pub fn size(&self) -> i32 {
        DIMENSION
    }

    /// The packed module bits, row-major, most significant bit first.
    pub fn modules(&self) -> &'a [u8] {
        self.modules
    }

    /// Returns the color of the module at the given coordinates.
    ///
    /// Returns `true` for dark modules and `false` for light modules. Coordinates
    /// outside the symbol, i.e. in the quiet zone, are always light.
    ///
    /// # Arguments
    ///
    /// * `x` - X-coordinate (0 is left).
    /// * `y` - Y-coordinate (0 is top).
    pub fn get_module(&self, x: i32, y: i32) -> bool {
        let range = 0..DIMENSION;
        range.contains(&x) && range.contains(&y) && self.get_module_bounded(x, y)
    }

    fn get_module_bounded(&self, x: i32, y: i32) -> bool {
        let index = (y * DIMENSION + x) as usize;
        (self.modules[index >> 3] >> (7 - (index & 7))) & 1 != 0
    }

    /// The two 15-bit format words as drawn: the copy around the top-left
    /// finder, then the copy split between the other two finders.
    pub fn format_words(&self) -> [u16; 2] {
        let mut words = [0u16; 2];
        for y in 0..DIMENSION {
            for x in 0..DIMENSION {
                if let ModuleKind::Format { index } = classify(x, y) {
                    let copy = usize::from(x > 8 || y > 8);
                    words[copy] |= u16::from(self.get_module_bounded(x, y)) << index;
                }
            }
        }
        words
    }

    /// Decodes the level and mask from the format information, falling back to
    /// the second copy when the first is unreadable.
    pub fn format_info(&self) -> Option<(QrCodeEcc, Mask)> {
        let [primary, secondary] = self.format_words();
        decode_format_bits(primary).or_else(|| decode_format_bits(secondary))
    }

    /// Returns this QR Code's error correction level.
    pub fn error_correction_level(&self) -> Option<QrCodeEcc> {
        self.format_info().map(|(ecl, _)| ecl)
    }

    /// Returns this QR Code's mask.
    pub fn mask(&self) -> Option<Mask> {
        self.format_info().map(|(_, mask)| mask)
    }
}

fn check_buffer_len(buffer: &[u8], needed: usize) -> Result<(), QrError> {
    if buffer.len() < needed {
        return Err(QrError::BufferTooSmall {
            needed,
            actual: buffer.len(),
        });
    }
    Ok(())
}

/// Fills `data` after the first `payload_bits` bits: up to four terminator
/// bits, zero bits to the next byte boundary, then alternating pad codewords.
fn pad_data_codewords(data: &mut [u8], payload_bits: usize) {
    let capacity = data.len() * 8;
    let mut bb = BitBuffer::at(data, payload_bits);

    let numzerobits = (capacity - bb.len()).min(4);
    bb.append_bits(MODE_TERMINATOR, numzerobits as u8);
    let numzerobits = (bb.len().wrapping_neg() & 7).min(capacity - bb.len());
    bb.append_bits(0, numzerobits as u8);
    debug_assert_eq!(bb.len() % 8, 0);

    let mut padbits = 0;
    while bb.len() < capacity {
        let remaining = (capacity - bb.len()).min(16);
        padbits += bb.append_bits(PAD_CODEWORDS >> (16 - remaining), remaining as u8);
    }
    trace!("terminated at bit {payload_bits}, {padbits} pad bits");
}

/// Draws every module of the symbol in raster order.
fn draw_modules(modules: &mut [u8], codewords: &[u8], ecl: QrCodeEcc, mask: Mask) {
    let format = format_bits(ecl, mask);
    modules.fill(0);
    for y in 0..DIMENSION {
        for x in 0..DIMENSION {
            let dark = match classify(x, y) {
                ModuleKind::Finder { dark } | ModuleKind::Timing { dark } => dark,
                ModuleKind::Separator => false,
                ModuleKind::DarkModule => true,
                ModuleKind::Format { index } => (format >> index) & 1 != 0,
                ModuleKind::Data => {
                    let (codeword, shift) = data_bit_position(x, y);
                    let bit = (codewords[codeword] >> shift) & 1 != 0;
                    bit ^ mask.is_masked(x, y)
                }
            };
            if dark {
                let index = (y * DIMENSION + x) as usize;
                modules[index >> 3] |= 1 << (7 - (index & 7));
            }
        }
    }
}

/// Error-correction codewords per level, indexed by [`QrCodeEcc::ordinal`].
const ECC_CODEWORDS: [usize; 4] = [7, 10, 13, 17];

static GENERATORS: [ReedSolomonGenerator; 4] = [
    ReedSolomonGenerator::new(ECC_CODEWORDS[0]),
    ReedSolomonGenerator::new(ECC_CODEWORDS[1]),
    ReedSolomonGenerator::new(ECC_CODEWORDS[2]),
    ReedSolomonGenerator::new(ECC_CODEWORDS[3]),
];

/// Error correction level for a QR code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum QrCodeEcc {
    /// Tolerates ~7% erroneous codewords.
    Low,
    /// Tolerates ~15% erroneous codewords.
    Medium,
    /// Tolerates ~25% erroneous codewords.
    Quartile,
    /// Tolerates ~30% erroneous codewords.
    High,
}

impl QrCodeEcc {
    pub const ALL: [QrCodeEcc; 4] = [
        QrCodeEcc::Low,
        QrCodeEcc::Medium,
        QrCodeEcc::Quartile,
        QrCodeEcc::High,
    ];

    /// Returns an unsigned 2-bit integer (in the range 0 to 3).
    const fn ordinal(self) -> usize {
        use QrCodeEcc::*;
        match self {
            Low => 0,
            Medium => 1,
            Quartile => 2,
            High => 3,
        }
    }

    /// Returns the 2-bit value stored in the format information.
    pub const fn format_bits(self) -> u8 {
        use QrCodeEcc::*;
        match self {
            Low => 1,
            Medium => 0,
            Quartile => 3,
            High => 2,
        }
    }

    /// Number of error-correction codewords in the single block.
    pub const fn ecc_codewords(self) -> usize {
        ECC_CODEWORDS[self.ordinal()]
    }

    /// Number of data codewords left after error correction.
    pub const fn data_codewords(self) -> usize {
        TOTAL_CODEWORDS - self.ecc_codewords()
    }

    /// Data capacity in bits, mode indicator and count field included.
    pub const fn data_capacity_bits(self) -> usize {
        self.data_codewords() * 8
    }

    /// The Reed-Solomon generator for this level.
    pub fn generator(self) -> &'static ReedSolomonGenerator {
        &GENERATORS[self.ordinal()]
    }
}

/// One of the eight data mask patterns.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum Mask {
    Pattern0,
    Pattern1,
    Pattern2,
    Pattern3,
    Pattern4,
    Pattern5,
    Pattern6,
    Pattern7,
}

impl Mask {
    pub const ALL: [Mask; 8] = [
        Mask::Pattern0,
        Mask::Pattern1,
        Mask::Pattern2,
        Mask::Pattern3,
        Mask::Pattern4,
        Mask::Pattern5,
        Mask::Pattern6,
        Mask::Pattern7,
    ];

    /// Returns the value, which is in the range [0, 7].
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Whether the data module at column `x`, row `y` is inverted by this mask.
    pub fn is_masked(self, x: i32, y: i32) -> bool {
        use Mask::*;
        match self {
            Pattern0 => (x + y) % 2 == 0,
            Pattern1 => y % 2 == 0,
            Pattern2 => x % 3 == 0,
            Pattern3 => (x + y) % 3 == 0,
            Pattern4 => (y / 2 + x / 3) % 2 == 0,
            Pattern5 => (x * y) % 2 + (x * y) % 3 == 0,
            Pattern6 => ((x * y) % 2 + (x * y) % 3) % 2 == 0,
            Pattern7 => ((x * y) % 3 + (x + y) % 2) % 2 == 0,
        }
    }
}

impl TryFrom<u8> for Mask {
    type Error = QrError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Mask::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(QrError::InvalidMask(value))
    }
}
