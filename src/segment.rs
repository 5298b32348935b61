//! Segment encoding: mode indicator, character count and packed payload.
//!
//! Exactly one segment is written per symbol; there is no automatic mode
//! selection and no mixing of modes.

use crate::bits::BitBuffer;
use crate::error::QrError;

/// Width of the mode indicator that starts every segment.
pub const MODE_INDICATOR_BITS: u8 = 4;

/// Mode indicator of the end-of-message pseudo segment.
pub const MODE_TERMINATOR: u32 = 0x0;

static ALPHANUMERIC_CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Encoding mode of a segment.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum QrSegmentMode {
    /// Decimal digits, packed three to ten bits.
    Numeric,
    /// The 45-symbol alphabet `0-9 A-Z $%*+-./:` and space, packed two to eleven bits.
    Alphanumeric,
    /// Arbitrary bytes, eight bits each.
    Byte,
}

impl QrSegmentMode {
    /// Returns the 4-bit mode indicator.
    pub const fn mode_bits(self) -> u32 {
        use QrSegmentMode::*;
        match self {
            Numeric => 0x1,
            Alphanumeric => 0x2,
            Byte => 0x4,
        }
    }

    /// Width of the character count field for a 21x21 symbol.
    pub const fn num_char_count_bits(self) -> u8 {
        use QrSegmentMode::*;
        match self {
            Numeric => 10,
            Alphanumeric => 9,
            Byte => 8,
        }
    }
}

/// A validated payload bound to one mode, ready to be written.
#[derive(Clone, Copy, Debug)]
pub struct QrSegment<'a> {
    mode: QrSegmentMode,
    data: &'a [u8],
}

impl<'a> QrSegment<'a> {
    /// Creates a numeric segment.
    ///
    /// # Errors
    ///
    /// [`QrError::InvalidCharacter`] if `text` contains anything but `0`-`9`.
    pub fn make_numeric(text: &'a str) -> Result<Self, QrError> {
        if let Some((index, ch)) = text.chars().enumerate().find(|(_, c)| !c.is_ascii_digit()) {
            return Err(QrError::InvalidCharacter {
                mode: QrSegmentMode::Numeric,
                index,
                ch,
            });
        }
        Self::new(QrSegmentMode::Numeric, text.as_bytes())
    }

    /// Creates an alphanumeric segment. Lower-case letters are folded to upper case.
    ///
    /// # Errors
    ///
    /// [`QrError::InvalidCharacter`] for the first character outside the
    /// 45-symbol alphabet.
    pub fn make_alphanumeric(text: &'a str) -> Result<Self, QrError> {
        if let Some((index, ch)) = text
            .chars()
            .enumerate()
            .find(|&(_, c)| alphanumeric_value(c).is_none())
        {
            return Err(QrError::InvalidCharacter {
                mode: QrSegmentMode::Alphanumeric,
                index,
                ch,
            });
        }
        Self::new(QrSegmentMode::Alphanumeric, text.as_bytes())
    }

    /// Creates a byte segment; every input byte is encoded verbatim.
    pub fn make_bytes(data: &'a [u8]) -> Result<Self, QrError> {
        Self::new(QrSegmentMode::Byte, data)
    }

    fn new(mode: QrSegmentMode, data: &'a [u8]) -> Result<Self, QrError> {
        let ccbits = mode.num_char_count_bits();
        if data.len() >= 1usize << ccbits {
            return Err(QrError::SegmentTooLong(data.len(), ccbits));
        }
        Ok(Self { mode, data })
    }

    pub fn mode(&self) -> QrSegmentMode {
        self.mode
    }

    pub fn num_chars(&self) -> usize {
        self.data.len()
    }

    /// Total bits this segment occupies, header included.
    pub fn bit_length(&self) -> usize {
        Self::calc_bit_length(self.mode, self.data.len())
    }

    /// Bits needed by a segment of `numchars` characters in `mode`, including
    /// the mode indicator and count field.
    pub fn calc_bit_length(mode: QrSegmentMode, numchars: usize) -> usize {
        let header = usize::from(MODE_INDICATOR_BITS + mode.num_char_count_bits());
        let payload = match mode {
            QrSegmentMode::Numeric => 10 * (numchars / 3) + [0, 4, 7][numchars % 3],
            QrSegmentMode::Alphanumeric => 11 * (numchars / 2) + 6 * (numchars % 2),
            QrSegmentMode::Byte => 8 * numchars,
        };
        header + payload
    }

    /// Writes the segment into `buffer` starting at bit `position` and returns
    /// the number of bits written.
    ///
    /// # Errors
    ///
    /// [`QrError::BufferTooSmall`] if the segment would run past the end of
    /// `buffer`; nothing is written in that case.
    pub fn write(&self, buffer: &mut [u8], position: usize) -> Result<usize, QrError> {
        let end = position + self.bit_length();
        if end > buffer.len() * 8 {
            return Err(QrError::BufferTooSmall {
                needed: end.div_ceil(8),
                actual: buffer.len(),
            });
        }
        let mut bb = BitBuffer::at(buffer, position);
        bb.append_bits(self.mode.mode_bits(), MODE_INDICATOR_BITS);
        bb.append_bits(self.data.len() as u32, self.mode.num_char_count_bits());
        match self.mode {
            QrSegmentMode::Numeric => {
                for group in self.data.chunks(3) {
                    let value = group
                        .iter()
                        .fold(0u32, |acc, &b| acc * 10 + u32::from(b - b'0'));
                    bb.append_bits(value, group.len() as u8 * 3 + 1);
                }
            }
            QrSegmentMode::Alphanumeric => {
                for (pair, chars) in self.data.chunks(2).enumerate() {
                    let mut accumdata = 0u32;
                    for (offset, &b) in chars.iter().enumerate() {
                        let value = alphanumeric_value(char::from(b)).ok_or(
                            QrError::InvalidCharacter {
                                mode: QrSegmentMode::Alphanumeric,
                                index: pair * 2 + offset,
                                ch: char::from(b),
                            },
                        )?;
                        accumdata = accumdata * 45 + value;
                    }
                    bb.append_bits(accumdata, if chars.len() == 2 { 11 } else { 6 });
                }
            }
            QrSegmentMode::Byte => {
                for &b in self.data {
                    bb.append_bits(u32::from(b), 8);
                }
            }
        }
        debug_assert_eq!(bb.len(), end);
        Ok(end - position)
    }
}

/// Index of `c` in the alphanumeric alphabet, folding `a`-`z` to upper case.
fn alphanumeric_value(c: char) -> Option<u32> {
    ALPHANUMERIC_CHARSET
        .find(c.to_ascii_uppercase())
        .map(|i| i as u32)
}

/// Writes `text` as a numeric segment at bit `position`.
pub fn write_numeric(buffer: &mut [u8], position: usize, text: &str) -> Result<usize, QrError> {
    QrSegment::make_numeric(text)?.write(buffer, position)
}

/// Writes `text` as an alphanumeric segment at bit `position`.
pub fn write_alphanumeric(
    buffer: &mut [u8],
    position: usize,
    text: &str,
) -> Result<usize, QrError> {
    QrSegment::make_alphanumeric(text)?.write(buffer, position)
}

/// Writes `data` as a byte segment at bit `position`.
pub fn write_bytes(buffer: &mut [u8], position: usize, data: &[u8]) -> Result<usize, QrError> {
    QrSegment::make_bytes(data)?.write(buffer, position)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calc_bit_length() {
        use QrSegmentMode::*;
        assert_eq!(QrSegment::calc_bit_length(Numeric, 0), 14);
        assert_eq!(QrSegment::calc_bit_length(Numeric, 8), 14 + 20 + 7);
        assert_eq!(QrSegment::calc_bit_length(Numeric, 17), 14 + 50 + 7);
        assert_eq!(QrSegment::calc_bit_length(Numeric, 42), 14 + 140);
        assert_eq!(QrSegment::calc_bit_length(Alphanumeric, 11), 13 + 55 + 6);
        assert_eq!(QrSegment::calc_bit_length(Byte, 5), 12 + 40);
    }

    #[test]
    fn test_write_alphanumeric() {
        let mut buf = [0u8; 26];
        assert_eq!(write_alphanumeric(&mut buf, 0, "HELLO WORLD"), Ok(74));
        assert_eq!(buf[..9], [32, 91, 11, 120, 209, 114, 220, 77, 67]);
        assert_eq!(buf[9] >> 6, 0b01);
    }

    #[test]
    fn test_alphanumeric_folds_lower_case() {
        let mut upper = [0u8; 26];
        let mut lower = [0u8; 26];
        write_alphanumeric(&mut upper, 0, "HELLO WORLD").unwrap();
        write_alphanumeric(&mut lower, 0, "hello world").unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_alphanumeric_rejects_unknown_character() {
        let mut buf = [0u8; 26];
        assert_eq!(
            write_alphanumeric(&mut buf, 0, "HELLO#"),
            Err(QrError::InvalidCharacter {
                mode: QrSegmentMode::Alphanumeric,
                index: 5,
                ch: '#',
            })
        );
        assert_eq!(buf, [0u8; 26]);
        assert!(QrSegment::make_alphanumeric("caf\u{e9}").is_err());
    }

    #[test]
    fn test_write_numeric() {
        let mut buf = [0u8; 26];
        assert_eq!(write_numeric(&mut buf, 0, "01234567"), Ok(41));
        assert_eq!(buf[..5], [16, 32, 12, 86, 97]);
        assert_eq!(buf[5], 0x80);
    }

    #[test]
    fn test_numeric_rejects_non_digit() {
        let mut buf = [0u8; 26];
        assert_eq!(
            write_numeric(&mut buf, 0, "12a4"),
            Err(QrError::InvalidCharacter {
                mode: QrSegmentMode::Numeric,
                index: 2,
                ch: 'a',
            })
        );
    }

    #[test]
    fn test_write_bytes() {
        let mut buf = [0u8; 26];
        assert_eq!(write_bytes(&mut buf, 0, b"hello"), Ok(52));
        assert_eq!(buf[..7], [64, 86, 134, 86, 198, 198, 240]);
    }

    #[test]
    fn test_write_at_offset() {
        let mut buf = [0u8; 4];
        let written = write_bytes(&mut buf, 4, &[0xff]).unwrap();
        assert_eq!(written, 20);
        assert_eq!(buf, [0x04, 0x01, 0xff, 0x00]);
    }

    #[test]
    fn test_write_past_buffer_is_rejected() {
        let mut buf = [0u8; 4];
        assert_eq!(
            write_alphanumeric(&mut buf, 0, "HELLO WORLD"),
            Err(QrError::BufferTooSmall {
                needed: 10,
                actual: 4,
            })
        );
        assert_eq!(buf, [0u8; 4]);

        let mut buf = [0u8; 10];
        assert_eq!(
            write_alphanumeric(&mut buf, 10, "HELLO WORLD"),
            Err(QrError::BufferTooSmall {
                needed: 11,
                actual: 10,
            })
        );
        assert_eq!(write_alphanumeric(&mut buf, 6, "HELLO WORLD"), Ok(74));
    }

    #[test]
    fn test_alphanumeric_odd_length_tail() {
        let mut buf = [0u8; 4];
        assert_eq!(write_alphanumeric(&mut buf, 0, "a1b"), Ok(30));
        // Mode 0010, count 3, "A1" = 10 * 45 + 1 in eleven bits, "B" = 11 in six.
        let expected = (((((0b0010 << 9) | 3) << 11) | 451) << 6) | 11;
        assert_eq!(u32::from_be_bytes(buf) >> 2, expected);
    }

    #[test]
    fn test_count_field_overflow() {
        let data = [0u8; 256];
        assert_eq!(
            QrSegment::make_bytes(&data).map(|s| s.num_chars()),
            Err(QrError::SegmentTooLong(256, 8))
        );
        assert!(QrSegment::make_bytes(&data[..255]).is_ok());
    }

    #[test]
    fn test_segment_accessors() {
        let seg = QrSegment::make_numeric("123").unwrap();
        assert_eq!(seg.mode(), QrSegmentMode::Numeric);
        assert_eq!(seg.num_chars(), 3);
        assert_eq!(seg.bit_length(), 24);
    }
}
