use thiserror::Error;

use crate::segment::QrSegmentMode;

/// Reasons a symbol could not be generated.
///
/// Every variant is reported before the output buffer is written, so a failed
/// call never leaves a partially drawn matrix behind.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QrError {
    /// The encoded segment (header included) does not fit the data capacity
    /// of the chosen error-correction level.
    #[error("Data length = {0} bits, Max capacity = {1} bits")]
    DataOverCapacity(usize, usize),
    /// The character count cannot be represented in the mode's count field.
    #[error("Segment too long: {0} characters do not fit a {1}-bit count field")]
    SegmentTooLong(usize, u8),
    /// A character has no encoding in the requested mode.
    #[error("Character {ch:?} at index {index} cannot be encoded in {mode:?} mode")]
    InvalidCharacter {
        mode: QrSegmentMode,
        index: usize,
        ch: char,
    },
    #[error("Buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },
    #[error("Mask value out of range: {0}")]
    InvalidMask(u8),
}
