//! Format information: error-correction level and mask protected by BCH(15,5).

use crate::qrcode::{Mask, QrCodeEcc};

/// XOR pattern applied to every format word so it is never all light.
pub const FORMAT_INFO_MASK: u16 = 0x5412;

/// BCH generator polynomial x^10 + x^8 + x^5 + x^4 + x^2 + x + 1.
const FORMAT_BCH_POLY: u32 = 0x537;

/// Most bit errors the nearest-codeword search will correct.
const MAX_CORRECTABLE_ERRORS: u32 = 3;

/// Returns the 15-bit format word for `ecl` and `mask`, already XOR-masked.
pub const fn format_bits(ecl: QrCodeEcc, mask: Mask) -> u16 {
    let data = ((ecl.format_bits() as u32) << 3) | mask.value() as u32;
    let mut rem: u32 = data;
    let mut i = 0;
    while i < 10 {
        rem = (rem << 1) ^ ((rem >> 9) * FORMAT_BCH_POLY);
        i += 1;
    }
    (((data << 10) | rem) as u16) ^ FORMAT_INFO_MASK
}

/// Recovers the level and mask from a format word read out of a symbol.
///
/// Returns `None` when the word is more than three bit errors away from every
/// valid format word.
pub fn decode_format_bits(bits: u16) -> Option<(QrCodeEcc, Mask)> {
    QrCodeEcc::ALL
        .iter()
        .flat_map(|&ecl| Mask::ALL.iter().map(move |&mask| (ecl, mask)))
        .map(|(ecl, mask)| ((format_bits(ecl, mask) ^ bits).count_ones(), ecl, mask))
        .min_by_key(|&(distance, _, _)| distance)
        .filter(|&(distance, _, _)| distance <= MAX_CORRECTABLE_ERRORS)
        .map(|(_, ecl, mask)| (ecl, mask))
}
