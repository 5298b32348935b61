//! Fixed geometry of a 21x21 symbol.
//!
//! Everything here is a pure function of the coordinate. Alignment patterns and
//! version information only exist from version 2 upward and are deliberately
//! not modelled: this layout is only valid for the 21x21 size.

/// Width and height of the symbol in modules.
pub const DIMENSION: i32 = 21;

const FINDER_SIZE: i32 = 7;
const FINDER_CENTER: i32 = FINDER_SIZE / 2;
const TIMING_OFFSET: i32 = 6;

/// What occupies a given module position.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ModuleKind {
    /// One of the three concentric-square corner markers.
    Finder { dark: bool },
    /// The light border between a finder and the rest of the symbol.
    Separator,
    /// Alternating stripe on row and column 6.
    Timing { dark: bool },
    /// The module right of the bottom-left finder that is always dark.
    DarkModule,
    /// Bit `index` (0 = least significant) of the 15-bit format word.
    Format { index: u8 },
    /// Carries one bit of the data and error-correction codewords.
    Data,
}

impl ModuleKind {
    /// Whether the position is part of a function pattern rather than data.
    pub fn is_function(self) -> bool {
        self != ModuleKind::Data
    }
}

/// Finder centres: top-left, top-right, bottom-left.
const FINDER_CENTERS: [(i32, i32); 3] = [
    (FINDER_CENTER, FINDER_CENTER),
    (DIMENSION - 1 - FINDER_CENTER, FINDER_CENTER),
    (FINDER_CENTER, DIMENSION - 1 - FINDER_CENTER),
];

/// Classifies an in-bounds coordinate.
pub fn classify(x: i32, y: i32) -> ModuleKind {
    debug_assert!((0..DIMENSION).contains(&x) && (0..DIMENSION).contains(&y));

    for (cx, cy) in FINDER_CENTERS {
        let dist = (x - cx).abs().max((y - cy).abs());
        if dist <= FINDER_CENTER {
            return ModuleKind::Finder { dark: dist != 2 };
        }
        if dist == FINDER_CENTER + 1 {
            return ModuleKind::Separator;
        }
    }

    if x == TIMING_OFFSET || y == TIMING_OFFSET {
        return ModuleKind::Timing {
            dark: (x + y) % 2 == 0,
        };
    }

    const FORMAT_LINE: i32 = FINDER_SIZE + 1;
    const FAR_EDGE: i32 = DIMENSION - FINDER_SIZE - 1;
    if x == FORMAT_LINE && y == FAR_EDGE {
        return ModuleKind::DarkModule;
    }

    // Copy 1 wraps around the top-left finder, low bits down column 8 and high
    // bits leftward along row 8.
    let (xx, yy) = (skip_timing(x), skip_timing(y));
    if xx <= FINDER_SIZE && yy <= FINDER_SIZE {
        return ModuleKind::Format {
            index: (FINDER_SIZE - xx + yy) as u8,
        };
    }
    // Copy 2 is split between the bottom-left and top-right finders.
    if x == FORMAT_LINE && y > FAR_EDGE {
        return ModuleKind::Format {
            index: (y + 2 * FINDER_SIZE - (DIMENSION - 1)) as u8,
        };
    }
    if y == FORMAT_LINE && x >= FAR_EDGE {
        return ModuleKind::Format {
            index: (DIMENSION - 1 - x) as u8,
        };
    }

    ModuleKind::Data
}

/// Coordinate with the timing row/column squeezed out.
fn skip_timing(v: i32) -> i32 {
    if v >= TIMING_OFFSET {
        v - 1
    } else {
        v
    }
}

/// Maps a data module to `(codeword, shift)`: the module carries bit
/// `(codewords[codeword] >> shift) & 1` of the data+ECC sequence.
///
/// Codewords are laid out in the standard zig-zag: column pairs from the right
/// edge inward, alternately upward and downward, right column before left.
/// Only meaningful where [`classify`] returns [`ModuleKind::Data`].
pub fn data_bit_position(x: i32, y: i32) -> (usize, u8) {
    let (xx, yy) = (skip_timing(x), skip_timing(y));
    let upward = (xx >> 1) & 1 == 1;
    let left = xx & 1 == 0;
    // Column pair counted from the right, 4-row band counted from the bottom.
    let pair = 9 - (xx >> 1);
    let band = 4 - (yy >> 2);

    let codeword = if pair < 4 {
        // Below the top-right finder: three codewords per pair.
        pair * 3 + if upward { band } else { 2 - band }
    } else if pair < 6 {
        // Full-height pairs: five codewords each.
        12 + (pair - 4) * 5 + if upward { band } else { 4 - band }
    } else {
        // Between the left finders: one codeword per pair.
        22 + pair - 6
    };
    let row_in_band = if upward { 3 ^ (yy & 3) } else { yy & 3 };
    let shift = (3 - row_in_band) * 2 + i32::from(!left);
    (codeword as usize, shift as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_positions() -> impl Iterator<Item = (i32, i32)> {
        (0..DIMENSION)
            .flat_map(|y| (0..DIMENSION).map(move |x| (x, y)))
            .filter(|&(x, y)| !classify(x, y).is_function())
    }

    #[test]
    fn test_data_module_count() {
        assert_eq!(data_positions().count(), 26 * 8);
    }

    #[test]
    fn test_finder_rings() {
        assert_eq!(classify(3, 3), ModuleKind::Finder { dark: true });
        assert_eq!(classify(1, 3), ModuleKind::Finder { dark: false });
        assert_eq!(classify(0, 0), ModuleKind::Finder { dark: true });
        assert_eq!(classify(7, 0), ModuleKind::Separator);
        assert_eq!(classify(13, 7), ModuleKind::Separator);
        assert_eq!(classify(17, 17), ModuleKind::Data);
        assert_eq!(classify(3, 17), ModuleKind::Finder { dark: true });
    }

    #[test]
    fn test_timing_and_dark_module() {
        assert_eq!(classify(8, 6), ModuleKind::Timing { dark: true });
        assert_eq!(classify(6, 9), ModuleKind::Timing { dark: false });
        assert_eq!(classify(8, 13), ModuleKind::DarkModule);
    }

    #[test]
    fn test_format_positions() {
        let mut seen = [0u8; 15];
        for y in 0..DIMENSION {
            for x in 0..DIMENSION {
                if let ModuleKind::Format { index } = classify(x, y) {
                    seen[usize::from(index)] += 1;
                }
            }
        }
        assert_eq!(seen, [2u8; 15]);
        assert_eq!(classify(8, 0), ModuleKind::Format { index: 0 });
        assert_eq!(classify(8, 7), ModuleKind::Format { index: 6 });
        assert_eq!(classify(8, 8), ModuleKind::Format { index: 7 });
        assert_eq!(classify(7, 8), ModuleKind::Format { index: 8 });
        assert_eq!(classify(0, 8), ModuleKind::Format { index: 14 });
        assert_eq!(classify(20, 8), ModuleKind::Format { index: 0 });
        assert_eq!(classify(13, 8), ModuleKind::Format { index: 7 });
        assert_eq!(classify(8, 14), ModuleKind::Format { index: 8 });
        assert_eq!(classify(8, 20), ModuleKind::Format { index: 14 });
    }

    #[test]
    fn test_bottom_right_starts_first_codeword() {
        assert_eq!(data_bit_position(20, 20), (0, 7));
        assert_eq!(data_bit_position(19, 20), (0, 6));
        assert_eq!(data_bit_position(20, 19), (0, 5));
        assert_eq!(data_bit_position(19, 17), (0, 0));
        assert_eq!(data_bit_position(20, 16), (1, 7));
    }

    #[test]
    fn test_matches_zigzag_walk() {
        let mut i: usize = 0;
        let mut right: i32 = DIMENSION - 1;
        while right >= 1 {
            if right == TIMING_OFFSET {
                right = TIMING_OFFSET - 1;
            }
            let upward = ((right + 1) & 2) == 0;
            for vert in 0..DIMENSION {
                let y = if upward { DIMENSION - 1 - vert } else { vert };
                for j in 0..2 {
                    let x = right - j;
                    if classify(x, y) == ModuleKind::Data {
                        assert_eq!(
                            data_bit_position(x, y),
                            (i >> 3, 7 - (i & 7) as u8),
                            "module ({x}, {y})"
                        );
                        i += 1;
                    }
                }
            }
            right -= 2;
        }
        assert_eq!(i, 26 * 8);
    }
}
