//! Reed-Solomon error correction over GF(2^8/0x11D).

/// Largest generator degree needed by a 21x21 symbol (level High).
pub const MAX_DEGREE: usize = 17;

/// Returns the product of `x` and `y` in GF(2^8/0x11D).
pub const fn gf_multiply(x: u8, y: u8) -> u8 {
    let mut z: u8 = 0;
    let mut i = 8;
    while i > 0 {
        i -= 1;
        z = (z << 1) ^ ((z >> 7) * 0x1d);
        z ^= ((y >> i) & 1) * x;
    }
    z
}

/// The generator polynomial of a given degree, i.e. the product of
/// `(x - 2^i)` for `i` in `0..degree`, leading coefficient omitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReedSolomonGenerator {
    divisor: [u8; MAX_DEGREE],
    degree: usize,
}

impl ReedSolomonGenerator {
    /// Builds the generator at compile time or run time.
    ///
    /// # Panics
    ///
    /// Panics if `degree` is zero or above [`MAX_DEGREE`].
    pub const fn new(degree: usize) -> Self {
        assert!(degree >= 1 && degree <= MAX_DEGREE, "Degree out of range");
        let mut divisor = [0u8; MAX_DEGREE];
        divisor[degree - 1] = 1;
        let mut root: u8 = 1;
        let mut i = 0;
        while i < degree {
            let mut j = 0;
            while j < degree {
                divisor[j] = gf_multiply(divisor[j], root);
                if j + 1 < degree {
                    divisor[j] ^= divisor[j + 1];
                }
                j += 1;
            }
            root = gf_multiply(root, 0x02);
            i += 1;
        }
        Self { divisor, degree }
    }

    /// Number of error-correction codewords this generator produces.
    pub const fn degree(&self) -> usize {
        self.degree
    }

    /// Coefficients from highest to lowest power, leading 1 omitted.
    pub fn divisor(&self) -> &[u8] {
        &self.divisor[..self.degree]
    }

    /// Divides `data` by the generator and stores the remainder, which is the
    /// error-correction codewords, in `result`.
    pub fn compute_remainder(&self, data: &[u8], result: &mut [u8]) {
        assert_eq!(result.len(), self.degree);
        result.fill(0);
        for b in data {
            let factor: u8 = b ^ result[0];
            result.copy_within(1.., 0);
            result[self.degree - 1] = 0;
            for (x, &y) in result.iter_mut().zip(self.divisor()) {
                *x ^= gf_multiply(y, factor);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiply() {
        assert_eq!(gf_multiply(0, 0x53), 0);
        assert_eq!(gf_multiply(1, 0x53), 0x53);
        assert_eq!(gf_multiply(0x02, 0x80), 0x1d);
        assert_eq!(gf_multiply(0x53, 0xca), gf_multiply(0xca, 0x53));
    }

    #[test]
    fn test_every_nonzero_element_has_an_inverse() {
        for x in 1..=255u8 {
            assert!((1..=255u8).any(|y| gf_multiply(x, y) == 1), "no inverse for {x:#04x}");
        }
    }

    #[test]
    fn test_generator_tables() {
        assert_eq!(
            ReedSolomonGenerator::new(7).divisor(),
            [0x7f, 0x7a, 0x9a, 0xa4, 0x0b, 0x44, 0x75]
        );
        assert_eq!(
            ReedSolomonGenerator::new(10).divisor(),
            [0xd8, 0xc2, 0x9f, 0x6f, 0xc7, 0x5e, 0x5f, 0x71, 0x9d, 0xc1]
        );
        assert_eq!(
            ReedSolomonGenerator::new(13).divisor(),
            [0x89, 0x49, 0xe3, 0x11, 0xb1, 0x11, 0x34, 0x0d, 0x2e, 0x2b, 0x53, 0x84, 0x78]
        );
        assert_eq!(
            ReedSolomonGenerator::new(17).divisor(),
            [
                0x77, 0x42, 0x53, 0x78, 0x77, 0x16, 0xc5, 0x53, 0xf9, 0x29, 0x8f, 0x86, 0x55,
                0x35, 0x7d, 0x63, 0x4f,
            ]
        );
    }

    #[test]
    fn test_remainder_hello_world_quartile() {
        let data = [32, 91, 11, 120, 209, 114, 220, 77, 67, 64, 236, 17, 236];
        let mut ecc = [0u8; 13];
        ReedSolomonGenerator::new(13).compute_remainder(&data, &mut ecc);
        assert_eq!(ecc, [168, 72, 22, 82, 217, 54, 156, 0, 46, 15, 180, 122, 16]);
    }

    #[test]
    fn test_remainder_of_zero_data_is_zero() {
        let mut ecc = [0xffu8; 7];
        ReedSolomonGenerator::new(7).compute_remainder(&[0u8; 19], &mut ecc);
        assert_eq!(ecc, [0u8; 7]);
    }

    #[test]
    #[should_panic(expected = "Degree out of range")]
    fn test_degree_out_of_range() {
        ReedSolomonGenerator::new(MAX_DEGREE + 1);
    }
}
