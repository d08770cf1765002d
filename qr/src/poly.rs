//! Polynomials over GF(2^8) and the Reed-Solomon primitives built on
//! them: generator construction and message reduction.
//!
//! Coefficients are stored highest degree first, so `coeffs[0]` is the
//! leading term. A degree-d polynomial holds d + 1 coefficients.

use crate::gf256;

/// A polynomial with coefficients in GF(2^8), highest degree first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poly {
    coeffs: Vec<u8>,
}

impl Poly {
    /// Build from coefficient byte values, highest degree first.
    pub fn from_coeffs(coeffs: Vec<u8>) -> Self {
        debug_assert!(!coeffs.is_empty());
        Self { coeffs }
    }

    /// Build from alpha exponents, highest degree first. Each exponent
    /// e becomes the coefficient alpha^e at that position.
    pub fn from_exponents(exponents: &[u8]) -> Self {
        Self {
            coeffs: exponents.iter().map(|&e| gf256::exp(e)).collect(),
        }
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    pub fn coeffs(&self) -> &[u8] {
        &self.coeffs
    }

    /// Polynomial product. Every coefficient pair contributes to the
    /// term whose degree is the sum of the pair's degrees; contributions
    /// at the same degree combine with the field addition (XOR).
    pub fn mul(&self, other: &Poly) -> Poly {
        let mut out = vec![0u8; self.coeffs.len() + other.coeffs.len() - 1];
        for (i, &a) in self.coeffs.iter().enumerate() {
            for (j, &b) in other.coeffs.iter().enumerate() {
                out[i + j] = gf256::add(out[i + j], gf256::mul(a, b));
            }
        }
        Poly::from_coeffs(out)
    }

    /// Polynomial sum: align by degree (pad the shorter with leading
    /// zeros) and XOR corresponding coefficients.
    pub fn add(&self, other: &Poly) -> Poly {
        let (longer, shorter) = if self.coeffs.len() >= other.coeffs.len() {
            (&self.coeffs, &other.coeffs)
        } else {
            (&other.coeffs, &self.coeffs)
        };
        let shift = longer.len() - shorter.len();
        let mut out = longer.clone();
        for (i, &c) in shorter.iter().enumerate() {
            out[shift + i] = gf256::add(out[shift + i], c);
        }
        Poly::from_coeffs(out)
    }
}

/// The Reed-Solomon generator polynomial for `degree` error correction
/// codewords: the product (x - alpha^0)(x - alpha^1)...(x - alpha^(degree-1)).
/// Subtraction equals addition in GF(2^8), so each factor is simply
/// {1, alpha^i} in coefficient form.
pub fn generator(degree: usize) -> Poly {
    debug_assert!(degree >= 1);
    let mut g = Poly::from_coeffs(vec![1]);
    for i in 0..degree {
        g = g.mul(&Poly::from_coeffs(vec![1, gf256::exp(i as u8)]));
    }
    g
}

/// Reduce `data * x^degree` modulo the generator and return the
/// remainder: the error correction codewords for one block, highest
/// degree first.
///
/// Each step cancels the current leading term, which is polynomial long
/// division carried out over just the remainder window.
pub fn rs_remainder(data: &[u8], generator: &Poly) -> Vec<u8> {
    let degree = generator.degree();
    let mut remainder = vec![0u8; degree];

    for &byte in data {
        let factor = byte ^ remainder[0];
        remainder.rotate_left(1);
        remainder[degree - 1] = 0;

        for (r, &g) in remainder.iter_mut().zip(&generator.coeffs()[1..]) {
            *r ^= gf256::mul(g, factor);
        }
    }

    remainder
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Published generator polynomials, as alpha exponent lists
    /// (ISO 18004 Annex A).
    #[test]
    fn generator_vectors() {
        let cases: [(usize, &[u8]); 4] = [
            (2, &[0, 25, 1]),
            (6, &[0, 166, 0, 134, 5, 176, 15]),
            (7, &[0, 87, 229, 146, 149, 238, 102, 21]),
            (
                15,
                &[0, 8, 183, 61, 91, 202, 37, 51, 58, 58, 237, 140, 124, 5, 99, 105],
            ),
        ];
        for (degree, exponents) in cases {
            assert_eq!(
                generator(degree),
                Poly::from_exponents(exponents),
                "generator mismatch for degree {}",
                degree
            );
        }
    }

    #[test]
    fn generator_has_requested_degree() {
        for degree in 1..=30 {
            assert_eq!(generator(degree).degree(), degree);
        }
    }

    #[test]
    fn mul_matches_hand_expansion() {
        // (x + 1)(x + 2) = x^2 + 3x + 2 over GF(2^8)
        let a = Poly::from_coeffs(vec![1, 1]);
        let b = Poly::from_coeffs(vec![1, 2]);
        assert_eq!(a.mul(&b), Poly::from_coeffs(vec![1, 3, 2]));
    }

    #[test]
    fn add_aligns_by_degree() {
        let a = Poly::from_coeffs(vec![5, 0, 7]);
        let b = Poly::from_coeffs(vec![3]);
        assert_eq!(a.add(&b), Poly::from_coeffs(vec![5, 0, 4]));
        assert_eq!(b.add(&a), Poly::from_coeffs(vec![5, 0, 4]));
        assert_eq!(a.add(&a), Poly::from_coeffs(vec![0, 0, 0]));
    }

    /// Block-level remainders checked against a reference encoder.
    #[test]
    fn remainder_vectors() {
        let block = [
            0x40, 0x56, 0x86, 0x56, 0xC6, 0xC6, 0xF0, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC,
            0x11, 0xEC, 0x11, 0xEC, 0x11,
        ];
        assert_eq!(
            rs_remainder(&block, &generator(7)),
            [0x25, 0x19, 0xD0, 0xD2, 0x68, 0x59, 0x39]
        );

        let block = [
            0x10, 0x0C, 0x7B, 0x00, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11,
            0xEC, 0x11,
        ];
        assert_eq!(
            rs_remainder(&block, &generator(10)),
            [0x1C, 0x53, 0xB9, 0x9F, 0x2B, 0xD5, 0xE3, 0x6D, 0x0E, 0x70]
        );

        let block = [
            0xE4, 0xC6, 0xF7, 0x26, 0x56, 0xD2, 0x06, 0x97, 0x07, 0x37, 0x56, 0xD2, 0x07, 0x36,
        ];
        assert_eq!(
            rs_remainder(&block, &generator(26)),
            [
                0x9E, 0xC9, 0x68, 0xF7, 0xDA, 0xA8, 0x31, 0x8D, 0x81, 0x0B, 0x81, 0x89, 0x14,
                0x9C, 0xED, 0x69, 0xF3, 0xC8, 0xA8, 0x47, 0x9F, 0x8B, 0x84, 0xE1, 0x05, 0x4B,
            ]
        );
    }
}
