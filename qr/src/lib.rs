//! # QR Code Symbol Generator
//!
//! A QR code generator implementing **ISO/IEC 18004**, written to be
//! readable and reviewable end to end.
//!
//! ## Library Organization
//!
//! ```text
//! lib.rs      Public API: EcLevel, QrCode::encode()
//! +-- encode  Message construction (Section 7, 8)
//! |   +-- select_mode()            Numeric / alphanumeric / byte
//! |   +-- select_version()         Smallest version that fits
//! |   +-- assemble()               Header + data + terminator + padding
//! |   +-- interleave()             Per-block RS codewords, column-major
//! +-- poly    Reed-Solomon primitives (Section 8)
//! |   +-- generator()              (x - a^0)(x - a^1)...(x - a^(n-1))
//! |   +-- rs_remainder()           Polynomial division in GF(2^8)
//! +-- gf256   Galois field arithmetic (log/antilog tables)
//! +-- bits    BitBuffer: packed bits, big-endian
//! +-- tables  Version/level constants (capacities, blocks, alignment)
//! +-- matrix  Module grid (Section 6, 9, 10, Annex C/D)
//! |   +-- stamp_function_patterns  Finders, timing, alignment, reserves
//! |   +-- place_codewords          Zig-zag data placement
//! |   +-- apply_best_mask          Eight masks, four penalty rules
//! |   +-- place_format_info        BCH(15,5) level + mask word
//! |   +-- place_version_info       BCH(18,6) version word (v7+)
//! +-- render  PixelSink boundary, SVG / ASCII / PNG output
//! ```
//!
//! ## Pipeline
//!
//! A generation call runs, in order: mode selection, version selection,
//! segment encoding, message assembly, Reed-Solomon coding and
//! interleaving, matrix stamping, zig-zag placement, masking and
//! format/version information. Every stage is a pure function of its
//! inputs; the tables are shared process-wide constants, so any number
//! of generations may run concurrently.
//!
//! ## Example
//!
//! ```
//! use qr::{EcLevel, QrCode};
//!
//! let code = QrCode::encode("HELLO WORLD", EcLevel::Q).unwrap();
//! assert_eq!(code.version(), 1);
//! let svg = code.to_svg(10); // 10 pixels per module
//! # assert!(svg.starts_with("<svg"));
//! ```

mod bits;
mod encode;
mod error;
mod gf256;
mod matrix;
mod poly;
mod render;
mod tables;

pub use bits::BitBuffer;
pub use encode::{select_mode, select_version, Mode};
pub use error::QrError;
pub use matrix::{Matrix, Module};
pub use poly::Poly;
pub use render::PixelSink;

/// QR error correction levels.
///
/// Higher levels survive more damage at the cost of capacity. The
/// percentages are the approximate share of codewords that can be
/// recovered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EcLevel {
    /// Low: ~7% recovery.
    L = 0,
    /// Medium: ~15% recovery.
    M = 1,
    /// Quartile: ~25% recovery.
    Q = 2,
    /// High: ~30% recovery.
    H = 3,
}

impl EcLevel {
    /// The two format information bits for this level, per ISO 18004
    /// Table C.1. Note the order differs from the enum order:
    /// L = 01, M = 00, Q = 11, H = 10.
    pub(crate) fn format_indicator(self) -> u32 {
        match self {
            EcLevel::L => 0b01,
            EcLevel::M => 0b00,
            EcLevel::Q => 0b11,
            EcLevel::H => 0b10,
        }
    }
}

/// A finished QR code symbol.
#[derive(Clone, Debug)]
pub struct QrCode {
    matrix: Matrix,
    version: usize,
    level: EcLevel,
    mode: Mode,
    mask: u8,
}

impl QrCode {
    /// Generate a symbol for `input` at the requested error correction
    /// level. The densest mode and the smallest fitting version are
    /// chosen automatically.
    pub fn encode(input: &str, level: EcLevel) -> Result<Self, QrError> {
        let mode = encode::select_mode(input);
        let count = encode::char_count(input, mode);
        let version = encode::select_version(count, level, mode)?;

        let data = encode::assemble(input, mode, version, level)?;
        let stream = encode::build_codeword_stream(&data, version, level);

        let mut matrix = Matrix::new(version);
        matrix.stamp_function_patterns(version);
        matrix.place_codewords(&stream);

        let mask = matrix.apply_best_mask();
        matrix.place_format_info(level, mask);
        if version >= 7 {
            matrix.place_version_info(version);
        }

        Ok(Self {
            matrix,
            version,
            level,
            mode,
            mask,
        })
    }

    /// The symbol version, 1 to 40.
    pub fn version(&self) -> usize {
        self.version
    }

    /// Side length in modules: 21 + 4 * (version - 1).
    pub fn side(&self) -> usize {
        self.matrix.side()
    }

    pub fn level(&self) -> EcLevel {
        self.level
    }

    /// The encoding mode the input selected.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The mask pattern id chosen by penalty scoring, 0 to 7.
    pub fn mask(&self) -> u8 {
        self.mask
    }

    /// The module at column `x`, row `y`: `Module::Dark` or
    /// `Module::Light`.
    pub fn module(&self, x: usize, y: usize) -> Module {
        self.matrix.module(x, y)
    }

    /// The underlying matrix.
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hello_world_is_version_1() {
        let code = QrCode::encode("HELLO WORLD", EcLevel::Q).unwrap();
        assert_eq!(code.version(), 1);
        assert_eq!(code.side(), 21);
        assert_eq!(code.mode(), Mode::Alphanumeric);
        assert!(code.mask() < 8);
    }

    #[test]
    fn version_grows_with_payload() {
        let code = QrCode::encode(&"x".repeat(100), EcLevel::L).unwrap();
        assert_eq!(code.version(), 5);
        assert_eq!(code.side(), 37);

        let code = QrCode::encode(&"7".repeat(700), EcLevel::L).unwrap();
        assert_eq!(code.mode(), Mode::Numeric);
        assert_eq!(code.version(), 11);
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let input = "x".repeat(3000);
        assert_eq!(
            QrCode::encode(&input, EcLevel::L).unwrap_err(),
            QrError::PayloadTooLarge { length: 3000 }
        );
    }

    /// After generation every cell must be committed: the drawing view
    /// agrees with the raw matrix on all modules.
    #[test]
    fn finished_symbol_has_no_loose_cells() {
        for input in ["1", "HELLO WORLD", "hello, world", "q"] {
            let code = QrCode::encode(input, EcLevel::M).unwrap();
            let n = code.side();
            for y in 0..n {
                for x in 0..n {
                    let cell = code.matrix().get(x, y);
                    assert!(
                        cell == Module::Dark || cell == Module::Light,
                        "loose cell at ({}, {}) for {:?}",
                        x,
                        y,
                        input
                    );
                }
            }
        }
    }

    /// Function patterns survive masking and information placement.
    #[test]
    fn function_patterns_are_intact_after_encoding() {
        let code = QrCode::encode("FUNCTION PATTERNS", EcLevel::H).unwrap();
        let n = code.side();

        for (x, y) in [(0, 0), (n - 1, 0), (0, n - 1), (3, 3)] {
            assert_eq!(code.module(x, y), Module::Dark);
        }
        assert_eq!(code.module(1, 1), Module::Light);
        assert_eq!(code.module(7, 7), Module::Light);
        assert_eq!(code.module(8, n - 8), Module::Dark);
        for i in (8..n - 8).step_by(2) {
            assert_eq!(code.module(i, 6), Module::Dark);
            assert_eq!(code.module(6, i), Module::Dark);
        }
    }

    #[test]
    fn version_7_carries_version_information() {
        // 150 bytes at L land in version 7 (capacity 134 at v6, 154 at v7).
        let code = QrCode::encode(&"v".repeat(150), EcLevel::L).unwrap();
        assert_eq!(code.version(), 7);

        // The 18-bit word for version 7, bit 0 in the top-left corner
        // of the bottom-left block.
        let n = code.side();
        let word = 0b000111110010010100u32;
        for i in 0..18 {
            let expected = if word >> i & 1 == 1 {
                Module::Dark
            } else {
                Module::Light
            };
            assert_eq!(code.module(i / 3, n - 11 + i % 3), expected, "bit {}", i);
            assert_eq!(code.module(n - 11 + i % 3, i / 3), expected, "bit {}", i);
        }
    }

    /// Both format information copies must decode back to the written
    /// level and mask.
    #[test]
    fn format_information_is_consistent() {
        for level in [EcLevel::L, EcLevel::M, EcLevel::Q, EcLevel::H] {
            let code = QrCode::encode("FORMAT INFO", level).unwrap();
            let n = code.side();

            // Read copy 2: bits 0..7 along row 8 from the right edge,
            // bits 8..14 down column 8 towards the bottom edge.
            let mut word = 0u32;
            for i in 0..8 {
                if code.module(n - 1 - i, 8) == Module::Dark {
                    word |= 1 << i;
                }
            }
            for i in 8..15 {
                if code.module(8, n - 15 + i) == Module::Dark {
                    word |= 1 << i;
                }
            }

            // Copy 1 around the top-left finder must agree.
            let mut copy1 = 0u32;
            for i in 0..6 {
                if code.module(8, i) == Module::Dark {
                    copy1 |= 1 << i;
                }
            }
            if code.module(8, 7) == Module::Dark {
                copy1 |= 1 << 6;
            }
            if code.module(8, 8) == Module::Dark {
                copy1 |= 1 << 7;
            }
            if code.module(7, 8) == Module::Dark {
                copy1 |= 1 << 8;
            }
            for i in 9..15 {
                if code.module(14 - i, 8) == Module::Dark {
                    copy1 |= 1 << i;
                }
            }
            assert_eq!(copy1, word, "{:?}", level);

            let data = (word ^ 0b101010000010010) >> 10;
            assert_eq!(data >> 3, level.format_indicator(), "{:?}", level);
            assert_eq!((data & 0b111) as u8, code.mask(), "{:?}", level);
        }
    }
}
