//! Message construction: mode and version selection, segment encoding,
//! header/terminator/padding assembly, per-block Reed-Solomon error
//! correction and codeword interleaving (ISO 18004 Sections 7 and 8).
//!
//! The stages are plain functions over their inputs so each can be
//! tested against the reference vectors on its own.

use crate::bits::BitBuffer;
use crate::error::QrError;
use crate::poly;
use crate::tables;
use crate::EcLevel;

/// QR encoding modes. Kanji is not supported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Digits 0-9, packed three per 10 bits.
    Numeric = 0,
    /// The 45-character alphabet `0..9 A..Z SPACE $ % * + - . / :`,
    /// packed two per 11 bits.
    Alphanumeric = 1,
    /// Raw bytes, 8 bits each. Input text passes through as UTF-8.
    Byte = 2,
}

impl Mode {
    /// The 4-bit mode indicator that opens the bitstream.
    fn indicator(self) -> u32 {
        match self {
            Mode::Numeric => 0b0001,
            Mode::Alphanumeric => 0b0010,
            Mode::Byte => 0b0100,
        }
    }
}

fn is_alphanumeric_extra(c: char) -> bool {
    matches!(c, ' ' | '$' | '%' | '*' | '+' | '-' | '.' | '/' | ':')
}

/// Pick the densest mode that can represent every code point of the
/// input: numeric when all digits, alphanumeric when all digits,
/// uppercase letters or the nine special characters, byte otherwise.
/// Empty input encodes as an empty byte segment.
pub fn select_mode(input: &str) -> Mode {
    if input.is_empty() {
        return Mode::Byte;
    }

    let mut digits = 0usize;
    let mut alnum = 0usize;
    let mut other = 0usize;
    for c in input.chars() {
        if c.is_ascii_digit() {
            digits += 1;
        } else if c.is_ascii_uppercase() || is_alphanumeric_extra(c) {
            alnum += 1;
        } else {
            other += 1;
        }
    }

    if other > 0 {
        Mode::Byte
    } else if alnum == 0 {
        debug_assert_eq!(digits, input.chars().count());
        Mode::Numeric
    } else {
        Mode::Alphanumeric
    }
}

/// The character count carried by the count indicator: code points for
/// the text modes, UTF-8 bytes for byte mode.
pub(crate) fn char_count(input: &str, mode: Mode) -> usize {
    match mode {
        Mode::Byte => input.len(),
        _ => input.chars().count(),
    }
}

/// The smallest version whose capacity exceeds `count` characters at
/// this level and mode.
pub fn select_version(count: usize, level: EcLevel, mode: Mode) -> Result<usize, QrError> {
    for version in 1..=40usize {
        let capacity = tables::CHARACTER_CAPACITIES[version - 1][level as usize][mode as usize];
        if count < capacity as usize {
            return Ok(version);
        }
    }
    Err(QrError::PayloadTooLarge { length: count })
}

fn indicator_width(version: usize, mode: Mode) -> usize {
    let range = match version {
        1..=9 => 0,
        10..=26 => 1,
        _ => 2,
    };
    tables::INDICATOR_WIDTHS[range][mode as usize] as usize
}

/// Numeric segment: groups of three digits emit 10 bits, a trailing
/// two-digit group 7 bits, a single digit 4 bits.
pub(crate) fn encode_numeric(input: &str) -> Result<BitBuffer, QrError> {
    let mut bits = BitBuffer::new();
    for group in input.as_bytes().chunks(3) {
        let mut value = 0u32;
        for &d in group {
            if !d.is_ascii_digit() {
                return Err(QrError::InvalidCharacter { ch: d as char });
            }
            value = value * 10 + (d - b'0') as u32;
        }
        bits.append_bits(value, 1 + 3 * group.len());
    }
    Ok(bits)
}

/// Alphanumeric segment: pairs emit 11 bits of `45 * V(c1) + V(c2)`,
/// a trailing singleton 6 bits.
pub(crate) fn encode_alphanumeric(input: &str) -> Result<BitBuffer, QrError> {
    let value_of = |b: u8| {
        tables::alphanumeric_value(b as char).ok_or(QrError::InvalidCharacter { ch: b as char })
    };

    let mut bits = BitBuffer::new();
    for pair in input.as_bytes().chunks(2) {
        let first = value_of(pair[0])? as u32;
        if let Some(&second) = pair.get(1) {
            bits.append_bits(45 * first + value_of(second)? as u32, 11);
        } else {
            bits.append_bits(first, 6);
        }
    }
    Ok(bits)
}

/// Byte segment: the input's UTF-8 bytes, 8 bits each, MSB first.
pub(crate) fn encode_byte(input: &str) -> BitBuffer {
    let mut bits = BitBuffer::new();
    for &b in input.as_bytes() {
        bits.append_bits(b as u32, 8);
    }
    bits
}

/// Assemble the data codewords: mode indicator, character count
/// indicator, segment bits, up to four terminator bits, zero padding to
/// a byte boundary, then alternating 0xEC/0x11 pad codewords up to the
/// version's data capacity.
pub(crate) fn assemble(
    input: &str,
    mode: Mode,
    version: usize,
    level: EcLevel,
) -> Result<Vec<u8>, QrError> {
    let info = tables::block_info(version, level);
    let capacity_bits = info.total_data * 8;

    let mut bits = BitBuffer::new();
    bits.append_bits(mode.indicator(), 4);
    bits.append_bits(char_count(input, mode) as u32, indicator_width(version, mode));

    let segment = match mode {
        Mode::Numeric => encode_numeric(input)?,
        Mode::Alphanumeric => encode_alphanumeric(input)?,
        Mode::Byte => encode_byte(input),
    };
    bits.extend(&segment);

    let terminator = std::cmp::min(4, capacity_bits.saturating_sub(bits.len()));
    bits.append_bits(0, terminator);
    while bits.len() % 8 != 0 {
        bits.push(false);
    }

    let mut codewords = bits.to_bytes();
    let mut pad = true;
    while codewords.len() < info.total_data {
        codewords.push(if pad { 0xEC } else { 0x11 });
        pad = !pad;
    }
    debug_assert_eq!(codewords.len(), info.total_data);

    Ok(codewords)
}

/// Split the data codewords into blocks, compute each block's error
/// correction codewords and interleave both streams column-major:
/// byte i of every block in order, group 1 before group 2.
pub(crate) fn interleave(data: &[u8], version: usize, level: EcLevel) -> Vec<u8> {
    let info = tables::block_info(version, level);
    debug_assert_eq!(data.len(), info.total_data);

    let mut blocks: Vec<&[u8]> = Vec::with_capacity(info.block_count());
    let mut offset = 0;
    for _ in 0..info.group1_blocks {
        blocks.push(&data[offset..offset + info.group1_size]);
        offset += info.group1_size;
    }
    for _ in 0..info.group2_blocks {
        blocks.push(&data[offset..offset + info.group2_size]);
        offset += info.group2_size;
    }

    let generator = poly::generator(info.ec_per_block);
    let ec_blocks: Vec<Vec<u8>> = blocks
        .iter()
        .map(|block| poly::rs_remainder(block, &generator))
        .collect();

    let mut out = Vec::with_capacity(info.total_codewords());
    if blocks.len() == 1 {
        // A single block needs no interleaving.
        out.extend_from_slice(blocks[0]);
        out.extend_from_slice(&ec_blocks[0]);
        return out;
    }

    let longest = info.group1_size.max(info.group2_size);
    for i in 0..longest {
        for block in &blocks {
            if let Some(&byte) = block.get(i) {
                out.push(byte);
            }
        }
    }
    for i in 0..info.ec_per_block {
        for ec in &ec_blocks {
            out.push(ec[i]);
        }
    }
    out
}

/// The final codeword bitstream painted into the matrix: interleaved
/// data and error correction codewords followed by the version's
/// remainder bits.
pub(crate) fn build_codeword_stream(data: &[u8], version: usize, level: EcLevel) -> BitBuffer {
    let interleaved = interleave(data, version, level);

    let mut stream = BitBuffer::new();
    for &byte in &interleaved {
        stream.append_bits(byte as u32, 8);
    }
    stream.append_bits(0, tables::remainder_bits(version));

    debug_assert_eq!(
        stream.len(),
        8 * tables::block_info(version, level).total_codewords() + tables::remainder_bits(version)
    );
    stream
}
