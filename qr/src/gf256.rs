//! GF(2^8) arithmetic for Reed-Solomon encoding.
//!
//! The field has 256 elements represented as polynomials over GF(2)
//! modulo the irreducible polynomial x^8 + x^4 + x^3 + x^2 + 1 (0x11D),
//! with alpha = 2 as the primitive element. This is the field fixed by
//! ISO/IEC 18004 Section 8.
//!
//! - **Addition**: XOR (polynomial addition mod 2, no carries)
//! - **Multiplication**: via log/antilog tables:
//!   `a * b = exp((log(a) + log(b)) mod 255)`
//!
//! Both tables are computed at compile time and shared process-wide.

/// Antilog table: `EXP[i]` is alpha^i. `EXP[255]` wraps back to 1 so
/// that reduced exponent sums index directly.
pub(crate) const EXP: [u8; 256] = generate_exp_table();

/// Log table: `LOG[v]` is the unique i with alpha^i = v, for v in
/// 1..=255. `LOG[0]` is meaningless and must never be consulted.
pub(crate) const LOG: [u8; 256] = generate_log_table();

const fn generate_exp_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut x = 1u16;

    let mut i = 0;
    while i < 255 {
        table[i] = x as u8;
        x <<= 1;
        if x >= 256 {
            x ^= 0x11D;
        }
        i += 1;
    }

    table[255] = table[0];
    table
}

const fn generate_log_table() -> [u8; 256] {
    let exp = generate_exp_table();
    let mut table = [0u8; 256];

    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }

    table
}

/// Field addition. Subtraction is identical.
#[inline]
pub(crate) fn add(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Field multiplication.
pub(crate) fn mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        0
    } else {
        let sum = (LOG[a as usize] as u16 + LOG[b as usize] as u16) % 255;
        EXP[sum as usize]
    }
}

/// alpha^n.
#[inline]
pub(crate) fn exp(n: u8) -> u8 {
    EXP[n as usize]
}
