//! Error taxonomy of the codec core.

use thiserror::Error;

/// Errors returned by QR code generation.
///
/// Everything else that can go wrong inside the pipeline is an internal
/// invariant violation and panics with a diagnostic instead of being
/// surfaced here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QrError {
    /// The input does not fit in a version 40 symbol at the requested
    /// error correction level.
    #[error("input of {length} characters exceeds version 40 capacity at this level")]
    PayloadTooLarge { length: usize },

    /// A code point cannot be represented in the selected encoding
    /// mode. Unreachable when the mode was chosen by `select_mode`.
    #[error("character {ch:?} cannot be encoded in the selected mode")]
    InvalidCharacter { ch: char },
}
