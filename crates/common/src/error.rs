//! Decode errors for Brook instruction streams.

use thiserror::Error;

/// Errors that occur when reconstructing instruction-set types from raw
/// numeric form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Byte does not name an opcode (valid range is 0..=26).
    #[error("invalid opcode: {0}")]
    InvalidOpcode(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_opcode() {
        assert_eq!(DecodeError::InvalidOpcode(99).to_string(), "invalid opcode: 99");
    }
}
