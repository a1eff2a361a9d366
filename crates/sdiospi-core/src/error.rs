//! Error types for sdiospi-core
//!
//! None of these errors ever stop a decoding session. They describe why a
//! single chip-select window could not be classified and are carried inside
//! [`TransactionKind::Unrecognized`](crate::TransactionKind::Unrecognized).

use core::fmt;

/// Reason a window could not be decoded into an SDIO transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// No lead-in byte followed by a command byte within the first 3 offsets
    SyncFailed,
    /// Lead-in found but the command code is neither CMD52 nor CMD53
    UnknownCommand(u8),
    /// A field lies past the end of the captured buffer
    BufferUnderrun {
        /// Number of bytes the field extraction required
        needed: usize,
        /// Number of bytes actually captured
        available: usize,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SyncFailed => write!(f, "no command lead-in found"),
            Self::UnknownCommand(cmd) => write!(f, "unknown command code 0x{:02X}", cmd),
            Self::BufferUnderrun { needed, available } => write!(
                f,
                "buffer underrun: needed {} bytes, only {} captured",
                needed, available
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

/// Result type alias using [`DecodeError`]
pub type Result<T> = core::result::Result<T, DecodeError>;
