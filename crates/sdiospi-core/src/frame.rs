//! Command frame synchronization
//!
//! An SDIO command on SPI is 7 bytes on the outbound line:
//!
//! ```text
//! FF | 01cc_cccc | arg[31:24] arg[23:16] arg[15:8] arg[7:0] | crc7+1
//! ```
//!
//! Captures do not always start exactly at the lead-in: the host may clock
//! a byte or two of padding after asserting chip select. The synchronizer
//! tries the first [`SYNC_OFFSETS`] positions and takes the first one where
//! the lead-in is followed by a byte with the command start bits set.

use crate::error::{DecodeError, Result};
use crate::sdio::{CMD_MARKER, FRAME_LEN, LEAD_IN, SYNC_OFFSETS};

/// Find the offset of the command lead-in in `mosi`
///
/// Only offsets with a complete frame after them are candidates.
pub fn find_command_start(mosi: &[u8]) -> Option<usize> {
    (0..SYNC_OFFSETS)
        .take_while(|&offset| mosi.len() >= offset + FRAME_LEN)
        .find(|&offset| mosi[offset] == LEAD_IN && mosi[offset + 1] & CMD_MARKER != 0)
}

/// A command located in the outbound byte stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandFrame {
    /// Offset of the lead-in byte
    pub offset: usize,
    /// Command byte (`CMD_MARKER | index`)
    pub command: u8,
    /// Big-endian argument word
    pub argument: u32,
    /// Trailing CRC byte, if captured
    pub checksum: Option<u8>,
}

impl CommandFrame {
    /// Synchronize on `mosi` and extract the command
    pub fn locate(mosi: &[u8]) -> Result<Self> {
        let offset = find_command_start(mosi).ok_or(DecodeError::SyncFailed)?;
        Self::parse_at(mosi, offset)
    }

    /// Extract the command whose lead-in is at `offset`
    pub fn parse_at(mosi: &[u8], offset: usize) -> Result<Self> {
        let header = mosi
            .get(offset + 1..offset + 6)
            .ok_or(DecodeError::BufferUnderrun {
                needed: offset + 6,
                available: mosi.len(),
            })?;
        let argument = u32::from_be_bytes([header[1], header[2], header[3], header[4]]);
        Ok(Self {
            offset,
            command: header[0],
            argument,
            checksum: mosi.get(offset + 6).copied(),
        })
    }

    /// Command index (0-63)
    pub fn index(&self) -> u8 {
        self.command & 0x3F
    }

    /// Command byte followed by the argument bytes, as captured
    pub fn raw_bytes(&self) -> [u8; 5] {
        let [a, b, c, d] = self.argument.to_be_bytes();
        [self.command, a, b, c, d]
    }

    /// Offset on the inbound line of the first byte after the frame
    pub fn response_start(&self) -> usize {
        self.offset + FRAME_LEN
    }
}
