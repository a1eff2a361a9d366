//! Response payload location
//!
//! After a command the device keeps the inbound line idle (`0xFF`) for a
//! variable number of bytes, sends a one-byte R1-style acknowledgement and,
//! for a successful read, another idle gap followed by the `0xFE` start
//! token and the data. The number of turnaround bytes depends on the host
//! clock and device state, so both gaps are scanned rather than assumed.

use heapless::Vec;

use crate::sdio::{
    ACK_OK, ACK_SCAN_LIMIT, DATA_START_TOKEN, IDLE_FILLER, PAYLOAD_LEN, TOKEN_SCAN_LIMIT,
};

/// Response data found on the inbound line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsePayload {
    /// Offset of the first payload byte in the inbound buffer
    pub offset: usize,
    /// True if the payload followed a data start token
    pub token_found: bool,
    bytes: Vec<u8, PAYLOAD_LEN>,
}

impl ResponsePayload {
    /// Payload bytes (1 to 4)
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Interpret a full 4-byte payload as a little-endian register value
    ///
    /// Returns `None` if the capture ended before 4 bytes were seen.
    pub fn value_le(&self) -> Option<u32> {
        let bytes: [u8; PAYLOAD_LEN] = self.bytes.as_slice().try_into().ok()?;
        Some(u32::from_le_bytes(bytes))
    }
}

/// Find the acknowledgement byte at or after `start`
fn find_ack(miso: &[u8], start: usize) -> Option<usize> {
    let end = miso.len().min(start.saturating_add(ACK_SCAN_LIMIT));
    (start..end).find(|&i| miso[i] != IDLE_FILLER)
}

/// Find the data start token after the acknowledgement at `ack`
fn find_token(miso: &[u8], ack: usize) -> Option<usize> {
    let end = miso.len().min(ack + 1 + TOKEN_SCAN_LIMIT);
    (ack + 1..end).find(|&i| miso[i] == DATA_START_TOKEN)
}

/// Locate the response payload in `miso`, scanning from `start`
///
/// `start` is the first inbound byte after the command frame. Returns
/// `None` if no acknowledgement is seen, the device reported an error, or
/// the buffer ends before any payload byte.
pub fn locate_response(miso: &[u8], start: usize) -> Option<ResponsePayload> {
    let Some(ack) = find_ack(miso, start) else {
        log::trace!("no acknowledgement within {} bytes of {}", ACK_SCAN_LIMIT, start);
        return None;
    };
    if miso[ack] != ACK_OK {
        log::debug!("error response 0x{:02X} at inbound offset {}", miso[ack], ack);
        return None;
    }

    let token = find_token(miso, ack);
    let offset = match token {
        Some(t) => t + 1,
        None => {
            log::trace!("no data start token after ack at {}", ack);
            ack + 1
        }
    };

    let end = miso.len().min(offset + PAYLOAD_LEN);
    let data = miso.get(offset..end).filter(|d| !d.is_empty())?;
    let bytes = Vec::from_slice(data).ok()?;

    Some(ResponsePayload {
        offset,
        token_found: token.is_some(),
        bytes,
    })
}
