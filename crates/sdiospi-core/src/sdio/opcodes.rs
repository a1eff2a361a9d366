//! SDIO-over-SPI protocol constants
//!
//! Framing values follow the SD/SDIO SPI-mode convention. The register
//! addresses are those of the Wi-Fi transceiver's host interface.

// ============================================================================
// Framing
// ============================================================================

/// Idle byte driven by the host before a command (also the lead-in)
pub const LEAD_IN: u8 = 0xFF;
/// Start/transmission bits of a command byte (`01xx_xxxx`)
pub const CMD_MARKER: u8 = 0x40;
/// Length of a command frame: lead-in, command, 4 argument bytes, CRC
pub const FRAME_LEN: usize = 7;
/// Minimum number of outbound bytes for a window to be decoded at all
pub const MIN_WINDOW_LEN: usize = FRAME_LEN;
/// Number of leading padding offsets tried when synchronizing
pub const SYNC_OFFSETS: usize = 3;

// ============================================================================
// Command codes (CMD_MARKER | index)
// ============================================================================

/// CMD52 - IO_RW_DIRECT (single byte)
pub const CMD52: u8 = CMD_MARKER | 52;
/// CMD53 - IO_RW_EXTENDED (byte or block count)
pub const CMD53: u8 = CMD_MARKER | 53;

// ============================================================================
// Response tokens
// ============================================================================

/// Idle line value on the inbound line
pub const IDLE_FILLER: u8 = 0xFF;
/// Acknowledgement value meaning "no error"
pub const ACK_OK: u8 = 0x00;
/// Start data token preceding a read payload
pub const DATA_START_TOKEN: u8 = 0xFE;
/// Maximum bytes skipped while waiting for the acknowledgement
pub const ACK_SCAN_LIMIT: usize = 10;
/// Maximum bytes skipped while waiting for the data start token
pub const TOKEN_SCAN_LIMIT: usize = 10;
/// Maximum response payload length extracted
pub const PAYLOAD_LEN: usize = 4;

// ============================================================================
// Host interface registers (link-level addresses)
// ============================================================================

/// Interrupt status register
pub const INT1_STS: u32 = 0x6050;
/// Interrupt set register
pub const INT1_SET: u32 = 0x6054;
/// Interrupt clear register
pub const INT1_CLR: u32 = 0x6058;

/// Address window bits [23:16]
pub const WINDOW_0: u32 = 0x10000;
/// Address window bits [31:24]
pub const WINDOW_1: u32 = 0x10001;
/// Window access configuration
pub const WINDOW_CONFIG: u32 = 0x10002;

/// Data buffer addresses seen in bulk transfers
pub const DATA_BUFFERS: [u32; 4] = [0xC214, 0xC310, 0xBF40, 0xC110];

/// Default block size for block-mode CMD53 transfers
pub const BLOCK_SIZE: u32 = 512;
/// Largest block size an SDIO function can negotiate
pub const MAX_BLOCK_SIZE: u32 = 2048;

/// Name a well-known link-level register address
pub fn register_name(address: u32) -> Option<&'static str> {
    match address {
        INT1_STS => Some("INT1_STS"),
        INT1_SET => Some("INT1_SET"),
        INT1_CLR => Some("INT1_CLR"),
        WINDOW_0 => Some("WINDOW_0"),
        WINDOW_1 => Some("WINDOW_1"),
        WINDOW_CONFIG => Some("CONFIG"),
        a if DATA_BUFFERS.contains(&a) => Some("DATA_BUF"),
        _ => None,
    }
}
