//! CMD52/CMD53 argument bit fields
//!
//! Layout of the 32-bit argument (SDIO Simplified Specification, 5.1/5.3):
//!
//! ```text
//!  31  30..28  27     26     25..........9   8   7..0
//!  R/W  FN     RAW    -      register addr   -   data       CMD52
//!  R/W  FN     BLOCK  OP     register addr   count (9 bits) CMD53
//! ```

use core::fmt;

/// R/W flag (1 = write)
pub const WRITE_BIT: u32 = 1 << 31;
/// Function number position
pub const FUNCTION_SHIFT: u32 = 28;
/// Function number width mask (after shifting)
pub const FUNCTION_MASK: u32 = 0x7;
/// CMD52 read-after-write flag
pub const RAW_BIT: u32 = 1 << 27;
/// CMD53 block mode flag
pub const BLOCK_MODE_BIT: u32 = 1 << 27;
/// CMD53 OP code: incrementing address
pub const INCREMENT_BIT: u32 = 1 << 26;
/// Register address position
pub const ADDRESS_SHIFT: u32 = 9;
/// Register address width mask (17 bits, after shifting)
pub const ADDRESS_MASK: u32 = 0x1_FFFF;
/// CMD53 byte/block count mask (9 bits)
pub const CMD53_COUNT_MASK: u32 = 0x1FF;
/// CMD52 write data mask
pub const CMD52_DATA_MASK: u32 = 0xFF;

/// Transfer direction of an I/O command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Device to host
    Read,
    /// Host to device
    Write,
}

impl Direction {
    fn from_argument(arg: u32) -> Self {
        if arg & WRITE_BIT != 0 {
            Direction::Write
        } else {
            Direction::Read
        }
    }

    /// Returns true for [`Direction::Write`]
    pub fn is_write(self) -> bool {
        self == Direction::Write
    }

    /// Two-letter tag used in transaction summaries
    pub fn short(self) -> &'static str {
        match self {
            Direction::Read => "RD",
            Direction::Write => "WR",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Read => write!(f, "Read"),
            Direction::Write => write!(f, "Write"),
        }
    }
}

fn function_of(arg: u32) -> u8 {
    ((arg >> FUNCTION_SHIFT) & FUNCTION_MASK) as u8
}

fn address_of(arg: u32) -> u32 {
    (arg >> ADDRESS_SHIFT) & ADDRESS_MASK
}

/// Human-readable role of an SDIO function on this device
///
/// Returns `None` for functions the device does not use.
pub fn function_description(function: u8) -> Option<&'static str> {
    match function {
        0 => Some("Card Control (CCCR)"),
        1 => Some("Registers/Control"),
        2 => Some("Bulk Data"),
        _ => None,
    }
}

/// Decoded CMD52 (IO_RW_DIRECT) argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cmd52Fields {
    /// Transfer direction
    pub direction: Direction,
    /// Function number (0-7)
    pub function: u8,
    /// Read-after-write flag
    pub raw: bool,
    /// 17-bit register address
    pub address: u32,
    /// Write data (stuff bits for reads)
    pub data: u8,
}

impl Cmd52Fields {
    /// Split a CMD52 argument word into its fields
    pub fn from_argument(arg: u32) -> Self {
        Self {
            direction: Direction::from_argument(arg),
            function: function_of(arg),
            raw: arg & RAW_BIT != 0,
            address: address_of(arg),
            data: (arg & CMD52_DATA_MASK) as u8,
        }
    }
}

/// Decoded CMD53 (IO_RW_EXTENDED) argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cmd53Fields {
    /// Transfer direction
    pub direction: Direction,
    /// Function number (0-7)
    pub function: u8,
    /// Count is in blocks rather than bytes
    pub block_mode: bool,
    /// Register address increments during the transfer
    pub increment: bool,
    /// 17-bit register address
    pub address: u32,
    /// 9-bit byte or block count
    pub count: u16,
}

impl Cmd53Fields {
    /// Split a CMD53 argument word into its fields
    pub fn from_argument(arg: u32) -> Self {
        Self {
            direction: Direction::from_argument(arg),
            function: function_of(arg),
            block_mode: arg & BLOCK_MODE_BIT != 0,
            increment: arg & INCREMENT_BIT != 0,
            address: address_of(arg),
            count: (arg & CMD53_COUNT_MASK) as u16,
        }
    }

    /// Pack the fields back into an argument word
    ///
    /// Out-of-range values are masked to their field width.
    pub fn to_argument(&self) -> u32 {
        let mut arg = 0;
        if self.direction.is_write() {
            arg |= WRITE_BIT;
        }
        arg |= (u32::from(self.function) & FUNCTION_MASK) << FUNCTION_SHIFT;
        if self.block_mode {
            arg |= BLOCK_MODE_BIT;
        }
        if self.increment {
            arg |= INCREMENT_BIT;
        }
        arg |= (self.address & ADDRESS_MASK) << ADDRESS_SHIFT;
        arg |= u32::from(self.count) & CMD53_COUNT_MASK;
        arg
    }

    /// Transfer size in bytes, scaling block counts by `block_size`
    ///
    /// Saturates at `u32::MAX` for oversized block sizes.
    pub fn byte_count(&self, block_size: u32) -> u32 {
        if self.block_mode {
            u32::from(self.count).saturating_mul(block_size)
        } else {
            u32::from(self.count)
        }
    }
}
