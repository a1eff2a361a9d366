//! Decoded transaction types
//!
//! Every closed chip-select window with enough bytes decodes into exactly
//! one [`DecodedTransaction`]. The [`TransactionKind`] says what the window
//! was and carries only the fields that make sense for that kind.

use alloc::vec::Vec;
use core::fmt;

use crate::error::DecodeError;
use crate::irq::IrqSummary;
use crate::policy::DecodeLevel;
use crate::sdio::{function_description, register_name, Cmd53Fields, Direction};
use crate::window::WindowRegister;

/// Where a CMD53 register address points on the device bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressDisplay {
    /// Window known: full 32-bit bus address
    Resolved {
        /// Full bus address
        full: u32,
        /// Link-level address from the command
        link: u32,
    },
    /// Windowed function whose window registers have not all been seen
    WindowUnknown {
        /// Link-level address from the command
        link: u32,
    },
    /// Function without an address window
    Link(u32),
}

impl AddressDisplay {
    /// Link-level address from the command
    pub fn link(&self) -> u32 {
        match *self {
            AddressDisplay::Resolved { link, .. } => link,
            AddressDisplay::WindowUnknown { link } => link,
            AddressDisplay::Link(link) => link,
        }
    }

    /// Full bus address, if known
    pub fn full(&self) -> Option<u32> {
        match *self {
            AddressDisplay::Resolved { full, .. } => Some(full),
            _ => None,
        }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, level: DecodeLevel) -> fmt::Result {
        match (level, self) {
            (DecodeLevel::Basic, _) | (DecodeLevel::Detailed, AddressDisplay::Link(_)) => {
                write!(f, "0x{:04X}", self.link())
            }
            (DecodeLevel::Detailed, AddressDisplay::Resolved { full, link }) => {
                write!(f, "0x{:08X} (SDIO:0x{:04X})", full, link)
            }
            (DecodeLevel::Detailed, AddressDisplay::WindowUnknown { link }) => {
                write!(f, "UNKNOWN_WIN (SDIO:0x{:04X})", link)
            }
        }
    }
}

/// CMD53 count unit and address behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferMode {
    /// Count is in blocks
    pub block: bool,
    /// Address increments
    pub increment: bool,
}

impl From<&Cmd53Fields> for TransferMode {
    fn from(fields: &Cmd53Fields) -> Self {
        Self {
            block: fields.block_mode,
            increment: fields.increment,
        }
    }
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = if self.block { "Block" } else { "Byte" };
        let addr = if self.increment { "Incr" } else { "Fixed" };
        write!(f, "{},{}", unit, addr)
    }
}

/// Classification of one window
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionKind {
    /// CMD53 to function 0 (CCCR/FBR)
    CardControl {
        /// Transfer direction
        direction: Direction,
        /// Register address
        address: u32,
        /// Byte or block count as encoded
        count: u16,
    },
    /// CMD52 single-byte register access
    RegisterAccess {
        /// Function number
        function: u8,
        /// Transfer direction
        direction: Direction,
        /// Read-after-write requested
        raw: bool,
        /// Register address
        address: u32,
        /// Write data
        data: u8,
    },
    /// CMD52 write to an address window register
    WindowConfig {
        /// Function number
        function: u8,
        /// Which window register
        register: WindowRegister,
        /// Value written
        value: u8,
    },
    /// CMD53 register or data access
    DataAccess {
        /// Classified as bulk data rather than control
        bulk: bool,
        /// Function number
        function: u8,
        /// Transfer direction
        direction: Direction,
        /// Target address
        address: AddressDisplay,
        /// Count as encoded in the command
        count: u16,
        /// Transfer size in bytes
        bytes: u32,
        /// Count unit and address behaviour
        mode: TransferMode,
    },
    /// CMD53 access to the interrupt status register
    InterruptStatus {
        /// Function number
        function: u8,
        /// Transfer direction
        direction: Direction,
        /// Target address
        address: AddressDisplay,
        /// Register value from the response
        value: Option<u32>,
        /// Named interrupt bits of `value`
        flags: Option<IrqSummary>,
    },
    /// CMD53 access to the interrupt clear register
    InterruptClear {
        /// Function number
        function: u8,
        /// Transfer direction
        direction: Direction,
        /// Target address
        address: AddressDisplay,
        /// Echoed clear mask from the response
        value: Option<u32>,
        /// Named interrupt bits of `value`
        flags: Option<IrqSummary>,
    },
    /// Window that could not be decoded
    Unrecognized {
        /// Why decoding stopped
        reason: DecodeError,
        /// Raw bytes for offline inspection
        raw: Vec<u8>,
        /// More bytes were captured than `raw` holds
        truncated: bool,
    },
}

impl TransactionKind {
    /// Short name of the classification, stable across levels
    pub fn name(&self) -> &'static str {
        match self {
            TransactionKind::CardControl { .. } => "card_control",
            TransactionKind::RegisterAccess { .. } => "register_access",
            TransactionKind::WindowConfig { .. } => "window_config",
            TransactionKind::DataAccess { bulk: true, .. } => "bulk_data",
            TransactionKind::DataAccess { bulk: false, .. } => "data_access",
            TransactionKind::InterruptStatus { .. } => "irq_status",
            TransactionKind::InterruptClear { .. } => "irq_clear",
            TransactionKind::Unrecognized { .. } => "unknown",
        }
    }

    /// One-line summary at the given level
    pub fn summary(&self, level: DecodeLevel) -> Summary<'_> {
        Summary { kind: self, level }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.summary(DecodeLevel::default()), f)
    }
}

struct FunctionName(u8);

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match function_description(self.0) {
            Some(desc) => write!(f, "{}", desc),
            None => write!(f, "Fn{}", self.0),
        }
    }
}

fn write_irq(f: &mut fmt::Formatter<'_>, flags: &Option<IrqSummary>) -> fmt::Result {
    match flags {
        Some(summary) => write!(f, "[{}]", summary),
        None => write!(f, "[N/A]"),
    }
}

/// Level-dependent rendering of a [`TransactionKind`]
pub struct Summary<'a> {
    kind: &'a TransactionKind,
    level: DecodeLevel,
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = self.level;
        match self.kind {
            TransactionKind::CardControl {
                direction,
                address,
                count,
            } => write!(
                f,
                "CARD: {} | Addr:0x{:04X} {} Cnt:{}",
                FunctionName(0),
                address,
                direction,
                count
            ),
            TransactionKind::RegisterAccess {
                function,
                direction,
                raw,
                address,
                data,
            } => {
                write!(
                    f,
                    "CMD52 {}: Fn{} | Addr:0x{:05X}",
                    direction.short(),
                    function,
                    address
                )?;
                if direction.is_write() {
                    write!(f, " Data:0x{:02X}", data)?;
                }
                if *raw {
                    write!(f, " RAW")?;
                }
                Ok(())
            }
            TransactionKind::WindowConfig {
                function,
                register,
                value,
            } => write!(f, "WINDOW: Fn{} | {} = 0x{:02X}", function, register, value),
            TransactionKind::DataAccess {
                bulk,
                function,
                direction,
                address,
                count,
                bytes,
                mode,
            } => {
                if *bulk {
                    write!(f, "BULK {}: {} | ", direction.short(), FunctionName(*function))?;
                    address.render(f, level)?;
                    write!(f, " [{} bytes] {}", bytes, mode)
                } else {
                    write!(
                        f,
                        "CMD53 {}: {} | Addr:",
                        direction.short(),
                        FunctionName(*function)
                    )?;
                    address.render(f, level)?;
                    write!(f, " Cnt:{} {}", count, mode)?;
                    if level == DecodeLevel::Detailed {
                        if let Some(name) = register_name(address.link()) {
                            write!(f, " ({})", name)?;
                        }
                    }
                    Ok(())
                }
            }
            TransactionKind::InterruptStatus {
                function,
                direction,
                address,
                flags,
                ..
            } => {
                write!(f, "IRQ {}: {} | ", direction.short(), FunctionName(*function))?;
                address.render(f, level)?;
                write!(f, " ")?;
                write_irq(f, flags)
            }
            TransactionKind::InterruptClear {
                function,
                address,
                value,
                flags,
                ..
            } => {
                write!(f, "IRQ CLR: {} | ", FunctionName(*function))?;
                address.render(f, level)?;
                match value {
                    Some(v) => write!(f, " (val:0x{:08X}) ", v)?,
                    None => write!(f, " (val:N/A) ")?,
                }
                write_irq(f, flags)
            }
            TransactionKind::Unrecognized {
                reason,
                raw,
                truncated,
            } => {
                write!(f, "Unknown:")?;
                for b in raw {
                    write!(f, " {:02X}", b)?;
                }
                if *truncated {
                    write!(f, "...")?;
                }
                if level == DecodeLevel::Detailed {
                    write!(f, " ({})", reason)?;
                }
                Ok(())
            }
        }
    }
}

/// Result of decoding one chip-select window
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTransaction {
    /// Chip-select assert time
    pub start: f64,
    /// Chip-select deassert time
    pub end: f64,
    /// What the window contained
    pub kind: TransactionKind,
}

impl fmt::Display for DecodedTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}
