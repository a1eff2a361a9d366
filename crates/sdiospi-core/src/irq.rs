//! Interrupt status bit naming
//!
//! The transceiver reports host interrupts in the 32-bit `INT1_STS`
//! register. Bits are grouped by source: per-pager doorbells, TX status,
//! per-VIF beacons, NDP probe requests and the HW stop notification.

use alloc::vec::Vec;
use bitflags::bitflags;
use core::fmt;

bitflags! {
    /// Interrupt source groups in `INT1_STS`
    ///
    /// Bits 14 and 16 are unassigned and are not part of any group, so
    /// `from_bits_truncate` drops them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct IrqGroups: u32 {
        /// Pager doorbells 0-13
        const PAGER     = 0x0000_3FFF;
        /// TX status available
        const TX_STATUS = 1 << 15;
        /// Beacon interrupts for VIF 0-7
        const BEACON    = 0xFF << 17;
        /// NDP probe request, VIF 0
        const NDP0      = 1 << 25;
        /// NDP probe request, VIF 1
        const NDP1      = 1 << 26;
        /// HW stop notification
        const HW_STOP   = 1 << 27;
        /// Reserved upper bits
        const RESERVED  = 0xF << 28;
    }
}

const BEACON_SHIFT: u32 = 17;

/// One named interrupt bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrqBit {
    /// Pager doorbell (bits 0-13)
    Pager(u8),
    /// TX status available (bit 15)
    TxStatus,
    /// Beacon for a VIF (bits 17-24)
    Beacon(u8),
    /// NDP probe request VIF 0 (bit 25)
    Ndp0,
    /// NDP probe request VIF 1 (bit 26)
    Ndp1,
    /// HW stop (bit 27)
    HwStop,
    /// Reserved bit (28-31)
    Reserved(u8),
}

impl IrqBit {
    /// Name the interrupt at `bit`, or `None` for unassigned bits
    pub fn from_bit(bit: u32) -> Option<Self> {
        let mask = 1u32.checked_shl(bit)?;
        let group = IrqGroups::from_bits_truncate(mask);
        if group.intersects(IrqGroups::PAGER) {
            Some(IrqBit::Pager(bit as u8))
        } else if group.contains(IrqGroups::TX_STATUS) {
            Some(IrqBit::TxStatus)
        } else if group.intersects(IrqGroups::BEACON) {
            Some(IrqBit::Beacon((bit - BEACON_SHIFT) as u8))
        } else if group.contains(IrqGroups::NDP0) {
            Some(IrqBit::Ndp0)
        } else if group.contains(IrqGroups::NDP1) {
            Some(IrqBit::Ndp1)
        } else if group.contains(IrqGroups::HW_STOP) {
            Some(IrqBit::HwStop)
        } else if group.intersects(IrqGroups::RESERVED) {
            Some(IrqBit::Reserved(bit as u8))
        } else {
            None
        }
    }

    /// Bit position of this interrupt in `INT1_STS`
    pub fn bit(self) -> u32 {
        match self {
            IrqBit::Pager(n) => u32::from(n),
            IrqBit::TxStatus => 15,
            IrqBit::Beacon(n) => BEACON_SHIFT + u32::from(n),
            IrqBit::Ndp0 => 25,
            IrqBit::Ndp1 => 26,
            IrqBit::HwStop => 27,
            IrqBit::Reserved(n) => u32::from(n),
        }
    }
}

impl fmt::Display for IrqBit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrqBit::Pager(n) => write!(f, "Pager{}", n),
            IrqBit::TxStatus => write!(f, "TxStatus"),
            IrqBit::Beacon(n) => write!(f, "Beacon{}", n),
            IrqBit::Ndp0 => write!(f, "NDP0"),
            IrqBit::Ndp1 => write!(f, "NDP1"),
            IrqBit::HwStop => write!(f, "HW_STOP"),
            IrqBit::Reserved(n) => write!(f, "Bit{}", n),
        }
    }
}

/// Named view of an interrupt status value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrqSummary {
    /// The value was zero
    NoneSet,
    /// Named bits in ascending order; empty if only unassigned bits were set
    Flags(Vec<IrqBit>),
}

impl IrqSummary {
    /// Named bits, empty for [`IrqSummary::NoneSet`]
    pub fn flags(&self) -> &[IrqBit] {
        match self {
            IrqSummary::NoneSet => &[],
            IrqSummary::Flags(bits) => bits,
        }
    }
}

impl fmt::Display for IrqSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrqSummary::NoneSet => write!(f, "None"),
            IrqSummary::Flags(bits) if bits.is_empty() => write!(f, "Unknown"),
            IrqSummary::Flags(bits) => {
                for (i, bit) in bits.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", bit)?;
                }
                Ok(())
            }
        }
    }
}

/// Name every assigned bit set in `value`
pub fn name_irq_bits(value: u32) -> IrqSummary {
    if value == 0 {
        return IrqSummary::NoneSet;
    }
    let bits = (0..u32::BITS)
        .filter(|bit| value & (1 << bit) != 0)
        .filter_map(IrqBit::from_bit)
        .collect();
    IrqSummary::Flags(bits)
}
