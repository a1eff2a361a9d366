//! Address window tracking
//!
//! A CMD53 carries a 17-bit register address. The transceiver extends it to
//! a 32-bit bus address with two window registers that the host programs via
//! CMD52 writes, one window per SDIO function:
//!
//! ```text
//! full = (WINDOW_1 << 24) | (WINDOW_0 << 16) | (link_address & 0xFFFF)
//! ```
//!
//! The windows are only known once the capture has seen the host write them,
//! so every field starts out unknown and resolution never guesses.

use core::fmt;

use crate::sdio::{WINDOW_0, WINDOW_1, WINDOW_CONFIG};

/// One of the three per-function window registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowRegister {
    /// Address bits [23:16]
    Window0,
    /// Address bits [31:24]
    Window1,
    /// Access size configuration
    Config,
}

impl WindowRegister {
    /// Map a link-level register address to a window register
    pub fn from_address(address: u32) -> Option<Self> {
        match address {
            WINDOW_0 => Some(WindowRegister::Window0),
            WINDOW_1 => Some(WindowRegister::Window1),
            WINDOW_CONFIG => Some(WindowRegister::Config),
            _ => None,
        }
    }

    /// Link-level address of this register
    pub fn address(self) -> u32 {
        match self {
            WindowRegister::Window0 => WINDOW_0,
            WindowRegister::Window1 => WINDOW_1,
            WindowRegister::Config => WINDOW_CONFIG,
        }
    }
}

impl fmt::Display for WindowRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowRegister::Window0 => write!(f, "WINDOW_0"),
            WindowRegister::Window1 => write!(f, "WINDOW_1"),
            WindowRegister::Config => write!(f, "CONFIG"),
        }
    }
}

/// Window registers of one SDIO function
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddressWindow {
    /// WINDOW_0 - address bits [23:16]
    pub high_low: Option<u8>,
    /// WINDOW_1 - address bits [31:24]
    pub high_high: Option<u8>,
    /// CONFIG - access size
    pub access_config: Option<u8>,
}

impl AddressWindow {
    /// Create a window with every register unknown
    pub const fn new() -> Self {
        Self {
            high_low: None,
            high_high: None,
            access_config: None,
        }
    }

    /// Store a register value
    pub fn set(&mut self, register: WindowRegister, value: u8) {
        match register {
            WindowRegister::Window0 => self.high_low = Some(value),
            WindowRegister::Window1 => self.high_high = Some(value),
            WindowRegister::Config => self.access_config = Some(value),
        }
    }

    /// Returns true once all three registers have been observed
    pub fn is_resolved(&self) -> bool {
        self.high_low.is_some() && self.high_high.is_some() && self.access_config.is_some()
    }

    /// Build the full bus address, or `None` while the window is unresolved
    pub fn resolve(&self, link_address: u32) -> Option<u32> {
        match (self.high_high, self.high_low, self.access_config) {
            (Some(hi), Some(lo), Some(_)) => {
                Some((u32::from(hi) << 24) | (u32::from(lo) << 16) | (link_address & 0xFFFF))
            }
            _ => None,
        }
    }
}

/// Window registers for the two windowed functions (1 and 2)
///
/// Function 0 (card control) and functions 3-7 have no window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowState {
    func1: AddressWindow,
    func2: AddressWindow,
}

impl WindowState {
    /// Create a store with every window unknown
    pub const fn new() -> Self {
        Self {
            func1: AddressWindow::new(),
            func2: AddressWindow::new(),
        }
    }

    /// Window of `function`, if that function is windowed
    pub fn window(&self, function: u8) -> Option<&AddressWindow> {
        match function {
            1 => Some(&self.func1),
            2 => Some(&self.func2),
            _ => None,
        }
    }

    fn window_mut(&mut self, function: u8) -> Option<&mut AddressWindow> {
        match function {
            1 => Some(&mut self.func1),
            2 => Some(&mut self.func2),
            _ => None,
        }
    }

    /// Returns true if `function` is one of the tracked windowed functions
    pub fn is_tracked(function: u8) -> bool {
        matches!(function, 1 | 2)
    }

    /// Record a CMD52 write of `value` to `register` on `function`
    ///
    /// Writes to other registers or untracked functions are ignored.
    /// Returns the register that was updated.
    pub fn record(&mut self, function: u8, register: u32, value: u8) -> Option<WindowRegister> {
        let reg = WindowRegister::from_address(register)?;
        let window = self.window_mut(function)?;
        window.set(reg, value);
        log::debug!(
            "Fn{} {} (0x{:05X}) = 0x{:02X}",
            function,
            reg,
            reg.address(),
            value
        );
        Some(reg)
    }

    /// Returns true once all three window registers of `function` are known
    pub fn is_resolved(&self, function: u8) -> bool {
        self.window(function).is_some_and(AddressWindow::is_resolved)
    }

    /// Translate `link_address` into a full bus address for `function`
    pub fn resolve(&self, function: u8, link_address: u32) -> Option<u32> {
        self.window(function)?.resolve(link_address)
    }
}
