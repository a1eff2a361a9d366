//! sdiospi-core - Decoder for SDIO commands carried over an SPI link
//!
//! This crate turns the bytes seen on the two data lines of an SPI bus
//! during one chip-select assertion into a classified SDIO transaction.
//! It is designed to be `no_std` compatible (it needs `alloc`) so the same
//! engine can run inside a host tool or on a capture probe.
//!
//! # Features
//!
//! - `std` - Enable standard library support: `std::error::Error` impls and
//!   loading a [`ClassificationPolicy`] from a TOML file
//!
//! # Example
//!
//! ```
//! use sdiospi_core::{TransactionDecoder, TransactionKind};
//!
//! let mut decoder = TransactionDecoder::default();
//!
//! decoder.assert(0.0);
//! for byte in [0xFF, 0x75, 0x14, 0xC0, 0xA0, 0x04, 0x89] {
//!     decoder.observe(Some(byte), Some(0xFF));
//! }
//! let txn = decoder.deassert(1e-6).expect("7 bytes is a full frame");
//!
//! assert!(matches!(txn.kind, TransactionKind::InterruptStatus { .. }));
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod decoder;
pub mod error;
pub mod frame;
pub mod irq;
pub mod policy;
pub mod response;
pub mod sdio;
pub mod transaction;
pub mod window;

pub use decoder::{ByteWindow, DecoderState, TransactionDecoder};
pub use error::{DecodeError, Result};
pub use frame::CommandFrame;
pub use irq::{name_irq_bits, IrqBit, IrqSummary};
pub use policy::{ClassificationPolicy, DecodeLevel};
pub use response::ResponsePayload;
pub use sdio::{Cmd52Fields, Cmd53Fields, Direction};
pub use transaction::{AddressDisplay, DecodedTransaction, Summary, TransactionKind, TransferMode};
pub use window::{AddressWindow, WindowRegister, WindowState};
