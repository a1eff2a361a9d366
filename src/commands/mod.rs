//! CLI command implementations
//!
//! `decode` replays a capture file through the transaction decoder. The
//! remaining commands are offline helpers for reading single values out of
//! a capture by hand.

pub mod decode;
mod inspect;

pub use inspect::{run_field, run_irq, run_policy};
