//! SDIO command types and constants
//!
//! This module provides the fixed protocol constants of the SPI framing and
//! the bit-field decompositions of CMD52 (`IO_RW_DIRECT`) and CMD53
//! (`IO_RW_EXTENDED`) argument words.

mod fields;
pub mod opcodes;

pub use fields::{
    function_description, Cmd52Fields, Cmd53Fields, Direction, ADDRESS_MASK, ADDRESS_SHIFT,
    BLOCK_MODE_BIT, CMD52_DATA_MASK, CMD53_COUNT_MASK, FUNCTION_MASK, FUNCTION_SHIFT,
    INCREMENT_BIT, RAW_BIT, WRITE_BIT,
};
pub use opcodes::*;
