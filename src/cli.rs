//! CLI argument parsing

use clap::{Parser, Subcommand};
use sdiospi_core::DecodeLevel;
use std::path::PathBuf;

/// Parse a string as a hex or decimal u32
fn parse_hex_u32(s: &str) -> Result<u32, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u32>().map_err(|e| format!("Invalid number: {}", e))
    }
}

#[derive(Parser)]
#[command(name = "sdiospi")]
#[command(author, version, about = "SDIO-over-SPI transaction decoder", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Classification policy file (TOML format)
    /// Defaults to the built-in data buffer list and thresholds
    #[arg(long, global = true)]
    pub policy: Option<PathBuf>,

    /// Address detail level [basic, detailed]
    #[arg(long, global = true, default_value_t = DecodeLevel::Detailed)]
    pub level: DecodeLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode an exported SPI capture (CSV: type,start_time,end_time,mosi,miso)
    Decode {
        /// Capture file path
        capture: PathBuf,

        /// Print per-kind transaction counts at the end
        #[arg(long)]
        summary: bool,
    },

    /// Decode a 32-bit command argument as CMD52 and CMD53 fields
    Field {
        /// Argument word (hex, e.g., 0x14C0A004)
        #[arg(value_parser = parse_hex_u32)]
        argument: u32,
    },

    /// Name the bits of an interrupt status value
    Irq {
        /// Status value (hex or decimal)
        #[arg(value_parser = parse_hex_u32)]
        value: u32,
    },

    /// Show the effective classification policy
    Policy,
}
