//! SPI capture import
//!
//! Reads the CSV export of a logic analyzer's SPI decoder. Each row is one
//! analyzer frame:
//!
//! ```text
//! type,start_time,end_time,mosi,miso
//! enable,0.000100,0.000100,,
//! result,0.000101,0.000102,0xFF,0xFF
//! disable,0.000180,0.000181,,
//! ```
//!
//! `enable`/`disable` mark chip select; `result` carries one byte per line.
//! Either byte column may be empty.

use sdiospi_core::{DecodedTransaction, TransactionDecoder};
use std::fs;
use std::path::Path;

/// Errors reading a capture file
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// The file could not be read
    #[error("failed to read capture: {0}")]
    Io(#[from] std::io::Error),
    /// A row could not be parsed
    #[error("line {line}: {message}")]
    Line { line: usize, message: String },
}

/// One analyzer frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CaptureEvent {
    /// Chip select asserted
    Enable { time: f64 },
    /// Bytes clocked on the data lines
    Result { mosi: Option<u8>, miso: Option<u8> },
    /// Chip select deasserted
    Disable { time: f64 },
}

/// Parse a byte written as `0x..` hex or decimal; empty means absent
fn parse_byte(s: &str) -> Result<Option<u8>, String> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    let value = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16)
    } else {
        s.parse::<u8>()
    };
    value
        .map(Some)
        .map_err(|e| format!("invalid byte '{}': {}", s, e))
}

fn parse_time(s: &str) -> Result<f64, String> {
    let s = s.trim();
    s.parse::<f64>()
        .map_err(|e| format!("invalid time '{}': {}", s, e))
}

fn parse_row(fields: &[&str]) -> Result<CaptureEvent, String> {
    let field = |i: usize| fields.get(i).copied().unwrap_or("");

    match field(0).to_ascii_lowercase().as_str() {
        "enable" => Ok(CaptureEvent::Enable {
            time: parse_time(field(1))?,
        }),
        "disable" => {
            // Some exports leave end_time empty on marker rows
            let end = field(2);
            let time = if end.trim().is_empty() {
                parse_time(field(1))?
            } else {
                parse_time(end)?
            };
            Ok(CaptureEvent::Disable { time })
        }
        "result" => Ok(CaptureEvent::Result {
            mosi: parse_byte(field(3))?,
            miso: parse_byte(field(4))?,
        }),
        other => Err(format!("unknown frame type '{}'", other)),
    }
}

/// Parse capture text into events
///
/// Blank lines, `#` comments and a leading header row are skipped.
pub fn parse_capture(text: &str) -> Result<Vec<CaptureEvent>, CaptureError> {
    let mut events = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line
            .split(',')
            .map(|f| f.trim().trim_matches('"'))
            .collect();

        if events.is_empty() && fields[0].eq_ignore_ascii_case("type") {
            continue;
        }

        let event = parse_row(&fields).map_err(|message| CaptureError::Line {
            line: idx + 1,
            message,
        })?;
        events.push(event);
    }

    log::debug!("Parsed {} capture events", events.len());
    Ok(events)
}

/// Read and parse a capture file
pub fn read_capture(path: &Path) -> Result<Vec<CaptureEvent>, CaptureError> {
    let text = fs::read_to_string(path)?;
    parse_capture(&text)
}

/// Feed `events` through `decoder`, collecting every decoded transaction
pub fn replay(decoder: &mut TransactionDecoder, events: &[CaptureEvent]) -> Vec<DecodedTransaction> {
    let mut transactions = Vec::new();

    for event in events {
        match *event {
            CaptureEvent::Enable { time } => decoder.assert(time),
            CaptureEvent::Result { mosi, miso } => decoder.observe(mosi, miso),
            CaptureEvent::Disable { time } => {
                if let Some(txn) = decoder.deassert(time) {
                    transactions.push(txn);
                }
            }
        }
    }

    transactions
}
