//! Capture decoding

use crate::capture::{read_capture, replay};
use sdiospi_core::{ClassificationPolicy, DecodeLevel, DecodedTransaction, TransactionDecoder};
use std::collections::BTreeMap;
use std::path::Path;

/// Decode a capture file and print one line per transaction
pub fn run_decode(
    path: &Path,
    policy: ClassificationPolicy,
    level: DecodeLevel,
    summary: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let events = read_capture(path)?;
    log::info!("Read {} events from {:?}", events.len(), path);

    let mut decoder = TransactionDecoder::new(policy);
    let transactions = replay(&mut decoder, &events);

    for txn in &transactions {
        println!("{:>14.9}  {}", txn.start, txn.kind.summary(level));
    }

    if summary {
        println!();
        print_summary(&transactions);
    }

    Ok(())
}

/// Count transactions per kind
pub fn count_kinds(transactions: &[DecodedTransaction]) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for txn in transactions {
        *counts.entry(txn.kind.name()).or_insert(0) += 1;
    }
    counts
}

fn print_summary(transactions: &[DecodedTransaction]) {
    println!("Transaction summary");
    println!("===================");
    for (name, count) in count_kinds(transactions) {
        println!("  {:<16} {:>8}", name, count);
    }
    println!("  {:<16} {:>8}", "total", transactions.len());
}
