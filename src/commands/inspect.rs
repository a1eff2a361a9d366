//! Single-value helpers: argument fields, interrupt bits, policy

use sdiospi_core::sdio::{function_description, register_name};
use sdiospi_core::{name_irq_bits, ClassificationPolicy, Cmd52Fields, Cmd53Fields, TransferMode};

fn describe_function(function: u8) -> String {
    function_description(function)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Fn{}", function))
}

fn describe_address(address: u32) -> String {
    match register_name(address) {
        Some(name) => format!("0x{:05X} ({})", address, name),
        None => format!("0x{:05X}", address),
    }
}

/// Print an argument word decoded both ways
pub fn run_field(argument: u32) -> Result<(), Box<dyn std::error::Error>> {
    let cmd52 = Cmd52Fields::from_argument(argument);
    let cmd53 = Cmd53Fields::from_argument(argument);

    println!("Argument 0x{:08X}", argument);
    println!();
    println!("As CMD52 (IO_RW_DIRECT):");
    println!("  Direction:       {}", cmd52.direction);
    println!(
        "  Function:        {} - {}",
        cmd52.function,
        describe_function(cmd52.function)
    );
    println!("  Read after write: {}", if cmd52.raw { "yes" } else { "no" });
    println!("  Address:         {}", describe_address(cmd52.address));
    println!("  Data:            0x{:02X}", cmd52.data);
    println!();
    println!("As CMD53 (IO_RW_EXTENDED):");
    println!("  Direction:       {}", cmd53.direction);
    println!(
        "  Function:        {} - {}",
        cmd53.function,
        describe_function(cmd53.function)
    );
    println!("  Address:         {}", describe_address(cmd53.address));
    println!("  Count:           {}", cmd53.count);
    println!("  Mode:            {}", TransferMode::from(&cmd53));

    Ok(())
}

/// Print the named bits of an interrupt status value
pub fn run_irq(value: u32) -> Result<(), Box<dyn std::error::Error>> {
    let summary = name_irq_bits(value);
    println!("0x{:08X}: {}", value, summary);
    for bit in summary.flags() {
        println!("  bit {:>2}: {}", bit.bit(), bit);
    }
    Ok(())
}

/// Print the classification policy in effect
pub fn run_policy(policy: &ClassificationPolicy) -> Result<(), Box<dyn std::error::Error>> {
    println!("Classification policy");
    println!("=====================");
    println!();
    println!("Data buffers:");
    for &addr in &policy.data_buffers {
        println!("  {}", describe_address(addr));
    }
    println!("Bulk threshold:  {} (data buffer accesses above this are bulk)", policy.bulk_threshold);
    println!("Block size:      {} bytes", policy.block_size);
    println!("Function 2:      always bulk");
    Ok(())
}
