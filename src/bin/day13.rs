use clap::Parser;

use aoc_solvers::cli::{init_tracing, InputArgs};
use aoc_solvers::packet::{self, parser::parse_input};

/// Distress signal: checks which packet pairs are in order and computes the decoder key.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    input: InputArgs,
}

pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    let pairs = cli.input.read_and_parse(parse_input)?;

    println!("Sum of indices of ordered pairs: {}", packet::count_ordered(&pairs));
    println!("Decoder key: {}", packet::decoder_key(packet::flatten(pairs))?);

    Ok(())
}
