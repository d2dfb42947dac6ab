use clap::Parser;

use aoc_solvers::cli::{init_tracing, InputArgs};
use aoc_solvers::config::DiskConfig;
use aoc_solvers::filesystem::{parser::parse_session, FileSystem};
use aoc_solvers::parser::parse_all;

/// No space left on device: finds directory sizes from a terminal session.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    disk: DiskConfig,
}

pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    // Commands borrow names from the buffer, so it outlives the parse.
    let buffer = cli.input.read()?;
    let commands = parse_all(parse_session, &buffer)?;
    let fs = FileSystem::replay(commands)?;

    println!(
        "Sum of small directory sizes: {}",
        fs.sum_of_small_dirs(cli.disk.small_dir_limit)
    );
    println!(
        "Smallest directory to delete: {}",
        fs.smallest_dir_to_free(&cli.disk)
    );

    Ok(())
}
