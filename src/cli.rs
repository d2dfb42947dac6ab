use std::io::Read;
use std::path::PathBuf;

use nom::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::error::Result;
use crate::parser::parse_all;

/// Logs go to stderr so the answers on stdout stay clean. Set `RUST_LOG=debug` to see the work.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(clap::Args, Debug, Default)]
pub struct InputArgs {
    /// Puzzle input file. Reads stdin when omitted
    pub input: Option<PathBuf>,
}

impl InputArgs {
    pub fn read(&self) -> Result<String> {
        let buffer = match &self.input {
            Some(path) => {
                debug!(path = %path.display(), "reading input file");
                std::fs::read_to_string(path)?
            }
            None => {
                debug!("reading input from stdin");
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                buffer
            }
        };
        Ok(buffer)
    }

    /// Reads the whole input and parses it into an owned value.
    pub fn read_and_parse<O, P>(&self, parser: P) -> Result<O>
    where
        P: for<'i> Parser<&'i str, O, nom::error::Error<&'i str>>,
    {
        let buffer = self.read()?;
        parse_all(parser, &buffer)
    }
}
