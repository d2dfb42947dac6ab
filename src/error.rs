use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse input: {0}")]
    Parse(#[from] nom::error::Error<String>),

    /// A divider packet was not present after sorting. Only reachable through a logic error.
    #[error("packet {0} not found in sorted output")]
    NotFound(String),

    #[error("cannot leave the root directory")]
    NoParentDirectory,

    #[error("no such directory: {0}")]
    UnknownDirectory(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),
}
