pub mod cli;
pub mod config;
pub mod error;
pub mod filesystem;
pub mod packet;
pub mod parser;

pub use error::{Error, Result};
