//! Error types for command execution

use std::io;
use thiserror::Error;

/// Failure kinds produced by command dispatch and handlers.
///
/// `Unsupported` is the only kind that falls through from the device table
/// to the built-in table; everything else stops resolution where it occurred.
#[derive(Error, Debug)]
pub enum CmdError {
    /// Command, or the requested access form of it, is not registered
    #[error("command not supported")]
    Unsupported,

    /// Write-form parameter failed validation
    #[error("invalid parameter")]
    InvalidParameter,

    /// Accumulated command text exceeded the buffer capacity
    #[error("command line overflow")]
    Overflow,

    /// The output sink rejected a write; fatal to the session
    #[error("transport write failed: {0}")]
    Transport(#[from] io::Error),
}

/// Result type for command handlers
pub type CmdResult = Result<(), CmdError>;
