//! AT command protocol engine
//!
//! This crate implements the command/response protocol spoken by a modem
//! over a character stream. It converts an inbound byte stream into command
//! invocations against a registry and writes the replies back to the
//! transport.
//!
//! The engine is designed to:
//! - Handle arbitrary chunk boundaries (streaming)
//! - Echo consumed input back to the remote side, including partial commands
//! - Resolve commands against a device table with a built-in fallback table
//!
//! Reference: ITU-T V.250 (the parser is intentionally not fully compliant).

mod command;
mod error;
mod generic;
mod port;
mod respond;

pub use command::{AtCommand, ExecFn, WriteFn};
pub use error::{CmdError, CmdResult};
pub use port::{AtPort, LineSettings, ParseState, CMD_BUF_SIZE};
pub use respond::Responder;
