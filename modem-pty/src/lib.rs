//! Modem PTY - Linux pseudoterminal transport
//!
//! Provides the character device the emulated modem is reachable through: a
//! PTY master owned by the emulator, with the slave side left for client
//! software to open like a real `/dev/ttyUSBx`.
//!
//! Key points:
//! - Slave kept open by the emulator so a client close does not destroy
//!   the pair
//! - Optional symlink pointing at the slave device
//! - Non-blocking reads for poll-driven use
//!
//! Reference: https://www.man7.org/linux/man-pages/man3/posix_openpt.3.html

mod error;
mod pty;

pub use error::{Error, Result};
pub use pty::Pty;
