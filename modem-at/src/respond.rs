//! Reply writers handed to command handlers
//!
//! Handlers never touch the transport directly; they go through a
//! [`Responder`] borrowed from the port for the duration of one command.

use std::fmt::{self, Write as _};
use std::io::Write;

use crate::error::CmdResult;

/// Capacity of the formatted-line buffer. Longer renders are truncated to
/// this size rather than rejected.
const FMT_BUF_SIZE: usize = 0x100;

/// Line-oriented reply writer for command handlers.
pub struct Responder<'a> {
    out: &'a mut dyn Write,
}

impl<'a> Responder<'a> {
    pub(crate) fn new(out: &'a mut dyn Write) -> Self {
        Self { out }
    }

    /// Write a reply line followed by CR LF.
    pub fn line(&mut self, text: &str) -> CmdResult {
        self.out.write_all(text.as_bytes())?;
        self.out.write_all(b"\r\n")?;
        Ok(())
    }

    /// Write a formatted reply line followed by CR LF.
    ///
    /// Output beyond [`FMT_BUF_SIZE`] is silently truncated.
    pub fn linef(&mut self, args: fmt::Arguments<'_>) -> CmdResult {
        let mut buf = FmtBuf::default();
        let _ = buf.write_fmt(args); // an Err only signals truncation
        self.line(&buf.text)
    }
}

/// Bounded formatting buffer; refuses further input once full.
#[derive(Default)]
struct FmtBuf {
    text: String,
}

impl fmt::Write for FmtBuf {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let remaining = FMT_BUF_SIZE - self.text.len();
        if s.len() <= remaining {
            self.text.push_str(s);
            Ok(())
        } else {
            let mut end = remaining;
            while !s.is_char_boundary(end) {
                end -= 1;
            }
            self.text.push_str(&s[..end]);
            Err(fmt::Error)
        }
    }
}
