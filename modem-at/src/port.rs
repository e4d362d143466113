//! AT port: the byte-stream state machine
//!
//! Implements a minimalistic AT command parser that echoes input back and
//! executes completed command lines against the registered device table,
//! falling back to the built-in table.
//!
//! The parser is driven one byte at a time, so input may arrive in chunks of
//! any size and at any boundary. A chunk is fully consumed before `feed`
//! returns; command handlers run synchronously inside that call.

use std::io::{self, Write};

use crate::command::{dispatch, AtCommand};
use crate::error::{CmdError, CmdResult};
use crate::generic::GENERIC_COMMANDS;
use crate::respond::Responder;

/// Command accumulation buffer capacity.
pub const CMD_BUF_SIZE: usize = 0x200;

/// Parse phase of the command-line matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// Waiting for the `A` of the `AT` prefix
    WaitA,
    /// Waiting for the `T` of the `AT` prefix
    WaitT,
    /// Accumulating the command body until the terminator
    WaitTerminator,
}

/// Per-session line settings. Also the handler context for the built-in
/// command table, which is how `ATE0`/`ATE1`/`ATS3?` reach these fields.
#[derive(Debug)]
pub struct LineSettings {
    pub(crate) echo: bool,
    pub(crate) echo_junk: bool,
    pub(crate) terminator: u8,
}

/// Outcome of feeding one byte to the prefix matcher.
enum Step {
    Consumed,
    /// Non-prefix byte seen while waiting for `A`
    ConsumedJunk,
    /// State changed; run the same byte again without advancing
    Replay,
}

/// One logical AT session over an output sink.
///
/// The port owns the sink and the device-command context; the surrounding
/// driver feeds it input chunks and reaches the context through
/// [`AtPort::ctx_mut`] for out-of-band state changes between chunks.
pub struct AtPort<W: Write, C: 'static> {
    line: LineSettings,
    state: ParseState,
    cmd_buf: [u8; CMD_BUF_SIZE],
    /// True received length; keeps counting once the buffer is full
    cmd_len: usize,
    commands: &'static [AtCommand<C>],
    ctx: C,
    out: W,
}

impl<W: Write, C> AtPort<W, C> {
    /// Create a session with echo enabled and a CR terminator (V.250 6.2.1).
    pub fn new(out: W, commands: &'static [AtCommand<C>], ctx: C) -> Self {
        Self {
            line: LineSettings {
                echo: true,
                echo_junk: false,
                terminator: b'\r',
            },
            state: ParseState::WaitA,
            cmd_buf: [0; CMD_BUF_SIZE],
            cmd_len: 0,
            commands,
            ctx,
            out,
        }
    }

    /// Consume one chunk of input.
    ///
    /// Returns `Err` only for transport write failures, which end the
    /// session; command-level failures are reported on the wire as `ERROR`
    /// and parsing continues.
    pub fn feed(&mut self, buf: &[u8]) -> io::Result<()> {
        // Start of the not-yet-echoed span within this chunk
        let mut mark = 0;
        let mut i = 0;

        while i < buf.len() {
            let b = buf[i];
            match self.state {
                ParseState::WaitA | ParseState::WaitT => match self.step_prefix(b) {
                    Step::Replay => continue,
                    Step::ConsumedJunk => {
                        if !self.line.echo_junk {
                            mark += 1;
                        }
                    }
                    Step::Consumed => {}
                },
                ParseState::WaitTerminator => {
                    if self.cmd_len < CMD_BUF_SIZE {
                        self.cmd_buf[self.cmd_len] = b;
                    }
                    self.cmd_len += 1;

                    if b == self.line.terminator {
                        // Echo the final command part before execution
                        if self.line.echo && i > mark {
                            self.out.write_all(&buf[mark..i])?;
                        }
                        mark = i + 1;
                        self.run_command()?;
                        self.state = ParseState::WaitA;
                        self.cmd_len = 0;
                    }
                }
            }
            i += 1;
        }

        // Echo the processed portion of a not yet completed command
        if self.line.echo && i > mark {
            self.out.write_all(&buf[mark..i])?;
        }

        Ok(())
    }

    /// Advance the `AT` prefix matcher by one byte.
    fn step_prefix(&mut self, b: u8) -> Step {
        match self.state {
            ParseState::WaitA => {
                if b == b'A' || b == b'a' {
                    self.state = ParseState::WaitT;
                    Step::Consumed
                } else {
                    Step::ConsumedJunk
                }
            }
            ParseState::WaitT => {
                if b == b'T' || b == b't' {
                    self.state = ParseState::WaitTerminator;
                    Step::Consumed
                } else {
                    self.state = ParseState::WaitA;
                    Step::Replay
                }
            }
            ParseState::WaitTerminator => Step::Consumed,
        }
    }

    /// Execute the accumulated command line and write the status reply.
    fn run_command(&mut self) -> io::Result<()> {
        match self.exec_line() {
            Ok(()) => self.out.write_all(b"\r\nOK\r\n"),
            Err(CmdError::Transport(e)) => Err(e),
            Err(e) => {
                log::debug!("command failed: {}", e);
                self.out.write_all(b"ERROR\r\n")
            }
        }
    }

    fn exec_line(&mut self) -> CmdResult {
        // The check is intentionally `>`: a body that fills the buffer
        // exactly, terminator included, still executes (matches the
        // reference device).
        if self.cmd_len > CMD_BUF_SIZE {
            return Err(CmdError::Overflow);
        }

        // Drop the terminator; a truncated line loses its final byte instead
        let n = self.cmd_len.min(CMD_BUF_SIZE);
        let line = &self.cmd_buf[..n - 1];

        let mut resp = Responder::new(&mut self.out);
        match dispatch(self.commands, line, &mut resp, &mut self.ctx) {
            Err(CmdError::Unsupported) => {
                dispatch(&GENERIC_COMMANDS, line, &mut resp, &mut self.line)
            }
            res => res,
        }
    }

    /// Handler context (the device state).
    pub fn ctx(&self) -> &C {
        &self.ctx
    }

    /// Mutable handler context, for tick/inject calls between chunks.
    pub fn ctx_mut(&mut self) -> &mut C {
        &mut self.ctx
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    pub fn echo(&self) -> bool {
        self.line.echo
    }

    pub fn set_echo(&mut self, echo: bool) {
        self.line.echo = echo;
    }

    /// Echo bytes preceding the `AT` prefix as well.
    pub fn set_echo_junk(&mut self, echo_junk: bool) {
        self.line.echo_junk = echo_junk;
    }

    /// End-of-line symbol (the S3 register).
    pub fn terminator(&self) -> u8 {
        self.line.terminator
    }

    pub fn set_terminator(&mut self, terminator: u8) {
        self.line.terminator = terminator;
    }

    /// The output sink, for inspection in tests and teardown.
    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }
}
