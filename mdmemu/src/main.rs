//! Modem AT interface emulator
//!
//! Serves an emulated cellular modem on a pseudoterminal so host software
//! can be tested without real hardware. Point the client at the slave
//! device (or the `--link` symlink) and talk AT to it.
//!
//! Out-of-band stimuli:
//! - a 1 Hz tick drifts the reported signal level
//! - `SIGUSR1` injects a concatenated test SMS into the message store

use std::error::Error;
use std::io::{self, Write};
use std::os::fd::AsFd;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use clap::Parser;
use modem_at::AtPort;
use modem_core::{command_table, inject_test_sms, ModemState};
use modem_pty::Pty;
use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};

const TICK: Duration = Duration::from_secs(1);

/// Set from the signal handler, consumed between input chunks. The handler
/// must not call into the modem itself: the flag is the whole contract.
static INJECT_SMS: AtomicBool = AtomicBool::new(false);

extern "C" fn on_sigusr1(_signal: libc::c_int) {
    INJECT_SMS.store(true, Ordering::Relaxed);
}

/// Modem AT interface emulator
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Create a symbolic link that points to the actual pseudoterminal
    /// device
    #[arg(short, long, value_name = "filename")]
    link: Option<PathBuf>,
}

/// Pass-through writer that logs outbound bytes.
struct TxLog<W: Write>(W);

impl<W: Write> Write for TxLog<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        dump_exchange("Tx", buf);
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

/// Log one side of the exchange with CR/LF made visible.
fn dump_exchange(dir: &str, buf: &[u8]) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    let mut text = String::with_capacity(buf.len());
    for &b in buf {
        match b {
            b'\r' => text.push_str("\\r"),
            b'\n' => text.push_str("\\n"),
            0x20..=0x7e => text.push(b as char),
            _ => text.push_str(&format!("\\x{:02x}", b)),
        }
    }
    log::debug!("{}[{}]: {}", dir, buf.len(), text);
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut pty = Pty::new()?;
    println!("Slave device name - {}", pty.slave_path());
    if let Some(link) = &args.link {
        pty.link_slave(link)?;
        log::info!("linked {} -> {}", link.display(), pty.slave_path());
    }

    let mut port = AtPort::new(TxLog(pty.writer()?), command_table(), ModemState::new());

    let action = SigAction::new(
        SigHandler::Handler(on_sigusr1),
        SaFlags::empty(),
        SigSet::empty(),
    );
    unsafe { sigaction(Signal::SIGUSR1, &action) }?;

    // Tick deadlines are absolute and advanced by the period, so the tick
    // frequency stays stable even when a deadline is served late
    let mut next_tick = Instant::now() + TICK;

    loop {
        if INJECT_SMS.swap(false, Ordering::Relaxed) {
            log::info!("injecting test SMS");
            inject_test_sms(port.ctx_mut());
            continue;
        }

        let timeout = next_tick.saturating_duration_since(Instant::now());
        let readable = {
            let mut fds = [PollFd::new(pty.as_fd(), PollFlags::POLLIN)];
            let timeout = PollTimeout::from(timeout.as_millis().min(u16::MAX as u128) as u16);
            match poll(&mut fds, timeout) {
                Ok(0) => {
                    port.ctx_mut().tick();
                    next_tick += TICK;
                    continue;
                }
                Ok(_) => fds[0]
                    .revents()
                    .is_some_and(|r| r.contains(PollFlags::POLLIN)),
                // Interrupted by a signal; the inject flag is checked on
                // the next pass
                Err(Errno::EINTR) => continue,
                Err(e) => return Err(e.into()),
            }
        };
        if !readable {
            continue;
        }

        let mut buf = [0u8; 0x100];
        let n = match pty.read(&mut buf) {
            Ok(0) => continue,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };

        dump_exchange("Rx", &buf[..n]);
        if let Err(e) = port.feed(&buf[..n]) {
            log::error!("transport failure, ending session: {}", e);
            return Err(e.into());
        }
    }
}
