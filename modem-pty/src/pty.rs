//! PTY (pseudoterminal) management
//!
//! Creates the master/slave pair the emulator serves its AT interface on.
//! The slave side is opened once here and held for the lifetime of the pair:
//! clients come and go, and the pair must survive their closes.

use std::fs::File;
use std::io::{self, Read, Write};
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, FromRawFd, OwnedFd, RawFd};
use std::path::Path;

use nix::fcntl::{fcntl, FcntlArg, OFlag};
use nix::pty::{grantpt, posix_openpt, ptsname, unlockpt, PtyMaster};
use nix::sys::termios::{self, LocalFlags, SetArg};

use crate::error::{Error, Result};

/// A pseudoterminal master with its slave held open.
pub struct Pty {
    /// The PTY master file descriptor
    master: PtyMaster,
    /// File wrapper for I/O
    file: File,
    /// Slave fd kept open so client closes do not destroy the pair
    _slave: OwnedFd,
    /// Path to the slave PTY
    slave_path: String,
}

impl Pty {
    /// Create a new PTY with master-side echo disabled.
    pub fn new() -> Result<Self> {
        let master = posix_openpt(OFlag::O_RDWR | OFlag::O_NOCTTY)?;

        // The kernel's tty echo would fight the protocol-level echo the
        // AT port implements itself
        let mut tio = termios::tcgetattr(&master)?;
        tio.local_flags.remove(LocalFlags::ECHO);
        termios::tcsetattr(&master, SetArg::TCSANOW, &tio)?;

        grantpt(&master)?;
        unlockpt(&master)?;
        let slave_path = unsafe { ptsname(&master)? };

        let slave = open_slave(&slave_path)?;

        let fd = master.as_raw_fd();
        let file = unsafe { File::from_raw_fd(libc::dup(fd)) };

        log::debug!("slave device name - {}", slave_path);

        Ok(Self {
            master,
            file,
            _slave: slave,
            slave_path,
        })
    }

    /// Path of the slave device clients should open.
    pub fn slave_path(&self) -> &str {
        &self.slave_path
    }

    /// Create (or replace) a symlink pointing at the slave device.
    pub fn link_slave(&self, link: &Path) -> Result<()> {
        loop {
            match std::os::unix::fs::symlink(&self.slave_path, link) {
                Ok(()) => return Ok(()),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    std::fs::remove_file(link)?;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub fn set_nonblocking(&self, nonblocking: bool) -> Result<()> {
        let fd = self.master.as_raw_fd();
        let flags = fcntl(fd, FcntlArg::F_GETFL)?;
        let flags = OFlag::from_bits_truncate(flags);
        let new_flags = if nonblocking {
            flags | OFlag::O_NONBLOCK
        } else {
            flags & !OFlag::O_NONBLOCK
        };
        fcntl(fd, FcntlArg::F_SETFL(new_flags))?;
        Ok(())
    }

    /// A second handle onto the master for writing, so reads and the AT
    /// port's reply sink can live on separate owners.
    pub fn writer(&self) -> Result<File> {
        Ok(self.file.try_clone()?)
    }

    pub fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }

    pub fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.file.write_all(buf)
    }
}

impl AsRawFd for Pty {
    fn as_raw_fd(&self) -> RawFd {
        self.master.as_raw_fd()
    }
}

impl AsFd for Pty {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.master.as_fd()
    }
}

fn open_slave(path: &str) -> Result<OwnedFd> {
    use std::ffi::CString;
    let path_cstr = CString::new(path).map_err(|e| Error::PtyCreation(e.to_string()))?;
    let fd = unsafe { libc::open(path_cstr.as_ptr(), libc::O_RDWR | libc::O_NOCTTY) };
    if fd < 0 {
        return Err(Error::PtyCreation(io::Error::last_os_error().to_string()));
    }
    Ok(unsafe { OwnedFd::from_raw_fd(fd) })
}
