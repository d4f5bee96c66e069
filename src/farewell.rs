use std::io::{self, Stdout, Write};

use crate::messages::EXIT_MESSAGE;

/// Prints the exit message to its sink when dropped.
///
/// On Unix the message is also printed when the installer is interrupted
/// with SIGINT or SIGTERM, which then exits with `128 + signal`.
pub struct Farewell<W: Write = Stdout> {
    sink: W,
    message: &'static str,
}

impl Farewell {
    /// Installs the signal handlers and prints to stdout.
    pub fn register() -> io::Result<Self> {
        #[cfg(unix)]
        install_signal_handlers()?;

        Ok(Farewell::new(io::stdout()))
    }
}

impl<W: Write> Farewell<W> {
    /// A guard printing to `sink`, without any signal handling.
    pub fn new(sink: W) -> Self {
        Farewell {
            sink,
            message: EXIT_MESSAGE,
        }
    }
}

impl<W: Write> Drop for Farewell<W> {
    fn drop(&mut self) {
        // nothing left to report a failed write to
        let _ = writeln!(self.sink, "{}", self.message);
        let _ = self.sink.flush();
    }
}

#[cfg(unix)]
fn install_signal_handlers() -> io::Result<()> {
    use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};

    let action = SigAction::new(
        SigHandler::Handler(on_signal),
        SaFlags::empty(),
        SigSet::empty(),
    );
    for sig in [Signal::SIGINT, Signal::SIGTERM] {
        // SAFETY: the handler only calls async-signal-safe functions
        unsafe { signal::sigaction(sig, &action) }.map_err(io::Error::from)?;
    }
    Ok(())
}

#[cfg(unix)]
extern "C" fn on_signal(sig: libc::c_int) {
    fn write_all(bytes: &[u8]) {
        // SAFETY: write(2) on stdout with a valid buffer
        unsafe {
            libc::write(libc::STDOUT_FILENO, bytes.as_ptr().cast(), bytes.len());
        }
    }

    write_all(b"\n");
    write_all(EXIT_MESSAGE.as_bytes());
    write_all(b"\n");
    // SAFETY: terminates without running destructors, as required inside a handler
    unsafe { libc::_exit(128 + sig) }
}
