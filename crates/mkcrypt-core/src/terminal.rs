//! Echo suppression on the controlling terminal.
//!
//! The terminal's line discipline is process-external shared state. It is
//! only ever modified inside an [`EchoGuard`], which restores the captured
//! settings when it goes out of scope, whether the read succeeded, failed,
//! or unwound.
//!
//! A fatal signal (SIGINT, SIGTERM, SIGHUP, SIGQUIT) skips `Drop`. While a
//! real terminal has echo off, its original settings are also parked where a
//! signal handler can reapply them before the signal's default action runs.

use std::os::unix::io::RawFd;

use crate::error::{MkcryptError, Result};

/// Capture, modify, and restore terminal settings.
pub trait EchoControl {
    /// Snapshot of the settings taken before modification.
    type State;

    /// Read the current settings of the input stream.
    fn capture(&mut self) -> Result<Self::State>;

    /// Apply `state` with input echo turned off.
    fn disable_echo(&mut self, state: &Self::State) -> Result<()>;

    /// Reapply a previously captured snapshot.
    fn restore(&mut self, state: &Self::State) -> Result<()>;
}

/// Saved termios flags of a terminal file descriptor.
#[derive(Clone, Copy)]
pub struct TerminalState(libc::termios);

impl TerminalState {
    /// Whether this snapshot has the echo bit set.
    pub fn echo_enabled(&self) -> bool {
        self.0.c_lflag & libc::ECHO != 0
    }
}

impl std::fmt::Debug for TerminalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalState")
            .field("echo", &self.echo_enabled())
            .finish()
    }
}

/// A real terminal reached through termios.
#[derive(Debug)]
pub struct Tty {
    fd: RawFd,
}

impl Tty {
    pub fn new(fd: RawFd) -> Self {
        Self { fd }
    }

    /// The process's standard input.
    pub fn stdin() -> Self {
        Self::new(libc::STDIN_FILENO)
    }

    fn apply(&self, termios: &libc::termios) -> Result<()> {
        // SAFETY: termios points to a fully initialized struct obtained from tcgetattr.
        let rc = unsafe { libc::tcsetattr(self.fd, libc::TCSANOW, termios) };
        if rc != 0 {
            return Err(MkcryptError::TerminalUnavailable(format!(
                "tcsetattr failed: {}",
                std::io::Error::last_os_error()
            )));
        }
        Ok(())
    }
}

impl EchoControl for Tty {
    type State = TerminalState;

    fn capture(&mut self) -> Result<TerminalState> {
        use std::mem::MaybeUninit;

        let mut termios = MaybeUninit::<libc::termios>::uninit();
        // SAFETY: tcgetattr writes a complete termios struct on success.
        let rc = unsafe { libc::tcgetattr(self.fd, termios.as_mut_ptr()) };
        if rc != 0 {
            return Err(MkcryptError::TerminalUnavailable(format!(
                "tcgetattr failed: {}",
                std::io::Error::last_os_error()
            )));
        }
        // SAFETY: rc == 0, so the struct was initialized.
        Ok(TerminalState(unsafe { termios.assume_init() }))
    }

    fn disable_echo(&mut self, state: &TerminalState) -> Result<()> {
        let mut silent = state.0;
        silent.c_lflag &= !libc::ECHO;
        interrupt::arm(self.fd, &state.0);
        let applied = self.apply(&silent);
        if applied.is_err() {
            interrupt::disarm();
        }
        applied
    }

    fn restore(&mut self, state: &TerminalState) -> Result<()> {
        let restored = self.apply(&state.0);
        interrupt::disarm();
        restored
    }
}

/// Terminal settings to reapply if a fatal signal arrives while echo is off.
mod interrupt {
    use std::cell::UnsafeCell;
    use std::mem::MaybeUninit;
    use std::os::unix::io::RawFd;
    use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
    use std::sync::Once;

    const SIGNALS: [libc::c_int; 4] = [libc::SIGINT, libc::SIGTERM, libc::SIGHUP, libc::SIGQUIT];

    struct Parked {
        armed: AtomicBool,
        fd: AtomicI32,
        termios: UnsafeCell<MaybeUninit<libc::termios>>,
    }

    // SAFETY: `termios` is written only while `armed` is false and read only
    // after `armed` was observed true.
    unsafe impl Sync for Parked {}

    static PARKED: Parked = Parked {
        armed: AtomicBool::new(false),
        fd: AtomicI32::new(-1),
        termios: UnsafeCell::new(MaybeUninit::uninit()),
    };

    static INSTALL: Once = Once::new();

    /// Park `original` for `fd` and make sure the handlers are installed.
    pub(super) fn arm(fd: RawFd, original: &libc::termios) {
        INSTALL.call_once(install_handlers);
        PARKED.armed.store(false, Ordering::SeqCst);
        // SAFETY: disarmed, so the handler will not read the cell.
        unsafe { (*PARKED.termios.get()).write(*original) };
        PARKED.fd.store(fd, Ordering::SeqCst);
        PARKED.armed.store(true, Ordering::SeqCst);
    }

    pub(super) fn disarm() {
        PARKED.armed.store(false, Ordering::SeqCst);
    }

    /// Take the parked settings, leaving nothing armed.
    pub(super) fn take() -> Option<(RawFd, libc::termios)> {
        if !PARKED.armed.swap(false, Ordering::SeqCst) {
            return None;
        }
        let fd = PARKED.fd.load(Ordering::SeqCst);
        // SAFETY: armed was true, so `arm` finished writing the cell.
        let termios = unsafe { (*PARKED.termios.get()).assume_init_read() };
        Some((fd, termios))
    }

    fn install_handlers() {
        for signal in SIGNALS {
            // SAFETY: on_signal only performs async-signal-safe calls.
            unsafe {
                libc::signal(
                    signal,
                    on_signal as extern "C" fn(libc::c_int) as libc::sighandler_t,
                );
            }
        }
    }

    extern "C" fn on_signal(signal: libc::c_int) {
        if let Some((fd, termios)) = take() {
            // SAFETY: tcsetattr is async-signal-safe; termios is a copy.
            unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) };
        }
        // SAFETY: resetting to the default action and re-raising are
        // async-signal-safe.
        unsafe {
            libc::signal(signal, libc::SIG_DFL);
            libc::raise(signal);
        }
    }
}

/// Input that is not a terminal (a pipe or a file): nothing to toggle.
#[derive(Debug, Default)]
pub struct Passthrough;

impl EchoControl for Passthrough {
    type State = ();

    fn capture(&mut self) -> Result<()> {
        Ok(())
    }

    fn disable_echo(&mut self, _state: &()) -> Result<()> {
        Ok(())
    }

    fn restore(&mut self, _state: &()) -> Result<()> {
        Ok(())
    }
}

/// Scope in which echo is disabled.
///
/// Restoration happens exactly once, in `Drop`.
pub struct EchoGuard<'a, T: EchoControl> {
    term: &'a mut T,
    saved: T::State,
}

impl<'a, T: EchoControl> EchoGuard<'a, T> {
    /// Capture the current settings and turn echo off.
    ///
    /// If capturing fails nothing was changed. If disabling fails the
    /// captured settings are reapplied before the error is returned.
    pub fn acquire(term: &'a mut T) -> Result<Self> {
        let saved = term.capture()?;
        let mut guard = Self { term, saved };
        guard.term.disable_echo(&guard.saved)?;
        Ok(guard)
    }
}

impl<T: EchoControl> Drop for EchoGuard<'_, T> {
    fn drop(&mut self) {
        if let Err(err) = self.term.restore(&self.saved) {
            tracing::warn!("Failed to restore terminal settings: {err}");
        }
    }
}
