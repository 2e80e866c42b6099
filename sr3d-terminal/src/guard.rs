//! Terminal state that must be restored on exit.

use std::io::{self, stdout};

use crossterm::{cursor, execute, terminal};

/// Puts the terminal in raw mode on the alternate screen with the cursor
/// hidden, and undoes all of it when dropped, including on error and panic
/// unwinding.
pub struct TerminalGuard(());

impl TerminalGuard {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        // Raw mode is on from here, so a failure below still needs the drop
        let guard = Self(());
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        log::debug!("terminal acquired");
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show);
        let _ = terminal::disable_raw_mode();
        log::debug!("terminal restored");
    }
}
