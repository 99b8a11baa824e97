use std::io::{self, Stdout};
use std::ops::{Deref, DerefMut};

use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::error;

pub type Frame<'a> = ratatui::Frame<'a>;

/// The crossterm terminal. Raw mode and the alternate screen are only taken
/// on `enter`, so the wizard can stay on the normal screen until the first
/// prompt is needed.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    active: bool,
}

impl Tui {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            terminal: Terminal::new(CrosstermBackend::new(io::stdout()))?,
            active: false,
        })
    }

    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)?;
        self.active = true;
        self.terminal.clear()
    }

    /// Leaves raw mode if anybody enabled it, so the panic hook can call this
    /// on a fresh `Tui`.
    pub fn exit(&mut self) -> io::Result<()> {
        if terminal::is_raw_mode_enabled()? {
            execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)?;
            terminal::disable_raw_mode()?;
        }
        self.active = false;
        Ok(())
    }
}

impl Deref for Tui {
    type Target = Terminal<CrosstermBackend<Stdout>>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for Tui {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(e) = self.exit() {
            error!("Unable to exit Terminal: {e}");
        }
    }
}
