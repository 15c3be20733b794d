use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io::{self, Stdout};

use crate::app::Redraw;
use crate::editor::Suspend;
use crate::error::Result;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// The full-screen terminal. Hands the tty to child processes on
/// `suspend` and takes it back on `resume`.
pub struct TerminalSession {
    pub terminal: Tui,
    redraw: Redraw,
}

impl TerminalSession {
    pub fn enter(redraw: Redraw) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal, redraw })
    }

    pub fn restore(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Suspend for TerminalSession {
    fn suspend(&mut self) -> Result<()> {
        self.terminal.show_cursor()?;
        self.terminal.flush()?;
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        tracing::debug!("terminal suspended");
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        execute!(
            self.terminal.backend_mut(),
            EnterAlternateScreen,
            EnableMouseCapture
        )?;
        enable_raw_mode()?;
        // Whatever the editor drew is still in ratatui's buffers
        self.terminal.clear()?;
        self.terminal.hide_cursor()?;
        self.redraw.notify_changed();
        tracing::debug!("terminal resumed");
        Ok(())
    }
}
