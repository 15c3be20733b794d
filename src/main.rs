mod app;
mod browser;
mod config;
mod editor;
mod error;
mod github;
mod logging;
mod terminal;
mod ui;

use anyhow::Result;
use app::App;
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEventKind};
use github::{GhCli, RemoteHost};
use std::time::Duration;
use terminal::TerminalSession;

/// Terminal UI for browsing GitHub repositories and editing issues
#[derive(Parser)]
#[command(name = "ghtui", version, about)]
struct Cli {}

fn main() -> Result<()> {
    Cli::parse();

    let (config, config_error) = match config::load_config() {
        Ok(config) => (config, None),
        Err(e) => (config::Config::default(), Some(e)),
    };
    match logging::init_logging(&config.log.level) {
        Ok(path) => tracing::info!(log = %path.display(), "ghtui starting"),
        Err(e) => eprintln!("warning: logging disabled: {e:#}"),
    }
    if let Some(e) = config_error {
        tracing::warn!(error = %e, "using default config");
    }

    let host = GhCli::new();
    host.ensure_ready()?;

    // Init app state (runs the start screen's first fetch)
    let mut app = App::new(config, &host);

    // Terminal setup
    let mut session = TerminalSession::enter(app.redraw.clone())?;

    // Run event loop
    let result = run_app(&mut session, &mut app, &host);

    // Cleanup
    session.restore()?;

    if let Err(err) = result {
        tracing::error!(error = %err, "event loop failed");
        eprintln!("Error: {:?}", err);
    }
    tracing::info!("ghtui exiting");
    Ok(())
}

fn run_app(session: &mut TerminalSession, app: &mut App, host: &dyn RemoteHost) -> Result<()> {
    let mut hits = ui::HitMap::default();
    app.redraw.notify_changed();

    loop {
        // Draw only when something changed
        if app.redraw.take() {
            session.terminal.draw(|f| hits = ui::draw(f, app))?;
        }

        // Poll with a timeout so notices still expire without input
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key, host, session);
                }
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                    if let Some(target) = hits.target_at(mouse.column, mouse.row) {
                        app.handle_click(target, host, session);
                    }
                }
                Event::Resize(..) => app.redraw.notify_changed(),
                _ => {}
            }
        }

        // Expire the status notice
        app.tick();

        if app.should_quit {
            return Ok(());
        }
    }
}
