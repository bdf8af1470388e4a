//! Interactive terminal dashboard.
//!
//! Keys: `r` refresh (or retry after an error), `R` restart a pending load,
//! `d` dismiss error, `1`..`9` collapse/expand a category section,
//! `q` / Esc quit.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{cursor, execute, queue, terminal};
use recon_dashboard::render::terminal::render_dashboard;
use recon_dashboard::{Dashboard, Phase};
use std::io::{self, Write};
use std::time::Duration;
use tracing::{debug, info};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

enum Action {
    Refresh,
    Reload,
    Dismiss,
    Toggle(usize),
    Quit,
    None,
}

fn action_for(key: KeyEvent) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('r') | KeyCode::F(5) => Action::Refresh,
        KeyCode::Char('R') => Action::Reload,
        KeyCode::Char('d') => Action::Dismiss,
        KeyCode::Char(c @ '1'..='9') => Action::Toggle(c as usize - '1' as usize),
        _ => Action::None,
    }
}

/// Restores the terminal even if the loop bails out with an error.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(TerminalGuard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn draw(dashboard: &Dashboard) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    queue!(
        stdout,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0)
    )?;
    // raw mode does not translate \n
    let text = render_dashboard(dashboard, true).replace('\n', "\r\n");
    stdout.write_all(text.as_bytes())?;
    stdout.flush()
}

pub fn run(mut dashboard: Dashboard) -> io::Result<()> {
    let _guard = TerminalGuard::enter()?;
    info!("Interactive dashboard started");
    draw(&dashboard)?;

    loop {
        let mut dirty = dashboard.poll();

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) => match action_for(key) {
                    Action::Quit => break,
                    Action::Refresh => {
                        let started = if dashboard.phase() == Phase::Error {
                            dashboard.retry()
                        } else {
                            dashboard.refresh()
                        };
                        debug!("Refresh requested, started: {}", started);
                        dirty |= started;
                    }
                    Action::Reload => {
                        dashboard.reload();
                        dirty = true;
                    }
                    Action::Dismiss => {
                        dashboard.dismiss_error();
                        dirty = true;
                    }
                    Action::Toggle(index) => {
                        let category = dashboard
                            .summary()
                            .and_then(|s| s.groups.get(index).map(|g| g.category));
                        if let Some(category) = category {
                            dashboard.toggle_category(category);
                            dirty = true;
                        }
                    }
                    Action::None => {}
                },
                Event::Resize(_, _) => dirty = true,
                _ => {}
            }
        }

        if dirty {
            draw(&dashboard)?;
        }
    }

    info!("Interactive dashboard closed");
    Ok(())
}
