//! Full-screen letter viewer.
//!
//! Two screens: the closed envelope (click to start the opening animation)
//! and the letter itself, where blocks are revealed one at a time.
//!
//! ## Entry point
//!
//! - [`run_viewer`] takes a fetched letter and owns the terminal until quit.

pub mod app;
pub mod assemble;
pub mod controller;
pub mod render;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::Duration;

use missive_core::model::LetterPublic;

use app::ViewerApp;

const TICK: Duration = Duration::from_millis(50);

/// Run the interactive viewer for a fetched letter.
pub fn run_viewer(letter: LetterPublic) -> Result<()> {
    let mut app = ViewerApp::new(letter);
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut app);
    ratatui::restore();
    result
}

fn event_loop(terminal: &mut DefaultTerminal, app: &mut ViewerApp) -> Result<()> {
    while !app.should_quit() {
        terminal.draw(|frame| render::draw(frame, app))?;
        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
        app.tick();
    }
    Ok(())
}
