//! Viewer state and key handling, kept free of terminal I/O so the whole
//! interaction model is unit-testable.

use crossterm::event::{KeyCode, KeyEvent};

use missive_core::model::LetterPublic;
use missive_core::reveal::{EnvelopePhase, InteractionState};

use super::assemble::{RevealItem, reveal_items};
use super::controller::EnvelopeController;

pub struct ViewerApp {
    pub letter: LetterPublic,
    pub items: Vec<RevealItem>,
    pub interaction: InteractionState,
    controller: EnvelopeController,
    pub selected: usize,
    should_quit: bool,
}

impl ViewerApp {
    #[must_use]
    pub fn new(letter: LetterPublic) -> Self {
        Self::with_controller(letter, EnvelopeController::new())
    }

    #[must_use]
    pub fn with_controller(letter: LetterPublic, controller: EnvelopeController) -> Self {
        let items = reveal_items(&letter);
        Self {
            letter,
            items,
            interaction: InteractionState::new(),
            controller,
            selected: 0,
            should_quit: false,
        }
    }

    #[must_use]
    pub fn envelope_phase(&self) -> EnvelopePhase {
        self.controller.phase()
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    #[must_use]
    pub fn is_unlocked(&self, item: &RevealItem) -> bool {
        item.key
            .as_deref()
            .is_some_and(|key| self.interaction.is_block_unlocked(key))
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.controller.cancel();
                self.should_quit = true;
            }
            KeyCode::Enter | KeyCode::Char(' ') => match self.controller.phase() {
                EnvelopePhase::Closed => self.controller.click(),
                EnvelopePhase::Opening => {}
                EnvelopePhase::Open => self.unlock_selected(),
            },
            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_previous(),
            _ => {}
        }
    }

    /// Drive pending timers. Call once per event-loop iteration.
    pub fn tick(&mut self) {
        if self.controller.tick() {
            self.interaction.open_envelope();
        }
    }

    fn unlock_selected(&mut self) {
        let Some(item) = self.items.get(self.selected) else {
            return;
        };
        // Keyless blocks stay locked on purpose.
        if let Some(key) = item.key.clone() {
            self.interaction.unlock_block(&key);
        }
    }

    fn select_next(&mut self) {
        if self.controller.phase() != EnvelopePhase::Open || self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.items.len() - 1);
    }

    fn select_previous(&mut self) {
        if self.controller.phase() != EnvelopePhase::Open {
            return;
        }
        self.selected = self.selected.saturating_sub(1);
    }
}
