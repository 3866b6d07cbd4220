use std::collections::HashSet;

use tracing::warn;

/// Per-letter interaction state: the envelope-open flag and the set of
/// unlocked content block ids.
///
/// Invariant: `unlocked` only grows within one epoch; the only way to shrink
/// it is [`InteractionState::reset`], which starts a fresh epoch. Nothing
/// here is persisted or shared with the backend.
#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    envelope_open: bool,
    unlocked: HashSet<String>,
}

impl InteractionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the envelope as open. Idempotent.
    pub fn open_envelope(&mut self) {
        self.envelope_open = true;
    }

    /// Mark the envelope as closed. The viewer never exposes this after an
    /// open other than via [`InteractionState::reset`]; kept for
    /// completeness.
    pub fn close_envelope(&mut self) {
        self.envelope_open = false;
    }

    #[must_use]
    pub const fn is_envelope_open(&self) -> bool {
        self.envelope_open
    }

    /// Unlock a content block. Empty (or whitespace-only) ids are invalid
    /// input from the interaction layer: they are logged and ignored, never
    /// an error. Idempotent.
    pub fn unlock_block(&mut self, block_id: &str) {
        if block_id.trim().is_empty() {
            warn!("ignoring unlock for empty block id");
            return;
        }
        self.unlocked.insert(block_id.to_string());
    }

    /// True once `unlock_block` has been called with `block_id` in the
    /// current epoch. Empty and unknown ids report locked.
    #[must_use]
    pub fn is_block_unlocked(&self, block_id: &str) -> bool {
        if block_id.trim().is_empty() {
            return false;
        }
        self.unlocked.contains(block_id)
    }

    /// Number of blocks unlocked this epoch.
    #[must_use]
    pub fn unlocked_count(&self) -> usize {
        self.unlocked.len()
    }

    /// Clear everything back to the initial state, starting a fresh epoch.
    ///
    /// Called when the viewer navigates to a different letter and on viewer
    /// teardown.
    pub fn reset(&mut self) {
        self.envelope_open = false;
        self.unlocked.clear();
    }
}
