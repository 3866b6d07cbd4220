use std::time::{Duration, Instant};

/// How long the envelope spends in `Opening` before it is fully open,
/// measured from the click that started the animation.
pub const OPEN_DELAY: Duration = Duration::from_millis(2500);

/// Animation phase of the envelope. Exactly one forward path:
/// `Closed` → `Opening` (user click) → `Open` (automatic after
/// [`OPEN_DELAY`]). There is no reverse transition; a new letter gets a
/// fresh sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvelopePhase {
    #[default]
    Closed,
    Opening,
    Open,
}

/// The envelope phase machine, clock-injected so the timing contract is
/// testable without real sleeps. The caller owns scheduling: it feeds the
/// current instant into [`EnvelopeSequencer::poll`] and applies the single
/// completion it reports.
#[derive(Debug, Clone)]
pub struct EnvelopeSequencer {
    phase: EnvelopePhase,
    open_at: Option<Instant>,
    delay: Duration,
}

impl Default for EnvelopeSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvelopeSequencer {
    #[must_use]
    pub fn new() -> Self {
        Self::with_delay(OPEN_DELAY)
    }

    /// Sequencer with a non-standard delay. Tests use this to avoid real
    /// 2.5 s waits; production code sticks to [`EnvelopeSequencer::new`].
    #[must_use]
    pub const fn with_delay(delay: Duration) -> Self {
        Self {
            phase: EnvelopePhase::Closed,
            open_at: None,
            delay,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> EnvelopePhase {
        self.phase
    }

    /// When the `Opening` phase completes, if one is in flight.
    #[must_use]
    pub const fn open_deadline(&self) -> Option<Instant> {
        self.open_at
    }

    /// Handle a user click at `now`. Only a click while `Closed` does
    /// anything: it starts the opening animation and arms the completion
    /// deadline. Returns true when the click started the animation.
    pub fn click(&mut self, now: Instant) -> bool {
        if self.phase != EnvelopePhase::Closed {
            return false;
        }
        self.phase = EnvelopePhase::Opening;
        self.open_at = Some(now + self.delay);
        true
    }

    /// Advance the machine to `now`. Reports `true` exactly once per epoch:
    /// on the poll that carries the machine past its completion deadline.
    /// The caller must then apply the open side effect (store mutation and
    /// completion callback).
    pub fn poll(&mut self, now: Instant) -> bool {
        match (self.phase, self.open_at) {
            (EnvelopePhase::Opening, Some(deadline)) if now >= deadline => {
                self.phase = EnvelopePhase::Open;
                self.open_at = None;
                true
            }
            _ => false,
        }
    }
}
