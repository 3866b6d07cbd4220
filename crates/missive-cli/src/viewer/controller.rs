//! Envelope open timing for the interactive viewer.
//!
//! The pure phase machine lives in `missive_core::reveal`; this wraps it
//! with a wall-clock timer thread so the event loop wakes up the moment the
//! opening animation finishes instead of waiting for the next input tick.
//! The thread holds a cancellation token that is flipped when the viewer
//! closes mid-animation, so a stale timer can never mutate a later screen.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use missive_core::reveal::{EnvelopePhase, EnvelopeSequencer, OPEN_DELAY};

pub struct EnvelopeController {
    sequencer: EnvelopeSequencer,
    delay: Duration,
    cancel: Option<Arc<AtomicBool>>,
    fired: Option<Receiver<()>>,
}

impl EnvelopeController {
    #[must_use]
    pub fn new() -> Self {
        Self::with_delay(OPEN_DELAY)
    }

    /// Tests shrink the delay so they never sleep for the real animation.
    #[must_use]
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            sequencer: EnvelopeSequencer::with_delay(delay),
            delay,
            cancel: None,
            fired: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> EnvelopePhase {
        self.sequencer.phase()
    }

    /// Handle a click on the closed envelope. Arms the timer on the first
    /// click; later clicks are ignored by the sequencer.
    pub fn click(&mut self) {
        if !self.sequencer.click(Instant::now()) {
            return;
        }

        let cancel = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel();
        let delay = self.delay;
        let token = Arc::clone(&cancel);
        thread::spawn(move || {
            thread::sleep(delay);
            if !token.load(Ordering::Relaxed) {
                // Receiver may already be gone; nothing to do then.
                let _ = tx.send(());
            }
        });
        self.cancel = Some(cancel);
        self.fired = Some(rx);
    }

    /// Advance the phase machine. Returns `true` exactly once, on the tick
    /// where the envelope finishes opening.
    pub fn tick(&mut self) -> bool {
        if let Some(rx) = &self.fired {
            match rx.try_recv() {
                Ok(()) | Err(TryRecvError::Disconnected) => {
                    self.fired = None;
                }
                Err(TryRecvError::Empty) => {}
            }
        }
        let opened = self.sequencer.poll(Instant::now());
        if opened {
            self.cancel = None;
        }
        opened
    }

    /// Stop a pending timer. Safe to call in any phase.
    pub fn cancel(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.store(true, Ordering::Relaxed);
        }
        self.fired = None;
    }
}

impl Default for EnvelopeController {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EnvelopeController {
    fn drop(&mut self) {
        self.cancel();
    }
}
