//! The letter-reveal interaction engine.
//!
//! Two pieces, both pure state with no I/O:
//! - [`interaction::InteractionState`]: envelope-open flag plus the set of
//!   unlocked block ids for the current viewing epoch.
//! - [`envelope::EnvelopeSequencer`]: the closed/opening/open phase machine
//!   with its fixed 2.5 s completion deadline.
//!
//! An epoch is one viewing session of a single letter. Switching letters
//! remounts the sequencer and calls [`interaction::InteractionState::reset`],
//! so no unlock state leaks between letters.

pub mod envelope;
pub mod interaction;

pub use envelope::{EnvelopePhase, EnvelopeSequencer, OPEN_DELAY};
pub use interaction::InteractionState;
