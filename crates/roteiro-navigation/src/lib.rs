//! Roteiro — navigation state machine.
//!
//! A session tracks where one operator is inside a script: the current
//! position (a step, or the terminal call-closing state) and the ordered
//! back-history of visited steps. The machine is pure and synchronous; it
//! reads steps through [`StepLookup`] and never suspends.

mod cue;
mod error;
mod session;

pub use cue::{PULSE_WINDOW, TabulationCue};
pub use error::NavigationError;
pub use session::{NavigationSession, Position, StepLookup, resolve};
