//! Session-local tabulation pulse cue.

use chrono::{DateTime, TimeDelta, Utc};

/// How long the tabulation affordance pulses after arriving at a step.
pub const PULSE_WINDOW: TimeDelta = TimeDelta::seconds(4);

/// UI-local pulse state for the tabulation affordance. Fires once per step
/// arrival and clears itself after [`PULSE_WINDOW`]; never persisted and
/// never part of the step's own data.
#[derive(Debug, Default)]
pub struct TabulationCue {
    pulse_until: Option<DateTime<Utc>>,
}

impl TabulationCue {
    /// A cue with no pulse pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a step arrival, restarting the pulse window.
    pub fn arrive(&mut self, now: DateTime<Utc>) {
        self.pulse_until = Some(now + PULSE_WINDOW);
    }

    /// Whether the affordance should currently pulse.
    #[must_use]
    pub fn is_pulsing(&self, now: DateTime<Utc>) -> bool {
        self.pulse_until.is_some_and(|until| now < until)
    }

    /// Dismiss the pulse early.
    pub fn clear(&mut self) {
        self.pulse_until = None;
    }
}
