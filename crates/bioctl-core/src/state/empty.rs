//! Empty phase: wait for the product to drain.

use crate::config::EmptySettings;
use crate::cpp::{CppTracker, CppVariable};
use crate::phase::{AbortReason, ProcessPhase, Transition};
use crate::reading::Reading;
use crate::state::PhaseState;

// Drain progress smaller than this is treated as no progress at all, so
// sensor jitter cannot keep resetting the stall clock.
const PROGRESS_EPSILON: f64 = 1e-6;

/// Watches fill level drain to zero, with a stall timeout.
///
/// The simulator may never self-terminate a stalled drain, so the timeout
/// is a guard inside the phase rather than an external mechanism.
/// Temperature keeps being recorded here because the batch can continue to
/// heat while the tank drains, and the temperature CPP covers that window.
#[derive(Debug)]
pub struct EmptyState {
    settings: EmptySettings,
    last_fill: Option<f64>,
    last_progress_at: Option<f64>,
}

impl EmptyState {
    #[must_use]
    pub const fn new(settings: EmptySettings) -> Self {
        Self {
            settings,
            last_fill: None,
            last_progress_at: None,
        }
    }
}

impl PhaseState for EmptyState {
    fn phase(&self) -> ProcessPhase {
        ProcessPhase::Empty
    }

    fn evaluate(&mut self, reading: &Reading, tracker: &mut CppTracker) -> Transition {
        tracker.record(CppVariable::Temperature, reading.temperature);

        if reading.fill_percent <= self.settings.zero_tolerance {
            return Transition::AdvanceTo(ProcessPhase::Done);
        }

        let progressed = match self.last_fill {
            None => true, // first tick in this phase starts the clock
            Some(last) => reading.fill_percent < last - PROGRESS_EPSILON,
        };
        self.last_fill = Some(reading.fill_percent);
        if progressed {
            self.last_progress_at = Some(reading.elapsed_secs);
            return Transition::Stay;
        }

        let stalled_secs = self
            .last_progress_at
            .map_or(0.0, |at| (reading.elapsed_secs - at).max(0.0));
        if stalled_secs >= self.settings.stall_timeout_secs {
            return Transition::Abort(AbortReason::EmptyingStalled { stalled_secs });
        }
        Transition::Stay
    }
}
