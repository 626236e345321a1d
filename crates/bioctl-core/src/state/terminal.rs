//! Terminal states: Done and Failed.

use crate::cpp::CppTracker;
use crate::phase::{ProcessPhase, Transition};
use crate::reading::Reading;
use crate::state::PhaseState;

/// Done or Failed. Evaluation is idempotent: always Stay, never a tracker
/// mutation. Reaching either ends the polling loop.
#[derive(Debug)]
pub struct TerminalState {
    phase: ProcessPhase,
}

impl TerminalState {
    /// # Panics
    ///
    /// Panics if `phase` is not terminal; constructing a terminal state for
    /// a live phase is a defect.
    #[must_use]
    pub fn new(phase: ProcessPhase) -> Self {
        assert!(phase.is_terminal(), "TerminalState requires Done or Failed");
        Self { phase }
    }

    #[must_use]
    pub fn done() -> Self {
        Self::new(ProcessPhase::Done)
    }

    #[must_use]
    pub fn failed() -> Self {
        Self::new(ProcessPhase::Failed)
    }
}

impl PhaseState for TerminalState {
    fn phase(&self) -> ProcessPhase {
        self.phase
    }

    fn evaluate(&mut self, _reading: &Reading, _tracker: &mut CppTracker) -> Transition {
        Transition::Stay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_stay_forever_without_touching_the_tracker() {
        for mut state in [TerminalState::done(), TerminalState::failed()] {
            let mut tracker = CppTracker::new();
            let reading = Reading::baseline(1000.0);
            for _ in 0..10 {
                assert_eq!(state.evaluate(&reading, &mut tracker), Transition::Stay);
            }
            assert!(tracker.is_empty());
        }
    }

    #[test]
    #[should_panic(expected = "TerminalState requires Done or Failed")]
    fn live_phase_is_rejected() {
        let _ = TerminalState::new(ProcessPhase::Run);
    }
}
