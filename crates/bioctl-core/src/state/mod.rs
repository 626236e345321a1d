//! The process state machine: one implementation per lifecycle phase.
//!
//! Each phase encapsulates its own guard conditions behind the
//! [`PhaseState`] trait. The session holds exactly one state at a time
//! behind the trait and replaces it wholesale when a transition advances;
//! a phase is never mutated into another phase in place.

mod empty;
mod fill;
mod run;
mod start;
mod terminal;

pub use empty::EmptyState;
pub use fill::FillState;
pub use run::RunState;
pub use start::StartState;
pub use terminal::TerminalState;

use crate::client::ReactorCommand;
use crate::config::SessionConfig;
use crate::cpp::CppTracker;
use crate::phase::{ProcessPhase, Transition};
use crate::reading::Reading;

/// Polymorphic unit of the state machine.
pub trait PhaseState {
    /// The phase this state implements.
    fn phase(&self) -> ProcessPhase;

    /// Evaluates one reading against this phase's guards, recording into
    /// the tracker whichever variables are relevant to the phase.
    fn evaluate(&mut self, reading: &Reading, tracker: &mut CppTracker) -> Transition;

    /// Actuation the session must perform when leaving this phase on an
    /// advance. Empty by default.
    fn exit_commands(&self) -> &'static [ReactorCommand] {
        &[]
    }
}

/// Builds the state object for `phase` from the session configuration.
#[must_use]
pub fn state_for(phase: ProcessPhase, config: &SessionConfig) -> Box<dyn PhaseState> {
    match phase {
        ProcessPhase::Start => Box::new(StartState::new()),
        ProcessPhase::Fill => Box::new(FillState::new(config.fill)),
        ProcessPhase::Run => Box::new(RunState::new(config.run, config.bounds.pressure_max)),
        ProcessPhase::Empty => Box::new(EmptyState::new(config.empty)),
        ProcessPhase::Done | ProcessPhase::Failed => Box::new(TerminalState::new(phase)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_builds_the_requested_phase() {
        let config = SessionConfig::default();
        for phase in [
            ProcessPhase::Start,
            ProcessPhase::Fill,
            ProcessPhase::Run,
            ProcessPhase::Empty,
            ProcessPhase::Done,
            ProcessPhase::Failed,
        ] {
            assert_eq!(state_for(phase, &config).phase(), phase);
        }
    }
}
