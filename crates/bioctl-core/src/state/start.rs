//! Pre-flight phase: sanity-check the reactor before opening anything.

use crate::client::ReactorCommand;
use crate::cpp::CppTracker;
use crate::phase::{AbortReason, ProcessPhase, Transition};
use crate::reading::Reading;
use crate::state::PhaseState;

/// Valid only when both valves are closed on entry.
///
/// No CPP tracking occurs here; temperature, pH, and pressure are
/// meaningless before the reaction runs and the vessel is still empty.
#[derive(Debug, Default)]
pub struct StartState;

impl StartState {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PhaseState for StartState {
    fn phase(&self) -> ProcessPhase {
        ProcessPhase::Start
    }

    fn evaluate(&mut self, reading: &Reading, _tracker: &mut CppTracker) -> Transition {
        if reading.input_valve_open {
            return Transition::Abort(AbortReason::InputValveOpenOnStart);
        }
        if reading.output_valve_open {
            return Transition::Abort(AbortReason::OutputValveOpenOnStart);
        }
        Transition::AdvanceTo(ProcessPhase::Fill)
    }

    fn exit_commands(&self) -> &'static [ReactorCommand] {
        &[ReactorCommand::OpenInputValve]
    }
}
