//! Fill phase: wait for the vessel to reach the target band.

use crate::client::ReactorCommand;
use crate::config::FillSettings;
use crate::cpp::CppTracker;
use crate::phase::{AbortReason, ProcessPhase, Transition};
use crate::reading::Reading;
use crate::state::PhaseState;

/// Holds until fill level reaches the target band, aborting on overfill.
///
/// The overfill check runs before the target-band check: a reading that is
/// both above the ceiling and inside the band aborts. The ceiling defaults
/// to the band's upper edge, so with default settings the two conditions
/// cannot overlap, but a wider ceiling is configurable.
#[derive(Debug)]
pub struct FillState {
    settings: FillSettings,
}

impl FillState {
    #[must_use]
    pub const fn new(settings: FillSettings) -> Self {
        Self { settings }
    }
}

impl PhaseState for FillState {
    fn phase(&self) -> ProcessPhase {
        ProcessPhase::Fill
    }

    fn evaluate(&mut self, reading: &Reading, tracker: &mut CppTracker) -> Transition {
        tracker.record_fill_peak(reading.fill_percent);

        if reading.fill_percent > self.settings.overfill_ceiling {
            return Transition::Abort(AbortReason::Overfilled {
                fill_percent: reading.fill_percent,
                ceiling: self.settings.overfill_ceiling,
            });
        }
        if reading.fill_percent >= self.settings.target_min {
            return Transition::AdvanceTo(ProcessPhase::Run);
        }
        Transition::Stay
    }

    fn exit_commands(&self) -> &'static [ReactorCommand] {
        &[ReactorCommand::CloseInputValve]
    }
}
