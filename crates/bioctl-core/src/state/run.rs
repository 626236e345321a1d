//! Run phase: hold the reaction until it completes, watching every CPP.

use crate::client::ReactorCommand;
use crate::config::RunSettings;
use crate::cpp::{CppTracker, CppVariable};
use crate::phase::{AbortReason, ProcessPhase, Transition};
use crate::reading::Reading;
use crate::state::PhaseState;

/// Records temperature, pH, pressure, and fill level every tick and
/// advances once the reaction signals completion.
///
/// Completion is the stop-temperature band (the reaction is exothermic and
/// temperature is the completion signal), or a configured run duration when
/// one is set. Hard bounds abort immediately: over-pressure against the
/// process limit, over-temperature past the stop band's upper edge. The
/// run-phase fill level is only recorded; a drift outside the stability
/// band surfaces at report time as an unmet CPP, not as an abort.
#[derive(Debug)]
pub struct RunState {
    settings: RunSettings,
    pressure_limit: f64,
    entered_at: Option<f64>,
}

impl RunState {
    #[must_use]
    pub const fn new(settings: RunSettings, pressure_limit: f64) -> Self {
        Self {
            settings,
            pressure_limit,
            entered_at: None,
        }
    }

    fn elapsed_in_run(&mut self, reading: &Reading) -> f64 {
        let entered = *self.entered_at.get_or_insert(reading.elapsed_secs);
        (reading.elapsed_secs - entered).max(0.0)
    }
}

impl PhaseState for RunState {
    fn phase(&self) -> ProcessPhase {
        ProcessPhase::Run
    }

    fn evaluate(&mut self, reading: &Reading, tracker: &mut CppTracker) -> Transition {
        tracker.record(CppVariable::Temperature, reading.temperature);
        tracker.record(CppVariable::Ph, reading.ph);
        tracker.record(CppVariable::Pressure, reading.pressure);
        tracker.record(CppVariable::FillLevel, reading.fill_percent);

        let elapsed_in_run = self.elapsed_in_run(reading);

        if reading.pressure > self.pressure_limit {
            return Transition::Abort(AbortReason::SafetyBound {
                variable: CppVariable::Pressure,
                value: reading.pressure,
                limit: self.pressure_limit,
            });
        }
        if reading.temperature > self.settings.stop_temp.max {
            // The published process does not say what an over-temperature
            // excursion means. Abort rather than keep reacting.
            return Transition::Abort(AbortReason::SafetyBound {
                variable: CppVariable::Temperature,
                value: reading.temperature,
                limit: self.settings.stop_temp.max,
            });
        }

        if reading.temperature >= self.settings.stop_temp.min {
            return Transition::AdvanceTo(ProcessPhase::Empty);
        }
        if let Some(run_secs) = self.settings.run_secs {
            if elapsed_in_run >= run_secs {
                return Transition::AdvanceTo(ProcessPhase::Empty);
            }
        }

        if let Some(timeout) = self.settings.stall_timeout_secs {
            if elapsed_in_run >= timeout {
                return Transition::Abort(AbortReason::RunStalled {
                    elapsed_secs: elapsed_in_run,
                });
            }
        }

        Transition::Stay
    }

    fn exit_commands(&self) -> &'static [ReactorCommand] {
        &[ReactorCommand::OpenOutputValve]
    }
}
