//! Lifecycle phases, transitions, and structured abort reasons.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cpp::CppVariable;

/// One stage of the reactor lifecycle.
///
/// Intended progression is Start -> Fill -> Run -> Empty -> Done. `Failed`
/// is reachable from any phase and, like `Done`, is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessPhase {
    Start,
    Fill,
    Run,
    Empty,
    Done,
    Failed,
}

impl ProcessPhase {
    /// Returns the lowercase phase name used in logs and per-tick output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Fill => "fill",
            Self::Run => "run",
            Self::Empty => "empty",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// Returns `true` once the polling loop should stop.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for ProcessPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a phase guard aborted the batch.
///
/// Guard violations are anticipated failure modes: they are carried through
/// the normal control-flow path as [`Transition::Abort`] and rendered into
/// the final report, never raised as errors.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AbortReason {
    /// The input valve was already open when the process started.
    InputValveOpenOnStart,

    /// The output valve was open when the process started.
    OutputValveOpenOnStart,

    /// Fill level exceeded the overfill ceiling.
    Overfilled {
        /// Observed fill level (percent).
        fill_percent: f64,
        /// Configured ceiling (percent).
        ceiling: f64,
    },

    /// A hard safety bound was crossed.
    SafetyBound {
        /// The variable that went out of bounds.
        variable: CppVariable,
        /// Observed value.
        value: f64,
        /// The bound that was crossed.
        limit: f64,
    },

    /// Fill level failed to decrease for longer than the configured timeout
    /// while emptying.
    EmptyingStalled {
        /// Seconds without observable drain progress.
        stalled_secs: f64,
    },

    /// The run phase exceeded its configured stall timeout without reaching
    /// the completion condition.
    RunStalled {
        /// Seconds spent in the run phase.
        elapsed_secs: f64,
    },
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputValveOpenOnStart => write!(f, "input valve open on start"),
            Self::OutputValveOpenOnStart => write!(f, "output valve open on start"),
            Self::Overfilled {
                fill_percent,
                ceiling,
            } => {
                write!(f, "overfilled: fill level {fill_percent}% above ceiling {ceiling}%")
            }
            Self::SafetyBound {
                variable,
                value,
                limit,
            } => {
                write!(f, "safety bound breached: {variable} {value} above limit {limit}")
            }
            Self::EmptyingStalled { stalled_secs } => {
                write!(f, "emptying stalled: no drain progress for {stalled_secs}s")
            }
            Self::RunStalled { elapsed_secs } => {
                write!(f, "run stalled: no completion after {elapsed_secs}s")
            }
        }
    }
}

/// The decision returned by evaluating a [`Reading`] against the current
/// phase's guards.
///
/// [`Reading`]: crate::reading::Reading
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Hold the current phase and wait for the next poll.
    Stay,

    /// Replace the current phase state with the one for the given phase.
    AdvanceTo(ProcessPhase),

    /// Abort the batch. The session moves to `Failed` and the reason is
    /// carried into the final report.
    Abort(AbortReason),
}

impl Transition {
    /// Returns `true` for [`Transition::Abort`].
    #[must_use]
    pub const fn is_abort(&self) -> bool {
        matches!(self, Self::Abort(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_phases() {
        assert!(ProcessPhase::Done.is_terminal());
        assert!(ProcessPhase::Failed.is_terminal());
        assert!(!ProcessPhase::Start.is_terminal());
        assert!(!ProcessPhase::Fill.is_terminal());
        assert!(!ProcessPhase::Run.is_terminal());
        assert!(!ProcessPhase::Empty.is_terminal());
    }

    #[test]
    fn phase_display_is_lowercase() {
        assert_eq!(ProcessPhase::Fill.to_string(), "fill");
        assert_eq!(ProcessPhase::Failed.to_string(), "failed");
    }

    #[test]
    fn abort_reason_display_names_the_guard() {
        assert_eq!(
            AbortReason::InputValveOpenOnStart.to_string(),
            "input valve open on start"
        );
        assert_eq!(
            AbortReason::OutputValveOpenOnStart.to_string(),
            "output valve open on start"
        );
        let overfilled = AbortReason::Overfilled {
            fill_percent: 73.5,
            ceiling: 72.0,
        };
        assert!(overfilled.to_string().starts_with("overfilled"));
        let stalled = AbortReason::EmptyingStalled { stalled_secs: 60.0 };
        assert!(stalled.to_string().starts_with("emptying stalled"));
    }

    #[test]
    fn safety_bound_display_names_the_variable() {
        let reason = AbortReason::SafetyBound {
            variable: CppVariable::Pressure,
            value: 260.0,
            limit: 250.0,
        };
        assert!(reason.to_string().contains("pressure"));
        assert!(reason.to_string().contains("260"));
    }
}
