//! The final structured summary of a completed, failed, or cancelled run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cpp::CppOutcome;
use crate::phase::ProcessPhase;

/// Overall batch outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchStatus {
    /// The machine walked every phase through to Done.
    Success,

    /// A guard violation aborted the batch.
    Failure {
        /// Human-readable description of the violated guard or CPP.
        reason: String,
    },

    /// The caller stopped the loop between ticks before a terminal phase
    /// was reached. Distinguishable from both success and failure; the
    /// tracked data up to the cancellation is still reported.
    Cancelled,
}

impl BatchStatus {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// One entry in the phase history: when (in reactor elapsed seconds) a
/// phase became current.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseChange {
    pub elapsed_secs: f64,
    pub phase: ProcessPhase,
}

/// Final report for one batch.
///
/// Built exactly once, when the session reaches a terminal phase or is
/// cancelled, and read-only afterward. The session keeps no reference to
/// it; formatting is entirely the renderer's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Overall outcome. Flattened so the JSON carries a top-level
    /// `status` tag (plus `reason` on failure).
    #[serde(flatten)]
    pub status: BatchStatus,

    /// Phase the machine was in when the run ended.
    pub terminal_phase: ProcessPhase,

    /// Reactor-clock seconds between the first and last reading.
    pub elapsed_secs: f64,

    /// Wall-clock session start.
    pub started_at: DateTime<Utc>,

    /// Wall-clock session end.
    pub finished_at: DateTime<Utc>,

    /// Max level reached during the fill stage, when the fill phase ran.
    pub fill_peak: Option<f64>,

    /// Per-variable (min, max, met) for every variable that observed data.
    pub cpp: Vec<CppOutcome>,

    /// Phase history in entry order.
    pub phases: Vec<PhaseChange>,
}

impl BatchReport {
    /// Seconds spent in `phase`: from its entry to the next entry, or to
    /// the last reading for the final phase. `None` when the phase was
    /// never entered.
    #[must_use]
    pub fn phase_duration_secs(&self, phase: ProcessPhase) -> Option<f64> {
        let index = self.phases.iter().position(|change| change.phase == phase)?;
        let entered = self.phases[index].elapsed_secs;
        let end_of_run = self
            .phases
            .first()
            .map_or(entered, |first| first.elapsed_secs + self.elapsed_secs);
        let left = self
            .phases
            .get(index + 1)
            .map_or(end_of_run, |next| next.elapsed_secs);
        Some((left - entered).max(0.0))
    }

    /// Returns `true` when every recorded CPP met its bounds.
    #[must_use]
    pub fn all_cpp_met(&self) -> bool {
        self.cpp.iter().all(|outcome| outcome.met)
    }
}
