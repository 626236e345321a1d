//! The orchestrator: owns the current phase state and the CPP tracker,
//! drives transitions, and produces the final report.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::client::{ReactorClient, ReactorCommand};
use crate::config::SessionConfig;
use crate::cpp::CppTracker;
use crate::error::SessionError;
use crate::monitor::SafetyMonitor;
use crate::phase::{AbortReason, ProcessPhase, Transition};
use crate::report::{BatchReport, BatchStatus, PhaseChange};
use crate::state::{self, PhaseState, TerminalState};

// Actuation performed when any guard aborts the batch: stop feeding the
// vessel and discard its contents.
const DISCARD_COMMANDS: [ReactorCommand; 2] = [
    ReactorCommand::CloseInputValve,
    ReactorCommand::OpenOutputValve,
];

/// What one tick did.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    /// Reactor-clock timestamp of the reading that drove this tick.
    pub elapsed_secs: f64,

    /// The decision the tick acted on.
    pub event: TickEvent,
}

/// The acted-on transition of one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    /// The phase held; nothing changed.
    Stayed(ProcessPhase),

    /// The machine advanced into the given phase.
    Advanced(ProcessPhase),

    /// A guard aborted the batch; the session is now in `Failed`.
    Aborted(AbortReason),
}

/// Drives one batch from Start to a terminal phase.
///
/// Exactly one phase state is current at any time. The session exclusively
/// owns the tracker and the state; readings pass through by value and are
/// not retained. Guard violations never escape as errors: they become the
/// `Failed` terminal phase and a failure report. Only collaborator failures
/// and invariant violations return `Err`.
pub struct ReactorSession {
    config: SessionConfig,
    tracker: CppTracker,
    monitor: SafetyMonitor,
    state: Box<dyn PhaseState>,
    phases: Vec<PhaseChange>,
    failure: Option<AbortReason>,
    first_elapsed: Option<f64>,
    last_elapsed: f64,
    started_at: DateTime<Utc>,
}

impl ReactorSession {
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            monitor: SafetyMonitor::new(config.safety),
            state: Box::new(state::StartState::new()),
            tracker: CppTracker::new(),
            phases: Vec::new(),
            failure: None,
            first_elapsed: None,
            last_elapsed: 0.0,
            started_at: Utc::now(),
            config,
        }
    }

    /// The phase the machine is currently in.
    #[must_use]
    pub fn phase(&self) -> ProcessPhase {
        self.state.phase()
    }

    /// Returns `true` once the polling loop should stop.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.phase().is_terminal()
    }

    /// Pulls one reading and advances the machine by one step.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Transport`] when the client fails; fatal, no
    ///   report can be built from it.
    /// - [`SessionError::AlreadyTerminal`] when called after the machine
    ///   reached Done or Failed; a caller defect.
    pub fn tick<C: ReactorClient>(&mut self, client: &mut C) -> Result<TickOutcome, SessionError> {
        if self.is_terminal() {
            return Err(SessionError::AlreadyTerminal {
                phase: self.phase(),
            });
        }

        let reading = client.next_reading()?;
        let elapsed_secs = reading.elapsed_secs;
        if self.first_elapsed.is_none() {
            self.first_elapsed = Some(elapsed_secs);
            self.phases.push(PhaseChange {
                elapsed_secs,
                phase: self.phase(),
            });
        }
        self.last_elapsed = elapsed_secs;

        let mut transition = self.state.evaluate(&reading, &mut self.tracker);

        // Backstop: not every phase watches every parameter, so the safety
        // monitor gets the reading too. A phase-level abort already wins.
        if !transition.is_abort() {
            if let Some(reason) = self.monitor.check(&reading) {
                transition = Transition::Abort(reason);
            }
        }

        let event = match transition {
            Transition::Stay => {
                debug!(phase = %self.phase(), elapsed_secs, "holding");
                TickEvent::Stayed(self.phase())
            }
            Transition::AdvanceTo(next) => {
                for command in self.state.exit_commands() {
                    client.send_command(*command)?;
                }
                info!(from = %self.phase(), to = %next, elapsed_secs, "phase advance");
                self.state = state::state_for(next, &self.config);
                self.phases.push(PhaseChange {
                    elapsed_secs,
                    phase: next,
                });
                TickEvent::Advanced(next)
            }
            Transition::Abort(reason) => {
                warn!(phase = %self.phase(), elapsed_secs, %reason, "batch aborted");
                // Discard the batch. If the reactor is also unreachable we
                // still want the failure report, so a command error here is
                // logged rather than propagated.
                for command in DISCARD_COMMANDS {
                    if let Err(err) = client.send_command(command) {
                        warn!(%command, %err, "discard command failed");
                    }
                }
                self.state = Box::new(TerminalState::failed());
                self.phases.push(PhaseChange {
                    elapsed_secs,
                    phase: ProcessPhase::Failed,
                });
                self.failure = Some(reason.clone());
                TickEvent::Aborted(reason)
            }
        };

        Ok(TickOutcome {
            elapsed_secs,
            event,
        })
    }

    /// Runs the tick loop to a terminal phase and builds the report.
    ///
    /// The wait between polls belongs to the client or the caller's loop;
    /// this method issues back-to-back ticks.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Transport`] when the client fails mid-run.
    pub fn run<C: ReactorClient>(mut self, client: &mut C) -> Result<BatchReport, SessionError> {
        while !self.is_terminal() {
            self.tick(client)?;
        }
        Ok(self.finish())
    }

    /// Builds the final report.
    ///
    /// Done maps to `Success`, Failed to `Failure` naming the violated
    /// guard, and a session that never reached a terminal phase to
    /// `Cancelled` - a partial report from whatever was tracked so far.
    #[must_use]
    pub fn finish(self) -> BatchReport {
        let status = match (self.phase(), &self.failure) {
            (ProcessPhase::Failed, Some(reason)) => BatchStatus::Failure {
                reason: reason.to_string(),
            },
            (ProcessPhase::Failed, None) => BatchStatus::Failure {
                reason: "process did not complete".to_string(),
            },
            (ProcessPhase::Done, _) => BatchStatus::Success,
            _ => BatchStatus::Cancelled,
        };

        let elapsed_secs = self
            .first_elapsed
            .map_or(0.0, |first| (self.last_elapsed - first).max(0.0));

        BatchReport {
            status,
            terminal_phase: self.phase(),
            elapsed_secs,
            started_at: self.started_at,
            finished_at: Utc::now(),
            fill_peak: self.tracker.fill_peak(),
            cpp: self.tracker.evaluate(&self.config.bounds),
            phases: self.phases,
        }
    }

    /// Builds a report for a run the caller stopped between ticks.
    ///
    /// Equivalent to [`finish`](Self::finish) when the machine already
    /// reached a terminal phase; otherwise the status is `Cancelled`,
    /// never `Success`.
    #[must_use]
    pub fn finish_cancelled(self) -> BatchReport {
        self.finish()
    }
}
