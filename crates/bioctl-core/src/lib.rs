//! Core engine for the bioreactor simulator client.
//!
//! Drives a remote bioreactor batch through its lifecycle
//! (start -> fill -> run -> empty -> done), validating safety preconditions
//! at each transition, tracking process variables against
//! critical-process-parameter (CPP) thresholds, and producing a final
//! pass/fail [`BatchReport`].
//!
//! The crate is transport-agnostic: everything that talks to the simulator
//! sits behind the [`ReactorClient`] trait, and the wait between polls
//! belongs to the caller. See `bioctl-cli` for the HTTP client and the
//! polling loop.

pub mod client;
pub mod config;
pub mod cpp;
pub mod error;
pub mod monitor;
pub mod phase;
pub mod reading;
pub mod report;
pub mod session;
pub mod state;
pub mod testing;

pub use client::{ReactorClient, ReactorCommand};
pub use config::{ConfigError, SessionConfig};
pub use cpp::{CppBounds, CppOutcome, CppTracker, CppVariable, MinMax};
pub use error::{SessionError, TransportError};
pub use monitor::SafetyMonitor;
pub use phase::{AbortReason, ProcessPhase, Transition};
pub use reading::Reading;
pub use report::{BatchReport, BatchStatus, PhaseChange};
pub use session::{ReactorSession, TickEvent, TickOutcome};
