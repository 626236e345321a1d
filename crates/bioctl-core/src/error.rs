//! Error types for the session and its collaborators.
//!
//! Guard violations are not errors: they travel through the state machine as
//! [`Transition::Abort`] and end in a failed report. The types here cover
//! the two cases that do escape the session boundary: a collaborator
//! failure (no report can be trusted without sensor data) and an invariant
//! violation (a defect, surfaced loudly).
//!
//! [`Transition::Abort`]: crate::phase::Transition::Abort

use thiserror::Error;

use crate::phase::ProcessPhase;

/// Errors emitted by [`ReactorClient`] implementations.
///
/// [`ReactorClient`]: crate::client::ReactorClient
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The reading source is unreachable.
    #[error("reactor unreachable: {0}")]
    Unreachable(String),

    /// The API responded but the payload could not be decoded.
    #[error("malformed reactor response: {0}")]
    Malformed(String),

    /// A valve command was sent but the reactor did not confirm the
    /// requested state.
    #[error("command rejected: {0}")]
    CommandRejected(String),
}

/// Errors that escape the reactor session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// The reading source failed. Fatal to the run: the report cannot be
    /// trusted without sensor data, so this is never folded into it.
    #[error("reactor transport failure: {source}")]
    Transport {
        #[from]
        source: TransportError,
    },

    /// `tick` was called on a session that already reached a terminal
    /// phase. This is a caller defect, not an anticipated condition.
    #[error("session already terminal in phase {phase}")]
    AlreadyTerminal {
        /// The terminal phase the session is in.
        phase: ProcessPhase,
    },
}
