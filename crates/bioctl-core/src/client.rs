//! The seam between the session and whatever supplies readings.

use std::fmt;

use crate::error::TransportError;
use crate::reading::Reading;

/// An actuation request the session sends when a phase boundary is crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactorCommand {
    OpenInputValve,
    CloseInputValve,
    OpenOutputValve,
    CloseOutputValve,
}

impl fmt::Display for ReactorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OpenInputValve => "open input valve",
            Self::CloseInputValve => "close input valve",
            Self::OpenOutputValve => "open output valve",
            Self::CloseOutputValve => "close output valve",
        };
        f.write_str(name)
    }
}

/// Supplies readings and accepts control commands.
///
/// The session is generic over this trait; the CLI implements it against
/// the simulator's REST API and tests implement it with a scripted
/// in-memory reactor.
pub trait ReactorClient {
    /// Returns the next sensor snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the reactor cannot be reached or
    /// the payload cannot be decoded. The session treats this as fatal.
    fn next_reading(&mut self) -> Result<Reading, TransportError>;

    /// Performs a valve actuation.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the command cannot be delivered or
    /// the reactor does not confirm the requested valve state.
    fn send_command(&mut self, command: ReactorCommand) -> Result<(), TransportError>;
}
