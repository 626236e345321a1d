//! Test support: a scripted in-memory reactor.
//!
//! Used by the crate's own tests and available to downstream integration
//! tests; it implements [`ReactorClient`] off a fixed sequence of readings
//! and records every command it is sent.

use std::collections::VecDeque;

use crate::client::{ReactorClient, ReactorCommand};
use crate::error::TransportError;
use crate::reading::Reading;

/// A [`ReactorClient`] that replays a scripted sequence of readings.
///
/// Exhausting the script yields a transport error, which doubles as a way
/// to exercise the fatal-collaborator-failure path.
#[derive(Debug, Default)]
pub struct ScriptedReactor {
    readings: VecDeque<Reading>,
    commands: Vec<ReactorCommand>,
}

impl ScriptedReactor {
    #[must_use]
    pub fn new(readings: Vec<Reading>) -> Self {
        Self {
            readings: readings.into(),
            commands: Vec::new(),
        }
    }

    /// Every command the session dispatched, in order.
    #[must_use]
    pub fn commands(&self) -> &[ReactorCommand] {
        &self.commands
    }
}

impl ReactorClient for ScriptedReactor {
    fn next_reading(&mut self) -> Result<Reading, TransportError> {
        self.readings
            .pop_front()
            .ok_or_else(|| TransportError::Unreachable("scripted readings exhausted".to_string()))
    }

    fn send_command(&mut self, command: ReactorCommand) -> Result<(), TransportError> {
        self.commands.push(command);
        Ok(())
    }
}
