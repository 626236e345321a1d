//! Sensor snapshot type returned by the reactor API on each poll.

use serde::{Deserialize, Serialize};

/// One sampled snapshot of reactor sensors and valve states.
///
/// A `Reading` is produced once per poll by the [`ReactorClient`]
/// collaborator and passed by value into the current phase state. The core
/// never retains a reading beyond the evaluation call.
///
/// [`ReactorClient`]: crate::client::ReactorClient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Seconds elapsed since the session started (monotonic, >= 0).
    pub elapsed_secs: f64,

    /// Fill level as a percentage of reactor capacity. Nominally 0-100 but
    /// may exceed 100 on a fault, which is exactly the overfill condition
    /// the fill phase guards against.
    pub fill_percent: f64,

    /// Vessel temperature in degrees Celsius.
    pub temperature: f64,

    /// Batch pH.
    #[serde(rename = "pH")]
    pub ph: f64,

    /// Vessel pressure in kPa.
    pub pressure: f64,

    /// Whether the input valve is currently open.
    pub input_valve_open: bool,

    /// Whether the output valve is currently open.
    pub output_valve_open: bool,
}

impl Reading {
    /// Returns a reading with all sensors at their idle baseline and both
    /// valves closed. Useful as a starting point in tests and scripted
    /// clients.
    #[must_use]
    pub fn baseline(elapsed_secs: f64) -> Self {
        Self {
            elapsed_secs,
            fill_percent: 0.0,
            temperature: 25.0,
            ph: 7.0,
            pressure: 113.0,
            input_valve_open: false,
            output_valve_open: false,
        }
    }
}
