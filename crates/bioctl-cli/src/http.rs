//! Blocking HTTP client for the bioreactor simulator REST API.
//!
//! Endpoints:
//! - `GET  {host}/bioreactor/{id}` - sensor snapshot (also used with id 0
//!   to discover the assigned reactor id)
//! - `GET  {host}/bioreactor/{id}/{valve}` - valve state
//! - `PUT  {host}/bioreactor/{id}/{valve}` - valve actuation, echoing the
//!   resulting state

use std::time::{Duration, Instant};

use bioctl_core::{ReactorClient, ReactorCommand, Reading, TransportError};
use serde::Deserialize;

const INPUT_VALVE: &str = "input-valve";
const OUTPUT_VALVE: &str = "output-valve";

#[derive(Debug, Deserialize)]
struct DiscoverDto {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct StatusDto {
    fill_percent: f64,
    temperature: f64,
    #[serde(rename = "pH")]
    ph: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct ValveDto {
    state: String,
}

/// [`ReactorClient`] over the simulator's REST API.
///
/// The simulator does not report elapsed time; readings are stamped from a
/// monotonic clock started at connection time.
pub struct HttpReactorClient {
    http: reqwest::blocking::Client,
    reactor_url: String,
    reactor_id: u64,
    connected_at: Instant,
}

impl HttpReactorClient {
    /// Connects to `host` and resolves the reactor id, unless one is given.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the simulator is unreachable or
    /// the discovery payload cannot be decoded.
    pub fn connect(host: &str, reactor_id: Option<u64>) -> Result<Self, TransportError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|err| TransportError::Unreachable(err.to_string()))?;

        let reactor_id = match reactor_id {
            Some(id) => id,
            None => {
                let discovered: DiscoverDto =
                    get_json(&http, &format!("{host}/bioreactor/0"))?;
                discovered.id
            }
        };

        Ok(Self {
            http,
            reactor_url: format!("{host}/bioreactor/{reactor_id}"),
            reactor_id,
            connected_at: Instant::now(),
        })
    }

    /// The reactor this client is bound to.
    #[must_use]
    pub const fn reactor_id(&self) -> u64 {
        self.reactor_id
    }

    fn valve_state(&self, valve: &str) -> Result<bool, TransportError> {
        let dto: ValveDto = get_json(&self.http, &format!("{}/{valve}", self.reactor_url))?;
        match dto.state.as_str() {
            "open" => Ok(true),
            "closed" => Ok(false),
            other => Err(TransportError::Malformed(format!(
                "unrecognized valve state {other:?} for {valve}"
            ))),
        }
    }
}

impl ReactorClient for HttpReactorClient {
    fn next_reading(&mut self) -> Result<Reading, TransportError> {
        let status: StatusDto = get_json(&self.http, &self.reactor_url)?;
        let input_valve_open = self.valve_state(INPUT_VALVE)?;
        let output_valve_open = self.valve_state(OUTPUT_VALVE)?;

        Ok(Reading {
            elapsed_secs: self.connected_at.elapsed().as_secs_f64(),
            fill_percent: status.fill_percent,
            temperature: status.temperature,
            ph: status.ph,
            pressure: status.pressure,
            input_valve_open,
            output_valve_open,
        })
    }

    fn send_command(&mut self, command: ReactorCommand) -> Result<(), TransportError> {
        let (valve, desired) = match command {
            ReactorCommand::OpenInputValve => (INPUT_VALVE, "open"),
            ReactorCommand::CloseInputValve => (INPUT_VALVE, "closed"),
            ReactorCommand::OpenOutputValve => (OUTPUT_VALVE, "open"),
            ReactorCommand::CloseOutputValve => (OUTPUT_VALVE, "closed"),
        };

        let response = self
            .http
            .put(format!("{}/{valve}", self.reactor_url))
            .json(&serde_json::json!({ "state": desired }))
            .send()
            .map_err(|err| TransportError::Unreachable(err.to_string()))?
            .error_for_status()
            .map_err(|err| TransportError::CommandRejected(err.to_string()))?;

        let echoed: ValveDto = response
            .json()
            .map_err(|err| TransportError::Malformed(err.to_string()))?;
        if echoed.state != desired {
            return Err(TransportError::CommandRejected(format!(
                "{valve} reports {:?} after requesting {desired:?}",
                echoed.state
            )));
        }
        Ok(())
    }
}

fn get_json<T: serde::de::DeserializeOwned>(
    http: &reqwest::blocking::Client,
    url: &str,
) -> Result<T, TransportError> {
    http.get(url)
        .send()
        .map_err(|err| TransportError::Unreachable(err.to_string()))?
        .error_for_status()
        .map_err(|err| TransportError::Unreachable(err.to_string()))?
        .json()
        .map_err(|err| TransportError::Malformed(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_dto_decodes_the_simulator_payload() {
        let json = r#"{"id": 7, "fill_percent": 68.714, "temperature": 25.0, "pH": 7, "pressure": 113}"#;
        let dto: StatusDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.fill_percent, 68.714);
        assert_eq!(dto.ph, 7.0);
    }

    #[test]
    fn valve_dto_decodes_state() {
        let dto: ValveDto = serde_json::from_str(r#"{"state": "closed"}"#).unwrap();
        assert_eq!(dto.state, "closed");
    }
}
