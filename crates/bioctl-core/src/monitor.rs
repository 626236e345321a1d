//! Safety backstop independent of the phase logic.

use crate::config::SafetySettings;
use crate::cpp::CppVariable;
use crate::phase::AbortReason;
use crate::reading::Reading;

/// Checks safety-critical parameters on every tick, regardless of phase.
///
/// Not every phase watches every variable; an over-pressure event is
/// possible while filling, for example. The monitor covers those gaps with
/// limits looser than the process limits the run phase enforces, so it only
/// fires when the phase guards have already missed something.
#[derive(Debug, Clone, Copy)]
pub struct SafetyMonitor {
    limits: SafetySettings,
}

impl SafetyMonitor {
    #[must_use]
    pub const fn new(limits: SafetySettings) -> Self {
        Self { limits }
    }

    /// Returns the breached bound, if any.
    #[must_use]
    pub fn check(&self, reading: &Reading) -> Option<AbortReason> {
        if reading.temperature > self.limits.max_temperature {
            return Some(AbortReason::SafetyBound {
                variable: CppVariable::Temperature,
                value: reading.temperature,
                limit: self.limits.max_temperature,
            });
        }
        if reading.pressure > self.limits.max_pressure {
            return Some(AbortReason::SafetyBound {
                variable: CppVariable::Pressure,
                value: reading.pressure,
                limit: self.limits.max_pressure,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor() -> SafetyMonitor {
        SafetyMonitor::new(SafetySettings {
            max_temperature: 100.0,
            max_pressure: 200.0,
        })
    }

    #[test]
    fn in_bounds_reading_passes() {
        let mut reading = Reading::baseline(0.0);
        reading.temperature = 90.0;
        assert!(monitor().check(&reading).is_none());
    }

    #[test]
    fn over_temperature_is_caught() {
        let mut reading = Reading::baseline(0.0);
        reading.temperature = 110.0;
        let reason = monitor().check(&reading).unwrap();
        assert!(matches!(
            reason,
            AbortReason::SafetyBound {
                variable: CppVariable::Temperature,
                ..
            }
        ));
    }

    #[test]
    fn over_pressure_is_caught() {
        let mut reading = Reading::baseline(0.0);
        reading.pressure = 260.0;
        let reason = monitor().check(&reading).unwrap();
        assert!(matches!(
            reason,
            AbortReason::SafetyBound {
                variable: CppVariable::Pressure,
                ..
            }
        ));
    }
}
