//! Critical-process-parameter tracking.
//!
//! The tracker accumulates a widening (min, max) per monitored variable as
//! phases record readings, and evaluates the recorded ranges against the
//! configured [`CppBounds`] when the report is built. Recording is
//! append-only: ranges only widen, never shrink.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A sensor variable whose value must stay within defined bounds for the
/// batch to be considered successful.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CppVariable {
    Temperature,
    Ph,
    Pressure,
    /// Fill level during the run phase (stability band).
    FillLevel,
}

impl fmt::Display for CppVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Temperature => "temperature",
            Self::Ph => "pH",
            Self::Pressure => "pressure",
            Self::FillLevel => "fill level",
        };
        f.write_str(name)
    }
}

/// An inclusive (min, max) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

impl MinMax {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns `true` when `value` lies within `[min, max]`.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn widen(&mut self, value: f64) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }
}

/// Static per-variable thresholds, fixed at construction.
///
/// Temperature and pressure carry an upper safety limit only: their CPP is
/// met when the recorded max did not exceed the bound. pH and run-phase fill
/// level are band variables: both the recorded min and max must lie within
/// the band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CppBounds {
    /// Upper bound on temperature over the run and empty phases.
    pub temperature_max: f64,

    /// Acceptable pH band.
    pub ph: MinMax,

    /// Upper bound on pressure.
    pub pressure_max: f64,

    /// Fill level band that must hold throughout the run phase.
    pub run_fill_band: MinMax,
}

impl Default for CppBounds {
    fn default() -> Self {
        Self {
            temperature_max: 81.0,
            // The simulated process has no pH requirement; the full scale
            // keeps the variable reported without constraining it.
            ph: MinMax::new(0.0, 14.0),
            pressure_max: 200.0,
            run_fill_band: MinMax::new(68.0, 72.0),
        }
    }
}

impl CppBounds {
    fn met(&self, variable: CppVariable, range: MinMax) -> bool {
        match variable {
            CppVariable::Temperature => range.max <= self.temperature_max,
            CppVariable::Pressure => range.max <= self.pressure_max,
            CppVariable::Ph => self.ph.contains(range.min) && self.ph.contains(range.max),
            CppVariable::FillLevel => {
                self.run_fill_band.contains(range.min) && self.run_fill_band.contains(range.max)
            }
        }
    }
}

/// A per-variable line in the final report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CppOutcome {
    pub variable: CppVariable,
    pub min: f64,
    pub max: f64,
    pub met: bool,
}

/// Accumulates running (min, max) statistics per monitored variable.
///
/// Mutated exactly once per reading by the currently active phase state.
/// The peak fill level observed during the fill phase is tracked as a
/// separate channel so that low fill values seen while filling do not
/// pollute the run-phase stability band.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CppTracker {
    ranges: BTreeMap<CppVariable, MinMax>,
    fill_peak: Option<f64>,
}

impl CppTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Widens the stored (min, max) for `variable` with `value`.
    ///
    /// NaN values are dropped rather than allowed to poison the range.
    pub fn record(&mut self, variable: CppVariable, value: f64) {
        if value.is_nan() {
            return;
        }
        self.ranges
            .entry(variable)
            .and_modify(|range| range.widen(value))
            .or_insert_with(|| MinMax::new(value, value));
    }

    /// Widens the fill-phase peak ("max level reached during fill").
    pub fn record_fill_peak(&mut self, fill_percent: f64) {
        if fill_percent.is_nan() {
            return;
        }
        match self.fill_peak {
            Some(peak) if peak >= fill_percent => {}
            _ => self.fill_peak = Some(fill_percent),
        }
    }

    /// Returns the recorded range for `variable`, if any reading touched it.
    #[must_use]
    pub fn range(&self, variable: CppVariable) -> Option<MinMax> {
        self.ranges.get(&variable).copied()
    }

    /// Returns the peak fill level observed during the fill phase.
    #[must_use]
    pub const fn fill_peak(&self) -> Option<f64> {
        self.fill_peak
    }

    /// Returns `true` when no variable has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty() && self.fill_peak.is_none()
    }

    /// Compares the recorded ranges against `bounds`.
    ///
    /// Returns one outcome per variable that observed at least one reading,
    /// in a stable order. Variables with no data produce no outcome; an
    /// aborted batch is already marked failed by its terminal phase.
    #[must_use]
    pub fn evaluate(&self, bounds: &CppBounds) -> Vec<CppOutcome> {
        self.ranges
            .iter()
            .map(|(&variable, &range)| CppOutcome {
                variable,
                min: range.min,
                max: range.max,
                met: bounds.met(variable, range),
            })
            .collect()
    }
}
