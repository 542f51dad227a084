//! Torque control schedules
//!
//! Joint torques are described as lists of pulses which are looked up by
//! time, rather than by inline comparisons in the simulation loop.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

use super::SwingParams;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A constant torque applied over the half-open interval `[start_s, end_s)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TorquePulse {
    /// Units: seconds
    pub start_s: f64,

    /// Units: seconds
    pub end_s: f64,

    /// Units: newton meters
    pub mag_nm: f64,
}

/// The torque pulses acting on a single joint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TorqueSchedule {
    pulses: Vec<TorquePulse>,
}

/// Torque schedules for both joints.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ControlSchedule {
    pub proximal: TorqueSchedule,
    pub distal: TorqueSchedule,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TorquePulse {
    /// Create a pulse starting at `start_s` and lasting `dur_s`.
    pub fn new(start_s: f64, dur_s: f64, mag_nm: f64) -> Self {
        Self {
            start_s,
            end_s: start_s + dur_s,
            mag_nm,
        }
    }

    pub fn is_active(&self, time_s: f64) -> bool {
        time_s >= self.start_s && time_s < self.end_s
    }
}

impl TorqueSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pulse to the schedule.
    pub fn with_pulse(mut self, pulse: TorquePulse) -> Self {
        self.pulses.push(pulse);
        self
    }

    pub fn pulses(&self) -> &[TorquePulse] {
        &self.pulses
    }

    /// Torque demanded at the given time. Overlapping pulses add.
    pub fn torque_at(&self, time_s: f64) -> f64 {
        self.pulses
            .iter()
            .filter(|p| p.is_active(time_s))
            .map(|p| p.mag_nm)
            .sum()
    }
}

impl ControlSchedule {
    /// Torques on the proximal and distal joints at the given time.
    pub fn torques_at(&self, time_s: f64) -> (f64, f64) {
        (
            self.proximal.torque_at(time_s),
            self.distal.torque_at(time_s),
        )
    }
}

impl From<&SwingParams> for ControlSchedule {
    fn from(params: &SwingParams) -> Self {
        Self {
            proximal: TorqueSchedule::new().with_pulse(TorquePulse::new(
                0.0,
                params.t1_dur_s,
                params.t1_mag_nm,
            )),
            distal: TorqueSchedule::new().with_pulse(TorquePulse::new(
                params.t2_delay_s,
                params.t2_dur_s,
                params.t2_mag_nm,
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
