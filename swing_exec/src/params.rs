//! Simulation parameters
//!
//! Groups the parameters of every module involved in simulating a swing so
//! they can be loaded from a single file.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{dynamics, flight, swing};
use util::params::{self, LoadError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for a swing simulation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimParams {
    pub dynamics: dynamics::Params,
    pub swing: swing::Params,
    pub flight: flight::Params,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with simulation parameters.
#[derive(Debug, Error)]
pub enum SimParamsError {
    #[error("Could not load the parameter file: {0}")]
    Load(#[from] LoadError),

    #[error("{name} must be finite and greater than zero, found {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error(transparent)]
    InvalidRange(#[from] swing::SwingError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimParams {
    /// Load simulation parameters from a file relative to the params
    /// directory, then validate them.
    pub fn load(param_file_path: &str) -> Result<Self, SimParamsError> {
        let p: Self = params::load(param_file_path)?;
        p.validate()?;

        Ok(p)
    }

    /// Check the step sizes and time limits, and the swing parameter ranges.
    pub fn validate(&self) -> Result<(), SimParamsError> {
        let timings = [
            ("dynamics.dt_s", self.dynamics.dt_s),
            ("swing.max_time_s", self.swing.max_time_s),
            ("flight.dt_s", self.flight.dt_s),
            ("flight.max_flight_time_s", self.flight.max_flight_time_s),
        ];

        for (name, value) in timings.iter() {
            if !(value.is_finite() && *value > 0.0) {
                return Err(SimParamsError::NotPositive {
                    name: *name,
                    value: *value,
                });
            }
        }

        self.swing.ranges.validate()?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
