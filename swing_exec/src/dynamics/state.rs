//! Linkage state structures

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector4;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The state of the two link system.
///
/// Both angles are absolute, measured from the downward vertical, so the
/// distal angle is not relative to the proximal one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkState {
    /// Proximal link angle.
    ///
    /// Units: radians
    pub theta1_rad: f64,

    /// Proximal link angular rate.
    ///
    /// Units: radians/second
    pub omega1_rads: f64,

    /// Distal link angle.
    ///
    /// Units: radians
    pub theta2_rad: f64,

    /// Distal link angular rate.
    ///
    /// Units: radians/second
    pub omega2_rads: f64,
}

/// Generalised accelerations of the two links.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accelerations {
    /// Units: radians/second^2
    pub alpha1_radss: f64,

    /// Units: radians/second^2
    pub alpha2_radss: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LinkState {
    /// Create a stationary state at the given angles.
    pub fn at_rest(theta1_rad: f64, theta2_rad: f64) -> Self {
        Self {
            theta1_rad,
            omega1_rads: 0.0,
            theta2_rad,
            omega2_rads: 0.0,
        }
    }

    /// Angle of the distal link relative to the proximal one.
    ///
    /// Negative values are lag (distal trailing), positive values release.
    ///
    /// Units: radians
    pub fn relative_rad(&self) -> f64 {
        self.theta2_rad - self.theta1_rad
    }

    /// Returns true if all components are finite.
    pub fn is_finite(&self) -> bool {
        self.theta1_rad.is_finite()
            && self.omega1_rads.is_finite()
            && self.theta2_rad.is_finite()
            && self.omega2_rads.is_finite()
    }

    /// The state as a column vector `[theta1, omega1, theta2, omega2]`.
    pub fn as_vector(&self) -> Vector4<f64> {
        Vector4::new(
            self.theta1_rad,
            self.omega1_rads,
            self.theta2_rad,
            self.omega2_rads,
        )
    }
}

impl From<Vector4<f64>> for LinkState {
    fn from(v: Vector4<f64>) -> Self {
        Self {
            theta1_rad: v[0],
            omega1_rads: v[1],
            theta2_rad: v[2],
            omega2_rads: v[3],
        }
    }
}
