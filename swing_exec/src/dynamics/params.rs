//! Parameters structure for the linkage dynamics

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the two link dynamics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    // ---- ENVIRONMENT ----
    /// Gravitational acceleration.
    ///
    /// Units: meters/second^2
    pub gravity_mss: f64,

    // ---- GEOMETRY ----
    /// Length of the proximal link (shoulder to wrist).
    ///
    /// Units: meters
    pub link1_length_m: f64,

    /// Length of the distal link (wrist to club head).
    ///
    /// Units: meters
    pub link2_length_m: f64,

    // ---- MASS ----
    /// Mass of the proximal link, lumped at its end point.
    ///
    /// Units: kilograms
    pub link1_mass_kg: f64,

    /// Effective mass of the distal link, lumped at its end point.
    ///
    /// Units: kilograms
    pub link2_mass_kg: f64,

    // ---- INTEGRATION ----
    /// Integration step size.
    ///
    /// Units: seconds
    pub dt_s: f64,

    /// Mass matrix determinants with an absolute value below this are treated
    /// as singular, producing zero accelerations.
    pub singular_det_threshold: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            gravity_mss: 9.81,
            link1_length_m: 0.55,
            link2_length_m: 0.95,
            link1_mass_kg: 4.5,
            link2_mass_kg: 0.35,
            dt_s: 0.0005,
            singular_det_threshold: 1e-10,
        }
    }
}

impl Params {
    /// Total reach of the linkage when both links are in line.
    ///
    /// Units: meters
    pub fn reach_m(&self) -> f64 {
        self.link1_length_m + self.link2_length_m
    }
}
