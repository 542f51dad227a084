//! Parameters structure for the ball flight model

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the ball flight model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    // ---- COLLISION ----
    /// Units: kilograms
    pub club_head_mass_kg: f64,

    /// Units: kilograms
    pub ball_mass_kg: f64,

    /// Coefficient of restitution between club face and ball.
    pub restitution_coeff: f64,

    /// Fraction of the ideal collision energy actually transferred.
    pub energy_factor: f64,

    /// Upper limit on the ball speed after impact.
    ///
    /// Units: meters/second
    pub max_ball_speed_ms: f64,

    // ---- LAUNCH ----
    /// Static loft of the club face.
    ///
    /// Units: degrees
    pub loft_deg: f64,

    /// Radians of loft removed per radian of forward shaft lean.
    pub loft_per_lean: f64,

    /// Units: radians
    pub min_dynamic_loft_rad: f64,

    /// Weight of the dynamic loft in the launch angle.
    pub launch_loft_weight: f64,

    /// Weight of the attack angle in the launch angle.
    pub launch_attack_weight: f64,

    // ---- STRIKE QUALITY ----
    /// Shaft lean giving the largest smash bonus.
    ///
    /// Units: degrees
    pub ideal_lean_deg: f64,

    pub lean_bonus_peak: f64,

    /// Bonus lost per degree away from the ideal lean.
    pub lean_bonus_slope: f64,

    pub lean_bonus_floor: f64,

    /// Attack angles in `[steep_attack_deg, up_attack_deg]` are not
    /// penalised.
    ///
    /// Units: degrees
    pub steep_attack_deg: f64,

    /// Units: degrees
    pub up_attack_deg: f64,

    /// Penalty per degree steeper than `steep_attack_deg`.
    pub steep_attack_slope: f64,

    pub steep_attack_floor: f64,

    /// Penalty per degree above `up_attack_deg`.
    pub up_attack_slope: f64,

    pub up_attack_floor: f64,

    // ---- AERODYNAMICS ----
    /// Integration step for the ball flight.
    ///
    /// Units: seconds
    pub dt_s: f64,

    /// Quadratic drag coefficient per unit mass.
    ///
    /// Units: 1/meters
    pub drag_coeff: f64,

    /// Units: seconds
    pub max_flight_time_s: f64,

    // ---- ROLL ----
    /// Run coefficient for a landing angle of zero.
    pub run_coeff_intercept: f64,

    /// Run coefficient lost per degree of landing angle.
    pub run_coeff_slope: f64,

    pub min_run_coeff: f64,

    pub max_run_coeff: f64,

    /// Number of points appended to the trajectory for the roll.
    pub num_roll_points: usize,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            club_head_mass_kg: 0.3,
            ball_mass_kg: 0.0459,
            restitution_coeff: 0.78,
            energy_factor: 0.95,
            max_ball_speed_ms: 68.0,
            loft_deg: 34.0,
            loft_per_lean: 0.7,
            min_dynamic_loft_rad: 0.1,
            launch_loft_weight: 0.85,
            launch_attack_weight: 0.15,
            ideal_lean_deg: 12.0,
            lean_bonus_peak: 0.05,
            lean_bonus_slope: 0.005,
            lean_bonus_floor: -0.15,
            steep_attack_deg: -10.0,
            up_attack_deg: 5.0,
            steep_attack_slope: 0.03,
            steep_attack_floor: 0.6,
            up_attack_slope: 0.02,
            up_attack_floor: 0.75,
            dt_s: 0.02,
            drag_coeff: 0.008,
            max_flight_time_s: 10.0,
            run_coeff_intercept: 0.6,
            run_coeff_slope: 0.01,
            min_run_coeff: 0.05,
            max_run_coeff: 0.5,
            num_roll_points: 20,
        }
    }
}
