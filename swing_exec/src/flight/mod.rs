//! # Ball flight module
//!
//! Converts the club head state at impact into a ball launch, integrates the
//! ball through the air with quadratic drag and estimates the roll after
//! landing.
//!
//! Velocities use the same frame as the swing, +x forward and +y down, so a
//! rising ball has a negative y velocity. Angles reported by this module are
//! positive upwards for the attack and launch angles and positive downwards
//! for the landing angle.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::warn;
use nalgebra::{Point2, Vector2};
use serde::Serialize;

// Internal
pub use params::*;
use util::maths;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Upper limit on the airborne trajectory capacity reserved before a flight.
const MAX_RESERVED_POINTS: usize = 1 << 16;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A point on the ball trajectory.
///
/// Units: meters,
/// Frame: proximal joint origin, +x forward, +y down
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BallPoint {
    pub x_m: f64,
    pub y_m: f64,
}

/// The computed flight of a struck ball.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flight {
    /// Airborne points followed by the landing point and the roll points.
    pub trajectory: Vec<BallPoint>,

    /// Carry plus run.
    ///
    /// Units: meters
    pub distance_m: f64,

    /// Units: meters
    pub carry_distance_m: f64,

    /// Units: meters
    pub run_distance_m: f64,

    /// Units: degrees
    pub attack_angle_deg: f64,

    /// Units: degrees
    pub dynamic_loft_deg: f64,

    /// Units: degrees
    pub launch_angle_deg: f64,

    /// Units: degrees
    pub landing_angle_deg: f64,

    pub smash_factor: f64,

    /// Units: meters/second
    pub ball_speed_ms: f64,

    /// Greatest height of the ball above the ground.
    ///
    /// Units: meters
    pub apex_height_m: f64,

    /// Units: seconds
    pub flight_time_s: f64,

    /// False if the ball was still airborne at the maximum flight time.
    pub landed: bool,
}

/// The ball flight model.
#[derive(Debug, Clone)]
pub struct FlightModel {
    params: Params,
    gravity_mss: f64,

    /// Resting ball position, which also sets the ground height.
    tee_m: Point2<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl From<Point2<f64>> for BallPoint {
    fn from(p: Point2<f64>) -> Self {
        Self { x_m: p.x, y_m: p.y }
    }
}

impl FlightModel {
    pub fn new(params: Params, gravity_mss: f64, tee_m: Point2<f64>) -> Self {
        Self {
            params,
            gravity_mss,
            tee_m,
        }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn tee_position(&self) -> Point2<f64> {
        self.tee_m
    }

    /// Compute the ball flight resulting from an impact.
    ///
    /// `impact_vx_ms` and `impact_vy_ms` are the club head velocity at contact
    /// (+y down), `shaft_lean_deg` is positive when the hands lead the head.
    pub fn flight(&self, impact_vx_ms: f64, impact_vy_ms: f64, shaft_lean_deg: f64) -> Flight {
        let p = &self.params;
        let ground_y = self.tee_m.y;

        // ---- LAUNCH ----

        let attack_rad = (-impact_vy_ms).atan2(impact_vx_ms);
        let attack_deg = attack_rad.to_degrees();
        let dynamic_loft_rad = self.dynamic_loft_rad(shaft_lean_deg);
        let launch_rad = self.launch_angle_rad(dynamic_loft_rad, attack_rad);

        let club_speed_ms = impact_vx_ms.hypot(impact_vy_ms);
        let smash_factor = self.smash_factor(shaft_lean_deg, attack_deg);
        let ball_speed_ms = (club_speed_ms * smash_factor).min(p.max_ball_speed_ms);

        // ---- CARRY ----

        let max_steps = maths::whole_steps(p.max_flight_time_s, p.dt_s);

        let mut pos = self.tee_m;
        let mut vel = Vector2::new(
            ball_speed_ms * launch_rad.cos(),
            -ball_speed_ms * launch_rad.sin(),
        );
        let mut trajectory = Vec::with_capacity(
            max_steps
                .min(MAX_RESERVED_POINTS)
                .saturating_add(p.num_roll_points)
                .saturating_add(1),
        );
        let mut min_y = ground_y;
        let mut num_steps = 0usize;
        let mut landed = false;

        while num_steps < max_steps {
            trajectory.push(BallPoint::from(pos));

            let drag = p.drag_coeff * vel.norm();

            pos += vel * p.dt_s;
            vel.x -= drag * vel.x * p.dt_s;
            vel.y += self.gravity_mss * p.dt_s - drag * vel.y * p.dt_s;

            num_steps += 1;
            min_y = min_y.min(pos.y);

            if pos.y >= ground_y {
                landed = true;
                break;
            }
        }

        if !landed {
            warn!(
                "Ball still airborne after {} s, using distance travelled as carry",
                p.max_flight_time_s
            );
        }

        let carry_distance_m = pos.x - self.tee_m.x;
        trajectory.push(BallPoint {
            x_m: pos.x,
            y_m: ground_y,
        });

        // ---- ROLL ----

        let landing_angle_deg = vel.y.atan2(vel.x).to_degrees();
        let run_distance_m = carry_distance_m * self.run_coefficient(landing_angle_deg);

        if p.num_roll_points > 0 {
            let step_m = run_distance_m / p.num_roll_points as f64;
            for i in 1..=p.num_roll_points {
                trajectory.push(BallPoint {
                    x_m: self.tee_m.x + carry_distance_m + step_m * i as f64,
                    y_m: ground_y,
                });
            }
        }

        Flight {
            trajectory,
            distance_m: carry_distance_m + run_distance_m,
            carry_distance_m,
            run_distance_m,
            attack_angle_deg: attack_deg,
            dynamic_loft_deg: dynamic_loft_rad.to_degrees(),
            launch_angle_deg: launch_rad.to_degrees(),
            landing_angle_deg,
            smash_factor,
            ball_speed_ms,
            apex_height_m: ground_y - min_y,
            flight_time_s: num_steps as f64 * p.dt_s,
            landed,
        }
    }

    /// Effective loft after forward shaft lean has delofted the face.
    ///
    /// Units: radians
    pub fn dynamic_loft_rad(&self, shaft_lean_deg: f64) -> f64 {
        let p = &self.params;

        (p.loft_deg.to_radians() - shaft_lean_deg.to_radians() * p.loft_per_lean)
            .max(p.min_dynamic_loft_rad)
    }

    /// Launch angle as a blend of the dynamic loft and the attack angle.
    ///
    /// Units: radians
    pub fn launch_angle_rad(&self, dynamic_loft_rad: f64, attack_rad: f64) -> f64 {
        self.params.launch_loft_weight * dynamic_loft_rad
            + self.params.launch_attack_weight * attack_rad
    }

    /// Ratio of ball speed to club speed for an ideal one dimensional
    /// collision.
    pub fn base_smash_factor(&self) -> f64 {
        let p = &self.params;

        (1.0 + p.restitution_coeff) * p.club_head_mass_kg / (p.club_head_mass_kg + p.ball_mass_kg)
    }

    /// Relative change in smash factor due to shaft lean, largest at the ideal
    /// lean.
    pub fn lean_bonus(&self, shaft_lean_deg: f64) -> f64 {
        let p = &self.params;

        (p.lean_bonus_peak - (shaft_lean_deg - p.ideal_lean_deg).abs() * p.lean_bonus_slope)
            .max(p.lean_bonus_floor)
    }

    /// Multiplier on smash factor for attack angles outside the neutral band.
    pub fn attack_penalty(&self, attack_deg: f64) -> f64 {
        let p = &self.params;

        if attack_deg < p.steep_attack_deg {
            (1.0 - (attack_deg - p.steep_attack_deg).abs() * p.steep_attack_slope)
                .max(p.steep_attack_floor)
        } else if attack_deg > p.up_attack_deg {
            (1.0 - (attack_deg - p.up_attack_deg) * p.up_attack_slope).max(p.up_attack_floor)
        } else {
            1.0
        }
    }

    /// Smash factor including strike quality.
    pub fn smash_factor(&self, shaft_lean_deg: f64, attack_deg: f64) -> f64 {
        self.base_smash_factor()
            * self.params.energy_factor
            * (1.0 + self.lean_bonus(shaft_lean_deg))
            * self.attack_penalty(attack_deg)
    }

    /// Ratio of roll to carry for a given landing angle. Steeper landings roll
    /// less.
    pub fn run_coefficient(&self, landing_angle_deg: f64) -> f64 {
        let p = &self.params;

        maths::clamp(
            p.run_coeff_intercept - landing_angle_deg * p.run_coeff_slope,
            p.min_run_coeff,
            p.max_run_coeff,
        )
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
