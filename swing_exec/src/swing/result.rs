//! Swing simulation results

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{Point2, Vector2};
use serde::Serialize;

use crate::dynamics::LinkState;
use crate::flight::{BallPoint, Flight};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The outcome of a single simulated swing.
///
/// Ball flight fields are zero and the trajectory empty unless `hit_ball` is
/// set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimResult {
    /// State after every integration step.
    pub history: Vec<LinkState>,

    /// Highest club head speed over the whole swing.
    ///
    /// Units: meters/second
    pub max_speed_ms: f64,

    /// Club head speed at ball contact.
    ///
    /// Units: meters/second
    pub impact_speed_ms: f64,

    pub hit_ball: bool,

    /// Set if the club struck the floor before the ball, or met the ball on
    /// too steep a descent.
    pub ground_strike: bool,

    pub impact: Option<Impact>,

    pub termination: Termination,

    pub ball_trajectory: Vec<BallPoint>,

    /// Carry plus roll.
    ///
    /// Units: meters
    pub ball_distance_m: f64,

    /// Units: meters
    pub carry_distance_m: f64,

    /// Units: meters
    pub run_distance_m: f64,

    /// Units: degrees
    pub attack_angle_deg: f64,

    /// Units: degrees
    pub launch_angle_deg: f64,

    /// Proximal angle minus distal angle at contact. Positive when the hands
    /// lead the club head.
    ///
    /// Units: degrees
    pub shaft_lean_deg: f64,

    /// Units: meters/second
    pub ball_speed_ms: f64,

    pub smash_factor: f64,

    /// Units: meters
    pub apex_height_m: f64,

    /// Airborne time of the ball.
    ///
    /// Units: seconds
    pub flight_time_s: f64,
}

/// The moment of ball contact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Impact {
    /// Index into the swing history of the contact state.
    pub step: usize,

    /// Units: seconds
    pub time_s: f64,

    /// Units: meters
    pub head_position_m: Point2<f64>,

    /// Frame: +x forward, +y down
    ///
    /// Units: meters/second
    pub head_velocity_ms: Vector2<f64>,
}

/// Why the swing simulation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Termination {
    /// The maximum simulated time elapsed.
    TimeLimit,

    /// The proximal link reached its follow through angle.
    FollowThrough,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimResult {
    /// A result with no ball flight.
    pub(crate) fn without_flight(
        history: Vec<LinkState>,
        max_speed_ms: f64,
        ground_strike: bool,
        termination: Termination,
    ) -> Self {
        Self {
            history,
            max_speed_ms,
            impact_speed_ms: 0.0,
            hit_ball: false,
            ground_strike,
            impact: None,
            termination,
            ball_trajectory: Vec::new(),
            ball_distance_m: 0.0,
            carry_distance_m: 0.0,
            run_distance_m: 0.0,
            attack_angle_deg: 0.0,
            launch_angle_deg: 0.0,
            shaft_lean_deg: 0.0,
            ball_speed_ms: 0.0,
            smash_factor: 0.0,
            apex_height_m: 0.0,
            flight_time_s: 0.0,
        }
    }

    /// Add the ball contact and its flight to a result.
    pub(crate) fn with_flight(mut self, impact: Impact, shaft_lean_deg: f64, flight: Flight) -> Self {
        self.hit_ball = true;
        self.ground_strike = false;
        self.impact_speed_ms = impact.head_velocity_ms.norm();
        self.impact = Some(impact);
        self.shaft_lean_deg = shaft_lean_deg;
        self.ball_distance_m = flight.distance_m;
        self.carry_distance_m = flight.carry_distance_m;
        self.run_distance_m = flight.run_distance_m;
        self.attack_angle_deg = flight.attack_angle_deg;
        self.launch_angle_deg = flight.launch_angle_deg;
        self.ball_speed_ms = flight.ball_speed_ms;
        self.smash_factor = flight.smash_factor;
        self.apex_height_m = flight.apex_height_m;
        self.flight_time_s = flight.flight_time_s;
        self.ball_trajectory = flight.trajectory;
        self
    }

    /// Number of integration steps simulated.
    pub fn num_steps(&self) -> usize {
        self.history.len()
    }
}
