//! # Swing simulator module
//!
//! Drives the linkage dynamics from the top of the backswing under a torque
//! schedule, enforcing joint limits and detecting contact with the ball or
//! the floor. On a clean hit the ball flight is computed by the flight model.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod limits;
mod params;
mod result;
mod schedule;
mod swing_params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use nalgebra::{Point2, Vector2};

// Internal
use crate::dynamics::{Dynamics, LinkState};
use crate::flight::FlightModel;
use crate::params::SimParams;
use util::maths;
pub use limits::*;
pub use params::*;
pub use result::*;
pub use schedule::*;
pub use swing_params::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Upper limit on the history capacity reserved before a swing.
const MAX_RESERVED_STEPS: usize = 1 << 16;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The swing simulator.
///
/// A simulator holds no state between calls to `simulate`, so a single
/// instance can be shared by any number of evaluations.
#[derive(Debug, Clone)]
pub struct Simulator {
    params: Params,
    dynamics: Dynamics,
    flight: FlightModel,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with swing parameters.
#[derive(Debug, thiserror::Error)]
pub enum SwingError {
    #[error("Swing parameter {name} = {value} is outside of its range [{min}, {max}]")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid range for {name}: min = {min}, max = {max}, default = {default}")]
    InvalidRange {
        name: &'static str,
        min: f64,
        max: f64,
        default: f64,
    },
}

/// Contact state of the club head during a swing.
#[derive(Debug, Clone, Copy)]
enum Contact {
    None,
    Ball(Impact),
    Ground,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Simulator {
    pub fn new(params: SimParams) -> Self {
        let dynamics = Dynamics::new(params.dynamics);
        let ball = Point2::new(params.swing.ball_x_offset_m, dynamics.params().reach_m());
        let flight = FlightModel::new(params.flight, dynamics.params().gravity_mss, ball);

        Self {
            params: params.swing,
            dynamics,
            flight,
        }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn dynamics(&self) -> &Dynamics {
        &self.dynamics
    }

    pub fn flight_model(&self) -> &FlightModel {
        &self.flight
    }

    /// Admissible ranges of the swing parameters.
    pub fn ranges(&self) -> &SwingParamRanges {
        &self.params.ranges
    }

    /// Height of the floor below the proximal joint.
    ///
    /// Units: meters
    pub fn floor_y_m(&self) -> f64 {
        self.dynamics.params().reach_m()
    }

    /// Position of the ball centre.
    ///
    /// Units: meters,
    /// Frame: proximal joint origin, +x forward, +y down
    pub fn ball_position(&self) -> Point2<f64> {
        Point2::new(self.params.ball_x_offset_m, self.floor_y_m())
    }

    /// The stationary posture at the top of the backswing.
    pub fn initial_state(&self) -> LinkState {
        let theta1 = self.params.init_theta1_rad;

        LinkState::at_rest(theta1, theta1 - self.params.init_wrist_cock_rad)
    }

    /// Number of whole integration steps in the maximum swing time.
    pub fn max_steps(&self) -> usize {
        maths::whole_steps(self.params.max_time_s, self.dynamics.params().dt_s)
    }

    /// Simulate a swing after checking the parameters against their ranges.
    pub fn simulate_checked(&self, swing: &SwingParams) -> Result<SimResult, SwingError> {
        self.params.ranges.check(swing)?;

        Ok(self.simulate(swing))
    }

    /// Simulate a swing.
    ///
    /// Parameters are used as given, callers wanting range enforcement should
    /// use `simulate_checked` or clamp with `SwingParamRanges::clamp` first.
    pub fn simulate(&self, swing: &SwingParams) -> SimResult {
        let schedule = ControlSchedule::from(swing);
        let dt = self.dynamics.params().dt_s;
        let max_steps = self.max_steps();

        let mut state = self.initial_state();
        let mut history = Vec::with_capacity(max_steps.min(MAX_RESERVED_STEPS));
        let mut max_speed_ms = 0f64;
        let mut contact = Contact::None;
        let mut limited_steps = 0usize;
        let mut step = 0usize;

        let termination = loop {
            if step >= max_steps {
                break Termination::TimeLimit;
            }
            if state.theta1_rad >= self.params.stop_theta1_rad {
                break Termination::FollowThrough;
            }

            let (torque1_nm, torque2_nm) = schedule.torques_at(step as f64 * dt);

            state = self.dynamics.integrate_step(&state, torque1_nm, torque2_nm);
            if enforce_joint_limits(&mut state, &self.params.limits).any() {
                limited_steps += 1;
            }
            history.push(state);

            let head_vel = self.dynamics.head_velocity(&state);
            max_speed_ms = max_speed_ms.max(head_vel.norm());

            if let Contact::None = contact {
                contact = self.check_contact(step, (step + 1) as f64 * dt, &state, head_vel);
            }

            step += 1;
        };

        trace!(
            "Swing {:?} ended by {:?} after {} steps ({} limited), max speed {:.2} m/s, contact {:?}",
            swing,
            termination,
            step,
            limited_steps,
            max_speed_ms,
            contact
        );

        match contact {
            Contact::Ball(impact) => {
                let contact_state = history[impact.step];
                let shaft_lean_deg = (contact_state.theta1_rad - contact_state.theta2_rad).to_degrees();
                let flight = self.flight.flight(
                    impact.head_velocity_ms.x,
                    impact.head_velocity_ms.y,
                    shaft_lean_deg,
                );

                SimResult::without_flight(history, max_speed_ms, false, termination)
                    .with_flight(impact, shaft_lean_deg, flight)
            }
            Contact::Ground => SimResult::without_flight(history, max_speed_ms, true, termination),
            Contact::None => SimResult::without_flight(history, max_speed_ms, false, termination),
        }
    }

    /// Check the club head against the floor and the ball.
    ///
    /// The floor is checked first, so a head below the floor tolerance is a
    /// ground strike even if it is also touching the ball.
    fn check_contact(
        &self,
        step: usize,
        time_s: f64,
        state: &LinkState,
        head_vel: Vector2<f64>,
    ) -> Contact {
        let head = self.dynamics.head_position(state);

        if head.y > self.floor_y_m() + self.params.ground_tolerance_m {
            return Contact::Ground;
        }

        if (head - self.ball_position()).norm() < self.params.hit_radius_m() {
            // Positive descent angles are the head moving down (+y) into the
            // floor.
            let descent_deg = head_vel.y.atan2(head_vel.x).to_degrees();

            if descent_deg > self.params.max_descent_deg {
                return Contact::Ground;
            }

            return Contact::Ball(Impact {
                step,
                time_s,
                head_position_m: head,
                head_velocity_ms: head_vel,
            });
        }

        Contact::None
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::dynamics;
    use std::f64::consts::PI;

    fn simulator() -> Simulator {
        Simulator::new(SimParams::default())
    }

    fn simulator_with_swing(swing: Params) -> Simulator {
        Simulator::new(SimParams {
            swing,
            ..Default::default()
        })
    }

    /// Every combination of the range bounds, plus the defaults.
    fn corner_params(ranges: &SwingParamRanges) -> Vec<SwingParams> {
        let bounds = ranges.to_array();
        let mut out = vec![ranges.defaults()];

        for mask in 0..(1 << NUM_SWING_PARAMS) {
            let mut values = [0f64; NUM_SWING_PARAMS];
            for (i, v) in values.iter_mut().enumerate() {
                *v = if mask & (1 << i) == 0 {
                    bounds[i].min
                } else {
                    bounds[i].max
                };
            }
            out.push(SwingParams::from_array(values));
        }

        out
    }

    #[test]
    fn test_initial_posture() {
        let sim = simulator();
        let s0 = sim.initial_state();

        assert!((s0.theta1_rad + 2.0 * PI / 3.0).abs() < 1e-12);
        assert!((s0.relative_rad() + PI / 4.0).abs() < 1e-12);
        assert_eq!(s0.omega1_rads, 0.0);
        assert_eq!(sim.max_steps(), 2000);
        assert!((sim.ball_position() - Point2::new(0.05, 1.5)).norm() < 1e-12);
    }

    #[test]
    fn test_default_swing_hits_ball() {
        let sim = simulator();
        let res = sim.simulate(&SwingParams::default());

        assert!(res.hit_ball);
        assert!(!res.ground_strike);
        assert!(res.impact_speed_ms > 20.0);
        assert!(res.max_speed_ms >= res.impact_speed_ms);
        assert!(res.ball_distance_m >= res.carry_distance_m);
        assert!(res.carry_distance_m > 0.0);
        assert!(res.ball_speed_ms > 0.0);
        assert!(res.apex_height_m > 0.0);

        let impact = res.impact.expect("Hit without impact");
        assert!((impact.head_velocity_ms.norm() - res.impact_speed_ms).abs() < 1e-12);
        assert!((impact.head_position_m - sim.ball_position()).norm() < sim.params().hit_radius_m());

        let first = res.ball_trajectory[0];
        assert_eq!(first.x_m, sim.ball_position().x);
        assert_eq!(first.y_m, sim.ball_position().y);
    }

    #[test]
    fn test_weak_swing_is_slower() {
        let sim = simulator();
        let strong = sim.simulate(&SwingParams::default());
        let weak = sim.simulate(&SwingParams {
            t1_mag_nm: 30.0,
            t2_mag_nm: 0.0,
            ..Default::default()
        });

        assert!(!weak.hit_ball || weak.impact_speed_ms < 0.8 * strong.impact_speed_ms);
    }

    #[test]
    fn test_early_negative_wrist_torque_holds_lag() {
        let sim = simulator();
        let res = sim.simulate(&SwingParams {
            t2_delay_s: 0.0,
            t2_mag_nm: -50.0,
            t2_dur_s: 0.3,
            ..Default::default()
        });

        let lag = sim.params().limits.max_wrist_lag_rad;
        assert!(res
            .history
            .iter()
            .any(|s| (s.relative_rad() + lag).abs() < 1e-12));
        assert!(res.history.iter().all(|s| s.relative_rad() >= -lag));
    }

    #[test]
    fn test_history_bounded_by_inexact_step_ratio() {
        let sim = Simulator::new(SimParams {
            dynamics: dynamics::Params {
                dt_s: 0.0006,
                ..Default::default()
            },
            swing: Params {
                max_time_s: 1.0,
                stop_theta1_rad: 100.0,
                ..Default::default()
            },
            ..Default::default()
        });
        let res = sim.simulate(&SwingParams::default());

        assert_eq!(sim.max_steps(), 1666);
        assert_eq!(res.termination, Termination::TimeLimit);
        assert_eq!(res.history.len(), 1666);
        assert!(res.history.len() as f64 <= 1.0 / 0.0006);
    }

    #[test]
    fn test_zero_step_size_gives_empty_history() {
        let sim = Simulator::new(SimParams {
            dynamics: dynamics::Params {
                dt_s: 0.0,
                ..Default::default()
            },
            ..Default::default()
        });
        let res = sim.simulate(&SwingParams::default());

        assert_eq!(sim.max_steps(), 0);
        assert!(res.history.is_empty());
        assert_eq!(res.termination, Termination::TimeLimit);
        assert!(!res.hit_ball);
    }

    #[test]
    fn test_history_bounded_and_within_limits() {
        let sim = simulator();
        let limits = &sim.params().limits;

        for p in corner_params(sim.ranges()) {
            let res = sim.simulate(&p);

            assert!(!res.history.is_empty());
            assert!(res.history.len() <= sim.max_steps());
            assert!(!(res.hit_ball && res.ground_strike));

            for s in res.history.iter() {
                assert!(s.is_finite());
                assert!(s.theta1_rad.abs() <= limits.max_shoulder_rad);
                assert!(s.relative_rad() <= limits.max_wrist_release_rad);
                assert!(s.relative_rad() >= -limits.max_wrist_lag_rad);
            }

            if res.hit_ball {
                assert!(res.impact_speed_ms > 0.0);
                assert!(res.ball_distance_m >= res.carry_distance_m);
                assert!(res.carry_distance_m >= 0.0);
                assert!(res.ball_speed_ms <= sim.flight_model().params().max_ball_speed_ms);
            } else {
                assert_eq!(res.ball_distance_m, 0.0);
                assert!(res.ball_trajectory.is_empty());
                assert!(res.impact.is_none());
            }

            match res.termination {
                Termination::TimeLimit => assert_eq!(res.history.len(), sim.max_steps()),
                Termination::FollowThrough => {
                    let last = res.history[res.history.len() - 1];
                    assert!(last.theta1_rad >= sim.params().stop_theta1_rad);
                }
            }
        }
    }

    #[test]
    fn test_simulate_is_deterministic() {
        let sim = simulator();
        let p = SwingParams {
            t1_mag_nm: 95.0,
            t2_delay_s: 0.2,
            ..Default::default()
        };

        assert_eq!(sim.simulate(&p), sim.simulate(&p));
    }

    #[test]
    fn test_raised_floor_gives_ground_strike() {
        let sim = simulator_with_swing(Params {
            ground_tolerance_m: -0.3,
            ..Default::default()
        });
        let res = sim.simulate(&SwingParams::default());

        assert!(res.ground_strike);
        assert!(!res.hit_ball);
        assert_eq!(res.ball_distance_m, 0.0);
    }

    #[test]
    fn test_any_descent_too_steep_gives_ground_strike() {
        let sim = simulator_with_swing(Params {
            max_descent_deg: -180.0,
            ..Default::default()
        });
        let res = sim.simulate(&SwingParams::default());

        assert!(res.ground_strike);
        assert!(!res.hit_ball);
    }

    #[test]
    fn test_unreachable_ball_is_missed() {
        let sim = simulator_with_swing(Params {
            ball_x_offset_m: 5.0,
            ..Default::default()
        });
        let res = sim.simulate(&SwingParams::default());

        assert!(!res.hit_ball);
        assert!(!res.ground_strike);
        assert_eq!(res.shaft_lean_deg, 0.0);
        assert!(res.ball_trajectory.is_empty());
        assert!(res.max_speed_ms > 0.0);
    }

    #[test]
    fn test_simulate_checked_rejects_out_of_range() {
        let sim = simulator();
        let p = SwingParams {
            t1_mag_nm: 500.0,
            ..Default::default()
        };

        assert!(matches!(
            sim.simulate_checked(&p),
            Err(SwingError::OutOfRange { name: "t1_mag_nm", .. })
        ));
        assert!(sim.simulate_checked(&SwingParams::default()).is_ok());
    }
}
