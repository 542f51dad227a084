//! # Linkage dynamics module
//!
//! Equations of motion of the torque driven two link pendulum and the fixed
//! step integrator used to advance it.
//!
//! The system is modelled as two point masses at the ends of massless links,
//! with both angles measured absolutely from the downward vertical. Gravity
//! acts along +y, which points down.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod kinematics;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{Matrix2, Vector2, Vector4};

// Internal
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The linkage dynamics solver.
#[derive(Debug, Clone, Default)]
pub struct Dynamics {
    pub(crate) params: Params,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Dynamics {
    /// Create a new solver from the given parameters.
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    /// Get the solver's parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Compute the generalised accelerations for the given state and applied
    /// joint torques.
    ///
    /// The 2x2 mass matrix is inverted explicitly. If its determinant is
    /// smaller in magnitude than `singular_det_threshold` both accelerations
    /// are zero.
    pub fn accelerations(
        &self,
        state: &LinkState,
        torque1_nm: f64,
        torque2_nm: f64,
    ) -> Accelerations {
        let p = &self.params;
        let m_tot = p.link1_mass_kg + p.link2_mass_kg;
        let coupling = p.link2_mass_kg * p.link1_length_m * p.link2_length_m;

        let (sin_d, cos_d) = (state.theta1_rad - state.theta2_rad).sin_cos();

        let mass = Matrix2::new(
            m_tot * p.link1_length_m.powi(2),
            coupling * cos_d,
            coupling * cos_d,
            p.link2_mass_kg * p.link2_length_m.powi(2),
        );

        // Velocity product, gravity and applied torque terms
        let forcing = Vector2::new(
            -coupling * state.omega2_rads.powi(2) * sin_d
                - m_tot * p.gravity_mss * p.link1_length_m * state.theta1_rad.sin()
                + torque1_nm,
            coupling * state.omega1_rads.powi(2) * sin_d
                - p.link2_mass_kg * p.gravity_mss * p.link2_length_m * state.theta2_rad.sin()
                + torque2_nm,
        );

        let det = mass.determinant();
        if det.abs() < p.singular_det_threshold {
            return Accelerations::default();
        }

        let inverse = Matrix2::new(
            mass[(1, 1)],
            -mass[(0, 1)],
            -mass[(1, 0)],
            mass[(0, 0)],
        ) / det;

        let alpha = inverse * forcing;

        Accelerations {
            alpha1_radss: alpha[0],
            alpha2_radss: alpha[1],
        }
    }

    /// Advance the state by one step of `dt_s` using classical RK4.
    ///
    /// Torques are held constant across the four stages.
    pub fn integrate_step(&self, state: &LinkState, torque1_nm: f64, torque2_nm: f64) -> LinkState {
        let dt = self.params.dt_s;
        let y = state.as_vector();

        let k1 = self.derivative(&y, torque1_nm, torque2_nm);
        let k2 = self.derivative(&(y + k1 * (0.5 * dt)), torque1_nm, torque2_nm);
        let k3 = self.derivative(&(y + k2 * (0.5 * dt)), torque1_nm, torque2_nm);
        let k4 = self.derivative(&(y + k3 * dt), torque1_nm, torque2_nm);

        LinkState::from(y + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0))
    }

    /// Time derivative of the state vector.
    fn derivative(&self, y: &Vector4<f64>, torque1_nm: f64, torque2_nm: f64) -> Vector4<f64> {
        let acc = self.accelerations(&LinkState::from(*y), torque1_nm, torque2_nm);

        Vector4::new(y[1], acc.alpha1_radss, y[3], acc.alpha2_radss)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn run_free(dynamics: &Dynamics, mut state: LinkState, steps: usize, t1: f64, t2: f64) -> LinkState {
        for _ in 0..steps {
            state = dynamics.integrate_step(&state, t1, t2);
        }
        state
    }

    #[test]
    fn test_hanging_at_rest_is_equilibrium() {
        let dynamics = Dynamics::default();
        let state = LinkState::at_rest(0.0, 0.0);

        assert_eq!(dynamics.accelerations(&state, 0.0, 0.0), Accelerations::default());
        assert_eq!(dynamics.integrate_step(&state, 0.0, 0.0), state);
    }

    #[test]
    fn test_singular_mass_matrix_gives_zero_acceleration() {
        // With a massless proximal link and aligned links the mass matrix has
        // a zero determinant.
        let dynamics = Dynamics::new(Params {
            link1_mass_kg: 0.0,
            ..Default::default()
        });
        let state = LinkState {
            theta1_rad: 0.7,
            omega1_rads: 3.0,
            theta2_rad: 0.7,
            omega2_rads: -2.0,
        };

        let acc = dynamics.accelerations(&state, 40.0, -10.0);
        assert_eq!(acc.alpha1_radss, 0.0);
        assert_eq!(acc.alpha2_radss, 0.0);
    }

    #[test]
    fn test_torque_accelerates_in_its_direction() {
        let dynamics = Dynamics::default();
        let state = LinkState::at_rest(0.0, 0.0);

        let acc = dynamics.accelerations(&state, 50.0, 0.0);
        assert!(acc.alpha1_radss > 0.0);

        let acc = dynamics.accelerations(&state, -50.0, 0.0);
        assert!(acc.alpha1_radss < 0.0);
    }

    #[test]
    fn test_free_swing_conserves_energy() {
        let dynamics = Dynamics::default();

        let initial_states = [
            LinkState::at_rest(0.5, 0.2),
            LinkState::at_rest(-2.0, -2.6),
            LinkState {
                theta1_rad: 1.0,
                omega1_rads: 2.0,
                theta2_rad: -0.5,
                omega2_rads: -3.0,
            },
        ];

        for s0 in initial_states.iter() {
            let e0 = dynamics.total_energy_j(s0);
            let s1 = run_free(&dynamics, *s0, 2000, 0.0, 0.0);
            let e1 = dynamics.total_energy_j(&s1);

            assert!(s1.is_finite());
            assert!(
                ((e1 - e0) / e0).abs() < 1e-9,
                "Energy drifted from {} to {}",
                e0,
                e1
            );
        }
    }

    #[test]
    fn test_constant_torque_work_matches_energy_change() {
        let dynamics = Dynamics::default();
        let (tau1, tau2) = (50.0, 10.0);

        let s0 = LinkState::at_rest(-2.0, -2.6);
        let s1 = run_free(&dynamics, s0, 400, tau1, tau2);

        let work = tau1 * (s1.theta1_rad - s0.theta1_rad) + tau2 * (s1.theta2_rad - s0.theta2_rad);
        let delta_e = dynamics.total_energy_j(&s1) - dynamics.total_energy_j(&s0);

        assert!((delta_e - work).abs() < 1e-6, "dE = {}, W = {}", delta_e, work);
    }

    #[test]
    fn test_integration_is_deterministic() {
        let dynamics = Dynamics::default();
        let s0 = LinkState::at_rest(-2.0, -2.8);

        let a = run_free(&dynamics, s0, 1000, 70.0, 20.0);
        let b = run_free(&dynamics, s0, 1000, 70.0, 20.0);

        assert_eq!(a, b);
    }
}
