//! Linkage forward kinematics

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{Point2, Vector2};

use super::{Dynamics, LinkState};

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Dynamics {
    /// Position of the joint between the two links.
    ///
    /// Units: meters,
    /// Frame: proximal joint origin, +x forward, +y down
    pub fn hand_position(&self, state: &LinkState) -> Point2<f64> {
        let l1 = self.params.link1_length_m;

        Point2::new(l1 * state.theta1_rad.sin(), l1 * state.theta1_rad.cos())
    }

    /// Position of the end of the distal link.
    ///
    /// Units: meters,
    /// Frame: proximal joint origin, +x forward, +y down
    pub fn head_position(&self, state: &LinkState) -> Point2<f64> {
        let l2 = self.params.link2_length_m;

        self.hand_position(state)
            + Vector2::new(l2 * state.theta2_rad.sin(), l2 * state.theta2_rad.cos())
    }

    /// Linear velocity of the end of the distal link.
    ///
    /// Units: meters/second,
    /// Frame: proximal joint origin, +x forward, +y down
    pub fn head_velocity(&self, state: &LinkState) -> Vector2<f64> {
        let l1w1 = self.params.link1_length_m * state.omega1_rads;
        let l2w2 = self.params.link2_length_m * state.omega2_rads;

        Vector2::new(
            l1w1 * state.theta1_rad.cos() + l2w2 * state.theta2_rad.cos(),
            -(l1w1 * state.theta1_rad.sin() + l2w2 * state.theta2_rad.sin()),
        )
    }

    /// Total mechanical energy, with the zero of potential at the proximal
    /// joint height.
    ///
    /// Units: joules
    pub fn total_energy_j(&self, state: &LinkState) -> f64 {
        let p = &self.params;
        let m_tot = p.link1_mass_kg + p.link2_mass_kg;
        let (l1, l2) = (p.link1_length_m, p.link2_length_m);
        let (w1, w2) = (state.omega1_rads, state.omega2_rads);

        let kinetic = 0.5 * m_tot * l1.powi(2) * w1.powi(2)
            + 0.5 * p.link2_mass_kg * l2.powi(2) * w2.powi(2)
            + p.link2_mass_kg * l1 * l2 * w1 * w2 * (state.theta1_rad - state.theta2_rad).cos();

        let potential = -m_tot * p.gravity_mss * l1 * state.theta1_rad.cos()
            - p.link2_mass_kg * p.gravity_mss * l2 * state.theta2_rad.cos();

        kinetic + potential
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
