//! # Swing library.
//!
//! A torque driven two link model of a golf swing. The library simulates a
//! swing from the top of the backswing, detects contact with the ball or the
//! ground, computes the resulting ball flight and searches the swing
//! parameters for the longest forward leaning strike.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Linkage dynamics - equations of motion and the RK4 integrator
pub mod dynamics;

/// Ball flight model - launch conditions, carry with drag and roll
pub mod flight;

/// Swing optimizer - two phase random search over the swing parameters
pub mod optim;

/// Grouped simulation parameters
pub mod params;

/// Swing simulator - torque schedules, joint limits and contact detection
pub mod swing;
