//! Swing parameters and their admissible ranges

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use super::SwingError;
use util::maths;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// The number of free parameters describing a swing.
pub const NUM_SWING_PARAMS: usize = 5;

/// Names of the swing parameters, in array order.
pub const SWING_PARAM_NAMES: [&str; NUM_SWING_PARAMS] =
    ["t1_mag_nm", "t1_dur_s", "t2_mag_nm", "t2_delay_s", "t2_dur_s"];

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The torque profile of a single swing.
///
/// The proximal pulse starts at time zero, the distal pulse after a delay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingParams {
    /// Proximal (shoulder) torque magnitude.
    ///
    /// Units: newton meters
    pub t1_mag_nm: f64,

    /// Proximal torque duration.
    ///
    /// Units: seconds
    pub t1_dur_s: f64,

    /// Distal (wrist) torque magnitude. Negative values act to hold lag.
    ///
    /// Units: newton meters
    pub t2_mag_nm: f64,

    /// Delay between the start of the swing and the distal torque.
    ///
    /// Units: seconds
    pub t2_delay_s: f64,

    /// Distal torque duration.
    ///
    /// Units: seconds
    pub t2_dur_s: f64,
}

/// The admissible range of a single swing parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

/// Admissible ranges for every swing parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwingParamRanges {
    pub t1_mag_nm: ParamRange,
    pub t1_dur_s: ParamRange,
    pub t2_mag_nm: ParamRange,
    pub t2_delay_s: ParamRange,
    pub t2_dur_s: ParamRange,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SwingParams {
    /// The parameters as an array, ordered as `SWING_PARAM_NAMES`.
    pub fn to_array(&self) -> [f64; NUM_SWING_PARAMS] {
        [
            self.t1_mag_nm,
            self.t1_dur_s,
            self.t2_mag_nm,
            self.t2_delay_s,
            self.t2_dur_s,
        ]
    }

    /// Build parameters from an array ordered as `SWING_PARAM_NAMES`.
    pub fn from_array(values: [f64; NUM_SWING_PARAMS]) -> Self {
        Self {
            t1_mag_nm: values[0],
            t1_dur_s: values[1],
            t2_mag_nm: values[2],
            t2_delay_s: values[3],
            t2_dur_s: values[4],
        }
    }
}

impl Default for SwingParams {
    fn default() -> Self {
        SwingParamRanges::default().defaults()
    }
}

impl ParamRange {
    pub fn new(min: f64, max: f64, default: f64) -> Self {
        Self { min, max, default }
    }

    /// Width of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        maths::clamp(value, self.min, self.max)
    }

    /// Returns true if the range is finite, ordered and contains its default.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min <= self.max
            && self.contains(self.default)
    }
}

impl Default for SwingParamRanges {
    fn default() -> Self {
        Self {
            t1_mag_nm: ParamRange::new(30.0, 150.0, 70.0),
            t1_dur_s: ParamRange::new(0.2, 0.5, 0.35),
            t2_mag_nm: ParamRange::new(-50.0, 80.0, 20.0),
            t2_delay_s: ParamRange::new(0.0, 0.35, 0.1),
            t2_dur_s: ParamRange::new(0.05, 0.3, 0.15),
        }
    }
}

impl SwingParamRanges {
    /// The ranges as an array, ordered as `SWING_PARAM_NAMES`.
    pub fn to_array(&self) -> [ParamRange; NUM_SWING_PARAMS] {
        [
            self.t1_mag_nm,
            self.t1_dur_s,
            self.t2_mag_nm,
            self.t2_delay_s,
            self.t2_dur_s,
        ]
    }

    /// The default value of every parameter.
    pub fn defaults(&self) -> SwingParams {
        let mut values = [0f64; NUM_SWING_PARAMS];
        for (v, r) in values.iter_mut().zip(self.to_array().iter()) {
            *v = r.default;
        }

        SwingParams::from_array(values)
    }

    /// Check that every declared range is usable.
    pub fn validate(&self) -> Result<(), SwingError> {
        for (name, r) in SWING_PARAM_NAMES.iter().zip(self.to_array().iter()) {
            if !r.is_valid() {
                return Err(SwingError::InvalidRange {
                    name: *name,
                    min: r.min,
                    max: r.max,
                    default: r.default,
                });
            }
        }

        Ok(())
    }

    /// Returns true if every parameter is within its range.
    pub fn contains(&self, params: &SwingParams) -> bool {
        self.check(params).is_ok()
    }

    /// Check every parameter against its range, reporting the first one out
    /// of range.
    pub fn check(&self, params: &SwingParams) -> Result<(), SwingError> {
        let values = params.to_array();

        for ((name, r), v) in SWING_PARAM_NAMES
            .iter()
            .zip(self.to_array().iter())
            .zip(values.iter())
        {
            if !r.contains(*v) {
                return Err(SwingError::OutOfRange {
                    name: *name,
                    value: *v,
                    min: r.min,
                    max: r.max,
                });
            }
        }

        Ok(())
    }

    /// Clamp every parameter into its range.
    pub fn clamp(&self, params: &SwingParams) -> SwingParams {
        let mut values = params.to_array();
        for (v, r) in values.iter_mut().zip(self.to_array().iter()) {
            *v = r.clamp(*v);
        }

        SwingParams::from_array(values)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults_are_in_range() {
        let ranges = SwingParamRanges::default();
        assert!(ranges.validate().is_ok());
        assert!(ranges.contains(&SwingParams::default()));
        assert_eq!(SwingParams::default().t1_mag_nm, 70.0);
        assert_eq!(SwingParams::default().t2_dur_s, 0.15);
    }

    #[test]
    fn test_array_order_matches_names() {
        let p = SwingParams {
            t1_mag_nm: 1.0,
            t1_dur_s: 2.0,
            t2_mag_nm: 3.0,
            t2_delay_s: 4.0,
            t2_dur_s: 5.0,
        };
        assert_eq!(p.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(SwingParams::from_array(p.to_array()), p);
    }

    #[test]
    fn test_check_and_clamp() {
        let ranges = SwingParamRanges::default();
        let p = SwingParams {
            t2_mag_nm: -120.0,
            ..Default::default()
        };

        match ranges.check(&p) {
            Err(SwingError::OutOfRange { name, value, .. }) => {
                assert_eq!(name, "t2_mag_nm");
                assert_eq!(value, -120.0);
            }
            other => panic!("Expected out of range error, got {:?}", other),
        }

        let clamped = ranges.clamp(&p);
        assert_eq!(clamped.t2_mag_nm, -50.0);
        assert_eq!(clamped.t1_mag_nm, p.t1_mag_nm);
        assert!(ranges.contains(&clamped));
    }

    #[test]
    fn test_invalid_range_rejected() {
        let ranges = SwingParamRanges {
            t1_dur_s: ParamRange::new(0.5, 0.2, 0.35),
            ..Default::default()
        };
        assert!(matches!(
            ranges.validate(),
            Err(SwingError::InvalidRange { name: "t1_dur_s", .. })
        ));
    }
}
