//! Parameters structure for the swing optimizer

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the two phase swing search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Number of uniformly sampled swings in the global phase.
    pub phase1_iters: usize,

    /// Number of perturbed swings in the local phase.
    pub phase2_iters: usize,

    /// Maximum number of swings simulated per call to `proc`.
    pub batch_size: usize,

    /// Perturbation width in the local phase as a fraction of each
    /// parameter's range.
    pub perturb_frac: f64,

    pub score: ScoreWeights,
}

/// Weights used to score a simulated swing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Base score of a hit with the hands behind the club head.
    pub hands_behind_base: f64,

    /// Score per degree of forward shaft lean.
    ///
    /// Units: 1/degrees
    pub lean_weight: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            phase1_iters: 2000,
            phase2_iters: 3000,
            batch_size: 100,
            perturb_frac: 0.1,
            score: ScoreWeights::default(),
        }
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            hands_behind_base: -1000.0,
            lean_weight: 2.0,
        }
    }
}
