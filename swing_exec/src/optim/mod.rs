//! # Swing optimizer module
//!
//! A two phase stochastic search over the swing parameters. The global phase
//! samples swings uniformly inside the declared ranges, the local phase then
//! hill climbs from the best hit by small random perturbations, accepting
//! only strict improvements.
//!
//! Work is split into bounded batches. Each call to `Optimizer::proc`
//! simulates at most one batch and hands control back to the caller, who may
//! archive, report progress or cancel the search before the next batch.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod score;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use rand::Rng;
use serde::Serialize;

// Internal
use crate::swing::{SimResult, Simulator, SwingError, SwingParams};
pub use params::*;
pub use score::*;
pub use state::*;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A simulated swing and its score.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub params: SwingParams,
    pub result: SimResult,
    pub score: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Phase of the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Uniform random sampling of the parameter ranges.
    Global,

    /// Hill climbing from the best candidate.
    Local,

    /// The search finished with a best candidate.
    Complete,

    /// The global phase produced no hits, so there is nothing to refine.
    NoValidResult,
}

/// Decision returned by the caller between batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Errors associated with the optimizer.
#[derive(Debug, thiserror::Error)]
pub enum OptimError {
    #[error("Invalid optimizer parameters: {0}")]
    InvalidParams(String),

    #[error("Invalid swing parameter ranges: {0}")]
    InvalidRanges(#[from] SwingError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Phase {
    fn default() -> Self {
        Phase::Global
    }
}

impl Phase {
    /// Returns true if no more batches will be run.
    pub fn is_finished(&self) -> bool {
        matches!(self, Phase::Complete | Phase::NoValidResult)
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Run a complete search without interruption.
///
/// Returns `None` if the global phase found no hit.
pub fn run_optimization<R: Rng>(
    sim: Simulator,
    params: Params,
    rng: R,
) -> Result<Option<Candidate>, OptimError> {
    let mut optim = Optimizer::new(sim, params, rng)?;

    optim.run(|_| Flow::Continue)
}
