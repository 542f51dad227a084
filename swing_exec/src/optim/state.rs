//! Implementations for the Optimizer state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use rand::Rng;
use serde::Serialize;

// Internal
use super::{score, Candidate, Flow, OptimError, Params, Phase};
use crate::swing::{Simulator, SwingParams, NUM_SWING_PARAMS};
use util::{
    archive::{Archived, Archiver},
    maths,
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Swing optimizer state.
pub struct Optimizer<R: Rng> {
    sim: Simulator,
    params: Params,
    rng: R,

    phase: Phase,

    /// Swings simulated so far in the current phase.
    iteration: usize,

    num_batches: usize,
    num_evaluations: usize,
    hit_count: usize,

    best: Option<Candidate>,

    report: StatusReport,
    arch_report: Archiver,
}

/// Status report for one batch of the search.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StatusReport {
    /// Phase the batch was run in.
    pub phase: Phase,

    /// Phase after the batch.
    pub next_phase: Phase,

    pub batch: usize,

    /// Swings simulated in this batch.
    pub batch_evaluations: usize,

    /// Progress through the phase the batch was run in.
    pub phase_iteration: usize,
    pub phase_iters: usize,

    /// Total hits across the whole search.
    pub hit_count: usize,

    /// Set if the best candidate changed during this batch.
    pub improved: bool,

    pub best_score: Option<f64>,
    pub best_distance_m: Option<f64>,
    pub best_distance_yd: Option<f64>,
    pub best_shaft_lean_deg: Option<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<R: Rng> Optimizer<R> {
    /// Create a new optimizer.
    ///
    /// The random number generator is injected so that searches can be made
    /// reproducible by seeding it.
    pub fn new(sim: Simulator, params: Params, rng: R) -> Result<Self, OptimError> {
        if params.batch_size == 0 {
            return Err(OptimError::InvalidParams(
                "batch_size must be greater than zero".into(),
            ));
        }
        if !params.perturb_frac.is_finite() || params.perturb_frac < 0.0 {
            return Err(OptimError::InvalidParams(format!(
                "perturb_frac must be finite and non-negative, got {}",
                params.perturb_frac
            )));
        }

        sim.ranges().validate()?;

        Ok(Self {
            sim,
            params,
            rng,
            phase: Phase::Global,
            iteration: 0,
            num_batches: 0,
            num_evaluations: 0,
            hit_count: 0,
            best: None,
            report: StatusReport::default(),
            arch_report: Archiver::default(),
        })
    }

    /// Create the archive files for this optimizer in the given session.
    pub fn init_archives(&mut self, session: &Session) -> Result<(), Box<dyn std::error::Error>> {
        self.arch_report = Archiver::from_path(session, "optim/status_report.csv")?;

        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn best(&self) -> Option<&Candidate> {
        self.best.as_ref()
    }

    pub fn into_best(self) -> Option<Candidate> {
        self.best
    }

    pub fn num_evaluations(&self) -> usize {
        self.num_evaluations
    }

    pub fn hit_count(&self) -> usize {
        self.hit_count
    }

    pub fn simulator(&self) -> &Simulator {
        &self.sim
    }

    /// Run batches until the search finishes or `between_batches` returns
    /// `Flow::Stop`.
    ///
    /// `between_batches` is called with the status report of every batch.
    /// When stopped early the best candidate found so far is returned.
    pub fn run<F>(&mut self, mut between_batches: F) -> Result<Option<Candidate>, OptimError>
    where
        F: FnMut(&StatusReport) -> Flow,
    {
        while !self.phase.is_finished() {
            let (_, report) = self.proc(&())?;

            if let Flow::Stop = between_batches(&report) {
                info!(
                    "Search stopped after {} evaluations in phase {:?}",
                    self.num_evaluations, self.phase
                );
                break;
            }
        }

        Ok(self.best.clone())
    }

    /// Draw swing parameters uniformly from the declared ranges.
    pub fn sample_params(&mut self) -> SwingParams {
        let ranges = self.sim.ranges().to_array();
        let mut values = [0f64; NUM_SWING_PARAMS];

        for (v, r) in values.iter_mut().zip(ranges.iter()) {
            *v = r.clamp(r.min + self.rng.gen::<f64>() * r.span());
        }

        SwingParams::from_array(values)
    }

    /// Perturb each parameter by up to half of `perturb_frac` of its range in
    /// either direction, clamping the result into range.
    pub fn perturb_params(&mut self, base: &SwingParams) -> SwingParams {
        let ranges = self.sim.ranges().to_array();
        let mut values = base.to_array();

        for (v, r) in values.iter_mut().zip(ranges.iter()) {
            let delta = (self.rng.gen::<f64>() - 0.5) * r.span() * self.params.perturb_frac;
            *v = r.clamp(*v + delta);
        }

        SwingParams::from_array(values)
    }

    /// Simulate and score a swing, keeping it if it is a strictly better hit.
    fn evaluate(&mut self, params: SwingParams) {
        let result = self.sim.simulate(&params);
        self.num_evaluations += 1;

        if !result.hit_ball {
            return;
        }

        self.hit_count += 1;
        let score = score(&result, &self.params.score);

        let better = match &self.best {
            Some(b) => score > b.score,
            None => true,
        };

        if better {
            debug!(
                "New best: score {:.2}, distance {:.1} m, lean {:.1} deg",
                score, result.ball_distance_m, result.shaft_lean_deg
            );
            self.best = Some(Candidate {
                params,
                result,
                score,
            });
            self.report.improved = true;
        }
    }

    fn global_batch(&mut self) {
        let n = self
            .params
            .batch_size
            .min(self.params.phase1_iters.saturating_sub(self.iteration));

        for _ in 0..n {
            let p = self.sample_params();
            self.evaluate(p);
            self.iteration += 1;
        }

        self.report.batch_evaluations = n;
        self.report.phase_iteration = self.iteration;
        self.report.phase_iters = self.params.phase1_iters;

        info!(
            "Phase 1: {}/{} | Hits: {} | Best: {}",
            self.iteration,
            self.params.phase1_iters,
            self.hit_count,
            self.best_yards_str()
        );

        if self.iteration < self.params.phase1_iters {
            return;
        }

        self.iteration = 0;

        if self.best.is_some() {
            info!("Phase 2: hill climbing from {}", self.best_yards_str());
            self.phase = if self.params.phase2_iters > 0 {
                Phase::Local
            } else {
                Phase::Complete
            };
        } else {
            warn!(
                "No valid hits found in {} phase 1 swings",
                self.params.phase1_iters
            );
            self.phase = Phase::NoValidResult;
        }
    }

    fn local_batch(&mut self) {
        let n = self
            .params
            .batch_size
            .min(self.params.phase2_iters.saturating_sub(self.iteration));

        for _ in 0..n {
            let base = match &self.best {
                Some(b) => b.params,
                None => break,
            };
            let p = self.perturb_params(&base);
            self.evaluate(p);
            self.iteration += 1;
        }

        self.report.batch_evaluations = n;
        self.report.phase_iteration = self.iteration;
        self.report.phase_iters = self.params.phase2_iters;

        let lean = match &self.best {
            Some(b) => format!("{:+.0} deg", b.result.shaft_lean_deg),
            None => "---".into(),
        };
        info!(
            "Phase 2: {}/{} | {} | Lean: {}",
            self.iteration,
            self.params.phase2_iters,
            self.best_yards_str(),
            lean
        );

        if self.iteration >= self.params.phase2_iters {
            self.phase = Phase::Complete;

            if let Some(b) = &self.best {
                info!(
                    "Best: {:.0} yds | Lean: {:+.0} deg | Attack: {:+.1} deg",
                    maths::m_to_yd(b.result.ball_distance_m),
                    b.result.shaft_lean_deg,
                    b.result.attack_angle_deg
                );
            }
        }
    }

    fn best_yards_str(&self) -> String {
        match &self.best {
            Some(b) => format!("{:.0} yds", maths::m_to_yd(b.result.ball_distance_m)),
            None => "---".into(),
        }
    }
}

impl<R: Rng> State for Optimizer<R> {
    type InputData = ();
    type OutputData = Phase;
    type StatusReport = StatusReport;
    type ProcError = OptimError;

    /// Run one batch of the search.
    ///
    /// Once the search has finished further calls do no work.
    fn proc(
        &mut self,
        _input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        self.report = StatusReport {
            phase: self.phase,
            batch: self.num_batches,
            ..Default::default()
        };

        match self.phase {
            Phase::Global => self.global_batch(),
            Phase::Local => self.local_batch(),
            Phase::Complete | Phase::NoValidResult => (),
        }

        if self.report.batch_evaluations > 0 {
            self.num_batches += 1;
        }

        self.report.next_phase = self.phase;
        self.report.hit_count = self.hit_count;
        if let Some(b) = &self.best {
            self.report.best_score = Some(b.score);
            self.report.best_distance_m = Some(b.result.ball_distance_m);
            self.report.best_distance_yd = Some(maths::m_to_yd(b.result.ball_distance_m));
            self.report.best_shaft_lean_deg = Some(b.result.shaft_lean_deg);
        }

        Ok((self.phase, self.report))
    }
}

impl<R: Rng> Archived for Optimizer<R> {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.arch_report.serialise(self.report)?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::params::SimParams;
    use crate::swing::{self, SwingParamRanges};
    use rand::{rngs::SmallRng, SeedableRng};

    fn search_params(phase1_iters: usize, phase2_iters: usize, batch_size: usize) -> Params {
        Params {
            phase1_iters,
            phase2_iters,
            batch_size,
            ..Default::default()
        }
    }

    fn optimizer(params: Params, seed: u64) -> Optimizer<SmallRng> {
        Optimizer::new(
            Simulator::new(SimParams::default()),
            params,
            SmallRng::seed_from_u64(seed),
        )
        .unwrap()
    }

    #[test]
    fn test_seeded_search_is_reproducible() {
        let run = || {
            let mut optim = optimizer(search_params(50, 0, 100), 42);
            let best = optim.run(|_| Flow::Continue).unwrap();
            assert_eq!(optim.phase(), Phase::Complete);
            best
        };

        let a = run().expect("Seeded search found no hit");
        let b = run().expect("Seeded search found no hit");

        assert!(a.result.hit_ball);
        assert_eq!(a.params, b.params);
        assert_eq!(a.score, b.score);
        assert_eq!(a.result, b.result);
    }

    #[test]
    fn test_sampled_and_perturbed_params_in_range() {
        let mut optim = optimizer(Params::default(), 3);
        let ranges = SwingParamRanges::default();

        for _ in 0..1000 {
            let p = optim.sample_params();
            assert!(ranges.contains(&p));
        }

        let corners = [
            SwingParams::from_array([30.0, 0.2, -50.0, 0.0, 0.05]),
            SwingParams::from_array([150.0, 0.5, 80.0, 0.35, 0.3]),
        ];
        for c in corners.iter() {
            for _ in 0..500 {
                let p = optim.perturb_params(c);
                assert!(ranges.contains(&p));
            }
        }
    }

    #[test]
    fn test_perturbation_is_small() {
        let mut optim = optimizer(Params::default(), 11);
        let base = SwingParams::default();
        let ranges = SwingParamRanges::default().to_array();

        for _ in 0..200 {
            let p = optim.perturb_params(&base).to_array();
            for ((v, b), r) in p.iter().zip(base.to_array().iter()).zip(ranges.iter()) {
                assert!((v - b).abs() <= 0.05 * r.span() + 1e-12);
            }
        }
    }

    #[test]
    fn test_unreachable_ball_gives_no_valid_result() {
        let sim = Simulator::new(SimParams {
            swing: swing::Params {
                ball_x_offset_m: 5.0,
                ..Default::default()
            },
            ..Default::default()
        });
        let mut optim =
            Optimizer::new(sim, search_params(20, 20, 10), SmallRng::seed_from_u64(1)).unwrap();

        let best = optim.run(|_| Flow::Continue).unwrap();

        assert!(best.is_none());
        assert_eq!(optim.phase(), Phase::NoValidResult);
        assert_eq!(optim.num_evaluations(), 20);
        assert_eq!(optim.hit_count(), 0);
    }

    #[test]
    fn test_stop_halts_after_current_batch() {
        let mut optim = optimizer(search_params(30, 30, 10), 5);
        let mut calls = 0;

        optim
            .run(|report| {
                calls += 1;
                assert_eq!(report.batch_evaluations, 10);
                Flow::Stop
            })
            .unwrap();

        assert_eq!(calls, 1);
        assert_eq!(optim.num_evaluations(), 10);
        assert_eq!(optim.phase(), Phase::Global);
    }

    #[test]
    fn test_local_phase_never_lowers_best_score() {
        let mut optim = optimizer(search_params(40, 40, 10), 7);
        let mut scores = Vec::new();

        optim
            .run(|report| {
                if let Some(s) = report.best_score {
                    scores.push(s);
                }
                Flow::Continue
            })
            .unwrap();

        assert_eq!(optim.phase(), Phase::Complete);
        assert_eq!(optim.num_evaluations(), 80);
        assert!(!scores.is_empty());
        for pair in scores.windows(2) {
            assert!(pair[1] >= pair[0]);
        }

        let best = optim.best().unwrap();
        assert!(best.result.hit_ball);
        assert_eq!(Some(best.score), scores.last().copied());
    }

    #[test]
    fn test_finished_search_does_no_work() {
        let mut optim = optimizer(search_params(10, 0, 10), 9);
        optim.run(|_| Flow::Continue).unwrap();
        assert!(optim.phase().is_finished());

        let evaluations = optim.num_evaluations();
        let (phase, report) = optim.proc(&()).unwrap();

        assert!(phase.is_finished());
        assert_eq!(report.batch_evaluations, 0);
        assert_eq!(optim.num_evaluations(), evaluations);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let sim = Simulator::new(SimParams::default());
        let res = Optimizer::new(sim, search_params(10, 10, 0), SmallRng::seed_from_u64(0));
        assert!(matches!(res, Err(OptimError::InvalidParams(_))));

        let mut sim_params = SimParams::default();
        sim_params.swing.ranges.t2_dur_s.max = -1.0;
        let res = Optimizer::new(
            Simulator::new(sim_params),
            Params::default(),
            SmallRng::seed_from_u64(0),
        );
        assert!(matches!(res, Err(OptimError::InvalidRanges(_))));
    }
}
