//! Main swing simulator executable entry point.
//!
//! # Architecture
//!
//! The executable runs one of two commands inside a new session:
//!
//!     - `simulate`: simulate a single swing, archiving the linkage history
//!       and saving the result.
//!     - `optimize`: run the swing search batch by batch, archiving the status
//!       of every batch and saving the best candidate.
//!
//! Parameter files are loaded from `$SWING_SIM_ROOT/params`.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{info, warn};
use rand::{rngs::SmallRng, SeedableRng};
use structopt::StructOpt;

// Internal
use swing_lib::{
    optim::{self, Optimizer},
    params::SimParams,
    swing::{SimResult, Simulator, SwingParams},
};
use util::{
    archive::{Archived, Archiver},
    logger::{logger_init, LevelFilter},
    maths::m_to_yd,
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Two link golf swing simulator.
#[derive(Debug, StructOpt)]
#[structopt(name = "swing_exec")]
struct Opt {
    /// Minimum log level, one of `info`, `debug` or `trace`.
    #[structopt(long, default_value = "info")]
    log_level: LevelFilter,

    /// Simulation parameter file, relative to the params directory.
    #[structopt(long, default_value = "swing_sim.toml")]
    sim_params: String,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Simulate a single swing.
    ///
    /// Swing parameters not given take their default from the parameter
    /// ranges.
    #[structopt(name = "simulate")]
    Simulate {
        /// Shoulder torque magnitude in newton meters.
        #[structopt(long, allow_hyphen_values = true)]
        t1_mag: Option<f64>,

        /// Shoulder torque duration in seconds.
        #[structopt(long)]
        t1_dur: Option<f64>,

        /// Wrist torque magnitude in newton meters.
        #[structopt(long, allow_hyphen_values = true)]
        t2_mag: Option<f64>,

        /// Wrist torque delay in seconds.
        #[structopt(long)]
        t2_delay: Option<f64>,

        /// Wrist torque duration in seconds.
        #[structopt(long)]
        t2_dur: Option<f64>,

        /// Clamp out of range parameters into range instead of rejecting
        /// them.
        #[structopt(long)]
        clamp: bool,
    },

    /// Search for the swing giving the longest forward leaning strike.
    #[structopt(name = "optimize")]
    Optimize {
        /// Optimizer parameter file, relative to the params directory.
        #[structopt(long, default_value = "optim.toml")]
        optim_params: String,

        /// Seed for the random number generator. A random seed is used if
        /// not given.
        #[structopt(long)]
        seed: Option<u64>,

        #[structopt(long)]
        phase1_iters: Option<usize>,

        #[structopt(long)]
        phase2_iters: Option<usize>,

        #[structopt(long)]
        batch_size: Option<usize>,
    },
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opt = Opt::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("swing_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(opt.log_level, &session).wrap_err("Failed to initialise logging")?;

    info!("Swing Simulator Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let sim_params =
        SimParams::load(&opt.sim_params).wrap_err("Could not load simulation params")?;

    info!("Simulation parameters loaded from {:?}", opt.sim_params);

    let sim = Simulator::new(sim_params);

    match opt.cmd {
        Command::Simulate {
            t1_mag,
            t1_dur,
            t2_mag,
            t2_delay,
            t2_dur,
            clamp,
        } => {
            let defaults = sim.ranges().defaults();
            let swing = SwingParams {
                t1_mag_nm: t1_mag.unwrap_or(defaults.t1_mag_nm),
                t1_dur_s: t1_dur.unwrap_or(defaults.t1_dur_s),
                t2_mag_nm: t2_mag.unwrap_or(defaults.t2_mag_nm),
                t2_delay_s: t2_delay.unwrap_or(defaults.t2_delay_s),
                t2_dur_s: t2_dur.unwrap_or(defaults.t2_dur_s),
            };

            simulate(&session, &sim, swing, clamp)
        }
        Command::Optimize {
            optim_params,
            seed,
            phase1_iters,
            phase2_iters,
            batch_size,
        } => {
            let mut params: optim::Params =
                util::params::load(&optim_params).wrap_err("Could not load optimizer params")?;

            if let Some(n) = phase1_iters {
                params.phase1_iters = n;
            }
            if let Some(n) = phase2_iters {
                params.phase2_iters = n;
            }
            if let Some(n) = batch_size {
                params.batch_size = n;
            }

            optimize(&session, sim, params, seed.unwrap_or_else(rand::random))
        }
    }
}

/// Simulate a single swing and save the result.
fn simulate(
    session: &Session,
    sim: &Simulator,
    swing: SwingParams,
    clamp: bool,
) -> Result<(), Report> {
    let swing = if clamp {
        let clamped = sim.ranges().clamp(&swing);
        if clamped != swing {
            warn!("Swing parameters clamped into range: {:?}", clamped);
        }
        clamped
    } else {
        sim.ranges()
            .check(&swing)
            .wrap_err("Swing parameters out of range, use --clamp to clamp them")?;
        swing
    };

    info!("Simulating swing: {:?}", swing);

    let result = sim.simulate(&swing);

    // Archive the linkage history
    let mut arch_history =
        Archiver::from_path(session, "swing/history.csv").map_err(|e| eyre!("{}", e))?;
    for state in result.history.iter() {
        arch_history
            .serialise(state)
            .map_err(|e| eyre!("Failed to archive swing history: {}", e))?;
    }

    log_result(&result);

    session
        .save_json("result.json", &result)
        .wrap_err("Failed to save the simulation result")?;

    Ok(())
}

/// Run the swing search and save the best candidate.
fn optimize(
    session: &Session,
    sim: Simulator,
    params: optim::Params,
    seed: u64,
) -> Result<(), Report> {
    info!("Starting swing search with seed {}", seed);

    let mut optimizer = Optimizer::new(sim, params, SmallRng::seed_from_u64(seed))
        .wrap_err("Failed to initialise the optimizer")?;
    optimizer
        .init_archives(session)
        .map_err(|e| eyre!("Failed to initialise optimizer archives: {}", e))?;

    // ---- MAIN LOOP ----

    loop {
        let (phase, _) = optimizer
            .proc(&())
            .wrap_err("Error during optimizer processing")?;

        optimizer
            .write()
            .map_err(|e| eyre!("Failed to archive optimizer status: {}", e))?;

        if phase.is_finished() {
            info!(
                "Search finished in phase {:?} after {} evaluations ({} hits)",
                phase,
                optimizer.num_evaluations(),
                optimizer.hit_count()
            );
            break;
        }
    }

    match optimizer.into_best() {
        Some(best) => {
            info!("Best swing: {:?} (score {:.2})", best.params, best.score);
            log_result(&best.result);

            session
                .save_json("best.json", &best)
                .wrap_err("Failed to save the best candidate")?;
        }
        None => warn!("No valid swing found"),
    }

    Ok(())
}

/// Log a summary of a swing result.
fn log_result(result: &SimResult) {
    info!(
        "Swing ended by {:?} after {} steps, max head speed {:.2} m/s",
        result.termination,
        result.num_steps(),
        result.max_speed_ms
    );

    if result.hit_ball {
        info!(
            "Hit at {:.2} m/s | Lean: {:+.1} deg | Attack: {:+.1} deg | Launch: {:.1} deg",
            result.impact_speed_ms,
            result.shaft_lean_deg,
            result.attack_angle_deg,
            result.launch_angle_deg
        );
        info!(
            "Distance: {:.0} yds (Carry: {:.0} yds, Run: {:.0} yds) | Ball speed {:.1} m/s | Apex {:.1} m",
            m_to_yd(result.ball_distance_m),
            m_to_yd(result.carry_distance_m),
            m_to_yd(result.run_distance_m),
            result.ball_speed_ms,
            result.apex_height_m
        );
    } else if result.ground_strike {
        info!("Ground strike, the ball was not hit");
    } else {
        info!("Missed the ball");
    }
}
