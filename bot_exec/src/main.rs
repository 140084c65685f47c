//! Main robot executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the simulated robot and the state manager
//!     - Main loop:
//!         - State request acquisition, from the script or the built-in square pattern
//!         - State manager processing (state entry and rotation polling)
//!         - Sensor logging on the 1 Hz cycle
//!
//! # Usage
//!
//! ```text
//! bot_exec [script]
//! ```
//!
//! A script is a list of `<time_s>: <state tag json>;` entries, see `scripts/` for examples.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod square;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{
    env, thread,
    time::{Duration, Instant},
};

use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};

use bot_lib::{
    params::BotExecParams,
    rot_ctrl::RotationStatus,
    sim::{SimParams, SimRover},
    state_mgr::{InitData, InputData, StateMgr, StateMgrParams, StateTag},
};
use square::{SquarePattern, SquareStep};
use util::{
    host,
    logger::{logger_init, LevelFilter},
    module::Module,
    script_interpreter::{Pending, ScriptInterpreter},
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Sources of state requests for the executable.
enum RequestSource {
    Script(ScriptInterpreter<StateTag>),
    Square(SquarePattern),
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    let session = Session::new("bot_exec", "sessions").wrap_err("Failed to create the session")?;

    logger_init(LevelFilter::Debug, LevelFilter::Debug, &session)
        .wrap_err("Failed to initialise logging")?;

    info!("Diffbot Executable\n");
    info!(
        "Running on: {:#?}",
        host::get_uname().wrap_err("Failed to get host information")?
    );
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: BotExecParams =
        util::params::load("bot_exec.toml").wrap_err("Could not load exec params")?;
    let state_mgr_params: StateMgrParams =
        util::params::load("state_mgr.toml").wrap_err("Could not load StateMgr params")?;
    let sim_params: SimParams =
        util::params::load("sim.toml").wrap_err("Could not load sim params")?;

    if !(exec_params.cycle_period_s > 0.0) {
        return Err(eyre!(
            "Cycle period must be positive, found {}",
            exec_params.cycle_period_s
        ));
    }

    info!("Exec parameters loaded");

    // ---- INITIALISE REQUEST SOURCE ----

    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    let mut source = match args.len() {
        2 => {
            info!("Loading script from \"{}\"", &args[1]);

            let si = ScriptInterpreter::new(&args[1]).wrap_err("Failed to load script")?;

            info!(
                "Loaded script lasts {:.02} s and contains {} state requests\n",
                si.get_duration(),
                si.get_num_cmds()
            );

            RequestSource::Script(si)
        }
        1 => {
            info!(
                "No script provided, driving a {} leg square\n",
                exec_params.square_num_legs
            );
            RequestSource::Square(SquarePattern::new(&exec_params))
        }
        n => {
            return Err(eyre!(
                "Expected either zero or one argument, found {}",
                n - 1
            ))
        }
    };

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let sim = SimRover::new(&sim_params);

    let mut state_mgr = StateMgr::init(InitData {
        params: state_mgr_params,
        hardware: sim.hardware(),
        initial: StateTag::idle(),
    })
    .wrap_err("Failed to initialise StateMgr")?;
    info!("StateMgr init complete");

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    let cycle_period = Duration::from_secs_f64(exec_params.cycle_period_s);
    let cycles_per_second = exec_params.cycle_frequency_hz().round().max(1.0) as u64;
    let mut num_cycles: u64 = 0;

    loop {
        let cycle_start_instant = Instant::now();

        // ---- STATE REQUESTS ----

        let mut requests: Vec<StateTag> = vec![];

        match source {
            RequestSource::Script(ref mut si) => match si.get_pending() {
                Pending::None => (),
                Pending::Some(tags) => requests = tags,
                // Let any rotation in progress finish before exiting
                Pending::EndOfScript => {
                    if !state_mgr.is_rotating() {
                        info!("End of script reached, stopping");
                        break;
                    }
                }
            },
            RequestSource::Square(ref mut square) => match square.next(&state_mgr) {
                SquareStep::Continue(tag) => requests.extend(tag),
                SquareStep::Finished => {
                    info!("Square pattern complete, stopping");
                    break;
                }
            },
        }

        // Only the last request in a cycle is processed, earlier ones would be overwritten
        // immediately.
        if requests.len() > 1 {
            warn!(
                "{} state requests due in one cycle, skipping all but the last",
                requests.len()
            );
        }

        // ---- STATE MANAGER PROCESSING ----

        let input = InputData {
            request: requests.pop(),
        };

        match state_mgr.proc(&input) {
            Ok((Some(RotationStatus::Complete(report)), _)) => info!(
                "Rotation complete: {:.1} -> {:.1} deg in {:.2} s",
                report.start_deg, report.final_deg, report.elapsed_s
            ),
            Ok(_) => (),
            Err(e) => warn!("Error during StateMgr processing: {}", e),
        }

        // ---- SENSOR LOGGING ----

        if num_cycles % cycles_per_second == 0 {
            let distance_m = state_mgr.sensors().read_distance_m();
            let color = state_mgr.sensors().read_color();

            info!(
                "State {} ({:.1} s), distance {:.2} m, color {:?}",
                state_mgr.current_state(),
                state_mgr.time_in_current_state().as_secs_f64(),
                distance_m,
                color
            );
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        match cycle_period.checked_sub(cycle_dur) {
            Some(d) => thread::sleep(d),
            None => warn!(
                "Cycle overran by {:.06} s",
                cycle_dur.as_secs_f64() - cycle_period.as_secs_f64()
            ),
        }

        num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    state_mgr
        .enter(StateTag::idle())
        .wrap_err("Failed to stop the robot")?;

    match serde_json::to_string(&state_mgr.status()) {
        Ok(s) => info!("Final status: {}", s),
        Err(e) => warn!("Could not serialise the final status: {}", e),
    }

    info!("End of execution");

    Ok(())
}
