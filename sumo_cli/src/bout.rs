//! Simulated bouts: sim devices wired from `[sim]`, then the core runner.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use eyre::WrapErr;
use sumo_config::Config;
use sumo_core::{Behavior, CoreCfg, MotorCommand, RunSummary, SumoCore, build_sumo, runner};
use sumo_hardware::{
    LogFeedback, RecordingDrive, SeededRandom, SimTime, SimulatedAccelerometer, SimulatedBoundary,
    SimulatedRangeFinder,
};
use sumo_traits::clock::{Clock, ManualClock, MonotonicClock};

use crate::report::{tick_json, tick_line};

/// Ticks run by `self-check`.
const SELF_CHECK_TICKS: u64 = 20;

/// Test hook: make the simulated drive fail after N commands.
const DRIVE_FAIL_ENV: &str = "SUMO_TEST_DRIVE_FAIL_AFTER";

type SimSumo =
    SumoCore<SimulatedAccelerometer, SimulatedBoundary, SimulatedRangeFinder, RecordingDrive>;

fn sim_drive() -> RecordingDrive {
    match std::env::var(DRIVE_FAIL_ENV)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
    {
        Some(n) => {
            tracing::warn!(after = n, "simulated drive will fail");
            RecordingDrive::failing_after(n)
        }
        None => RecordingDrive::new(),
    }
}

fn build_sim(
    cfg: &Config,
    core: CoreCfg,
    seed: u64,
    clock: Arc<dyn Clock + Send + Sync>,
) -> eyre::Result<SimSumo> {
    let sim = &cfg.sim;
    let time = SimTime::new(Arc::clone(&clock));
    let accel = SimulatedAccelerometer::new(time.clone(), seed, sim.noise).with_impacts(
        sim.impact_every_ms,
        sim.impact_ms,
        sim.impact_accel,
    );
    let boundary = SimulatedBoundary::new(time.clone(), sim.edge_every_ms);
    let range = SimulatedRangeFinder::new(time, sim.opponent_every_ms, sim.opponent_ms);
    build_sumo(
        accel,
        boundary,
        range,
        sim_drive(),
        Some(Box::new(LogFeedback::new())),
        Box::new(SeededRandom::new(seed.wrapping_add(1))),
        core,
        Some(clock),
    )
    .wrap_err("build controller")
}

/// Fight one simulated bout. `ticks == 0` runs until `shutdown` is raised.
pub fn run_bout(
    cfg: &Config,
    ticks: u64,
    seed: Option<u64>,
    realtime: bool,
    json: bool,
    shutdown: &AtomicBool,
) -> eyre::Result<RunSummary> {
    let seed = seed.unwrap_or(cfg.sim.seed);
    let clock: Arc<dyn Clock + Send + Sync> = if realtime {
        Arc::new(MonotonicClock::new())
    } else {
        Arc::new(ManualClock::new())
    };
    let mut sumo = build_sim(cfg, CoreCfg::from(cfg), seed, clock)?;
    tracing::info!(seed, ticks, realtime, "simulated bout");

    let max_ticks = (ticks > 0).then_some(ticks);
    let mut last: Option<Behavior> = None;
    runner::run(&mut sumo, max_ticks, shutdown, |r| {
        if json {
            println!("{}", tick_json(r, None));
        } else if r.contact_made || last != Some(r.behavior) {
            println!("{}", tick_line(r));
        }
        last = Some(r.behavior);
    })
}

/// Short bout with no countdown; the drive must be left stopped.
pub fn self_check(cfg: &Config) -> eyre::Result<RunSummary> {
    let mut core = CoreCfg::from(cfg);
    core.timing.countdown_ms = 0;
    let mut sumo = build_sim(cfg, core, cfg.sim.seed, Arc::new(ManualClock::new()))?;
    let shutdown = AtomicBool::new(false);
    let summary = runner::run(&mut sumo, Some(SELF_CHECK_TICKS), &shutdown, |_| {})?;
    if sumo.last_command() != MotorCommand::STOP {
        eyre::bail!("drive was not stopped after self-check");
    }
    Ok(summary)
}
