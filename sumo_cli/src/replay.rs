//! Trace replay: one controller tick per CSV row on a manual clock.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use eyre::WrapErr;
use sumo_config::Config;
use sumo_core::mocks::NoopSensors;
use sumo_core::{CoreCfg, RunSummary, SensorFrame, build_sumo};
use sumo_hardware::{LogFeedback, RecordingDrive, SeededRandom};
use sumo_traits::clock::ManualClock;
use sumo_traits::{BoundaryFlags, Proximity, Sample};

use crate::report::{tick_json, tick_line};

/// Replay `trace` against the configured controller.
///
/// Row times are bout milliseconds (no countdown). A row that falls inside a
/// maneuver still running is processed when the maneuver completes; time
/// never runs backwards.
///
/// A row's `close`/`very_close` columns are fed as all `samples_per_tick`
/// range reads of its tick. When `samples_per_tick >= confirmations` a single
/// row confirms a sighting, so traces meant to exercise debouncing should set
/// `samples_per_tick = 1` and spread the sighting over several rows.
pub fn replay(cfg: &Config, trace: &Path, json: bool) -> eyre::Result<RunSummary> {
    let rows = sumo_config::load_trace_csv(trace).wrap_err("load trace")?;

    let mut core = CoreCfg::from(cfg);
    core.timing.countdown_ms = 0;
    let reads = usize::from(core.proximity.samples_per_tick);

    let clock = ManualClock::new();
    let mut sumo = build_sumo(
        NoopSensors,
        NoopSensors,
        NoopSensors,
        RecordingDrive::new(),
        Some(Box::new(LogFeedback::new())),
        Box::new(SeededRandom::new(cfg.sim.seed)),
        core,
        Some(Arc::new(clock.clone())),
    )
    .wrap_err("build controller")?;
    sumo.begin()?;
    tracing::info!(rows = rows.len(), path = %trace.display(), "replay start");

    let mut summary = RunSummary::default();
    let mut frame = SensorFrame::default();
    for row in &rows {
        let due = Duration::from_millis(row.t_ms);
        if due > clock.elapsed() {
            clock.set_offset(due);
        }
        frame.sample = Some(Sample::new(row.x, row.y));
        frame.boundary = BoundaryFlags {
            left: row.left,
            right: row.right,
        };
        frame.proximity.clear();
        frame.proximity.resize(
            reads,
            Proximity {
                close: row.close,
                very_close: row.very_close,
            },
        );

        let report = sumo.step_from_frame(&frame)?;
        summary.record(&report);
        if json {
            println!("{}", tick_json(&report, Some(row.t_ms)));
        } else {
            println!("{:>7}  {}", row.t_ms, tick_line(&report));
        }
    }

    sumo.motor_stop()?;
    summary.elapsed_ms = sumo.now_ms();
    Ok(summary)
}
