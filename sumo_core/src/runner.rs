use std::sync::atomic::{AtomicBool, Ordering};

use sumo_traits::{AccelSource, BoundarySensors, Drive, RangeFinder};

use crate::behavior::Behavior;
use crate::engine::SumoCore;
use crate::error::Result;
use crate::status::TickReport;

/// Totals for one bout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub contacts: u64,
    /// Ticks spent in each behavior, indexed like `Behavior::ALL`.
    pub behavior_ticks: [u64; 5],
    /// Bout time from the end of the countdown to the last tick.
    pub elapsed_ms: u64,
}

impl RunSummary {
    pub fn ticks_in(&self, behavior: Behavior) -> u64 {
        self.behavior_ticks[behavior.index()]
    }

    /// Fold one tick in. The runner does this itself; replays driving
    /// `step_from_frame` directly use it to keep the same totals.
    pub fn record(&mut self, report: &TickReport) {
        self.ticks += 1;
        if report.contact_made {
            self.contacts += 1;
        }
        self.behavior_ticks[report.behavior.index()] += 1;
    }
}

/// Returns true once the loop should stop.
#[inline]
fn should_stop(ticks: u64, max_ticks: Option<u64>, shutdown: &AtomicBool) -> bool {
    shutdown.load(Ordering::Relaxed) || max_ticks.is_some_and(|max| ticks >= max)
}

/// Run a bout: countdown, then tick until `max_ticks` is reached or
/// `shutdown` is raised. The drive is stopped on every exit path.
///
/// `on_tick` sees every report; the CLI uses it for JSON streaming.
pub fn run<A, B, P, D, F>(
    core: &mut SumoCore<A, B, P, D>,
    max_ticks: Option<u64>,
    shutdown: &AtomicBool,
    mut on_tick: F,
) -> Result<RunSummary>
where
    A: AccelSource,
    B: BoundarySensors,
    P: RangeFinder,
    D: Drive,
    F: FnMut(&TickReport),
{
    core.begin()?;
    let start_ms = core.now_ms();
    tracing::info!(max_ticks, "run loop start");

    let mut summary = RunSummary::default();
    let outcome = loop {
        if should_stop(summary.ticks, max_ticks, shutdown) {
            break Ok(());
        }
        match core.step() {
            Ok(report) => {
                summary.record(&report);
                on_tick(&report);
            }
            Err(e) => break Err(e),
        }
    };

    if let Err(e) = core.motor_stop() {
        tracing::warn!(error = %e, "drive stop failed at end of bout");
    }
    summary.elapsed_ms = core.now_ms().saturating_sub(start_ms);

    match outcome {
        Ok(()) => {
            tracing::info!(
                ticks = summary.ticks,
                contacts = summary.contacts,
                elapsed_ms = summary.elapsed_ms,
                "bout complete"
            );
            Ok(summary)
        }
        Err(e) => {
            tracing::error!(error = %e, ticks = summary.ticks, "bout aborted");
            Err(e)
        }
    }
}
