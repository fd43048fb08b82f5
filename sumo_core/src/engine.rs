//! The tick engine (`SumoCore`).
//!
//! Owns the collaborators and drives one control iteration per `step()`:
//! sample the clock once, read the sensors, update the motion pipeline, run
//! the behavior controller, then execute the resulting maneuver on the drive.
//! Delays inside a maneuver are `Clock::sleep` calls issued after the speed
//! for that segment has been set.

use std::sync::Arc;
use std::time::{Duration, Instant};

use eyre::WrapErr;
use sumo_traits::clock::Clock;
use sumo_traits::{
    AccelSource, BoundaryFlags, BoundarySensors, Drive, Feedback, Proximity, RandomSource,
    RangeFinder, Sample,
};

use crate::behavior::{Behavior, BehaviorController, Maneuver, MotorCommand, TierState};
use crate::config::TimingCfg;
use crate::contact::ContactState;
use crate::error::Result;
use crate::hw_error::map_hw_error;
use crate::motion::{Accelerometer, MotionReading};
use crate::status::TickReport;

/// Inputs for one tick sampled outside the engine (trace replay, tests).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorFrame {
    /// `None` when the accelerometer produced nothing this tick.
    pub sample: Option<Sample>,
    pub boundary: BoundaryFlags,
    /// Range-finder readings for this tick, oldest first.
    pub proximity: Vec<Proximity>,
}

/// Unified core for both dynamic (boxed) and generic (static dispatch) variants.
pub struct SumoCore<A: AccelSource, B: BoundarySensors, P: RangeFinder, D: Drive> {
    pub(crate) accel: Accelerometer<A>,
    pub(crate) boundary: B,
    pub(crate) range: P,
    pub(crate) drive: D,
    pub(crate) feedback: Box<dyn Feedback>,
    pub(crate) random: Box<dyn RandomSource>,
    pub(crate) controller: BehaviorController,
    pub(crate) timing: TimingCfg,
    pub(crate) samples_per_tick: u8,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    pub(crate) epoch: Instant,
    pub(crate) period_ms: u64,
    // Reused range-finder buffer; no per-tick allocation
    pub(crate) prox_buf: Vec<Proximity>,
    pub(crate) last_command: MotorCommand,
    pub(crate) ticks: u64,
    pub(crate) contacts: u64,
}

impl<A: AccelSource, B: BoundarySensors, P: RangeFinder, D: Drive> core::fmt::Debug
    for SumoCore<A, B, P, D>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SumoCore")
            .field("ticks", &self.ticks)
            .field("behavior", &self.controller.last_behavior())
            .field("tier", &self.controller.tier().tier)
            .field("in_contact", &self.controller.contact_state().in_contact)
            .finish()
    }
}

impl<A: AccelSource, B: BoundarySensors, P: RangeFinder, D: Drive> SumoCore<A, B, P, D> {
    /// Reset per-bout state and run the startup countdown. Call before the
    /// first tick of a bout.
    ///
    /// Motors are held stopped for `countdown_ms`, then both axis filters are
    /// seeded to rest and the detector windows restart at the post-countdown
    /// time, so nothing sampled at startup can register as a hit.
    pub fn begin(&mut self) -> Result<()> {
        self.motor_stop()?;
        self.last_command = MotorCommand::STOP;
        self.epoch = self.clock.now();

        let mut remaining = self.timing.countdown_ms;
        while remaining > 0 {
            let step = remaining.min(1000);
            tracing::info!(remaining_ms = remaining, "countdown");
            self.clock.sleep(Duration::from_millis(step));
            remaining -= step;
        }

        let now = self.clock.ms_since(self.epoch);
        self.accel.seed(Sample::default(), now);
        self.controller.reset(now);
        self.ticks = 0;
        self.contacts = 0;
        tracing::info!(at_ms = now, "bout start");
        Ok(())
    }

    /// One iteration of the control loop (reads all sensors internally).
    pub fn step(&mut self) -> Result<TickReport> {
        let now = self.clock.ms_since(self.epoch);
        self.accel.poll(now);

        let boundary = match self.boundary.read() {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(error = %e, "boundary read failed; treating as clear");
                BoundaryFlags::default()
            }
        };

        self.prox_buf.clear();
        for _ in 0..self.samples_per_tick {
            match self.range.read() {
                Ok(p) => self.prox_buf.push(p),
                Err(e) => {
                    tracing::warn!(error = %e, "range read failed; treating as no opponent");
                    self.prox_buf.push(Proximity::default());
                }
            }
        }

        self.process(now, boundary)
    }

    /// Process a pre-sampled frame (for trace replay and external samplers).
    pub fn step_from_frame(&mut self, frame: &SensorFrame) -> Result<TickReport> {
        let now = self.clock.ms_since(self.epoch);
        if let Some(sample) = frame.sample {
            self.accel.ingest(sample, now);
        }
        self.prox_buf.clear();
        self.prox_buf.extend_from_slice(&frame.proximity);
        self.process(now, frame.boundary)
    }

    /// Stop the drive (best-effort from the caller's point of view).
    pub fn motor_stop(&mut self) -> Result<()> {
        self.drive
            .stop()
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err("drive stop")?;
        self.last_command = MotorCommand::STOP;
        Ok(())
    }

    // ── Private: shared tick logic ───────────────────────────────────────────

    fn process(&mut self, now: u64, boundary: BoundaryFlags) -> Result<TickReport> {
        let reading = *self.accel.reading();
        tracing::trace!(
            at_ms = now,
            filtered_x = reading.filtered_x,
            filtered_y = reading.filtered_y,
            magnitude_sq = reading.magnitude_sq,
            direction_deg = reading.direction_deg,
            "motion reading"
        );

        let decision = self.controller.decide(
            now,
            &reading,
            boundary,
            &self.prox_buf,
            self.random.as_mut(),
        );
        if decision.contact_made {
            self.contacts += 1;
            tracing::info!(
                at_ms = now,
                magnitude = reading.magnitude(),
                direction_deg = reading.direction_deg,
                "contact made"
            );
            self.feedback.contact_made();
        }

        if let Err(e) = self.execute(&decision.maneuver) {
            if let Err(stop_err) = self.motor_stop() {
                tracing::warn!(error = %stop_err, "drive stop failed after maneuver error");
            }
            return Err(e);
        }
        self.ticks += 1;

        let report = TickReport {
            at_ms: now,
            behavior: decision.maneuver.behavior,
            command: self.last_command,
            hold_ms: decision.maneuver.total_hold_ms(),
            tier: self.controller.tier().tier,
            contact_made: decision.contact_made,
            in_contact: self.controller.contact_state().in_contact,
            reading,
        };
        self.clock.sleep(Duration::from_millis(self.period_ms));
        Ok(report)
    }

    fn execute(&mut self, maneuver: &Maneuver) -> Result<()> {
        for segment in &maneuver.segments {
            let cmd = segment.command;
            self.drive
                .set_speeds(cmd.left, cmd.right)
                .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
                .wrap_err("set_speeds")?;
            self.last_command = cmd;
            if segment.hold_ms > 0 {
                self.clock.sleep(Duration::from_millis(segment.hold_ms));
            }
        }
        Ok(())
    }

    // ── Telemetry ────────────────────────────────────────────────────────────

    #[inline]
    pub fn reading(&self) -> &MotionReading {
        self.accel.reading()
    }

    #[inline]
    pub fn tier(&self) -> TierState {
        self.controller.tier()
    }

    #[inline]
    pub fn behavior(&self) -> Behavior {
        self.controller.last_behavior()
    }

    #[inline]
    pub fn contact_state(&self) -> &ContactState {
        self.controller.contact_state()
    }

    #[inline]
    pub fn last_command(&self) -> MotorCommand {
        self.last_command
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// "Contact made" events since `begin()`.
    #[inline]
    pub fn contacts(&self) -> u64 {
        self.contacts
    }

    #[inline]
    pub fn timing(&self) -> &TimingCfg {
        &self.timing
    }

    /// Milliseconds since the bout epoch.
    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.clock.ms_since(self.epoch)
    }
}
