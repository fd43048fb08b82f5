//! Builder for `Sumo` and the generic `build_sumo` constructor.
//!
//! `SumoBuilder::try_build()` reports missing collaborators as typed
//! `BuildError`s; both paths share `validate_and_build`.

use std::sync::Arc;
use std::time::Instant;

use sumo_traits::clock::{Clock, MonotonicClock};
use sumo_traits::{AccelSource, BoundarySensors, Drive, Feedback, RandomSource, RangeFinder};

use crate::behavior::BehaviorController;
use crate::config::*;
use crate::contact::ContactDetector;
use crate::engine::SumoCore;
use crate::error::{BuildError, Result};
use crate::mocks::SilentFeedback;
use crate::motion::Accelerometer;
use crate::proximity::ProximityDebouncer;
use crate::util::period_ms;

/// Engine with boxed collaborators, for wiring decided at runtime.
pub type Sumo = SumoCore<
    Box<dyn AccelSource>,
    Box<dyn BoundarySensors>,
    Box<dyn RangeFinder>,
    Box<dyn Drive>,
>;

impl Sumo {
    /// Start building a boxed engine.
    pub fn builder() -> SumoBuilder {
        SumoBuilder::default()
    }
}

/// Builder for `Sumo`. All fields are validated on `try_build()`.
#[derive(Default)]
pub struct SumoBuilder {
    accel: Option<Box<dyn AccelSource>>,
    boundary: Option<Box<dyn BoundarySensors>>,
    range: Option<Box<dyn RangeFinder>>,
    drive: Option<Box<dyn Drive>>,
    feedback: Option<Box<dyn Feedback>>,
    random: Option<Box<dyn RandomSource>>,
    cfg: CoreCfg,
    clock: Option<Arc<dyn Clock + Send + Sync>>,
}

impl SumoBuilder {
    pub fn with_accelerometer(mut self, a: impl AccelSource + 'static) -> Self {
        self.accel = Some(Box::new(a));
        self
    }

    pub fn with_boundary(mut self, b: impl BoundarySensors + 'static) -> Self {
        self.boundary = Some(Box::new(b));
        self
    }

    pub fn with_range_finder(mut self, r: impl RangeFinder + 'static) -> Self {
        self.range = Some(Box::new(r));
        self
    }

    pub fn with_drive(mut self, d: impl Drive + 'static) -> Self {
        self.drive = Some(Box::new(d));
        self
    }

    pub fn with_feedback(mut self, f: impl Feedback + 'static) -> Self {
        self.feedback = Some(Box::new(f));
        self
    }

    pub fn with_random(mut self, r: impl RandomSource + 'static) -> Self {
        self.random = Some(Box::new(r));
        self
    }

    pub fn with_config(mut self, cfg: CoreCfg) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn with_filter(mut self, filter: FilterCfg) -> Self {
        self.cfg.filter = filter;
        self
    }

    pub fn with_detector(mut self, detector: DetectorCfg) -> Self {
        self.cfg.detector = detector;
        self
    }

    pub fn with_speeds(mut self, speeds: SpeedCfg) -> Self {
        self.cfg.speeds = speeds;
        self
    }

    pub fn with_timing(mut self, timing: TimingCfg) -> Self {
        self.cfg.timing = timing;
        self
    }

    pub fn with_proximity(mut self, proximity: ProximityCfg) -> Self {
        self.cfg.proximity = proximity;
        self
    }

    /// Inject a clock (tests use `ManualClock`). Defaults to `MonotonicClock`.
    pub fn with_clock(mut self, clock: impl Clock + Send + Sync + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    pub fn try_build(self) -> Result<Sumo> {
        let accel = self
            .accel
            .ok_or_else(|| eyre::Report::new(BuildError::MissingAccelerometer))?;
        let boundary = self
            .boundary
            .ok_or_else(|| eyre::Report::new(BuildError::MissingBoundary))?;
        let range = self
            .range
            .ok_or_else(|| eyre::Report::new(BuildError::MissingRangeFinder))?;
        let drive = self
            .drive
            .ok_or_else(|| eyre::Report::new(BuildError::MissingDrive))?;
        let random = self
            .random
            .ok_or_else(|| eyre::Report::new(BuildError::MissingRandom))?;
        let feedback = self
            .feedback
            .unwrap_or_else(|| Box::new(SilentFeedback));
        validate_and_build(
            accel, boundary, range, drive, feedback, random, self.cfg, self.clock,
        )
    }
}

/// Construct a statically dispatched engine.
#[allow(clippy::too_many_arguments)]
pub fn build_sumo<A, B, P, D>(
    accel: A,
    boundary: B,
    range: P,
    drive: D,
    feedback: Option<Box<dyn Feedback>>,
    random: Box<dyn RandomSource>,
    cfg: CoreCfg,
    clock: Option<Arc<dyn Clock + Send + Sync>>,
) -> Result<SumoCore<A, B, P, D>>
where
    A: AccelSource,
    B: BoundarySensors,
    P: RangeFinder,
    D: Drive,
{
    let feedback = feedback.unwrap_or_else(|| Box::new(SilentFeedback));
    validate_and_build(accel, boundary, range, drive, feedback, random, cfg, clock)
}

fn invalid(msg: &'static str) -> eyre::Report {
    eyre::Report::new(BuildError::InvalidConfig(msg))
}

/// Validate configuration and construct a `SumoCore`.
///
/// This is the single source of truth for validation and construction,
/// used by both `SumoBuilder::try_build()` and `build_sumo()`.
#[allow(clippy::too_many_arguments)]
fn validate_and_build<A, B, P, D>(
    accel: A,
    boundary: B,
    range: P,
    drive: D,
    feedback: Box<dyn Feedback>,
    random: Box<dyn RandomSource>,
    cfg: CoreCfg,
    clock: Option<Arc<dyn Clock + Send + Sync>>,
) -> Result<SumoCore<A, B, P, D>>
where
    A: AccelSource,
    B: BoundarySensors,
    P: RangeFinder,
    D: Drive,
{
    let CoreCfg {
        filter,
        detector,
        speeds,
        timing,
        proximity,
    } = cfg;

    // ── Validation ───────────────────────────────────────────────────────────
    let all_speeds = [
        speeds.search,
        speeds.sustained,
        speeds.full,
        speeds.reverse,
        speeds.turn,
        speeds.evade,
    ];
    if all_speeds.iter().any(|s| !(1..=MAX_SPEED).contains(s)) {
        return Err(invalid("speeds must be in 1..=400"));
    }
    if timing.tick_hz == 0 {
        return Err(invalid("tick_hz must be > 0"));
    }
    if timing.turn_ms == 0 || timing.evade_ms == 0 {
        return Err(invalid("turn_ms and evade_ms must be > 0"));
    }
    let durations = [
        timing.stop_ms,
        timing.reverse_ms,
        timing.turn_ms,
        timing.evade_ms,
        timing.search_pivot_ms,
        timing.full_speed_limit_ms,
    ];
    if durations.iter().any(|&ms| ms > MAX_MANEUVER_MS) {
        return Err(invalid("maneuver durations must be <= 10000 ms"));
    }
    if timing.jitter_min > timing.jitter_max {
        return Err(invalid("jitter_min must be <= jitter_max"));
    }
    let shortest_turn = timing.turn_ms as i64
        + i64::from(timing.jitter_min) * timing.jitter_increment_ms() as i64;
    if shortest_turn <= 0 {
        return Err(invalid("jitter_min would make a turn non-positive"));
    }
    if proximity.confirmations == 0 {
        return Err(invalid("proximity confirmations must be >= 1"));
    }
    if proximity.samples_per_tick == 0 {
        return Err(invalid("proximity samples_per_tick must be >= 1"));
    }

    let accel = Accelerometer::new(accel, filter.window).map_err(eyre::Report::new)?;
    let detector = ContactDetector::new(detector).map_err(eyre::Report::new)?;
    let controller = BehaviorController::new(
        speeds,
        timing.clone(),
        detector,
        ProximityDebouncer::new(proximity.confirmations),
    );

    // ── Construction ─────────────────────────────────────────────────────────
    let clock: Arc<dyn Clock + Send + Sync> =
        clock.unwrap_or_else(|| Arc::new(MonotonicClock::new()));
    let epoch: Instant = clock.now();
    tracing::debug!(
        window = filter.window,
        tick_hz = timing.tick_hz,
        confirmations = proximity.confirmations,
        "sumo core built"
    );

    Ok(SumoCore {
        accel,
        boundary,
        range,
        drive,
        feedback,
        random,
        controller,
        period_ms: period_ms(timing.tick_hz),
        timing,
        samples_per_tick: proximity.samples_per_tick,
        clock,
        epoch,
        prox_buf: Vec::with_capacity(usize::from(proximity.samples_per_tick)),
        last_command: Default::default(),
        ticks: 0,
        contacts: 0,
    })
}
