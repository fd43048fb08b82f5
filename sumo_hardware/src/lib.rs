//! Simulated and scripted devices for the sumo controller.
//!
//! The `Simulated*` devices follow fixed schedules in simulated time so a
//! whole bout is reproducible from a seed. The `Scripted*` devices replay a
//! fixed sequence and are meant for tests.
pub mod drive;
pub mod error;
pub mod scripted;

use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sumo_traits::clock::Clock;
use sumo_traits::{
    AccelSource, BoundaryFlags, BoundarySensors, BoxError, Proximity, RandomSource, RangeFinder,
    Sample,
};

pub use drive::{DriveLog, LogFeedback, RecordingDrive};
pub use scripted::{ScriptedAccelerometer, ScriptedBoundary, ScriptedRangeFinder};

/// How long a simulated edge crossing stays visible.
pub const EDGE_WINDOW_MS: u64 = 20;

/// Shared view of simulated time, measured from construction.
#[derive(Clone)]
pub struct SimTime {
    clock: Arc<dyn Clock + Send + Sync>,
    origin: Instant,
}

impl SimTime {
    pub fn new(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        let origin = clock.now();
        Self { clock, origin }
    }

    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.clock.ms_since(self.origin)
    }
}

impl core::fmt::Debug for SimTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SimTime")
            .field("now_ms", &self.now_ms())
            .finish()
    }
}

/// Returns `t / every` when `t` falls inside `[k * every, k * every + len)`
/// for some `k >= 1`. Nothing happens before the first period.
#[inline]
fn window_index(t: u64, every: u64, len: u64) -> Option<u64> {
    if every == 0 || t < every {
        return None;
    }
    (t % every < len).then_some(t / every)
}

#[inline]
fn saturate_i16(v: i32) -> i16 {
    v.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

/// Accelerometer producing bounded noise plus periodic opponent impacts.
///
/// Impacts alternate sides: even-numbered ones push along +x, odd ones
/// along -x, each with a smaller forward component.
#[derive(Debug)]
pub struct SimulatedAccelerometer {
    time: SimTime,
    rng: StdRng,
    noise: i16,
    impact_every_ms: u64,
    impact_ms: u64,
    impact_accel: i16,
}

impl SimulatedAccelerometer {
    pub fn new(time: SimTime, seed: u64, noise: i16) -> Self {
        Self {
            time,
            rng: StdRng::seed_from_u64(seed),
            noise: noise.max(0),
            impact_every_ms: 0,
            impact_ms: 0,
            impact_accel: 0,
        }
    }

    /// Schedule an impact of `accel` raw units every `every_ms`, lasting `len_ms`.
    pub fn with_impacts(mut self, every_ms: u64, len_ms: u64, accel: i16) -> Self {
        self.impact_every_ms = every_ms;
        self.impact_ms = len_ms;
        self.impact_accel = accel;
        self
    }
}

impl AccelSource for SimulatedAccelerometer {
    fn read_raw(&mut self) -> Result<Sample, BoxError> {
        let t = self.time.now_ms();
        let n = self.noise;
        let mut x = i32::from(self.rng.random_range(-n..=n));
        let mut y = i32::from(self.rng.random_range(-n..=n));
        if let Some(k) = window_index(t, self.impact_every_ms, self.impact_ms) {
            let sign = if k % 2 == 0 { 1 } else { -1 };
            x += sign * i32::from(self.impact_accel);
            y += i32::from(self.impact_accel) / 4;
            tracing::trace!(at_ms = t, impact = k, "simulated impact");
        }
        Ok(Sample::new(saturate_i16(x), saturate_i16(y)))
    }
}

/// Line sensors that see an edge every `every_ms`, alternating sides
/// (odd crossings on the left).
#[derive(Debug)]
pub struct SimulatedBoundary {
    time: SimTime,
    every_ms: u64,
}

impl SimulatedBoundary {
    pub fn new(time: SimTime, every_ms: u64) -> Self {
        Self { time, every_ms }
    }
}

impl BoundarySensors for SimulatedBoundary {
    fn read(&mut self) -> Result<BoundaryFlags, BoxError> {
        let t = self.time.now_ms();
        let flags = match window_index(t, self.every_ms, EDGE_WINDOW_MS) {
            Some(k) if k % 2 == 1 => BoundaryFlags {
                left: true,
                right: false,
            },
            Some(_) => BoundaryFlags {
                left: false,
                right: true,
            },
            None => BoundaryFlags::default(),
        };
        if flags.any() {
            tracing::trace!(at_ms = t, left = flags.left, right = flags.right, "simulated edge");
        }
        Ok(flags)
    }
}

/// Range finder that sees the opponent every `every_ms` for `len_ms`:
/// close for the first half of the sighting, very close for the rest.
#[derive(Debug)]
pub struct SimulatedRangeFinder {
    time: SimTime,
    every_ms: u64,
    len_ms: u64,
}

impl SimulatedRangeFinder {
    pub fn new(time: SimTime, every_ms: u64, len_ms: u64) -> Self {
        Self {
            time,
            every_ms,
            len_ms,
        }
    }
}

impl RangeFinder for SimulatedRangeFinder {
    fn read(&mut self) -> Result<Proximity, BoxError> {
        let t = self.time.now_ms();
        Ok(match window_index(t, self.every_ms, self.len_ms) {
            Some(_) => Proximity {
                close: true,
                very_close: t % self.every_ms >= self.len_ms / 2,
            },
            None => Proximity::default(),
        })
    }
}

/// Reproducible random source.
#[derive(Debug)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_in_range(&mut self, lo: i32, hi: i32) -> i32 {
        if lo >= hi {
            return lo;
        }
        self.rng.random_range(lo..=hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sumo_traits::ManualClock;

    fn sim_time() -> (ManualClock, SimTime) {
        let clock = ManualClock::new();
        let time = SimTime::new(Arc::new(clock.clone()));
        (clock, time)
    }

    #[test]
    fn window_index_skips_first_period() {
        assert_eq!(window_index(0, 100, 10), None);
        assert_eq!(window_index(99, 100, 10), None);
        assert_eq!(window_index(100, 100, 10), Some(1));
        assert_eq!(window_index(109, 100, 10), Some(1));
        assert_eq!(window_index(110, 100, 10), None);
        assert_eq!(window_index(205, 100, 10), Some(2));
        assert_eq!(window_index(500, 0, 10), None);
    }

    #[test]
    fn noise_stays_in_bounds() {
        let (_clock, time) = sim_time();
        let mut accel = SimulatedAccelerometer::new(time, 3, 40);
        for _ in 0..200 {
            let s = accel.read_raw().unwrap();
            assert!((-40..=40).contains(&s.x));
            assert!((-40..=40).contains(&s.y));
        }
    }

    #[test]
    fn impacts_alternate_sides() {
        let (clock, time) = sim_time();
        let mut accel = SimulatedAccelerometer::new(time, 1, 0).with_impacts(1000, 50, 3000);
        clock.advance_ms(1010);
        assert_eq!(accel.read_raw().unwrap(), Sample::new(-3000, 750));
        clock.advance_ms(1000);
        assert_eq!(accel.read_raw().unwrap(), Sample::new(3000, 750));
        clock.advance_ms(100);
        assert_eq!(accel.read_raw().unwrap(), Sample::new(0, 0));
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SeededRandom::new(9);
        let mut b = SeededRandom::new(9);
        for _ in 0..32 {
            assert_eq!(a.next_in_range(-2, 5), b.next_in_range(-2, 5));
        }
        assert_eq!(a.next_in_range(4, 4), 4);
    }

    #[test]
    fn range_finder_escalates_within_sighting() {
        let (clock, time) = sim_time();
        let mut rf = SimulatedRangeFinder::new(time, 1000, 400);
        assert_eq!(rf.read().unwrap(), Proximity::default());
        clock.advance_ms(1100);
        let p = rf.read().unwrap();
        assert!(p.close && !p.very_close);
        clock.advance_ms(200);
        let p = rf.read().unwrap();
        assert!(p.close && p.very_close);
    }
}
