//! Test and helper mocks for sumo_core

use sumo_traits::{
    AccelSource, BoundaryFlags, BoundarySensors, BoxError, Feedback, Proximity, RandomSource,
    RangeFinder, Sample,
};

/// Sensors that always error on read; useful when driving the control loop
/// with externally sampled frames via `step_from_frame`.
pub struct NoopSensors;

impl AccelSource for NoopSensors {
    fn read_raw(&mut self) -> Result<Sample, BoxError> {
        Err(Box::new(std::io::Error::other("noop accelerometer")))
    }
}

impl BoundarySensors for NoopSensors {
    fn read(&mut self) -> Result<BoundaryFlags, BoxError> {
        Err(Box::new(std::io::Error::other("noop boundary sensors")))
    }
}

impl RangeFinder for NoopSensors {
    fn read(&mut self) -> Result<Proximity, BoxError> {
        Err(Box::new(std::io::Error::other("noop range finder")))
    }
}

/// Feedback sink that drops every event.
pub struct SilentFeedback;

impl Feedback for SilentFeedback {
    fn contact_made(&mut self) {}
}

/// Random source replaying a fixed sequence (clamped into the requested
/// range), cycling when exhausted. An empty script always yields `lo`.
pub struct ScriptedRandom {
    values: Vec<i32>,
    idx: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<i32>) -> Self {
        Self { values, idx: 0 }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_in_range(&mut self, lo: i32, hi: i32) -> i32 {
        if self.values.is_empty() || lo >= hi {
            return lo;
        }
        let v = self.values[self.idx % self.values.len()];
        self.idx = self.idx.wrapping_add(1);
        v.clamp(lo, hi)
    }
}
