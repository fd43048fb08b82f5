//! Devices that replay a fixed script, one entry per read.

use std::collections::VecDeque;

use sumo_traits::{AccelSource, BoundaryFlags, BoundarySensors, BoxError, Proximity, RangeFinder, Sample};

use crate::error::HwError;

/// Yields queued values in order, then keeps repeating the last one.
#[derive(Debug, Clone)]
struct Script<T: Copy> {
    queue: VecDeque<T>,
    last: Option<T>,
}

impl<T: Copy> Script<T> {
    fn new(values: impl IntoIterator<Item = T>) -> Self {
        Self {
            queue: values.into_iter().collect(),
            last: None,
        }
    }

    fn next(&mut self) -> Option<T> {
        if let Some(v) = self.queue.pop_front() {
            self.last = Some(v);
        }
        self.last
    }
}

/// Accelerometer replaying fixed samples. An empty script times out.
#[derive(Debug, Clone)]
pub struct ScriptedAccelerometer(Script<Sample>);

impl ScriptedAccelerometer {
    pub fn new(samples: impl IntoIterator<Item = Sample>) -> Self {
        Self(Script::new(samples))
    }
}

impl AccelSource for ScriptedAccelerometer {
    fn read_raw(&mut self) -> Result<Sample, BoxError> {
        self.0.next().ok_or_else(|| Box::new(HwError::Timeout) as BoxError)
    }
}

/// Boundary sensors replaying fixed flags. An empty script is always clear.
#[derive(Debug, Clone)]
pub struct ScriptedBoundary(Script<BoundaryFlags>);

impl ScriptedBoundary {
    pub fn new(flags: impl IntoIterator<Item = BoundaryFlags>) -> Self {
        Self(Script::new(flags))
    }
}

impl BoundarySensors for ScriptedBoundary {
    fn read(&mut self) -> Result<BoundaryFlags, BoxError> {
        Ok(self.0.next().unwrap_or_default())
    }
}

/// Range finder replaying fixed readings. An empty script sees nothing.
#[derive(Debug, Clone)]
pub struct ScriptedRangeFinder(Script<Proximity>);

impl ScriptedRangeFinder {
    pub fn new(readings: impl IntoIterator<Item = Proximity>) -> Self {
        Self(Script::new(readings))
    }
}

impl RangeFinder for ScriptedRangeFinder {
    fn read(&mut self) -> Result<Proximity, BoxError> {
        Ok(self.0.next().unwrap_or_default())
    }
}
