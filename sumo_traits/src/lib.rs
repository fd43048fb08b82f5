pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock};

/// Error type used at every device boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// One raw accelerometer axis pair, as handed over by the sensor driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Sample {
    pub x: i16,
    pub y: i16,
}

impl Sample {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

/// Line-boundary state for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundaryFlags {
    pub left: bool,
    pub right: bool,
}

impl BoundaryFlags {
    #[inline]
    pub fn any(&self) -> bool {
        self.left || self.right
    }
}

/// One range-finder reading, already converted to presence bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Proximity {
    /// Opponent within moderate range.
    pub close: bool,
    /// Opponent within striking range.
    pub very_close: bool,
}

pub trait AccelSource {
    fn read_raw(&mut self) -> Result<Sample, BoxError>;
}

pub trait BoundarySensors {
    fn read(&mut self) -> Result<BoundaryFlags, BoxError>;
}

pub trait RangeFinder {
    fn read(&mut self) -> Result<Proximity, BoxError>;
}

/// Differential drive. Speeds are signed, positive is forward.
pub trait Drive {
    fn set_speeds(&mut self, left: i16, right: i16) -> Result<(), BoxError>;
    fn stop(&mut self) -> Result<(), BoxError> {
        self.set_speeds(0, 0)
    }
}

/// Fire-and-forget notification sink (buzzer, LED). Never blocks the loop.
pub trait Feedback {
    fn contact_made(&mut self);
}

/// Injected pseudo-random source.
pub trait RandomSource {
    /// Uniform integer in `lo..=hi`. Implementations return `lo` when `lo >= hi`.
    fn next_in_range(&mut self, lo: i32, hi: i32) -> i32;
}

impl<T: AccelSource + ?Sized> AccelSource for Box<T> {
    fn read_raw(&mut self) -> Result<Sample, BoxError> {
        (**self).read_raw()
    }
}

impl<T: BoundarySensors + ?Sized> BoundarySensors for Box<T> {
    fn read(&mut self) -> Result<BoundaryFlags, BoxError> {
        (**self).read()
    }
}

impl<T: RangeFinder + ?Sized> RangeFinder for Box<T> {
    fn read(&mut self) -> Result<Proximity, BoxError> {
        (**self).read()
    }
}

impl<T: Drive + ?Sized> Drive for Box<T> {
    fn set_speeds(&mut self, left: i16, right: i16) -> Result<(), BoxError> {
        (**self).set_speeds(left, right)
    }
    fn stop(&mut self) -> Result<(), BoxError> {
        (**self).stop()
    }
}

impl<T: Feedback + ?Sized> Feedback for Box<T> {
    fn contact_made(&mut self) {
        (**self).contact_made()
    }
}

impl<T: RandomSource + ?Sized> RandomSource for Box<T> {
    fn next_in_range(&mut self, lo: i32, hi: i32) -> i32 {
        (**self).next_in_range(lo, hi)
    }
}
