//! Accelerometer pipeline: raw 2-axis samples in, filtered motion reading out.

use sumo_traits::{AccelSource, Sample};

use crate::error::BuildError;
use crate::filter::RunningFilter;

/// Per-tick motion snapshot derived from the axis filters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionReading {
    /// Tick time (ms since engine epoch) of the last accepted sample.
    pub at_ms: u64,
    /// Last accepted raw sample.
    pub raw: Sample,
    pub filtered_x: i32,
    pub filtered_y: i32,
    /// `filtered_x² + filtered_y²`. Averages of i16 samples bound this by 2^31.
    pub magnitude_sq: u32,
    /// `atan2(filtered_x, filtered_y)` in degrees.
    pub direction_deg: f32,
}

impl MotionReading {
    fn from_averages(at_ms: u64, raw: Sample, x: i32, y: i32) -> Self {
        let ax = x.unsigned_abs();
        let ay = y.unsigned_abs();
        let magnitude_sq = ax.saturating_mul(ax).saturating_add(ay.saturating_mul(ay));
        Self {
            at_ms,
            raw,
            filtered_x: x,
            filtered_y: y,
            magnitude_sq,
            direction_deg: (x as f32).atan2(y as f32).to_degrees(),
        }
    }

    /// Filtered magnitude. Diagnostics only; decisions use `magnitude_sq`.
    pub fn magnitude(&self) -> f32 {
        (self.magnitude_sq as f32).sqrt()
    }
}

/// Two axis filters plus duplicate-sample suppression.
#[derive(Debug, Clone)]
pub struct MotionFilter {
    x: RunningFilter<i32>,
    y: RunningFilter<i32>,
    last_raw: Option<Sample>,
    reading: MotionReading,
}

impl MotionFilter {
    pub fn new(window: usize) -> Result<Self, BuildError> {
        Ok(Self {
            x: RunningFilter::new(window)?,
            y: RunningFilter::new(window)?,
            last_raw: None,
            reading: MotionReading::default(),
        })
    }

    /// Feed one raw sample. Returns false when the sample repeats the previous
    /// one; the filters and the reading are then left untouched, so a stalled
    /// sensor cannot drag the average toward its frozen value.
    pub fn ingest(&mut self, sample: Sample, now_ms: u64) -> bool {
        if self.last_raw == Some(sample) {
            tracing::trace!(x = sample.x, y = sample.y, "duplicate accel sample skipped");
            return false;
        }
        self.last_raw = Some(sample);
        self.x.add_value(i32::from(sample.x));
        self.y.add_value(i32::from(sample.y));
        self.reading =
            MotionReading::from_averages(now_ms, sample, self.x.average(), self.y.average());
        true
    }

    /// Force both windows to a constant sample. The next sample is accepted
    /// even if it equals the seed.
    pub fn seed(&mut self, sample: Sample, now_ms: u64) {
        let reps = self.x.capacity();
        self.x.fill_with(i32::from(sample.x), reps);
        self.y.fill_with(i32::from(sample.y), reps);
        self.last_raw = None;
        self.reading =
            MotionReading::from_averages(now_ms, sample, self.x.average(), self.y.average());
    }

    #[inline]
    pub fn reading(&self) -> &MotionReading {
        &self.reading
    }
}

/// An accelerometer driver composed with the averaging pipeline.
pub struct Accelerometer<A: AccelSource> {
    source: A,
    filter: MotionFilter,
}

impl<A: AccelSource> Accelerometer<A> {
    pub fn new(source: A, window: usize) -> Result<Self, BuildError> {
        Ok(Self {
            source,
            filter: MotionFilter::new(window)?,
        })
    }

    /// Read the driver once and fold the sample in. A failed read is a
    /// transient anomaly: the previous reading stays in effect.
    pub fn poll(&mut self, now_ms: u64) -> &MotionReading {
        match self.source.read_raw() {
            Ok(sample) => {
                self.filter.ingest(sample, now_ms);
            }
            Err(e) => {
                tracing::warn!(error = %e, "accelerometer read failed; keeping previous reading");
            }
        }
        self.filter.reading()
    }

    /// Fold in a sample that was read elsewhere.
    pub fn ingest(&mut self, sample: Sample, now_ms: u64) -> bool {
        self.filter.ingest(sample, now_ms)
    }

    pub fn seed(&mut self, sample: Sample, now_ms: u64) {
        self.filter.seed(sample, now_ms);
    }

    #[inline]
    pub fn reading(&self) -> &MotionReading {
        self.filter.reading()
    }
}
