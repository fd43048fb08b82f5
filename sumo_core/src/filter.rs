//! Fixed-window running average.
//!
//! `RunningFilter<T>` keeps the last `capacity` samples in a circular buffer
//! and maintains their sum incrementally: each insert subtracts the value it
//! evicts and adds the new one, so `average()` is O(1) and no rescans happen
//! on the tick path.
//!
//! The sum is held in a wider accumulator (`FilterValue::Acc`), so integer
//! windows cannot overflow for any realistic capacity.

use std::ops::{Add, Sub};

use crate::error::BuildError;

/// Element types a `RunningFilter` can average.
pub trait FilterValue: Copy + Default {
    /// Accumulator used for the running sum.
    type Acc: Copy + Default + Add<Output = Self::Acc> + Sub<Output = Self::Acc>;

    fn widen(self) -> Self::Acc;

    /// `sum / count` in the element's arithmetic. Integer types truncate
    /// toward zero. `count` is never 0 here.
    fn mean(sum: Self::Acc, count: usize) -> Self;
}

macro_rules! int_filter_value {
    ($t:ty, $acc:ty) => {
        impl FilterValue for $t {
            type Acc = $acc;

            #[inline]
            fn widen(self) -> $acc {
                <$acc>::from(self)
            }

            #[inline]
            fn mean(sum: $acc, count: usize) -> $t {
                // The mean of in-range values is itself in range.
                (sum / count as $acc) as $t
            }
        }
    };
}

int_filter_value!(i16, i64);
int_filter_value!(i32, i64);
int_filter_value!(i64, i128);

impl FilterValue for f32 {
    type Acc = f64;

    #[inline]
    fn widen(self) -> f64 {
        f64::from(self)
    }

    #[inline]
    fn mean(sum: f64, count: usize) -> f32 {
        (sum / count as f64) as f32
    }
}

impl FilterValue for f64 {
    type Acc = f64;

    #[inline]
    fn widen(self) -> f64 {
        self
    }

    #[inline]
    fn mean(sum: f64, count: usize) -> f64 {
        sum / count as f64
    }
}

/// Streaming arithmetic mean over the last `capacity` inserted values.
#[derive(Debug, Clone)]
pub struct RunningFilter<T: FilterValue> {
    slots: Box<[T]>,
    sum: T::Acc,
    index: usize,
    count: usize,
}

impl<T: FilterValue> RunningFilter<T> {
    /// Allocate a zeroed window. A zero capacity is a configuration error.
    pub fn new(capacity: usize) -> Result<Self, BuildError> {
        if capacity == 0 {
            return Err(BuildError::InvalidConfig("filter capacity must be >= 1"));
        }
        Ok(Self {
            slots: vec![T::default(); capacity].into_boxed_slice(),
            sum: T::Acc::default(),
            index: 0,
            count: 0,
        })
    }

    /// Insert one value, evicting the oldest once the window is full.
    pub fn add_value(&mut self, v: T) {
        let slot = &mut self.slots[self.index];
        // Empty slots hold T::default(), which is additive zero.
        self.sum = self.sum - slot.widen() + v.widen();
        *slot = v;
        self.index = (self.index + 1) % self.slots.len();
        if self.count < self.slots.len() {
            self.count += 1;
        }
    }

    /// Mean of the values currently in the window; `T::default()` when empty.
    pub fn average(&self) -> T {
        if self.count == 0 {
            return T::default();
        }
        T::mean(self.sum, self.count)
    }

    /// Reset to the freshly constructed state.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = T::default());
        self.sum = T::Acc::default();
        self.index = 0;
        self.count = 0;
    }

    /// Clear, then insert `value` `repetitions` times.
    ///
    /// With `repetitions >= capacity` the window is entirely `value`, which is
    /// how a filter is seeded to a known steady state without waiting N ticks.
    pub fn fill_with(&mut self, value: T, repetitions: usize) {
        self.clear();
        for _ in 0..repetitions {
            self.add_value(value);
        }
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
