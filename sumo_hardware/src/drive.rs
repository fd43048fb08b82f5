//! Drive and feedback stand-ins that record what the controller asked for.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use sumo_traits::{BoxError, Drive, Feedback};

use crate::error::HwError;

/// Largest magnitude the simulated motor driver accepts.
pub const DRIVE_LIMIT: i16 = 400;

/// Shared handle onto the commands a `RecordingDrive` received.
#[derive(Debug, Clone, Default)]
pub struct DriveLog(Rc<RefCell<Vec<(i16, i16)>>>);

impl DriveLog {
    pub fn commands(&self) -> Vec<(i16, i16)> {
        self.0.borrow().clone()
    }

    pub fn last(&self) -> Option<(i16, i16)> {
        self.0.borrow().last().copied()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    fn push(&self, cmd: (i16, i16)) {
        self.0.borrow_mut().push(cmd);
    }
}

/// Differential drive that records every accepted command.
///
/// Commands beyond `DRIVE_LIMIT` are rejected as a bus error, and
/// `failing_after(n)` makes every call after the first `n` report a
/// disconnected driver.
#[derive(Debug, Default)]
pub struct RecordingDrive {
    log: DriveLog,
    fail_after: Option<usize>,
    calls: usize,
}

impl RecordingDrive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::default()
        }
    }

    pub fn log(&self) -> DriveLog {
        self.log.clone()
    }
}

impl Drive for RecordingDrive {
    fn set_speeds(&mut self, left: i16, right: i16) -> Result<(), BoxError> {
        self.calls += 1;
        if self.fail_after.is_some_and(|n| self.calls > n) {
            return Err(Box::new(HwError::Disconnected("drive".into())));
        }
        if left.unsigned_abs() > DRIVE_LIMIT.unsigned_abs()
            || right.unsigned_abs() > DRIVE_LIMIT.unsigned_abs()
        {
            return Err(Box::new(HwError::Bus(format!(
                "speed out of range: ({left}, {right})"
            ))));
        }
        tracing::trace!(left, right, "drive");
        self.log.push((left, right));
        Ok(())
    }
}

/// Feedback that logs each contact and counts it (stands in for a buzzer).
#[derive(Debug, Default)]
pub struct LogFeedback {
    count: Rc<Cell<u64>>,
}

impl LogFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared counter of signalled contacts.
    pub fn counter(&self) -> Rc<Cell<u64>> {
        Rc::clone(&self.count)
    }
}

impl Feedback for LogFeedback {
    fn contact_made(&mut self) {
        self.count.set(self.count.get() + 1);
        tracing::debug!(total = self.count.get(), "contact feedback");
    }
}
