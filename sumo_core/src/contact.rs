//! Contact detection.
//!
//! A turn produces x-y acceleration that looks just like a hit from the
//! opponent, so the detector only trusts the signal once a settle window has
//! passed since the last turn, and it rate-limits "contact made" with a
//! cooldown so one continuous push is a single event. Loss of contact is
//! never sensed here; the behavior layer declares it when it turns away.

use crate::config::DetectorCfg;
use crate::error::BuildError;
use crate::motion::MotionReading;
use crate::util::elapsed_ms;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContactState {
    pub in_contact: bool,
    pub contact_made_at_ms: u64,
    pub last_turn_at_ms: u64,
}

#[derive(Debug, Clone)]
pub struct ContactDetector {
    cfg: DetectorCfg,
    threshold_sq: u32,
    state: ContactState,
}

impl ContactDetector {
    pub fn new(cfg: DetectorCfg) -> Result<Self, BuildError> {
        if cfg.threshold == 0 {
            return Err(BuildError::InvalidConfig("detector threshold must be > 0"));
        }
        let t = u32::from(cfg.threshold);
        Ok(Self {
            threshold_sq: t * t,
            cfg,
            state: ContactState::default(),
        })
    }

    /// Restart both timing guards at `now_ms` and drop any contact.
    pub fn reset(&mut self, now_ms: u64) {
        self.state = ContactState {
            in_contact: false,
            contact_made_at_ms: now_ms,
            last_turn_at_ms: now_ms,
        };
    }

    /// True when the reading is above threshold and both windows have elapsed.
    pub fn is_triggered(&self, reading: &MotionReading, now_ms: u64) -> bool {
        reading.magnitude_sq > self.threshold_sq
            && elapsed_ms(now_ms, self.state.last_turn_at_ms) > self.cfg.settle_ms
            && elapsed_ms(now_ms, self.state.contact_made_at_ms) > self.cfg.cooldown_ms
    }

    /// Evaluate one tick. Returns true when a "contact made" event fires.
    pub fn evaluate(&mut self, reading: &MotionReading, now_ms: u64) -> bool {
        if !self.is_triggered(reading, now_ms) {
            return false;
        }
        self.state.in_contact = true;
        self.state.contact_made_at_ms = now_ms;
        tracing::debug!(
            magnitude_sq = reading.magnitude_sq,
            threshold_sq = self.threshold_sq,
            filtered_x = reading.filtered_x,
            filtered_y = reading.filtered_y,
            "contact detected"
        );
        true
    }

    /// Declare contact from a confirmed close-range sighting. Returns true when
    /// this is a new contact (nothing fires while already in contact).
    pub fn confirm_contact(&mut self, now_ms: u64) -> bool {
        if self.state.in_contact {
            return false;
        }
        self.state.in_contact = true;
        self.state.contact_made_at_ms = now_ms;
        true
    }

    /// Contact lost: the behavior layer turned or evaded away.
    pub fn release(&mut self) {
        self.state.in_contact = false;
    }

    /// Record a turn/evade finishing at `at_ms`; gates detection for `settle_ms`.
    pub fn note_turn(&mut self, at_ms: u64) {
        self.state.last_turn_at_ms = at_ms;
    }

    #[inline]
    pub fn state(&self) -> &ContactState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading_with(magnitude_sq: u32) -> MotionReading {
        MotionReading {
            magnitude_sq,
            ..MotionReading::default()
        }
    }

    fn detector() -> ContactDetector {
        let mut d = ContactDetector::new(DetectorCfg {
            threshold: 100,
            settle_ms: 400,
            cooldown_ms: 1000,
        })
        .unwrap();
        d.reset(0);
        d
    }

    #[test]
    fn zero_threshold_is_rejected() {
        let err = ContactDetector::new(DetectorCfg {
            threshold: 0,
            ..DetectorCfg::default()
        })
        .expect_err("threshold 0");
        assert!(matches!(err, BuildError::InvalidConfig(_)));
    }

    #[test]
    fn threshold_plus_one_after_both_windows_fires() {
        let mut d = detector();
        assert!(d.evaluate(&reading_with(100 * 100 + 1), 1001));
        assert!(d.state().in_contact);
        assert_eq!(d.state().contact_made_at_ms, 1001);
    }

    #[test]
    fn exactly_threshold_does_not_fire() {
        let mut d = detector();
        assert!(!d.evaluate(&reading_with(100 * 100), 5000));
    }

    #[test]
    fn windows_are_strict() {
        let mut d = detector();
        // cooldown not yet exceeded at exactly 1000 ms
        assert!(!d.evaluate(&reading_with(u32::MAX), 1000));
        d.note_turn(1000);
        assert!(!d.evaluate(&reading_with(u32::MAX), 1400));
        assert!(d.evaluate(&reading_with(u32::MAX), 1401));
    }

    #[test]
    fn future_turn_stamp_blocks_detection() {
        let mut d = detector();
        d.note_turn(3000);
        assert!(!d.evaluate(&reading_with(u32::MAX), 2500));
    }

    #[test]
    fn confirm_contact_only_fires_once() {
        let mut d = detector();
        assert!(d.confirm_contact(10));
        assert!(!d.confirm_contact(20));
        assert_eq!(d.state().contact_made_at_ms, 10);
        d.release();
        assert!(!d.state().in_contact);
        assert!(d.confirm_contact(30));
    }
}
