//! Consecutive-reading confirmation for the range finder.

use sumo_traits::Proximity;

/// Counts consecutive positive readings per band; any negative reading resets
/// that band's streak. Streaks carry across ticks.
///
/// A very-close reading also counts toward the close band.
#[derive(Debug, Clone)]
pub struct ProximityDebouncer {
    required: u8,
    close_streak: u8,
    very_close_streak: u8,
}

impl ProximityDebouncer {
    pub fn new(required: u8) -> Self {
        Self {
            required: required.max(1),
            close_streak: 0,
            very_close_streak: 0,
        }
    }

    pub fn observe(&mut self, p: Proximity) {
        self.very_close_streak = if p.very_close {
            self.very_close_streak.saturating_add(1)
        } else {
            0
        };
        self.close_streak = if p.close || p.very_close {
            self.close_streak.saturating_add(1)
        } else {
            0
        };
    }

    #[inline]
    pub fn very_close(&self) -> bool {
        self.very_close_streak >= self.required
    }

    #[inline]
    pub fn close(&self) -> bool {
        self.close_streak >= self.required
    }

    pub fn reset(&mut self) {
        self.close_streak = 0;
        self.very_close_streak = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const VC: Proximity = Proximity {
        close: false,
        very_close: true,
    };
    const C: Proximity = Proximity {
        close: true,
        very_close: false,
    };
    const NONE: Proximity = Proximity {
        close: false,
        very_close: false,
    };

    #[rstest]
    #[case(&[VC, VC], false)]
    #[case(&[VC, VC, VC], true)]
    #[case(&[VC, NONE, VC, VC], false)]
    #[case(&[VC, C, VC, VC, VC], true)]
    fn very_close_needs_three_in_a_row(#[case] seq: &[Proximity], #[case] expect: bool) {
        let mut d = ProximityDebouncer::new(3);
        for p in seq {
            d.observe(*p);
        }
        assert_eq!(d.very_close(), expect);
    }

    #[test]
    fn very_close_readings_count_as_close() {
        let mut d = ProximityDebouncer::new(3);
        d.observe(C);
        d.observe(VC);
        d.observe(C);
        assert!(d.close());
        assert!(!d.very_close());
    }

    #[test]
    fn single_noisy_reading_never_confirms() {
        let mut d = ProximityDebouncer::new(3);
        d.observe(VC);
        assert!(!d.close());
        assert!(!d.very_close());
    }

    #[test]
    fn empty_reading_resets_streaks() {
        let mut d = ProximityDebouncer::new(2);
        d.observe(VC);
        d.observe(VC);
        assert!(d.very_close());
        d.observe(Proximity::default());
        assert!(!d.very_close());
        assert!(!d.close());
    }
}
