#![no_main]
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;
use sumo_core::mocks::ScriptedRandom;
use sumo_core::{
    BehaviorController, ContactDetector, DetectorCfg, MAX_SPEED, MotionFilter, ProximityDebouncer,
    SpeedCfg, TimingCfg,
};
use sumo_traits::{BoundaryFlags, Proximity, Sample};

#[derive(Debug, Arbitrary)]
struct Tick {
    dt_ms: u16,
    x: i16,
    y: i16,
    left: bool,
    right: bool,
    close: bool,
    very_close: bool,
    jitter: i8,
}

fuzz_target!(|ticks: Vec<Tick>| {
    let Ok(detector) = ContactDetector::new(DetectorCfg::default()) else {
        return;
    };
    let Ok(mut motion) = MotionFilter::new(3) else {
        return;
    };
    let timing = TimingCfg::default();
    let mut c = BehaviorController::new(
        SpeedCfg::default(),
        timing.clone(),
        detector,
        ProximityDebouncer::new(3),
    );
    c.reset(0);

    let mut now = 0u64;
    for t in ticks {
        now += u64::from(t.dt_ms);
        motion.ingest(Sample::new(t.x, t.y), now);
        let mut random = ScriptedRandom::new(vec![i32::from(t.jitter)]);
        let p = Proximity {
            close: t.close,
            very_close: t.very_close,
        };
        let boundary = BoundaryFlags {
            left: t.left,
            right: t.right,
        };
        let d = c.decide(now, motion.reading(), boundary, &[p, p, p], &mut random);

        for s in &d.maneuver.segments {
            assert!(s.command.left.abs() <= MAX_SPEED && s.command.right.abs() <= MAX_SPEED);
        }
        // Only the last segment may be left running
        let n = d.maneuver.segments.len();
        assert!(n > 0);
        assert_eq!(d.maneuver.segments[n - 1].hold_ms, 0);
        // A boundary always wins
        if boundary.any() {
            assert_eq!(d.maneuver.behavior, sumo_core::Behavior::Turn);
            assert!(d.maneuver.total_hold_ms() >= timing.reverse_ms);
        }
        now += d.maneuver.total_hold_ms();
    }
});
