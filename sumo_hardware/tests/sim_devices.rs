use std::sync::Arc;

use rstest::rstest;
use sumo_hardware::error::HwError;
use sumo_hardware::{
    RecordingDrive, ScriptedAccelerometer, ScriptedBoundary, SimTime, SimulatedBoundary,
};
use sumo_traits::{AccelSource, BoundaryFlags, BoundarySensors, Drive, ManualClock, Sample};

#[rstest]
#[case(2700, true, false)] // first crossing: k = 1, left
#[case(5400, false, true)] // second crossing: k = 2, right
#[case(2730, false, false)] // past the edge window
fn boundary_schedule(#[case] at_ms: u64, #[case] left: bool, #[case] right: bool) {
    let clock = ManualClock::new();
    let mut b = SimulatedBoundary::new(SimTime::new(Arc::new(clock.clone())), 2700);
    clock.advance_ms(at_ms);
    assert_eq!(b.read().unwrap(), BoundaryFlags { left, right });
}

#[test]
fn scripted_accelerometer_repeats_last_then_times_out_when_empty() {
    let mut a = ScriptedAccelerometer::new([Sample::new(1, 2), Sample::new(3, 4)]);
    assert_eq!(a.read_raw().unwrap(), Sample::new(1, 2));
    assert_eq!(a.read_raw().unwrap(), Sample::new(3, 4));
    assert_eq!(a.read_raw().unwrap(), Sample::new(3, 4));

    let mut empty = ScriptedAccelerometer::new([]);
    let err = empty.read_raw().unwrap_err();
    assert!(matches!(err.downcast_ref::<HwError>(), Some(HwError::Timeout)));
}

#[test]
fn scripted_boundary_defaults_to_clear() {
    let mut b = ScriptedBoundary::new([]);
    assert!(!b.read().unwrap().any());
}

#[test]
fn recording_drive_logs_and_stops() {
    let mut d = RecordingDrive::new();
    let log = d.log();
    d.set_speeds(200, -200).unwrap();
    d.stop().unwrap();
    assert_eq!(log.commands(), vec![(200, -200), (0, 0)]);
}

#[test]
fn recording_drive_rejects_out_of_range() {
    let mut d = RecordingDrive::new();
    let err = d.set_speeds(401, 0).unwrap_err();
    assert!(matches!(err.downcast_ref::<HwError>(), Some(HwError::Bus(_))));
    assert!(d.log().is_empty());
}

#[test]
fn failing_drive_disconnects_after_n_calls() {
    let mut d = RecordingDrive::failing_after(1);
    d.set_speeds(100, 100).unwrap();
    let err = d.set_speeds(100, 100).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<HwError>(),
        Some(HwError::Disconnected(_))
    ));
}
