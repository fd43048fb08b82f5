//! Per-tick report returned from each control loop iteration.

use crate::behavior::{Behavior, MotorCommand, SpeedTier};
use crate::motion::MotionReading;

/// What one tick decided and left running.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Tick start, ms since the engine epoch.
    pub at_ms: u64,
    pub behavior: Behavior,
    /// Command left on the drive once the maneuver completed.
    pub command: MotorCommand,
    /// Blocking time spent inside the maneuver.
    pub hold_ms: u64,
    pub tier: SpeedTier,
    pub contact_made: bool,
    pub in_contact: bool,
    pub reading: MotionReading,
}
