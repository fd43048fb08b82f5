//! Reactive behavior state machine.
//!
//! Each tick the controller picks exactly one behavior from a fixed priority
//! table (boundary > charge > approach > evade > search) and returns the
//! motor sequence for it as a `Maneuver`. It never touches hardware or the
//! clock itself, so a tick is a function of `(state, inputs)` alone.

use sumo_traits::{BoundaryFlags, Proximity, RandomSource};

use crate::config::{SpeedCfg, TimingCfg};
use crate::contact::{ContactDetector, ContactState};
use crate::motion::MotionReading;
use crate::proximity::ProximityDebouncer;
use crate::util::elapsed_ms;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Behavior {
    Search,
    Approach,
    Charge,
    Turn,
    Evade,
}

impl Behavior {
    pub const ALL: [Behavior; 5] = [
        Behavior::Search,
        Behavior::Approach,
        Behavior::Charge,
        Behavior::Turn,
        Behavior::Evade,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Behavior::Search => "search",
            Behavior::Approach => "approach",
            Behavior::Charge => "charge",
            Behavior::Turn => "turn",
            Behavior::Evade => "evade",
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedTier {
    Search,
    Sustained,
    Full,
}

impl SpeedTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedTier::Search => "search",
            SpeedTier::Sustained => "sustained",
            SpeedTier::Full => "full",
        }
    }
}

/// Current forward-speed tier and when it was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierState {
    pub tier: SpeedTier,
    pub since_ms: u64,
}

/// Pivot direction. Right spins clockwise: left wheel forward, right wheel back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    #[inline]
    fn sign(self) -> i16 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotorCommand {
    pub left: i16,
    pub right: i16,
}

impl MotorCommand {
    pub const STOP: MotorCommand = MotorCommand { left: 0, right: 0 };

    pub fn forward(speed: i16) -> Self {
        Self {
            left: speed,
            right: speed,
        }
    }

    pub fn reverse(speed: i16) -> Self {
        Self::forward(-speed)
    }

    pub fn pivot(direction: Direction, speed: i16) -> Self {
        let s = speed * direction.sign();
        Self { left: s, right: -s }
    }
}

/// One motor command held for `hold_ms`. A zero hold means the command stays
/// in effect until the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub command: MotorCommand,
    pub hold_ms: u64,
}

impl Segment {
    fn hold(command: MotorCommand, hold_ms: u64) -> Self {
        Self { command, hold_ms }
    }

    fn standing(command: MotorCommand) -> Self {
        Self {
            command,
            hold_ms: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maneuver {
    pub behavior: Behavior,
    pub segments: Vec<Segment>,
}

impl Maneuver {
    fn single(behavior: Behavior, command: MotorCommand) -> Self {
        Self {
            behavior,
            segments: vec![Segment::standing(command)],
        }
    }

    /// Total blocking time of the sequence.
    pub fn total_hold_ms(&self) -> u64 {
        self.segments
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(s.hold_ms))
    }

    /// The command left running when the sequence completes.
    pub fn final_command(&self) -> MotorCommand {
        self.segments
            .last()
            .map(|s| s.command)
            .unwrap_or(MotorCommand::STOP)
    }
}

/// Result of one controller tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub maneuver: Maneuver,
    /// A "contact made" event fired this tick.
    pub contact_made: bool,
}

#[derive(Debug, Clone)]
pub struct BehaviorController {
    speeds: SpeedCfg,
    timing: TimingCfg,
    detector: ContactDetector,
    proximity: ProximityDebouncer,
    tier: TierState,
    last_behavior: Behavior,
}

impl BehaviorController {
    pub fn new(
        speeds: SpeedCfg,
        timing: TimingCfg,
        detector: ContactDetector,
        proximity: ProximityDebouncer,
    ) -> Self {
        Self {
            speeds,
            timing,
            detector,
            proximity,
            tier: TierState {
                tier: SpeedTier::Search,
                since_ms: 0,
            },
            last_behavior: Behavior::Search,
        }
    }

    /// Start of a bout: no contact, Search tier, both detector windows armed.
    pub fn reset(&mut self, now_ms: u64) {
        self.detector.reset(now_ms);
        self.proximity.reset();
        self.tier = TierState {
            tier: SpeedTier::Search,
            since_ms: now_ms,
        };
        self.last_behavior = Behavior::Search;
    }

    /// Run one tick of the decision table.
    ///
    /// `readings` are this tick's range-finder samples, oldest first; they are
    /// folded into the confirmation streaks before the table is evaluated.
    pub fn decide(
        &mut self,
        now_ms: u64,
        reading: &MotionReading,
        boundary: BoundaryFlags,
        readings: &[Proximity],
        random: &mut dyn RandomSource,
    ) -> Decision {
        self.refresh_tier(now_ms);
        for p in readings {
            self.proximity.observe(*p);
        }

        let mut contact_made = false;
        if self.detector.evaluate(reading, now_ms) {
            contact_made = true;
            self.escalate(now_ms);
        }

        let maneuver = if boundary.any() {
            // Both edges at once: back off and turn right.
            let direction = if boundary.left {
                Direction::Right
            } else {
                Direction::Left
            };
            let randomize = self.last_behavior == Behavior::Search;
            self.turn(now_ms, direction, randomize, random)
        } else if self.proximity.very_close() {
            if self.detector.confirm_contact(now_ms) {
                contact_made = true;
            }
            self.escalate(now_ms);
            Maneuver::single(Behavior::Charge, MotorCommand::forward(self.speeds.full))
        } else if self.proximity.close() {
            Maneuver::single(
                Behavior::Approach,
                MotorCommand::forward(self.forward_speed()),
            )
        } else if self.detector.state().in_contact {
            self.evade(now_ms, reading)
        } else {
            self.search(now_ms)
        };

        if maneuver.behavior != self.last_behavior {
            tracing::debug!(
                from = self.last_behavior.as_str(),
                to = maneuver.behavior.as_str(),
                tier = self.tier.tier.as_str(),
                "behavior change"
            );
        }
        self.last_behavior = maneuver.behavior;
        Decision {
            maneuver,
            contact_made,
        }
    }

    /// Back off the line, then pivot away. The pivot is jittered when the
    /// robot was searching, so repeated edge hits do not settle into a loop.
    fn turn(
        &mut self,
        now_ms: u64,
        direction: Direction,
        randomize: bool,
        random: &mut dyn RandomSource,
    ) -> Maneuver {
        self.contact_lost(now_ms);
        let pivot_ms = if randomize {
            let steps = random.next_in_range(self.timing.jitter_min, self.timing.jitter_max);
            let step_ms = i64::try_from(self.timing.jitter_increment_ms()).unwrap_or(i64::MAX);
            let jitter = i64::from(steps).saturating_mul(step_ms);
            self.timing.turn_ms.saturating_add_signed(jitter)
        } else {
            self.timing.turn_ms
        };
        let maneuver = Maneuver {
            behavior: Behavior::Turn,
            segments: vec![
                Segment::hold(
                    MotorCommand::reverse(self.speeds.reverse),
                    self.timing.reverse_ms,
                ),
                Segment::hold(MotorCommand::pivot(direction, self.speeds.turn), pivot_ms),
                Segment::standing(MotorCommand::forward(self.forward_speed())),
            ],
        };
        self.detector
            .note_turn(now_ms.saturating_add(maneuver.total_hold_ms()));
        maneuver
    }

    /// Spin away from the side the push came from, then drive on at the tier
    /// that was active when the hit registered.
    fn evade(&mut self, now_ms: u64, reading: &MotionReading) -> Maneuver {
        // Positive x: pushed from the right, so turn left.
        let direction = if reading.filtered_x >= 0 {
            Direction::Left
        } else {
            Direction::Right
        };
        let resume = self.forward_speed();
        self.contact_lost(now_ms);
        let maneuver = Maneuver {
            behavior: Behavior::Evade,
            segments: vec![
                Segment::hold(
                    MotorCommand::pivot(direction, self.speeds.evade),
                    self.timing.evade_ms,
                ),
                Segment::standing(MotorCommand::forward(resume)),
            ],
        };
        self.detector
            .note_turn(now_ms.saturating_add(maneuver.total_hold_ms()));
        maneuver
    }

    // Not stamped as a turn: a settle window after every scan pivot would
    // leave no tick on which a hit could register, so Evade never runs.
    fn search(&mut self, now_ms: u64) -> Maneuver {
        self.contact_lost(now_ms);
        Maneuver {
            behavior: Behavior::Search,
            segments: vec![
                Segment::hold(MotorCommand::STOP, self.timing.stop_ms),
                Segment::hold(
                    MotorCommand::pivot(Direction::Right, self.speeds.turn),
                    self.timing.search_pivot_ms,
                ),
                Segment::standing(MotorCommand::forward(self.speeds.search)),
            ],
        }
    }

    fn contact_lost(&mut self, now_ms: u64) {
        if self.detector.state().in_contact {
            tracing::info!(at_ms = now_ms, "contact lost");
        }
        self.detector.release();
        self.set_tier(SpeedTier::Search, now_ms);
    }

    /// Full speed, restarting the Full-tier clock.
    fn escalate(&mut self, now_ms: u64) {
        self.set_tier(SpeedTier::Full, now_ms);
    }

    /// Decay Full to Sustained once the burst has run its course.
    fn refresh_tier(&mut self, now_ms: u64) {
        if self.tier.tier == SpeedTier::Full
            && elapsed_ms(now_ms, self.tier.since_ms) > self.timing.full_speed_limit_ms
        {
            self.set_tier(SpeedTier::Sustained, now_ms);
        }
    }

    fn set_tier(&mut self, tier: SpeedTier, now_ms: u64) {
        if tier != self.tier.tier {
            tracing::info!(
                from = self.tier.tier.as_str(),
                to = tier.as_str(),
                at_ms = now_ms,
                "speed tier change"
            );
        }
        self.tier = TierState {
            tier,
            since_ms: now_ms,
        };
    }

    /// Forward speed for the current tier.
    pub fn forward_speed(&self) -> i16 {
        match self.tier.tier {
            SpeedTier::Search => self.speeds.search,
            SpeedTier::Sustained => self.speeds.sustained,
            SpeedTier::Full => self.speeds.full,
        }
    }

    #[inline]
    pub fn tier(&self) -> TierState {
        self.tier
    }

    #[inline]
    pub fn last_behavior(&self) -> Behavior {
        self.last_behavior
    }

    #[inline]
    pub fn contact_state(&self) -> &ContactState {
        self.detector.state()
    }
}
