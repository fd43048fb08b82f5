//! Configuration types for the control core.
//!
//! These are the runtime configuration structs used by `SumoCore`.
//! They are separate from the TOML-deserialized config in `sumo_config`.

/// Highest speed the drive accepts, in either direction.
pub const MAX_SPEED: i16 = 400;
/// Longest hold any single maneuver step or tier may ask for.
pub const MAX_MANEUVER_MS: u64 = 10_000;

/// Accelerometer averaging.
#[derive(Debug, Clone)]
pub struct FilterCfg {
    /// Running-average window per axis (samples).
    pub window: usize,
}

impl Default for FilterCfg {
    fn default() -> Self {
        Self { window: 3 }
    }
}

/// Contact detection thresholds and timing guards.
#[derive(Debug, Clone)]
pub struct DetectorCfg {
    /// Filtered x-y acceleration magnitude (raw units) that counts as a hit.
    pub threshold: u16,
    /// Detection is suppressed for this long after a turn or evade completes.
    pub settle_ms: u64,
    /// Minimum time between two "contact made" signals.
    pub cooldown_ms: u64,
}

impl Default for DetectorCfg {
    fn default() -> Self {
        Self {
            threshold: 2400,
            settle_ms: 400,
            cooldown_ms: 1000,
        }
    }
}

/// Motor speeds for each behavior (0..=MAX_SPEED).
#[derive(Debug, Clone)]
pub struct SpeedCfg {
    pub search: i16,
    pub sustained: i16,
    pub full: i16,
    pub reverse: i16,
    pub turn: i16,
    pub evade: i16,
}

impl Default for SpeedCfg {
    fn default() -> Self {
        Self {
            search: 200,
            sustained: 400,
            full: 400,
            reverse: 200,
            turn: 200,
            evade: 400,
        }
    }
}

/// Loop rate and maneuver durations.
#[derive(Debug, Clone)]
pub struct TimingCfg {
    /// Control loop rate in Hz.
    pub tick_hz: u32,
    /// Startup countdown before the first tick.
    pub countdown_ms: u64,
    /// Stop phase of a search scan.
    pub stop_ms: u64,
    /// Reverse phase of a boundary turn.
    pub reverse_ms: u64,
    /// Base pivot duration of a boundary turn.
    pub turn_ms: u64,
    /// Pivot duration of an evade.
    pub evade_ms: u64,
    /// Pivot duration of a search scan.
    pub search_pivot_ms: u64,
    /// Full tier decays to Sustained after this long without a renewed sighting.
    pub full_speed_limit_ms: u64,
    /// Turn jitter range, in increments of `turn_ms / 4`.
    pub jitter_min: i32,
    pub jitter_max: i32,
}

impl Default for TimingCfg {
    fn default() -> Self {
        Self {
            tick_hz: 100,
            countdown_ms: 5000,
            stop_ms: 100,
            reverse_ms: 200,
            turn_ms: 300,
            evade_ms: 450,
            search_pivot_ms: 100,
            full_speed_limit_ms: 250,
            jitter_min: -2,
            jitter_max: 5,
        }
    }
}

impl TimingCfg {
    /// One jitter step of a boundary turn.
    #[inline]
    pub fn jitter_increment_ms(&self) -> u64 {
        self.turn_ms / 4
    }
}

/// Range-finder debounce.
#[derive(Debug, Clone)]
pub struct ProximityCfg {
    /// Consecutive positive readings needed before a sighting counts.
    pub confirmations: u8,
    /// Range-finder reads per tick.
    pub samples_per_tick: u8,
}

impl Default for ProximityCfg {
    fn default() -> Self {
        Self {
            confirmations: 3,
            samples_per_tick: 3,
        }
    }
}

/// Everything the engine needs besides its collaborators.
#[derive(Debug, Clone, Default)]
pub struct CoreCfg {
    pub filter: FilterCfg,
    pub detector: DetectorCfg,
    pub speeds: SpeedCfg,
    pub timing: TimingCfg,
    pub proximity: ProximityCfg,
}
