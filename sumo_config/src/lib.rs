#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and sensor-trace parsing for the sumo controller.
//!
//! - `Config` and its sections are deserialized from TOML and validated.
//!   Every section is optional and falls back to the tuned defaults.
//! - The trace CSV loader enforces headers and timestamp ordering so a
//!   replay is always a well-formed sequence of ticks.
use serde::Deserialize;
use serde::de::{self, Deserializer};

/// Largest motor command magnitude accepted by the drive.
pub const MAX_SPEED: i16 = 400;
/// Upper bound for any single maneuver or tier duration.
pub const MAX_MANEUVER_MS: u64 = 10_000;

/// One tick of a recorded (or hand-written) sensor trace.
///
/// Expected headers:
/// t_ms,x,y,left,right,close,very_close
///
/// Example:
/// t_ms,x,y,left,right,close,very_close
/// 0,0,0,0,0,0,0
/// 10,2600,-300,0,0,1,1
///
/// Flag columns accept `0`/`1` or `true`/`false`.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct TraceRow {
    pub t_ms: u64,
    pub x: i16,
    pub y: i16,
    #[serde(deserialize_with = "de_flag")]
    pub left: bool,
    #[serde(deserialize_with = "de_flag")]
    pub right: bool,
    #[serde(deserialize_with = "de_flag")]
    pub close: bool,
    #[serde(deserialize_with = "de_flag")]
    pub very_close: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FilterCfg {
    /// Running-average capacity per axis
    pub window: usize,
}

impl Default for FilterCfg {
    fn default() -> Self {
        Self { window: 3 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DetectorCfg {
    /// Raw accelerometer units; compared squared against the filtered magnitude
    pub threshold: u16,
    pub settle_ms: u64,
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

#[derive(Debug, Deserialize)]
#[serde(default)]
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

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TimingCfg {
    pub tick_hz: u32,
    /// Motors held stopped before the first tick
    pub countdown_ms: u64,
    pub stop_ms: u64,
    pub reverse_ms: u64,
    pub turn_ms: u64,
    pub evade_ms: u64,
    pub search_pivot_ms: u64,
    /// Full tier decays to Sustained after this long
    pub full_speed_limit_ms: u64,
    /// Turn jitter bounds, in increments of `turn_ms / 4`
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

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProximityCfg {
    /// Consecutive positive readings needed to believe the range finder
    pub confirmations: u8,
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

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

/// Knobs for the simulated bout. All schedules are in bout milliseconds.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimCfg {
    pub seed: u64,
    /// Peak accelerometer noise in raw units
    pub noise: i16,
    /// Opponent impact every N ms (0 disables)
    pub impact_every_ms: u64,
    pub impact_ms: u64,
    pub impact_accel: i16,
    /// Edge crossing every N ms (0 disables)
    pub edge_every_ms: u64,
    /// Opponent sighting every N ms (0 disables)
    pub opponent_every_ms: u64,
    pub opponent_ms: u64,
}

impl Default for SimCfg {
    fn default() -> Self {
        Self {
            seed: 7,
            noise: 40,
            impact_every_ms: 3000,
            impact_ms: 150,
            impact_accel: 3500,
            edge_every_ms: 2700,
            opponent_every_ms: 4000,
            opponent_ms: 900,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub filter: FilterCfg,
    pub detector: DetectorCfg,
    pub speeds: SpeedCfg,
    pub timing: TimingCfg,
    pub proximity: ProximityCfg,
    pub logging: Logging,
    pub sim: SimCfg,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

fn de_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    match s.trim().to_ascii_lowercase().as_str() {
        "0" | "false" => Ok(false),
        "1" | "true" => Ok(true),
        other => Err(de::Error::custom(format!(
            "flag must be 0/1 or true/false, got {other:?}"
        ))),
    }
}

pub const TRACE_HEADERS: [&str; 7] = ["t_ms", "x", "y", "left", "right", "close", "very_close"];

pub fn load_trace_csv(path: &std::path::Path) -> eyre::Result<Vec<TraceRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open trace CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != TRACE_HEADERS {
        eyre::bail!(
            "trace CSV must have headers '{}', got: {}",
            TRACE_HEADERS.join(","),
            actual.join(",")
        );
    }

    let mut rows: Vec<TraceRow> = Vec::new();
    for (idx, rec) in rdr.deserialize::<TraceRow>().enumerate() {
        let row = match rec {
            Ok(row) => row,
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        };
        if let Some(prev) = rows.last()
            && row.t_ms <= prev.t_ms
        {
            eyre::bail!(
                "trace t_ms must be strictly increasing (row {}: {} after {})",
                idx + 2,
                row.t_ms,
                prev.t_ms
            );
        }
        rows.push(row);
    }

    if rows.is_empty() {
        eyre::bail!("trace CSV {:?} has no rows", path);
    }
    Ok(rows)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Filter
        if self.filter.window == 0 {
            eyre::bail!("filter.window must be >= 1");
        }

        // Detector
        if self.detector.threshold == 0 {
            eyre::bail!("detector.threshold must be > 0");
        }

        // Speeds
        let s = &self.speeds;
        for (name, v) in [
            ("search", s.search),
            ("sustained", s.sustained),
            ("full", s.full),
            ("reverse", s.reverse),
            ("turn", s.turn),
            ("evade", s.evade),
        ] {
            if !(1..=MAX_SPEED).contains(&v) {
                eyre::bail!("speeds.{name} must be in 1..={MAX_SPEED}, got {v}");
            }
        }
        if s.full < s.search {
            eyre::bail!("speeds.full must be >= speeds.search");
        }

        // Timing
        let t = &self.timing;
        if t.tick_hz == 0 {
            eyre::bail!("timing.tick_hz must be > 0");
        }
        if t.tick_hz > 1000 {
            eyre::bail!("timing.tick_hz must be <= 1000");
        }
        if t.turn_ms == 0 {
            eyre::bail!("timing.turn_ms must be > 0");
        }
        if t.evade_ms == 0 {
            eyre::bail!("timing.evade_ms must be > 0");
        }
        for (name, v) in [
            ("stop_ms", t.stop_ms),
            ("reverse_ms", t.reverse_ms),
            ("turn_ms", t.turn_ms),
            ("evade_ms", t.evade_ms),
            ("search_pivot_ms", t.search_pivot_ms),
            ("full_speed_limit_ms", t.full_speed_limit_ms),
        ] {
            if v > MAX_MANEUVER_MS {
                eyre::bail!("timing.{name} must be <= {MAX_MANEUVER_MS}, got {v}");
            }
        }
        if t.jitter_min > t.jitter_max {
            eyre::bail!("timing.jitter_min must be <= timing.jitter_max");
        }
        let shortest = t.turn_ms as i64 + i64::from(t.jitter_min) * (t.turn_ms / 4) as i64;
        if shortest <= 0 {
            eyre::bail!("timing.jitter_min would make a turn non-positive ({shortest} ms)");
        }
        if t.countdown_ms > 60 * 1000 {
            eyre::bail!("timing.countdown_ms is unreasonably large (>1min)");
        }

        // Proximity
        if self.proximity.confirmations == 0 {
            eyre::bail!("proximity.confirmations must be >= 1");
        }
        if self.proximity.samples_per_tick == 0 {
            eyre::bail!("proximity.samples_per_tick must be >= 1");
        }

        // Logging
        if let Some(r) = self.logging.rotation.as_deref()
            && !matches!(r, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got {r:?}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_all_defaults() {
        let cfg = load_toml("").unwrap();
        assert_eq!(cfg.filter.window, 3);
        assert_eq!(cfg.detector.threshold, 2400);
        assert_eq!(cfg.timing.tick_hz, 100);
        assert_eq!(cfg.proximity.confirmations, 3);
        cfg.validate().unwrap();
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg = load_toml("[timing]\nturn_ms = 400\n").unwrap();
        assert_eq!(cfg.timing.turn_ms, 400);
        assert_eq!(cfg.timing.evade_ms, 450);
    }
}
