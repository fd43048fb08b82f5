//! `From` implementations bridging `sumo_config` types to `sumo_core` types.

use crate::config::{CoreCfg, DetectorCfg, FilterCfg, ProximityCfg, SpeedCfg, TimingCfg};

// ── FilterCfg ────────────────────────────────────────────────────────────────

impl From<&sumo_config::FilterCfg> for FilterCfg {
    fn from(c: &sumo_config::FilterCfg) -> Self {
        Self { window: c.window }
    }
}

// ── DetectorCfg ──────────────────────────────────────────────────────────────

impl From<&sumo_config::DetectorCfg> for DetectorCfg {
    fn from(c: &sumo_config::DetectorCfg) -> Self {
        Self {
            threshold: c.threshold,
            settle_ms: c.settle_ms,
            cooldown_ms: c.cooldown_ms,
        }
    }
}

// ── SpeedCfg ─────────────────────────────────────────────────────────────────

impl From<&sumo_config::SpeedCfg> for SpeedCfg {
    fn from(c: &sumo_config::SpeedCfg) -> Self {
        Self {
            search: c.search,
            sustained: c.sustained,
            full: c.full,
            reverse: c.reverse,
            turn: c.turn,
            evade: c.evade,
        }
    }
}

// ── TimingCfg ────────────────────────────────────────────────────────────────

impl From<&sumo_config::TimingCfg> for TimingCfg {
    fn from(c: &sumo_config::TimingCfg) -> Self {
        Self {
            tick_hz: c.tick_hz,
            countdown_ms: c.countdown_ms,
            stop_ms: c.stop_ms,
            reverse_ms: c.reverse_ms,
            turn_ms: c.turn_ms,
            evade_ms: c.evade_ms,
            search_pivot_ms: c.search_pivot_ms,
            full_speed_limit_ms: c.full_speed_limit_ms,
            jitter_min: c.jitter_min,
            jitter_max: c.jitter_max,
        }
    }
}

// ── ProximityCfg ─────────────────────────────────────────────────────────────

impl From<&sumo_config::ProximityCfg> for ProximityCfg {
    fn from(c: &sumo_config::ProximityCfg) -> Self {
        Self {
            confirmations: c.confirmations,
            samples_per_tick: c.samples_per_tick,
        }
    }
}

// ── CoreCfg ──────────────────────────────────────────────────────────────────

impl From<&sumo_config::Config> for CoreCfg {
    fn from(c: &sumo_config::Config) -> Self {
        Self {
            filter: (&c.filter).into(),
            detector: (&c.detector).into(),
            speeds: (&c.speeds).into(),
            timing: (&c.timing).into(),
            proximity: (&c.proximity).into(),
        }
    }
}
