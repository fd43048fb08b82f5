#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core sumo decision logic (hardware-agnostic).
//!
//! This crate provides the hardware-independent control loop of an
//! autonomous sumo robot. All hardware interactions go through the
//! `sumo_traits` device traits, and all time goes through `Clock`.
//!
//! ## Architecture
//!
//! - **Filtering**: generic fixed-capacity running average (`filter` module)
//! - **Motion**: per-axis filtering into a `MotionReading` (`motion` module)
//! - **Contact**: hit detection with settle and cooldown windows (`contact` module)
//! - **Behavior**: prioritized state machine and speed tiers (`behavior` module)
//! - **Engine**: `SumoCore` ties sensors, controller, and drive together per tick
//!
//! ## Integer math
//!
//! Filter sums are widened (`i16 -> i64`) and the contact threshold is
//! compared squared in `u32`, so the decision path needs no square root and
//! cannot overflow for any `i16` input.

// Module declarations
pub mod behavior;
pub mod builder;
pub mod config;
pub mod contact;
pub mod conversions;
pub mod engine;
pub mod error;
pub mod filter;
pub mod hw_error;
pub mod mocks;
pub mod motion;
pub mod proximity;
pub mod runner;
pub mod status;
pub mod util;

// Re-exports for convenience
pub use behavior::{
    Behavior, BehaviorController, Decision, Direction, Maneuver, MotorCommand, Segment,
    SpeedTier, TierState,
};
pub use builder::{Sumo, SumoBuilder, build_sumo};
pub use config::{CoreCfg, DetectorCfg, FilterCfg, MAX_MANEUVER_MS, MAX_SPEED, ProximityCfg, SpeedCfg, TimingCfg};
pub use contact::{ContactDetector, ContactState};
pub use engine::{SensorFrame, SumoCore};
pub use filter::{FilterValue, RunningFilter};
pub use motion::{Accelerometer, MotionFilter, MotionReading};
pub use proximity::ProximityDebouncer;
pub use runner::RunSummary;
pub use status::TickReport;
