//! Centralized balance and tuning constants for the Water Saver Mission.
//!
//! These values back the compiled fallback configuration. The embedded
//! `data/mission.json` mirrors them; keeping both here makes the reference
//! balance reviewable in version control.

// Drain tuning -------------------------------------------------------------
pub(crate) const BASE_DRAIN_RATE: f64 = 15.0;
pub(crate) const INITIAL_LEVEL: f64 = 0.0;
pub(crate) const SAVED_FACTOR: f64 = 0.5;

// Outcome thresholds -------------------------------------------------------
pub(crate) const WIN_LEVEL: f64 = 90.0;
pub(crate) const LOSE_LEVEL: f64 = 0.0;

// Presentation thresholds --------------------------------------------------
pub(crate) const LOW_TANK_LEVEL: f64 = 30.0;
pub(crate) const FILLING_TANK_LEVEL: f64 = 80.0;

// Timing -------------------------------------------------------------------
pub(crate) const TICK_INTERVAL_MS: u32 = 800;
pub(crate) const NOTIFICATION_TTL_MS: u32 = 2_000;

// Rewards ------------------------------------------------------------------
pub(crate) const WON_COINS: u32 = 50;
pub(crate) const WON_XP: u32 = 100;
pub(crate) const LOST_COINS: u32 = 10;
pub(crate) const LOST_XP: u32 = 30;

// Leak sources -------------------------------------------------------------
pub(crate) const TAP_LEAK: f64 = 5.0;
pub(crate) const SHOWER_LEAK: f64 = 8.0;
pub(crate) const TOILET_LEAK: f64 = 6.0;

// Choice offsets -----------------------------------------------------------
pub(crate) const BUCKET_OFFSET: f64 = 8.0;
pub(crate) const SHORT_SHOWER_OFFSET: f64 = 6.0;
