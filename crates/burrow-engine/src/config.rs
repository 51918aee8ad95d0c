//! Clock configuration: base frame duration and pacing heuristic thresholds.
//!
//! Every constant the adaptive heuristics use is a named field here, with the
//! values the game has always shipped with as defaults. Fields missing from a
//! JSON document fall back to those defaults.
//!
//! ```
//! use burrow_engine::config::ClockConfig;
//!
//! let config = ClockConfig::from_json_str(r#"{ "benchmark": true }"#).unwrap();
//! assert!(config.benchmark);
//! assert_eq!(config.base_frame_ms, 60.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Logical duration of one tick at speed factor 1, in milliseconds.
pub const DEFAULT_BASE_FRAME_MS: f64 = 60.0;
/// Lowest speed factor either heuristic may set.
pub const DEFAULT_MIN_SPEED_FACTOR: f64 = 0.1;
/// Missed ticks tolerated in benchmark mode before slowing down.
pub const DEFAULT_MISSED_TICKS_THRESHOLD: u32 = 30;
/// Consecutive on-time callbacks in benchmark mode before speeding back up.
pub const DEFAULT_STABLE_TICKS_THRESHOLD: u32 = 60;
/// Benchmark-mode slowdown multiplier.
pub const DEFAULT_SLOWDOWN_FACTOR: f64 = 0.9;
/// Benchmark-mode speedup multiplier.
pub const DEFAULT_SPEEDUP_FACTOR: f64 = 1.05;
/// Wall-clock length of one `each_game_second` period, in milliseconds.
pub const DEFAULT_GAME_SECOND_MS: f64 = 1000.0;

// ---------------------------------------------------------------------------
// ClockConfig
// ---------------------------------------------------------------------------

/// Configuration for the [`SimulationClock`](crate::clock::SimulationClock).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Tick duration in milliseconds at speed factor 1. Must be positive and
    /// finite.
    pub base_frame_ms: f64,
    /// Floor for speed factors set by the catch-up and benchmark heuristics.
    /// Must be in `(0, 1]`.
    pub min_speed_factor: f64,
    /// Start in benchmark (high-throughput) mode.
    pub benchmark: bool,
    /// Benchmark mode: missed ticks above this slow the clock down.
    pub missed_ticks_threshold: u32,
    /// Benchmark mode: on-time callbacks above this speed the clock back up.
    pub stable_ticks_threshold: u32,
    /// Benchmark mode: multiplier applied when slowing down. Must be in `(0, 1)`.
    pub slowdown_factor: f64,
    /// Benchmark mode: multiplier applied when speeding up. Must be `> 1`.
    pub speedup_factor: f64,
    /// Wall-clock period of `each_game_second`, in milliseconds.
    pub game_second_ms: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            base_frame_ms: DEFAULT_BASE_FRAME_MS,
            min_speed_factor: DEFAULT_MIN_SPEED_FACTOR,
            benchmark: false,
            missed_ticks_threshold: DEFAULT_MISSED_TICKS_THRESHOLD,
            stable_ticks_threshold: DEFAULT_STABLE_TICKS_THRESHOLD,
            slowdown_factor: DEFAULT_SLOWDOWN_FACTOR,
            speedup_factor: DEFAULT_SPEEDUP_FACTOR,
            game_second_ms: DEFAULT_GAME_SECOND_MS,
        }
    }
}

impl ClockConfig {
    /// Parse a JSON document and validate the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::InvalidValue`] for out-of-range fields.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: ClockConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field the clock depends on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, value: f64, reason: &'static str) -> ConfigError {
            ConfigError::InvalidValue {
                field,
                value,
                reason,
            }
        }

        if !(self.base_frame_ms > 0.0 && self.base_frame_ms.is_finite()) {
            return Err(invalid(
                "base_frame_ms",
                self.base_frame_ms,
                "must be positive and finite",
            ));
        }
        if !(self.min_speed_factor > 0.0 && self.min_speed_factor <= 1.0) {
            return Err(invalid(
                "min_speed_factor",
                self.min_speed_factor,
                "must be in (0, 1]",
            ));
        }
        if !(self.slowdown_factor > 0.0 && self.slowdown_factor < 1.0) {
            return Err(invalid(
                "slowdown_factor",
                self.slowdown_factor,
                "must be in (0, 1)",
            ));
        }
        if !(self.speedup_factor > 1.0 && self.speedup_factor.is_finite()) {
            return Err(invalid(
                "speedup_factor",
                self.speedup_factor,
                "must be greater than 1 and finite",
            ));
        }
        if !(self.game_second_ms > 0.0 && self.game_second_ms.is_finite()) {
            return Err(invalid(
                "game_second_ms",
                self.game_second_ms,
                "must be positive and finite",
            ));
        }
        Ok(())
    }
}
