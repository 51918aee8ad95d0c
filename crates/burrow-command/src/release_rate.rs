//! The clamped release-rate counter behind [`VictoryFacade::change_release_rate`].
//!
//! [`VictoryFacade::change_release_rate`]: crate::facade::VictoryFacade::change_release_rate

use serde::{Deserialize, Serialize};

/// Lowest release rate a level may declare.
pub const DEFAULT_MIN_RELEASE_RATE: i32 = 1;
/// Highest release rate the player can reach.
pub const DEFAULT_MAX_RELEASE_RATE: i32 = 99;

/// A release rate that never leaves `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRate {
    min: i32,
    max: i32,
    current: i32,
}

impl ReleaseRate {
    /// Create a release rate. `current` is clamped into range.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    pub fn new(min: i32, max: i32, current: i32) -> Self {
        assert!(min <= max, "release rate range is empty: min {min} > max {max}");
        Self {
            min,
            max,
            current: current.clamp(min, max),
        }
    }

    /// A level whose starting rate is also its minimum, up to the default max.
    pub fn starting_at(rate: i32) -> Self {
        let min = rate.clamp(DEFAULT_MIN_RELEASE_RATE, DEFAULT_MAX_RELEASE_RATE);
        Self::new(min, DEFAULT_MAX_RELEASE_RATE, min)
    }

    /// Add `delta`, clamping to range.
    ///
    /// Returns `false` exactly when the clamped result equals the prior value.
    pub fn change(&mut self, delta: i32) -> bool {
        let next = (i64::from(self.current) + i64::from(delta))
            .clamp(i64::from(self.min), i64::from(self.max)) as i32;
        if next == self.current {
            return false;
        }
        self.current = next;
        true
    }

    /// Set the rate directly, clamping to range. Same return rule as
    /// [`change`](Self::change).
    pub fn set(&mut self, rate: i32) -> bool {
        let next = rate.clamp(self.min, self.max);
        if next == self.current {
            return false;
        }
        self.current = next;
        true
    }

    /// The current rate.
    #[inline]
    pub fn current(&self) -> i32 {
        self.current
    }

    /// Lower bound.
    #[inline]
    pub fn min(&self) -> i32 {
        self.min
    }

    /// Upper bound.
    #[inline]
    pub fn max(&self) -> i32 {
        self.max
    }
}

impl Default for ReleaseRate {
    fn default() -> Self {
        Self::starting_at(DEFAULT_MIN_RELEASE_RATE)
    }
}
