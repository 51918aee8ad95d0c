//! Burrow Engine -- Adaptive tick clock and deterministic command replay.
//!
//! This crate builds on [`burrow_command`] to provide the simulation driver of
//! the puzzle game:
//!
//! - [`SimulationClock`](clock::SimulationClock) turns host frame callbacks
//!   into discrete, fixed-size game ticks, adapting its pace when the host
//!   falls behind and supporting pause, auto-pause and speed changes.
//! - [`CommandLog`](command_log::CommandLog) runs player commands at the tick
//!   they were issued, records the ones that succeeded, and renders or loads
//!   the whole session as replay text.
//!
//! The two are composed by the game's orchestrator, which implements
//! [`TickListener`](clock::TickListener) and forwards the pre-tick hook to the
//! command log together with the facades of the running level.
//!
//! # Quick Start
//!
//! ```
//! use burrow_engine::prelude::*;
//!
//! #[derive(Default)]
//! struct Ticks(Vec<TickIndex>);
//!
//! impl TickListener for Ticks {
//!     fn on_before_game_tick(&mut self, tick: TickIndex) {
//!         self.0.push(tick);
//!     }
//! }
//!
//! let mut clock = SimulationClock::new(ManualHost::new(), ClockConfig::default());
//! clock.resume(PauseSignal::USER);
//!
//! let mut ticks = Ticks::default();
//! clock.host_mut().advance(120.0); // two 60 ms frames
//! clock.poll(&mut ticks);
//!
//! assert_eq!(ticks.0, vec![0, 1]);
//! assert_eq!(clock.tick_index(), 2);
//! ```

#![deny(unsafe_code)]

pub mod clock;
pub mod command_log;
pub mod config;
pub mod host;
pub mod replay;

use burrow_command::CommandError;

/// Re-export the command crate for convenience.
pub use burrow_command;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while parsing replay text.
///
/// The lenient loader turns each of these into a warning and skips the
/// offending entry; the strict loader returns the first one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    /// The entry has no `=` between tick and command.
    #[error("replay entry '{entry}' has no '=' separator")]
    MissingSeparator {
        /// The raw entry text.
        entry: String,
    },

    /// The tick is not a base-10 integer.
    #[error("replay entry '{entry}' has a non-numeric tick")]
    InvalidTick {
        /// The raw entry text.
        entry: String,
    },

    /// The tick is negative after 32-bit truncation.
    #[error("replay tick {tick} is out of range after 32-bit truncation")]
    TickOutOfRange {
        /// The tick after truncation to its low 32 bits.
        tick: i32,
    },

    /// The command part is empty or its key is not a single character.
    #[error("replay entry '{entry}' has no single-letter command key")]
    MissingKey {
        /// The raw entry text.
        entry: String,
    },

    /// A command value is not a base-10 integer.
    #[error("replay entry '{entry}' has a non-numeric value '{value}'")]
    InvalidValue {
        /// The raw entry text.
        entry: String,
        /// The offending value.
        value: String,
    },

    /// Two entries target the same tick.
    #[error("replay contains more than one command at tick {tick}")]
    DuplicateTick {
        /// The repeated tick.
        tick: clock::TickIndex,
    },

    /// The key and values do not form a valid command.
    #[error("replay entry at tick {tick}: {source}")]
    Command {
        /// Tick of the rejected entry.
        tick: clock::TickIndex,
        /// Why the command factory refused it.
        #[source]
        source: CommandError,
    },
}

/// Errors produced while loading or validating a [`ClockConfig`](config::ClockConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration text is not valid JSON for a clock config.
    #[error("failed to parse clock config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value the clock cannot run with.
    #[error("clock config field '{field}' = {value} is invalid: {reason}")]
    InvalidValue {
        /// Name of the field.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// What the field requires.
        reason: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common engine usage.
pub mod prelude {
    // Re-export everything from the command prelude.
    pub use burrow_command::prelude::*;

    // Engine-specific exports.
    pub use crate::clock::{
        PauseSignal, SimulationClock, StepReport, TickIndex, TickListener, MAX_TICK_INDEX,
    };
    pub use crate::command_log::CommandLog;
    pub use crate::config::ClockConfig;
    pub use crate::host::{FrameHost, FrameToken, InstantHost, ManualHost, PolledHost};
    pub use crate::replay::{ParsedReplay, ReplayDigest, ReplayEntry};
    pub use crate::{ConfigError, ReplayError};
}
