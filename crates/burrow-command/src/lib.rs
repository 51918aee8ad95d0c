//! Burrow Command -- Player actions with a uniform execute/save/load contract.
//!
//! This crate is the leaf of the Burrow workspace. It defines the five player
//! [`Command`](command::Command)s of the puzzle game (select a skill, apply it
//! to an entity, nuke, raise or lower the release rate), the narrow facade
//! traits through which a command reaches the world state, and two small
//! building blocks world-state implementations use behind those facades:
//! the [`EntityArena`](entity::EntityArena) of stable ids and the clamped
//! [`ReleaseRate`](release_rate::ReleaseRate) counter.
//!
//! Commands carry only primitive parameters. Entities and skills are resolved
//! at execute time through a [`Facades`](facade::Facades) bundle that lives for
//! a single call, so a command can never hold on to world state from an old
//! level.
//!
//! # Quick Start
//!
//! ```
//! use burrow_command::prelude::*;
//!
//! let command = Command::load('s', &[3]).unwrap();
//! assert_eq!(command, Command::SelectSkill { skill_index: 3 });
//! assert_eq!(command.key(), 's');
//! assert_eq!(command.save(), vec![3]);
//!
//! let mut rate = ReleaseRate::new(1, 10, 8);
//! assert!(rate.change(5));
//! assert_eq!(rate.current(), 10);
//! assert!(!rate.change(1));
//! ```

#![deny(unsafe_code)]

pub mod command;
pub mod entity;
pub mod facade;
pub mod release_rate;
pub mod skill;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while building a [`Command`](command::Command) from its
/// serialized key and values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The one-letter key does not name any command.
    #[error("unknown command key '{key}'. Known keys: [l, n, s, i, d]")]
    UnknownKey {
        /// The key that was read.
        key: char,
    },

    /// The command received the wrong number of values.
    #[error("command '{key}' expects {expected} value(s), got {actual}")]
    WrongArity {
        /// The command key.
        key: char,
        /// How many values the command takes.
        expected: usize,
        /// How many values were supplied.
        actual: usize,
    },

    /// A value does not fit the parameter it is loaded into.
    #[error("value {value} is out of range for parameter '{parameter}' of command '{key}'")]
    ValueOutOfRange {
        /// The command key.
        key: char,
        /// Name of the parameter being loaded.
        parameter: &'static str,
        /// The rejected value.
        value: i64,
    },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::command::{Command, COMMAND_KEYS};
    pub use crate::entity::{EntityArena, EntityId};
    pub use crate::facade::{Facades, SkillsFacade, VictoryFacade, WorldFacade};
    pub use crate::release_rate::{ReleaseRate, DEFAULT_MAX_RELEASE_RATE, DEFAULT_MIN_RELEASE_RATE};
    pub use crate::skill::Skill;
    pub use crate::CommandError;
}
