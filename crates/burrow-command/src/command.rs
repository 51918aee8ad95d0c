//! Player commands with a uniform execute/save/load contract.
//!
//! A [`Command`] is one player action. It is identified in replays by a
//! one-letter key and a list of integer values:
//!
//! | Key | Command | Values |
//! |-----|---------|--------|
//! | `l` | [`Command::ApplyAction`] | entity id |
//! | `n` | [`Command::Nuke`] | none |
//! | `s` | [`Command::SelectSkill`] | skill index |
//! | `i` | [`Command::IncreaseRate`] | amount |
//! | `d` | [`Command::DecreaseRate`] | amount |
//!
//! [`Command::execute`] runs the action against a [`Facades`] bundle and
//! reports success as a plain `bool`. A `false` result is not an error; it
//! means the action had no effect and must not be recorded.
//!
//! # Example
//!
//! ```
//! use burrow_command::prelude::*;
//!
//! let nuke = Command::load('n', &[]).unwrap();
//! assert_eq!(nuke, Command::Nuke);
//! assert_eq!(nuke.to_string(), "n");
//!
//! let action = Command::ApplyAction { entity: EntityId::new(12) };
//! assert_eq!(action.to_string(), "l:12");
//! assert_eq!(Command::load(action.key(), &action.save()), Ok(action));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::entity::EntityId;
use crate::facade::Facades;
use crate::skill::Skill;
use crate::CommandError;

/// Every key the command factory understands.
pub const COMMAND_KEYS: [char; 5] = ['l', 'n', 's', 'i', 'd'];

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A single player action.
///
/// Variants hold only primitive parameters. Nothing here references world
/// state; [`execute`](Self::execute) resolves everything through the facades
/// it is handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Select the skill at `skill_index` in the skill panel.
    SelectSkill {
        /// Panel index. Out-of-range indices load fine but never execute.
        skill_index: u32,
    },
    /// Apply the selected skill to an entity and consume one use of it.
    ApplyAction {
        /// Target entity.
        entity: EntityId,
    },
    /// Destroy every entity and stop spawning.
    Nuke,
    /// Raise the release rate by `amount`.
    IncreaseRate {
        /// How much to add.
        amount: i32,
    },
    /// Lower the release rate by `amount`.
    DecreaseRate {
        /// How much to subtract.
        amount: i32,
    },
}

impl Command {
    /// The one-letter replay key of this command.
    pub fn key(&self) -> char {
        match self {
            Command::ApplyAction { .. } => 'l',
            Command::Nuke => 'n',
            Command::SelectSkill { .. } => 's',
            Command::IncreaseRate { .. } => 'i',
            Command::DecreaseRate { .. } => 'd',
        }
    }

    /// Number of values the command stored under `key` takes, or `None` if
    /// the key is unknown.
    pub fn arity(key: char) -> Option<usize> {
        match key {
            'n' => Some(0),
            'l' | 's' | 'i' | 'd' => Some(1),
            _ => None,
        }
    }

    /// Build a command from its key and saved values.
    ///
    /// This is the command factory used by replay loading.
    ///
    /// # Errors
    ///
    /// - [`CommandError::UnknownKey`] if `key` names no command.
    /// - [`CommandError::WrongArity`] if the number of values is wrong.
    /// - [`CommandError::ValueOutOfRange`] if a value does not fit its
    ///   parameter.
    pub fn load(key: char, values: &[i64]) -> Result<Command, CommandError> {
        let expected = Self::arity(key).ok_or(CommandError::UnknownKey { key })?;
        if values.len() != expected {
            return Err(CommandError::WrongArity {
                key,
                expected,
                actual: values.len(),
            });
        }

        let command = match (key, values) {
            ('l', &[id]) => Command::ApplyAction {
                entity: EntityId::new(to_u32(key, "entity_id", id)?),
            },
            ('n', &[]) => Command::Nuke,
            ('s', &[index]) => Command::SelectSkill {
                skill_index: to_u32(key, "skill_index", index)?,
            },
            ('i', &[amount]) => Command::IncreaseRate {
                amount: to_i32(key, "amount", amount)?,
            },
            ('d', &[amount]) => Command::DecreaseRate {
                amount: to_i32(key, "amount", amount)?,
            },
            _ => return Err(CommandError::UnknownKey { key }),
        };
        Ok(command)
    }

    /// The values that [`load`](Self::load) needs to rebuild this command.
    pub fn save(&self) -> Vec<i64> {
        match *self {
            Command::ApplyAction { entity } => vec![i64::from(entity.index())],
            Command::Nuke => Vec::new(),
            Command::SelectSkill { skill_index } => vec![i64::from(skill_index)],
            Command::IncreaseRate { amount } | Command::DecreaseRate { amount } => {
                vec![i64::from(amount)]
            }
        }
    }

    /// Run the action. Returns `true` only if it changed the world.
    pub fn execute(&self, facades: &mut Facades<'_>) -> bool {
        match *self {
            Command::SelectSkill { skill_index } => {
                let Some(skill) = Skill::from_index(skill_index) else {
                    debug!(skill_index, "select skill: no such skill");
                    return false;
                };
                if facades.skills.selected_skill() == Some(skill) {
                    return false;
                }
                facades.skills.set_selected_skill(skill)
            }
            Command::ApplyAction { entity } => {
                let Some(skill) = facades.skills.selected_skill() else {
                    debug!(%entity, "apply action: no skill selected");
                    return false;
                };
                if !facades.skills.can_use_skill(skill) {
                    debug!(%entity, %skill, "apply action: no uses left");
                    return false;
                }
                if !facades.world.has_entity(entity) {
                    debug!(%entity, "apply action: entity does not exist");
                    return false;
                }
                if !facades.world.apply_action_to_entity(entity, skill) {
                    return false;
                }
                if !facades.skills.use_skill(skill) {
                    warn!(%entity, %skill, "apply action: skill use was refused after the action");
                    return false;
                }
                true
            }
            Command::Nuke => {
                if facades.world.is_nuking() {
                    return false;
                }
                facades.victory.do_nuke();
                facades.world.nuke_all();
                true
            }
            Command::IncreaseRate { amount } => facades.victory.change_release_rate(amount),
            Command::DecreaseRate { amount } => {
                facades.victory.change_release_rate(amount.saturating_neg())
            }
        }
    }
}

/// Renders the replay body: the key followed by `:value` for each saved value.
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())?;
        for value in self.save() {
            write!(f, ":{value}")?;
        }
        Ok(())
    }
}

fn to_u32(key: char, parameter: &'static str, value: i64) -> Result<u32, CommandError> {
    u32::try_from(value).map_err(|_| CommandError::ValueOutOfRange {
        key,
        parameter,
        value,
    })
}

fn to_i32(key: char, parameter: &'static str, value: i64) -> Result<i32, CommandError> {
    i32::try_from(value).map_err(|_| CommandError::ValueOutOfRange {
        key,
        parameter,
        value,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
