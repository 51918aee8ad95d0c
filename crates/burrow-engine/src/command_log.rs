//! The command log: runs player commands at their tick and records the ones
//! that succeeded.
//!
//! [`CommandLog`] sits between the clock's pre-tick hook and the player's
//! commands. It holds two maps:
//!
//! - **scheduled**: commands loaded from a replay (or scheduled ahead of
//!   time), waiting for their tick;
//! - **executed**: commands that ran and reported success, keyed by the tick
//!   they ran at. This map alone is what [`serialize`](CommandLog::serialize)
//!   renders.
//!
//! The log never stores facades. Every call that executes a command takes a
//! [`Facades`] bundle the caller builds for the current tick, so nothing from
//! a previous level can be reached once the caller stops handing it out.
//!
//! # Example
//!
//! ```
//! use burrow_engine::prelude::*;
//! # struct World; struct Skills; struct Victory(bool);
//! # impl WorldFacade for World {
//! #     fn entity_ids(&self) -> Vec<EntityId> { Vec::new() }
//! #     fn has_entity(&self, _: EntityId) -> bool { false }
//! #     fn apply_action_to_entity(&mut self, _: EntityId, _: Skill) -> bool { false }
//! #     fn is_nuking(&self) -> bool { false }
//! #     fn nuke_all(&mut self) {}
//! # }
//! # impl SkillsFacade for Skills {
//! #     fn selected_skill(&self) -> Option<Skill> { None }
//! #     fn can_use_skill(&self, _: Skill) -> bool { false }
//! #     fn use_skill(&mut self, _: Skill) -> bool { false }
//! #     fn set_selected_skill(&mut self, _: Skill) -> bool { false }
//! # }
//! # impl VictoryFacade for Victory {
//! #     fn change_release_rate(&mut self, _: i32) -> bool { false }
//! #     fn do_nuke(&mut self) { self.0 = true; }
//! # }
//! # let (mut world, mut skills, mut victory) = (World, Skills, Victory(false));
//!
//! let mut log = CommandLog::new();
//! assert_eq!(log.load_replay("2=n"), 1);
//!
//! for tick in 0..3 {
//!     let mut facades = Facades::new(&mut world, &mut skills, &mut victory);
//!     log.on_before_game_tick(tick, &mut facades);
//! }
//!
//! assert!(victory.0);
//! assert_eq!(log.serialize(), "2=n");
//! ```

use std::collections::BTreeMap;

use burrow_command::command::Command;
use burrow_command::facade::Facades;
use tracing::{debug, warn};

use crate::clock::TickIndex;
use crate::replay::{self, ReplayDigest};
use crate::ReplayError;

// ---------------------------------------------------------------------------
// CommandLog
// ---------------------------------------------------------------------------

/// Scheduled and executed commands of one session.
///
/// # Determinism Guarantee
///
/// Given the same initial world state and the same scheduled commands, the
/// same commands succeed at the same ticks, so [`serialize`](Self::serialize)
/// produces byte-identical text across runs. At most one command is recorded
/// per tick.
#[derive(Debug, Clone, Default)]
pub struct CommandLog {
    /// Commands waiting for their tick.
    scheduled: BTreeMap<TickIndex, Command>,
    /// Commands that ran successfully, by tick.
    executed: BTreeMap<TickIndex, Command>,
}

impl CommandLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the scheduled commands with the entries of a replay.
    ///
    /// Malformed entries are skipped one by one with a warning. A tick that
    /// appears twice keeps its last entry. Returns the number of commands now
    /// scheduled.
    pub fn load_replay(&mut self, text: &str) -> usize {
        let parsed = replay::parse(text);
        for error in &parsed.skipped {
            warn!(%error, "skipping malformed replay entry");
        }

        self.scheduled.clear();
        for entry in parsed.entries {
            if let Some(previous) = self.scheduled.insert(entry.tick, entry.command) {
                warn!(
                    tick = entry.tick,
                    %previous,
                    replacement = %entry.command,
                    "replay schedules two commands at one tick, keeping the last"
                );
            }
        }
        self.scheduled.len()
    }

    /// Replace the scheduled commands with a replay, rejecting it entirely if
    /// any entry is malformed.
    ///
    /// # Errors
    ///
    /// Returns the first [`ReplayError`]; the log is left unchanged.
    pub fn load_replay_strict(&mut self, text: &str) -> Result<usize, ReplayError> {
        let entries = replay::parse_strict(text)?;
        self.scheduled = entries
            .into_iter()
            .map(|entry| (entry.tick, entry.command))
            .collect();
        Ok(self.scheduled.len())
    }

    /// Schedule one command for `tick`, returning the one it replaces.
    pub fn schedule(&mut self, tick: TickIndex, command: Command) -> Option<Command> {
        self.scheduled.insert(tick, command)
    }

    /// Execute a command now, at `tick`, and record it if it succeeds.
    ///
    /// A tick that already has a recorded command does not run a second one:
    /// the replay could not reproduce it.
    pub fn queue_command(
        &mut self,
        tick: TickIndex,
        command: Command,
        facades: &mut Facades<'_>,
    ) -> bool {
        if let Some(existing) = self.executed.get(&tick) {
            warn!(
                tick,
                %existing,
                rejected = %command,
                "a command already ran at this tick, dropping the new one"
            );
            return false;
        }

        if !command.execute(facades) {
            debug!(tick, %command, "command had no effect, not recorded");
            return false;
        }

        debug!(tick, %command, "command executed");
        self.executed.insert(tick, command);
        true
    }

    /// Pre-tick hook: run the command scheduled for `tick`, if any.
    ///
    /// Returns `None` when nothing was scheduled, otherwise whether the
    /// command succeeded. The scheduled entry is consumed either way.
    pub fn on_before_game_tick(
        &mut self,
        tick: TickIndex,
        facades: &mut Facades<'_>,
    ) -> Option<bool> {
        let command = self.scheduled.remove(&tick)?;
        Some(self.queue_command(tick, command, facades))
    }

    /// Render the executed commands as replay text, ascending by tick.
    pub fn serialize(&self) -> String {
        replay::render(self.executed.iter().map(|(tick, command)| (*tick, command)))
    }

    /// BLAKE3 digest of [`serialize`](Self::serialize).
    pub fn digest(&self) -> ReplayDigest {
        ReplayDigest::of(&self.serialize())
    }

    /// Forget everything (a new level or session starts).
    pub fn reset(&mut self) {
        self.scheduled.clear();
        self.executed.clear();
    }

    // -- accessors ----------------------------------------------------------

    /// Commands that ran successfully, by tick.
    pub fn executed(&self) -> &BTreeMap<TickIndex, Command> {
        &self.executed
    }

    /// Commands still waiting for their tick.
    pub fn scheduled(&self) -> &BTreeMap<TickIndex, Command> {
        &self.scheduled
    }

    /// Number of commands still waiting for their tick.
    pub fn pending_count(&self) -> usize {
        self.scheduled.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
