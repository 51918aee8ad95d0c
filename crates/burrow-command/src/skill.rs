//! The skills a player can assign to an entity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the eight assignable skills.
///
/// The discriminant is the skill's index in the skill panel, which is also the
/// value a `SelectSkill` command stores in a replay. Indices must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Skill {
    /// Climbs vertical walls instead of turning around.
    Climber = 0,
    /// Survives any fall.
    Floater = 1,
    /// Explodes after a countdown, removing terrain.
    Bomber = 2,
    /// Stands still and turns others around.
    Blocker = 3,
    /// Lays a staircase of bricks.
    Builder = 4,
    /// Digs horizontally.
    Basher = 5,
    /// Digs diagonally downwards.
    Miner = 6,
    /// Digs straight down.
    Digger = 7,
}

impl Skill {
    /// Every skill, in panel order.
    pub const ALL: [Skill; 8] = [
        Skill::Climber,
        Skill::Floater,
        Skill::Bomber,
        Skill::Blocker,
        Skill::Builder,
        Skill::Basher,
        Skill::Miner,
        Skill::Digger,
    ];

    /// Resolve a panel index. `None` for anything outside `0..8`.
    pub fn from_index(index: u32) -> Option<Skill> {
        Self::ALL.get(index as usize).copied()
    }

    /// The panel index of this skill.
    #[inline]
    pub fn index(self) -> u32 {
        self as u32
    }

    /// Lower-case display name.
    pub fn name(self) -> &'static str {
        match self {
            Skill::Climber => "climber",
            Skill::Floater => "floater",
            Skill::Bomber => "bomber",
            Skill::Blocker => "blocker",
            Skill::Builder => "builder",
            Skill::Basher => "basher",
            Skill::Miner => "miner",
            Skill::Digger => "digger",
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
