//! Narrow interfaces through which commands mutate world state.
//!
//! The world-state code of a level implements these three traits. A
//! [`Facades`] bundle borrows the three implementations for exactly one
//! dispatch: it is rebuilt by the caller every tick, and its lifetime stops a
//! [`Command`](crate::command::Command) from keeping any of them.

use crate::entity::EntityId;
use crate::skill::Skill;

// ---------------------------------------------------------------------------
// WorldFacade
// ---------------------------------------------------------------------------

/// Entity-level access to the running level.
pub trait WorldFacade {
    /// Ids of every live entity, in ascending order.
    fn entity_ids(&self) -> Vec<EntityId>;

    /// Whether `id` refers to a live entity.
    fn has_entity(&self, id: EntityId) -> bool;

    /// Apply `skill` to the entity. Returns `false` when the entity cannot
    /// take the skill right now (already has it, falling, etc.).
    fn apply_action_to_entity(&mut self, id: EntityId, skill: Skill) -> bool;

    /// Whether every entity has already been flagged for destruction.
    fn is_nuking(&self) -> bool;

    /// Flag every entity for immediate destruction.
    fn nuke_all(&mut self);
}

// ---------------------------------------------------------------------------
// SkillsFacade
// ---------------------------------------------------------------------------

/// The skill panel: selection and remaining uses.
pub trait SkillsFacade {
    /// The currently selected skill, if any.
    fn selected_skill(&self) -> Option<Skill>;

    /// Whether at least one use of `skill` is left.
    fn can_use_skill(&self, skill: Skill) -> bool;

    /// Consume one use of `skill`. Returns `false` when none is left.
    fn use_skill(&mut self, skill: Skill) -> bool;

    /// Make `skill` the selected one. Returns `false` when it already is.
    fn set_selected_skill(&mut self, skill: Skill) -> bool;
}

// ---------------------------------------------------------------------------
// VictoryFacade
// ---------------------------------------------------------------------------

/// Level-wide spawn control.
pub trait VictoryFacade {
    /// Add `delta` to the release rate, clamped to the level's range.
    /// Returns `false` exactly when the clamped rate did not change.
    fn change_release_rate(&mut self, delta: i32) -> bool;

    /// Stop releasing new entities.
    fn do_nuke(&mut self);
}

// ---------------------------------------------------------------------------
// Facades
// ---------------------------------------------------------------------------

/// The three facades a command executes against, borrowed for one dispatch.
pub struct Facades<'a> {
    /// Entities of the running level.
    pub world: &'a mut dyn WorldFacade,
    /// Skill panel.
    pub skills: &'a mut dyn SkillsFacade,
    /// Release rate and spawning.
    pub victory: &'a mut dyn VictoryFacade,
}

impl<'a> Facades<'a> {
    /// Bundle the three facades for the current tick.
    pub fn new(
        world: &'a mut dyn WorldFacade,
        skills: &'a mut dyn SkillsFacade,
        victory: &'a mut dyn VictoryFacade,
    ) -> Self {
        Self {
            world,
            skills,
            victory,
        }
    }
}
