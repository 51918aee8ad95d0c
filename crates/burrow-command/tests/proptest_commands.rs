//! Property tests for commands and the release-rate counter.
//!
//! These tests use `proptest` to generate random commands and random
//! sequences of rate changes, and verify that the documented laws hold.

use burrow_command::prelude::*;
use proptest::prelude::*;

fn command_strategy() -> impl Strategy<Value = Command> {
    prop_oneof![
        any::<u32>().prop_map(|skill_index| Command::SelectSkill { skill_index }),
        any::<u32>().prop_map(|id| Command::ApplyAction {
            entity: EntityId::new(id)
        }),
        Just(Command::Nuke),
        any::<i32>().prop_map(|amount| Command::IncreaseRate { amount }),
        any::<i32>().prop_map(|amount| Command::DecreaseRate { amount }),
    ]
}

#[derive(Debug, Clone)]
enum RateOp {
    Increase(i32),
    Decrease(i32),
}

fn rate_op_strategy() -> impl Strategy<Value = RateOp> {
    prop_oneof![
        (-200..200i32).prop_map(RateOp::Increase),
        (-200..200i32).prop_map(RateOp::Decrease),
        any::<i32>().prop_map(RateOp::Increase),
    ]
}

proptest! {
    /// load(save()) rebuilds the same command for every variant.
    #[test]
    fn save_load_round_trip(command in command_strategy()) {
        let rebuilt = Command::load(command.key(), &command.save());
        prop_assert_eq!(rebuilt, Ok(command));
    }

    /// The Display form is always `key` followed by `:value` per saved value.
    #[test]
    fn display_lists_saved_values(command in command_strategy()) {
        let text = command.to_string();
        let key = command.key().to_string();
        let mut parts = text.split(':');
        prop_assert_eq!(parts.next(), Some(key.as_str()));
        let values: Vec<i64> = parts.map(|p| p.parse().unwrap()).collect();
        prop_assert_eq!(values, command.save());
    }

    /// The rate never leaves [min, max], and `change` reports false exactly
    /// when the clamped value did not move.
    #[test]
    fn release_rate_stays_in_range(
        min in 1..50i32,
        span in 0..60i32,
        start in -10..120i32,
        ops in prop::collection::vec(rate_op_strategy(), 1..100),
    ) {
        let max = min + span;
        let mut rate = ReleaseRate::new(min, max, start);
        prop_assert!(rate.current() >= min && rate.current() <= max);

        for op in ops {
            let delta = match op {
                RateOp::Increase(n) => n,
                RateOp::Decrease(n) => n.saturating_neg(),
            };
            let before = rate.current();
            let changed = rate.change(delta);
            let after = rate.current();

            prop_assert!(after >= min && after <= max, "rate {} left [{}, {}]", after, min, max);
            prop_assert_eq!(changed, before != after);
        }
    }

    /// Unknown keys are always rejected, whatever the values.
    #[test]
    fn unknown_keys_rejected(
        key in any::<char>().prop_filter("not a command key", |c| !COMMAND_KEYS.contains(c)),
        values in prop::collection::vec(any::<i64>(), 0..4),
    ) {
        prop_assert_eq!(Command::load(key, &values), Err(CommandError::UnknownKey { key }));
    }

    /// Skill indices map onto panel skills only inside 0..8.
    #[test]
    fn skill_index_resolution(index in any::<u32>()) {
        match Skill::from_index(index) {
            Some(skill) => prop_assert_eq!(skill.index(), index),
            None => prop_assert!(index >= 8),
        }
    }
}
