//! Reset and skip decision rules
//!
//! Rules are evaluated in order and the first match wins:
//! identity -> floor levels -> skip -> overflow -> ceiling roll -> scaled roll.
//! Nothing here touches the world; the caller applies the result.

use serde::{Deserialize, Serialize};

use crate::core::config::PolicyConfig;
use crate::core::types::{CharacterState, ClassId, DEATH_KNIGHT_START_LEVEL};
use crate::policy::chance::compute_chance;
use crate::policy::roll::PercentRoll;

/// What caused an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    LevelChanged,
    Login,
    PeriodicScan,
}

/// Outcome of an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    NoAction,
    Reset { target_level: u8 },
    Skip { target_level: u8 },
}

impl Decision {
    pub fn is_action(&self) -> bool {
        !matches!(self, Decision::NoAction)
    }

    pub fn target_level(&self) -> Option<u8> {
        match self {
            Decision::NoAction => None,
            Decision::Reset { target_level } | Decision::Skip { target_level } => Some(*target_level),
        }
    }
}

/// Per-evaluation view of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotObservation {
    pub level: u8,
    pub class: ClassId,
    pub time_played_at_level: u32,
    pub is_bot: bool,
    pub is_random_bot: bool,
}

impl BotObservation {
    pub fn from_state(state: &CharacterState, is_bot: bool, is_random_bot: bool) -> Self {
        Self {
            level: state.level,
            class: state.class,
            time_played_at_level: state.time_played_at_level,
            is_bot,
            is_random_bot,
        }
    }
}

/// Decide whether a bot should be reset, skipped, or left alone
pub fn decide<R: PercentRoll + ?Sized>(
    observation: &BotObservation,
    policy: &PolicyConfig,
    roll: &mut R,
    trigger: Trigger,
) -> Decision {
    // Player-owned companions are never touched
    if !observation.is_bot || !observation.is_random_bot {
        return Decision::NoAction;
    }

    let level = observation.level;
    let class = observation.class;

    if level <= 1 {
        return Decision::NoAction;
    }
    if class == ClassId::DeathKnight && level == DEATH_KNIGHT_START_LEVEL {
        return Decision::NoAction;
    }

    if trigger != Trigger::PeriodicScan
        && policy.skip_from_level > 0
        && level == policy.skip_from_level
    {
        return Decision::Skip {
            target_level: class.clamp_target(policy.skip_to_level),
        };
    }

    if !policy.resets_enabled() {
        return Decision::NoAction;
    }

    let reset = Decision::Reset {
        target_level: class.clamp_target(policy.reset_to_level),
    };

    if level > policy.max_level {
        return reset;
    }

    if level == policy.max_level {
        let gate_passed = observation.time_played_at_level >= policy.min_time_played_secs;
        let eligible = match trigger {
            Trigger::PeriodicScan => policy.restrict_by_played_time && gate_passed,
            Trigger::LevelChanged => !policy.restrict_by_played_time,
            // No later tick is guaranteed to see a login snapshot
            Trigger::Login => !policy.restrict_by_played_time || gate_passed,
        };
        if !eligible {
            return Decision::NoAction;
        }
        return roll_for(level, policy, roll, reset);
    }

    if policy.scaled_chance && trigger == Trigger::LevelChanged {
        return roll_for(level, policy, roll, reset);
    }

    Decision::NoAction
}

fn roll_for<R: PercentRoll + ?Sized>(
    level: u8,
    policy: &PolicyConfig,
    roll: &mut R,
    on_success: Decision,
) -> Decision {
    let chance = compute_chance(level, policy);
    if roll.roll_percent() < chance {
        on_success
    } else {
        Decision::NoAction
    }
}
