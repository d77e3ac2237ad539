//! Login and level-change hooks

use crate::actions::{ActionExecutor, ActionOutcome};
use crate::core::config::PolicyConfig;
use crate::core::error::Result;
use crate::core::types::CharacterId;
use crate::host::{observe, GameHost};
use crate::policy::{decide, PercentRoll, Trigger};

pub const MODULE_ACTIVE_NOTICE: &str = "The [Bot Level Reset] module is active on this server.";

/// Observe, decide and apply for a single character
pub fn evaluate_character<H: GameHost + ?Sized, R: PercentRoll + ?Sized>(
    host: &mut H,
    policy: &PolicyConfig,
    roll: &mut R,
    executor: &ActionExecutor,
    id: CharacterId,
    trigger: Trigger,
) -> Result<Option<ActionOutcome>> {
    let (state, observation) = observe(host, id)?;
    let decision = decide(&observation, policy, roll, trigger);

    if policy.debug_mode {
        tracing::info!(
            "{:?} check for '{}' (level {}, {}s at level): {:?}",
            trigger,
            state.name,
            observation.level,
            observation.time_played_at_level,
            decision
        );
    }

    executor.apply(host, id, decision)
}

/// Routes host events into the decision engine
#[derive(Debug, Clone, Copy, Default)]
pub struct EventDispatcher {
    executor: ActionExecutor,
}

impl EventDispatcher {
    pub fn new(executor: ActionExecutor) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &ActionExecutor {
        &self.executor
    }

    /// Character entered the world
    ///
    /// The activity notice is sent whether or not an action follows.
    pub fn on_login<H: GameHost + ?Sized, R: PercentRoll + ?Sized>(
        &self,
        host: &mut H,
        policy: &PolicyConfig,
        roll: &mut R,
        id: CharacterId,
    ) -> Result<Option<ActionOutcome>> {
        if let Err(e) = host.send_system_message(id, MODULE_ACTIVE_NOTICE) {
            tracing::debug!("Activity notice not delivered to {:?}: {}", id, e);
        }
        evaluate_character(host, policy, roll, &self.executor, id, Trigger::Login)
    }

    /// Character's level changed from `previous_level`
    pub fn on_level_changed<H: GameHost + ?Sized, R: PercentRoll + ?Sized>(
        &self,
        host: &mut H,
        policy: &PolicyConfig,
        roll: &mut R,
        id: CharacterId,
        previous_level: u8,
    ) -> Result<Option<ActionOutcome>> {
        if policy.debug_mode {
            tracing::info!("Level change for {:?} from {}", id, previous_level);
        }
        evaluate_character(host, policy, roll, &self.executor, id, Trigger::LevelChanged)
    }
}
