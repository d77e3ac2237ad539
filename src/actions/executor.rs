//! Applies reset and skip decisions to characters

use serde::Serialize;

use crate::core::error::{ResetError, Result};
use crate::core::types::CharacterId;
use crate::host::GameHost;
use crate::policy::Decision;

pub const RESET_MESSAGE: &str = "[Bot Level Reset] Your level has been reset.";
pub const SKIP_MESSAGE: &str = "[Bot Level Reset] Your level has been adjusted.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ActionKind {
    Reset,
    Skip,
}

impl ActionKind {
    pub fn message(&self) -> &'static str {
        match self {
            ActionKind::Reset => RESET_MESSAGE,
            ActionKind::Skip => SKIP_MESSAGE,
        }
    }
}

/// Record of an applied action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    pub character: CharacterId,
    pub name: String,
    pub kind: ActionKind,
    pub from_level: u8,
    pub to_level: u8,
    /// Confirmation reached the session
    pub notified: bool,
}

/// Drives the host's mutation API for a final decision
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionExecutor {
    debug_mode: bool,
}

impl ActionExecutor {
    pub fn new(debug_mode: bool) -> Self {
        Self { debug_mode }
    }

    /// Apply a decision; `NoAction` returns `Ok(None)`
    pub fn apply<H: GameHost + ?Sized>(
        &self,
        host: &mut H,
        id: CharacterId,
        decision: Decision,
    ) -> Result<Option<ActionOutcome>> {
        match decision {
            Decision::NoAction => Ok(None),
            Decision::Reset { target_level } => self.apply_reset(host, id, target_level).map(Some),
            Decision::Skip { target_level } => self.apply_skip(host, id, target_level).map(Some),
        }
    }

    pub fn apply_reset<H: GameHost + ?Sized>(&self, host: &mut H, id: CharacterId, target_level: u8) -> Result<ActionOutcome> {
        self.apply_level(host, id, target_level, ActionKind::Reset)
    }

    pub fn apply_skip<H: GameHost + ?Sized>(&self, host: &mut H, id: CharacterId, target_level: u8) -> Result<ActionOutcome> {
        self.apply_level(host, id, target_level, ActionKind::Skip)
    }

    fn apply_level<H: GameHost + ?Sized>(
        &self,
        host: &mut H,
        id: CharacterId,
        target_level: u8,
        kind: ActionKind,
    ) -> Result<ActionOutcome> {
        let state = host.character(id).ok_or(ResetError::CharacterNotFound(id))?;

        // Nothing is mutated unless the bot can be re-geared afterward
        if !host.has_automation(id) {
            return Err(ResetError::AutomationUnavailable(state.name));
        }

        host.set_level(id, target_level)?;
        host.reset_experience(id)?;
        // A companion would out-level its owner
        if target_level < state.level {
            host.remove_companion(id)?;
        }
        host.randomize_for_level(id, target_level)?;

        let notified = match host.send_system_message(id, kind.message()) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Could not notify '{}' of level change: {}", state.name, e);
                false
            }
        };

        if self.debug_mode {
            tracing::info!(
                "{:?}: bot '{}' moved from level {} to {}",
                kind,
                state.name,
                state.level,
                target_level
            );
        } else {
            tracing::debug!("{:?}: '{}' {} -> {}", kind, state.name, state.level, target_level);
        }

        Ok(ActionOutcome {
            character: id,
            name: state.name,
            kind,
            from_level: state.level,
            to_level: target_level,
            notified,
        })
    }
}
