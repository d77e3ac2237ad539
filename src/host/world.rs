//! SimWorld - in-memory host for driving the policy without a game server

use std::collections::BTreeMap;

use crate::core::error::{ResetError, Result};
use crate::core::types::{CharacterId, CharacterState, ClassId, MAX_PLAYER_LEVEL};
use crate::host::{BotOracle, CharacterApi, Notifier, WorldRoster};

/// Who drives a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Controller {
    Player,
    /// Bot spawned for and owned by a player
    CompanionBot,
    RandomBot,
}

/// A character with the extra state the host tracks
#[derive(Debug, Clone)]
pub struct SimCharacter {
    pub state: CharacterState,
    pub controller: Controller,
    pub experience: u32,
    /// Level the current equipment was rolled for
    pub gear_level: Option<u8>,
    pub companion: Option<String>,
    pub has_automation: bool,
    /// System messages delivered to the session
    pub inbox: Vec<String>,
}

/// The simulated world containing all characters
pub struct SimWorld {
    characters: BTreeMap<CharacterId, SimCharacter>,
    next_id: u64,
    pub elapsed_secs: u64,
}

impl SimWorld {
    pub fn new() -> Self {
        Self {
            characters: BTreeMap::new(),
            next_id: 1,
            elapsed_secs: 0,
        }
    }

    /// Add a connected, in-world character
    pub fn spawn(&mut self, name: &str, class: ClassId, level: u8, controller: Controller) -> CharacterId {
        let id = CharacterId(self.next_id);
        self.next_id += 1;

        let companion = (class == ClassId::Hunter).then(|| format!("{}'s pet", name));

        self.characters.insert(
            id,
            SimCharacter {
                state: CharacterState {
                    id,
                    name: name.to_string(),
                    level: level.clamp(1, MAX_PLAYER_LEVEL),
                    class,
                    time_played_at_level: 0,
                    in_world: true,
                    has_session: true,
                },
                controller,
                experience: 0,
                gear_level: Some(level),
                companion,
                has_automation: controller != Controller::Player,
                inbox: Vec::new(),
            },
        );

        id
    }

    pub fn get(&self, id: CharacterId) -> Option<&SimCharacter> {
        self.characters.get(&id)
    }

    pub fn get_mut(&mut self, id: CharacterId) -> Option<&mut SimCharacter> {
        self.characters.get_mut(&id)
    }

    pub fn character_count(&self) -> usize {
        self.characters.len()
    }

    pub fn characters(&self) -> impl Iterator<Item = &SimCharacter> + '_ {
        self.characters.values()
    }

    /// Advance played time for every in-world character
    pub fn advance_time(&mut self, secs: u32) {
        self.elapsed_secs += u64::from(secs);
        for character in self.characters.values_mut().filter(|c| c.state.in_world) {
            character.state.time_played_at_level = character.state.time_played_at_level.saturating_add(secs);
        }
    }

    /// Grant experience and gain one level
    ///
    /// Returns the previous level, or None at the level cap.
    pub fn level_up(&mut self, id: CharacterId) -> Option<u8> {
        let character = self.characters.get_mut(&id)?;
        let previous = character.state.level;
        if previous >= MAX_PLAYER_LEVEL {
            return None;
        }
        character.state.level = previous + 1;
        character.state.time_played_at_level = 0;
        character.experience = 0;
        Some(previous)
    }

    /// Add experience without leveling
    pub fn grant_experience(&mut self, id: CharacterId, amount: u32) {
        if let Some(character) = self.characters.get_mut(&id) {
            character.experience = character.experience.saturating_add(amount);
        }
    }

    fn require_mut(&mut self, id: CharacterId) -> Result<&mut SimCharacter> {
        self.characters.get_mut(&id).ok_or(ResetError::CharacterNotFound(id))
    }
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl BotOracle for SimWorld {
    fn is_bot(&self, id: CharacterId) -> bool {
        self.get(id).is_some_and(|c| c.controller != Controller::Player)
    }

    fn is_random_bot(&self, id: CharacterId) -> bool {
        self.get(id).is_some_and(|c| c.controller == Controller::RandomBot)
    }

    fn has_automation(&self, id: CharacterId) -> bool {
        self.get(id).is_some_and(|c| c.has_automation)
    }
}

impl CharacterApi for SimWorld {
    fn character(&self, id: CharacterId) -> Option<CharacterState> {
        self.get(id).map(|c| c.state.clone())
    }

    fn set_level(&mut self, id: CharacterId, level: u8) -> Result<()> {
        let character = self.require_mut(id)?;
        if character.state.level != level {
            character.state.time_played_at_level = 0;
        }
        character.state.level = level.clamp(1, MAX_PLAYER_LEVEL);
        Ok(())
    }

    fn reset_experience(&mut self, id: CharacterId) -> Result<()> {
        self.require_mut(id)?.experience = 0;
        Ok(())
    }

    fn remove_companion(&mut self, id: CharacterId) -> Result<()> {
        self.require_mut(id)?.companion = None;
        Ok(())
    }

    fn randomize_for_level(&mut self, id: CharacterId, level: u8) -> Result<()> {
        let character = self.require_mut(id)?;
        character.state.level = level.clamp(1, MAX_PLAYER_LEVEL);
        character.gear_level = Some(character.state.level);
        Ok(())
    }
}

impl Notifier for SimWorld {
    fn send_system_message(&mut self, id: CharacterId, text: &str) -> Result<()> {
        let character = self.require_mut(id)?;
        if !character.state.has_session {
            return Err(ResetError::MissingSession(character.state.name.clone()));
        }
        character.inbox.push(text.to_string());
        Ok(())
    }
}

impl WorldRoster for SimWorld {
    fn connected_characters(&self) -> Vec<CharacterId> {
        self.characters.keys().copied().collect()
    }
}
