//! Seams to the game server hosting the reset policy
//!
//! The policy never owns characters. It asks the host who is a bot,
//! reads snapshots, and requests mutations through these traits.

pub mod world;

use crate::core::error::{ResetError, Result};
use crate::core::types::{CharacterId, CharacterState};
use crate::policy::BotObservation;

pub use world::{Controller, SimCharacter, SimWorld};

/// Identifies automated characters
pub trait BotOracle {
    /// Character is driven by automation rather than a human
    fn is_bot(&self, id: CharacterId) -> bool;

    /// Bot belongs to the unsupervised background population
    fn is_random_bot(&self, id: CharacterId) -> bool;

    /// Automation handle can be retrieved for this bot
    fn has_automation(&self, id: CharacterId) -> bool;
}

/// Reads and mutates characters
pub trait CharacterApi {
    fn character(&self, id: CharacterId) -> Option<CharacterState>;

    fn set_level(&mut self, id: CharacterId, level: u8) -> Result<()>;

    fn reset_experience(&mut self, id: CharacterId) -> Result<()>;

    /// Dismiss the character's companion, if any
    fn remove_companion(&mut self, id: CharacterId) -> Result<()>;

    /// Re-gear and re-stat the character for `level`
    ///
    /// Idempotent; always leaves a valid, fully equipped character.
    fn randomize_for_level(&mut self, id: CharacterId, level: u8) -> Result<()>;
}

/// Delivers system messages to a character's session
pub trait Notifier {
    fn send_system_message(&mut self, id: CharacterId, text: &str) -> Result<()>;
}

/// Enumerates connected characters
pub trait WorldRoster {
    fn connected_characters(&self) -> Vec<CharacterId>;
}

/// Everything the policy needs from its host
pub trait GameHost: BotOracle + CharacterApi + Notifier + WorldRoster {}

impl<T: BotOracle + CharacterApi + Notifier + WorldRoster + ?Sized> GameHost for T {}

/// Build a fresh observation for one character
pub fn observe<H: GameHost + ?Sized>(host: &H, id: CharacterId) -> Result<(CharacterState, BotObservation)> {
    let state = host.character(id).ok_or(ResetError::CharacterNotFound(id))?;
    let observation = BotObservation::from_state(&state, host.is_bot(id), host.is_random_bot(id));
    Ok((state, observation))
}
