//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Highest level a character can reach
pub const MAX_PLAYER_LEVEL: u8 = 80;

/// Level at which Death Knights enter the world
///
/// A Death Knight is never moved below this level and is never
/// evaluated while sitting on it.
pub const DEATH_KNIGHT_START_LEVEL: u8 = 55;

/// Unique identifier for characters known to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub u64);

impl CharacterId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Playable classes
///
/// Discriminants match the host's numeric class ids (10 is unused).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ClassId {
    Warrior = 1,
    Paladin = 2,
    Hunter = 3,
    Rogue = 4,
    Priest = 5,
    DeathKnight = 6,
    Shaman = 7,
    Mage = 8,
    Warlock = 9,
    Druid = 11,
}

impl ClassId {
    pub const ALL: [ClassId; 10] = [
        ClassId::Warrior,
        ClassId::Paladin,
        ClassId::Hunter,
        ClassId::Rogue,
        ClassId::Priest,
        ClassId::DeathKnight,
        ClassId::Shaman,
        ClassId::Mage,
        ClassId::Warlock,
        ClassId::Druid,
    ];

    /// Map a host class id to a class
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|class| *class as u8 == id)
    }

    /// Lowest level this class may be moved to
    pub fn level_floor(&self) -> u8 {
        match self {
            ClassId::DeathKnight => DEATH_KNIGHT_START_LEVEL,
            _ => 1,
        }
    }

    /// Apply the class floor to a configured target level
    pub fn clamp_target(&self, target: u8) -> u8 {
        target.max(self.level_floor())
    }
}

/// Snapshot of a character as reported by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterState {
    pub id: CharacterId,
    pub name: String,
    pub level: u8,
    pub class: ClassId,
    /// Seconds spent at the current level; the host resets it on level change
    pub time_played_at_level: u32,
    /// False while loading or logging out
    pub in_world: bool,
    pub has_session: bool,
}
