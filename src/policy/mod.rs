//! Pure reset policy: chance, rolls and decisions

pub mod chance;
pub mod decision;
pub mod roll;

pub use chance::compute_chance;
pub use decision::{decide, BotObservation, Decision, Trigger};
pub use roll::{FixedRoll, PercentRoll};
