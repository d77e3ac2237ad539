pub mod config;
pub mod error;
pub mod types;

pub use config::{ConfigIssue, ConfigSource, KeyValueConfig, PolicyConfig};
pub use error::{ResetError, Result};
pub use types::{CharacterId, CharacterState, ClassId};
