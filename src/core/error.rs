use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResetError {
    #[error("Character not found: {0:?}")]
    CharacterNotFound(crate::core::types::CharacterId),

    #[error("Automation handle unavailable for bot '{0}'")]
    AutomationUnavailable(String),

    #[error("No session attached to character '{0}'")]
    MissingSession(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ResetError>;
