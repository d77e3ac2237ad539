//! Bot Level Reset - level reset and skip policy for automated characters

pub mod actions;
pub mod core;
pub mod hooks;
pub mod host;
pub mod module;
pub mod policy;

pub use module::{ModuleStats, ResetBotModule};
