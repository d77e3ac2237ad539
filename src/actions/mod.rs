//! Effects applied once a decision is final

pub mod executor;

pub use executor::{ActionExecutor, ActionKind, ActionOutcome};
