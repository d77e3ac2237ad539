//! Entry points the host calls into

pub mod dispatcher;
pub mod scanner;

use crate::core::types::CharacterId;
use crate::host::GameHost;

pub use dispatcher::{evaluate_character, EventDispatcher, MODULE_ACTIVE_NOTICE};
pub use scanner::{PeriodicScanner, ScanReport};

/// Hook surface registered with the host's event loop
///
/// All calls arrive on the world update thread, one at a time.
pub trait WorldHooks<H: GameHost + ?Sized> {
    fn on_startup(&mut self) {}

    fn on_login(&mut self, host: &mut H, character: CharacterId);

    fn on_level_changed(&mut self, host: &mut H, character: CharacterId, previous_level: u8);

    /// World tick with milliseconds elapsed since the previous one
    fn on_update(&mut self, host: &mut H, diff_ms: u32);
}
