//! ResetBotModule - owns the policy and wires it to the host's hooks

use serde::Serialize;

use crate::actions::{ActionExecutor, ActionKind, ActionOutcome};
use crate::core::config::{ConfigSource, PolicyConfig};
use crate::core::error::Result;
use crate::core::types::CharacterId;
use crate::hooks::{EventDispatcher, PeriodicScanner, WorldHooks};
use crate::host::GameHost;
use crate::policy::PercentRoll;

/// Running totals since startup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModuleStats {
    pub logins: u64,
    pub level_changes: u64,
    pub scans: u64,
    pub resets: u64,
    pub skips: u64,
    pub failures: u64,
}

impl ModuleStats {
    fn record(&mut self, outcome: &ActionOutcome) {
        match outcome.kind {
            ActionKind::Reset => self.resets += 1,
            ActionKind::Skip => self.skips += 1,
        }
    }
}

/// The reset policy as installed in a host
pub struct ResetBotModule<R: PercentRoll> {
    policy: PolicyConfig,
    roll: R,
    dispatcher: EventDispatcher,
    scanner: PeriodicScanner,
    stats: ModuleStats,
}

impl<R: PercentRoll> ResetBotModule<R> {
    pub fn new(policy: PolicyConfig, roll: R) -> Self {
        let dispatcher = EventDispatcher::new(ActionExecutor::new(policy.debug_mode));
        Self {
            policy,
            roll,
            dispatcher,
            scanner: PeriodicScanner::new(),
            stats: ModuleStats::default(),
        }
    }

    /// Load and clamp the policy from the host's configuration
    pub fn from_source(source: &dyn ConfigSource, roll: R) -> Self {
        Self::new(PolicyConfig::load(source), roll)
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    pub fn stats(&self) -> ModuleStats {
        self.stats
    }

    pub fn scanner(&self) -> &PeriodicScanner {
        &self.scanner
    }

    fn settle(&mut self, id: CharacterId, result: Result<Option<ActionOutcome>>) -> Option<ActionOutcome> {
        match result {
            Ok(Some(outcome)) => {
                self.stats.record(&outcome);
                Some(outcome)
            }
            Ok(None) => None,
            Err(e) => {
                self.stats.failures += 1;
                tracing::error!("Reset check for {:?} failed: {}", id, e);
                None
            }
        }
    }

    /// Login hook returning the applied action, if any
    pub fn handle_login<H: GameHost + ?Sized>(&mut self, host: &mut H, id: CharacterId) -> Option<ActionOutcome> {
        self.stats.logins += 1;
        let result = self.dispatcher.on_login(host, &self.policy, &mut self.roll, id);
        self.settle(id, result)
    }

    /// Level-change hook returning the applied action, if any
    pub fn handle_level_changed<H: GameHost + ?Sized>(
        &mut self,
        host: &mut H,
        id: CharacterId,
        previous_level: u8,
    ) -> Option<ActionOutcome> {
        self.stats.level_changes += 1;
        let result = self
            .dispatcher
            .on_level_changed(host, &self.policy, &mut self.roll, id, previous_level);
        self.settle(id, result)
    }

    /// Tick hook returning the scan report when a scan ran
    pub fn handle_update<H: GameHost + ?Sized>(&mut self, host: &mut H, diff_ms: u32) -> Option<crate::hooks::ScanReport> {
        let report = self.scanner.on_update(
            diff_ms,
            host,
            &self.policy,
            &mut self.roll,
            self.dispatcher.executor(),
        )?;

        self.stats.scans += 1;
        self.stats.failures += report.failures as u64;
        for outcome in &report.outcomes {
            self.stats.record(outcome);
        }
        Some(report)
    }
}

impl<H: GameHost + ?Sized, R: PercentRoll> WorldHooks<H> for ResetBotModule<R> {
    fn on_startup(&mut self) {
        let p = &self.policy;
        tracing::info!(
            "Bot level reset active: MaxLevel = {}, ResetToLevel = {}, ResetChance = {}%, ScaledChance = {}, SkipFromLevel = {}, SkipToLevel = {}",
            p.max_level,
            p.reset_to_level,
            p.reset_chance_percent,
            if p.scaled_chance { "Enabled" } else { "Disabled" },
            p.skip_from_level,
            p.skip_to_level
        );
        if p.restrict_by_played_time {
            tracing::info!(
                "Max-level resets require {}s at level, checked every {}s",
                p.min_time_played_secs,
                p.scan_interval_secs
            );
        }
    }

    fn on_login(&mut self, host: &mut H, character: CharacterId) {
        self.handle_login(host, character);
    }

    fn on_level_changed(&mut self, host: &mut H, character: CharacterId, previous_level: u8) {
        self.handle_level_changed(host, character, previous_level);
    }

    fn on_update(&mut self, host: &mut H, diff_ms: u32) {
        self.handle_update(host, diff_ms);
    }
}
