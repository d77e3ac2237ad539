//! Periodic re-evaluation of bots deferred by the time-played gate

use serde::Serialize;

use crate::actions::{ActionExecutor, ActionOutcome};
use crate::core::config::PolicyConfig;
use crate::host::GameHost;
use crate::hooks::dispatcher::evaluate_character;
use crate::policy::{PercentRoll, Trigger};

/// Summary of one scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// In-world characters evaluated
    pub examined: usize,
    /// Connected but not yet (or no longer) in world
    pub skipped: usize,
    pub outcomes: Vec<ActionOutcome>,
    pub failures: usize,
}

/// Tick-driven scanner
///
/// Accumulates elapsed milliseconds and fires once the configured
/// interval has passed, then starts counting from zero again.
#[derive(Debug, Clone, Default)]
pub struct PeriodicScanner {
    accumulated_ms: u64,
}

impl PeriodicScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accumulated_ms(&self) -> u64 {
        self.accumulated_ms
    }

    /// Advance the timer; returns a report when a scan ran
    pub fn on_update<H: GameHost + ?Sized, R: PercentRoll + ?Sized>(
        &mut self,
        diff_ms: u32,
        host: &mut H,
        policy: &PolicyConfig,
        roll: &mut R,
        executor: &ActionExecutor,
    ) -> Option<ScanReport> {
        self.accumulated_ms = self.accumulated_ms.saturating_add(u64::from(diff_ms));

        if !policy.scanner_enabled() || self.accumulated_ms < policy.scan_interval_ms() {
            return None;
        }

        self.accumulated_ms = 0;
        Some(self.scan(host, policy, roll, executor))
    }

    /// Evaluate every connected character now
    pub fn scan<H: GameHost + ?Sized, R: PercentRoll + ?Sized>(
        &self,
        host: &mut H,
        policy: &PolicyConfig,
        roll: &mut R,
        executor: &ActionExecutor,
    ) -> ScanReport {
        let mut report = ScanReport::default();

        for id in host.connected_characters() {
            let in_world = host.character(id).is_some_and(|state| state.in_world);
            if !in_world {
                report.skipped += 1;
                continue;
            }

            report.examined += 1;
            match evaluate_character(host, policy, roll, executor, id, Trigger::PeriodicScan) {
                Ok(Some(outcome)) => report.outcomes.push(outcome),
                Ok(None) => {}
                Err(e) => {
                    report.failures += 1;
                    tracing::error!("Periodic reset check failed for {:?}: {}", id, e);
                }
            }
        }

        if policy.debug_mode {
            tracing::info!(
                "Periodic scan: {} examined, {} skipped, {} reset, {} failed",
                report.examined,
                report.skipped,
                report.outcomes.len(),
                report.failures
            );
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ClassId;
    use crate::host::{CharacterApi, Controller, SimWorld};
    use crate::policy::FixedRoll;

    fn gated_policy() -> PolicyConfig {
        PolicyConfig {
            restrict_by_played_time: true,
            min_time_played_secs: 600,
            scan_interval_secs: 10,
            ..PolicyConfig::default()
        }
    }

    #[test]
    fn test_fires_only_after_interval() {
        let mut world = SimWorld::new();
        let policy = gated_policy();
        let executor = ActionExecutor::default();
        let mut scanner = PeriodicScanner::new();

        assert!(scanner.on_update(9_999, &mut world, &policy, &mut FixedRoll(0), &executor).is_none());
        assert_eq!(scanner.accumulated_ms(), 9_999);
        assert!(scanner.on_update(1, &mut world, &policy, &mut FixedRoll(0), &executor).is_some());
        assert_eq!(scanner.accumulated_ms(), 0);
    }

    #[test]
    fn test_disabled_without_restriction() {
        let mut world = SimWorld::new();
        let policy = PolicyConfig {
            scan_interval_secs: 1,
            ..PolicyConfig::default()
        };
        let mut scanner = PeriodicScanner::new();
        for _ in 0..5 {
            assert!(scanner
                .on_update(1_000, &mut world, &policy, &mut FixedRoll(0), &ActionExecutor::default())
                .is_none());
        }
        assert_eq!(scanner.accumulated_ms(), 5_000);
    }

    #[test]
    fn test_disabled_when_ceiling_off() {
        let mut world = SimWorld::new();
        let policy = PolicyConfig {
            max_level: 0,
            ..gated_policy()
        };
        let mut scanner = PeriodicScanner::new();
        assert!(scanner
            .on_update(60_000, &mut world, &policy, &mut FixedRoll(0), &ActionExecutor::default())
            .is_none());
    }

    #[test]
    fn test_scan_resets_only_eligible_bots() {
        let mut world = SimWorld::new();
        let waited = world.spawn("Waited", ClassId::Rogue, 80, Controller::RandomBot);
        world.advance_time(700);
        let fresh = world.spawn("Fresh", ClassId::Rogue, 80, Controller::RandomBot);
        let player = world.spawn("Player", ClassId::Rogue, 80, Controller::Player);
        world.advance_time(100);

        let report = PeriodicScanner::new().scan(&mut world, &gated_policy(), &mut FixedRoll(0), &ActionExecutor::default());

        assert_eq!(report.examined, 3);
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.outcomes[0].character, waited);
        assert_eq!(world.character(waited).unwrap().level, 1);
        assert_eq!(world.character(fresh).unwrap().level, 80);
        assert_eq!(world.character(player).unwrap().level, 80);
    }

    #[test]
    fn test_scan_skips_characters_not_in_world() {
        let mut world = SimWorld::new();
        let loading = world.spawn("Loading", ClassId::Mage, 80, Controller::RandomBot);
        world.advance_time(1_000);
        world.get_mut(loading).unwrap().state.in_world = false;

        let report = PeriodicScanner::new().scan(&mut world, &gated_policy(), &mut FixedRoll(0), &ActionExecutor::default());
        assert_eq!(report.skipped, 1);
        assert_eq!(report.examined, 0);
        assert_eq!(world.character(loading).unwrap().level, 80);
    }

    #[test]
    fn test_scan_counts_failures() {
        let mut world = SimWorld::new();
        let broken = world.spawn("Broken", ClassId::Mage, 80, Controller::RandomBot);
        world.advance_time(1_000);
        world.get_mut(broken).unwrap().has_automation = false;

        let report = PeriodicScanner::new().scan(&mut world, &gated_policy(), &mut FixedRoll(0), &ActionExecutor::default());
        assert_eq!(report.failures, 1);
        assert!(report.outcomes.is_empty());
    }
}
