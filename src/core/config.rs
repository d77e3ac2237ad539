//! Reset policy configuration
//!
//! The policy is read once at startup from a [`ConfigSource`], clamped into
//! its documented ranges, and then treated as immutable. Every clamp is
//! reported as a [`ConfigIssue`] and logged at error level; none of them
//! stop startup.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::error::Result;
use crate::core::types::MAX_PLAYER_LEVEL;

/// Configuration keys as the host exposes them
pub mod keys {
    pub const MAX_LEVEL: &str = "ResetBotLevel.MaxLevel";
    pub const RESET_TO_LEVEL: &str = "ResetBotLevel.ResetToLevel";
    pub const SKIP_FROM_LEVEL: &str = "ResetBotLevel.SkipFromLevel";
    pub const SKIP_TO_LEVEL: &str = "ResetBotLevel.SkipToLevel";
    pub const RESET_CHANCE: &str = "ResetBotLevel.ResetChance";
    pub const SCALED_CHANCE: &str = "ResetBotLevel.ScaledChance";
    pub const DEBUG_MODE: &str = "ResetBotLevel.DebugMode";
    pub const RESTRICT_TIME_PLAYED: &str = "ResetBotLevel.RestrictTimePlayed";
    pub const MIN_TIME_PLAYED: &str = "ResetBotLevel.MinTimePlayed";
    pub const CHECK_FREQUENCY: &str = "ResetBotLevel.PlayedTimeCheckFrequency";
}

const DEFAULT_RESET_CHANCE: u32 = 100;
const DEFAULT_MIN_TIME_PLAYED_SECS: u32 = 86_400;
const DEFAULT_SCAN_INTERVAL_SECS: u32 = 60;

/// Tunables for the reset and skip rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    // === RESET ===
    /// Level at which bots become eligible for a reset
    ///
    /// 0 disables resets entirely. Bots found above this level are
    /// reset immediately without a roll.
    pub max_level: u8,

    /// Level a reset bot is moved to
    ///
    /// Always below `max_level` when resets are enabled.
    pub reset_to_level: u8,

    /// Base reset chance in percent (0-100)
    pub reset_chance_percent: u32,

    /// Scale the chance by `level / max_level`
    ///
    /// When enabled a roll happens at every level-up, not only at the
    /// ceiling, so bots that plateau below the cap are still caught.
    pub scaled_chance: bool,

    // === SKIP ===
    /// Level that triggers a skip; 0 disables skipping
    pub skip_from_level: u8,

    /// Level a skipped bot is moved to
    pub skip_to_level: u8,

    // === TIME GATE ===
    /// Require `min_time_played_secs` at `max_level` before a reset may roll
    ///
    /// Level-change events at the ceiling are deferred to the periodic
    /// scanner while this is set.
    pub restrict_by_played_time: bool,

    /// Seconds a bot must spend at `max_level` before it becomes eligible
    pub min_time_played_secs: u32,

    /// Seconds between periodic scans of connected bots
    pub scan_interval_secs: u32,

    /// Verbose per-decision logging; never changes a decision
    pub debug_mode: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            max_level: MAX_PLAYER_LEVEL,
            reset_to_level: 1,
            reset_chance_percent: DEFAULT_RESET_CHANCE,
            scaled_chance: false,
            skip_from_level: 0,
            skip_to_level: 1,
            restrict_by_played_time: false,
            min_time_played_secs: DEFAULT_MIN_TIME_PLAYED_SECS,
            scan_interval_secs: DEFAULT_SCAN_INTERVAL_SECS,
            debug_mode: false,
        }
    }
}

/// A configuration value that was replaced while loading
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigIssue {
    #[error("{key}: value '{value}' is not usable, using default {default}")]
    Malformed {
        key: &'static str,
        value: String,
        default: String,
    },

    #[error("{key}: value {value} is invalid ({reason}), using {replacement}")]
    OutOfRange {
        key: &'static str,
        value: u32,
        replacement: u32,
        reason: &'static str,
    },
}

/// A raw configuration value before interpretation
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Integer(i64),
    Bool(bool),
    Text(String),
}

/// Read-only key/value store the policy is loaded from
pub trait ConfigSource {
    /// Look up a dotted key such as `ResetBotLevel.MaxLevel`
    fn raw(&self, key: &str) -> Option<RawValue>;
}

/// Flat string store, the shape a host's own config manager hands over
#[derive(Debug, Clone, Default)]
pub struct KeyValueConfig {
    values: HashMap<String, String>,
}

impl KeyValueConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KeyValueConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl ConfigSource for KeyValueConfig {
    fn raw(&self, key: &str) -> Option<RawValue> {
        self.values.get(key).map(|v| RawValue::Text(v.trim().to_string()))
    }
}

impl ConfigSource for toml::Table {
    fn raw(&self, key: &str) -> Option<RawValue> {
        // A quoted flat key wins over the nested table form
        let value = match self.get(key) {
            Some(value) => value,
            None => {
                let mut segments = key.split('.');
                let first = segments.next()?;
                let mut current = self.get(first)?;
                for segment in segments {
                    current = current.as_table()?.get(segment)?;
                }
                current
            }
        };

        Some(match value {
            toml::Value::Integer(i) => RawValue::Integer(*i),
            toml::Value::Boolean(b) => RawValue::Bool(*b),
            toml::Value::String(s) => RawValue::Text(s.clone()),
            other => RawValue::Text(other.to_string()),
        })
    }
}

fn parse_u32(raw: &RawValue) -> Option<u32> {
    match raw {
        RawValue::Integer(i) => u32::try_from(*i).ok(),
        RawValue::Text(s) => s.parse().ok(),
        RawValue::Bool(_) => None,
    }
}

fn parse_bool(raw: &RawValue) -> Option<bool> {
    match raw {
        RawValue::Bool(b) => Some(*b),
        RawValue::Integer(0) => Some(false),
        RawValue::Integer(1) => Some(true),
        RawValue::Integer(_) => None,
        RawValue::Text(s) => match s.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Some(true),
            "0" | "false" | "no" => Some(false),
            _ => None,
        },
    }
}

fn describe(raw: &RawValue) -> String {
    match raw {
        RawValue::Integer(i) => i.to_string(),
        RawValue::Bool(b) => b.to_string(),
        RawValue::Text(s) => s.clone(),
    }
}

struct Reader<'a> {
    source: &'a dyn ConfigSource,
    issues: Vec<ConfigIssue>,
}

impl Reader<'_> {
    fn u32(&mut self, key: &'static str, default: u32) -> u32 {
        let Some(raw) = self.source.raw(key) else {
            return default;
        };
        parse_u32(&raw).unwrap_or_else(|| {
            self.issues.push(ConfigIssue::Malformed {
                key,
                value: describe(&raw),
                default: default.to_string(),
            });
            default
        })
    }

    fn bool(&mut self, key: &'static str, default: bool) -> bool {
        let Some(raw) = self.source.raw(key) else {
            return default;
        };
        parse_bool(&raw).unwrap_or_else(|| {
            self.issues.push(ConfigIssue::Malformed {
                key,
                value: describe(&raw),
                default: default.to_string(),
            });
            default
        })
    }

    fn out_of_range(&mut self, key: &'static str, value: u32, replacement: u32, reason: &'static str) -> u32 {
        self.issues.push(ConfigIssue::OutOfRange {
            key,
            value,
            replacement,
            reason,
        });
        replacement
    }
}

impl PolicyConfig {
    /// Create a policy with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and clamp every key, returning the issues found along the way
    pub fn from_source(source: &dyn ConfigSource) -> (Self, Vec<ConfigIssue>) {
        let defaults = Self::default();
        let mut r = Reader {
            source,
            issues: Vec::new(),
        };
        let cap = u32::from(MAX_PLAYER_LEVEL);

        let mut max_level = r.u32(keys::MAX_LEVEL, u32::from(defaults.max_level));
        if max_level != 0 && !(2..=cap).contains(&max_level) {
            max_level = r.out_of_range(keys::MAX_LEVEL, max_level, cap, "must be 0 or within 2-80");
        }

        let mut reset_to_level = r.u32(keys::RESET_TO_LEVEL, u32::from(defaults.reset_to_level));
        if reset_to_level == 0 || reset_to_level > cap {
            reset_to_level = r.out_of_range(keys::RESET_TO_LEVEL, reset_to_level, 1, "must be within 1-80");
        } else if max_level > 0 && reset_to_level >= max_level {
            reset_to_level = r.out_of_range(keys::RESET_TO_LEVEL, reset_to_level, 1, "must be below MaxLevel");
        }

        let mut skip_from_level = r.u32(keys::SKIP_FROM_LEVEL, u32::from(defaults.skip_from_level));
        if skip_from_level > cap {
            skip_from_level = r.out_of_range(keys::SKIP_FROM_LEVEL, skip_from_level, 0, "must be within 0-80");
        } else if skip_from_level > 0 && max_level > 0 && skip_from_level >= max_level {
            skip_from_level = r.out_of_range(keys::SKIP_FROM_LEVEL, skip_from_level, 0, "must be below MaxLevel");
        }

        let mut skip_to_level = r.u32(keys::SKIP_TO_LEVEL, u32::from(defaults.skip_to_level));
        if skip_to_level == 0 || skip_to_level > cap {
            skip_to_level = r.out_of_range(keys::SKIP_TO_LEVEL, skip_to_level, 1, "must be within 1-80");
        } else if max_level > 0 && skip_to_level > max_level {
            skip_to_level = r.out_of_range(keys::SKIP_TO_LEVEL, skip_to_level, 1, "must not exceed MaxLevel");
        }

        let mut reset_chance_percent = r.u32(keys::RESET_CHANCE, defaults.reset_chance_percent);
        if reset_chance_percent > 100 {
            reset_chance_percent = r.out_of_range(keys::RESET_CHANCE, reset_chance_percent, DEFAULT_RESET_CHANCE, "must be within 0-100");
        }

        let scaled_chance = r.bool(keys::SCALED_CHANCE, defaults.scaled_chance);
        let debug_mode = r.bool(keys::DEBUG_MODE, defaults.debug_mode);
        let restrict_by_played_time = r.bool(keys::RESTRICT_TIME_PLAYED, defaults.restrict_by_played_time);
        let min_time_played_secs = r.u32(keys::MIN_TIME_PLAYED, defaults.min_time_played_secs);

        let mut scan_interval_secs = r.u32(keys::CHECK_FREQUENCY, defaults.scan_interval_secs);
        if scan_interval_secs == 0 {
            scan_interval_secs = r.out_of_range(keys::CHECK_FREQUENCY, 0, DEFAULT_SCAN_INTERVAL_SECS, "must be positive");
        }

        // Every level above has been clamped to 0-80
        let level = |v: u32| u8::try_from(v).unwrap_or(MAX_PLAYER_LEVEL);

        let config = Self {
            max_level: level(max_level),
            reset_to_level: level(reset_to_level),
            reset_chance_percent,
            scaled_chance,
            skip_from_level: level(skip_from_level),
            skip_to_level: level(skip_to_level),
            restrict_by_played_time,
            min_time_played_secs,
            scan_interval_secs,
            debug_mode,
        };

        (config, r.issues)
    }

    /// Read the policy, logging each clamped value at error level
    pub fn load(source: &dyn ConfigSource) -> Self {
        let (config, issues) = Self::from_source(source);
        for issue in &issues {
            tracing::error!("Invalid reset policy value: {}", issue);
        }
        config
    }

    /// Whether resets at the ceiling are enabled at all
    pub fn resets_enabled(&self) -> bool {
        self.max_level > 0
    }

    /// Whether the periodic scanner has any work to do
    pub fn scanner_enabled(&self) -> bool {
        self.resets_enabled() && self.restrict_by_played_time
    }

    /// Scan cadence in milliseconds
    pub fn scan_interval_ms(&self) -> u64 {
        u64::from(self.scan_interval_secs) * 1000
    }
}

/// Load a policy from a TOML file
///
/// Keys use the host's dotted names, so either
/// `ResetBotLevel.MaxLevel = 80` or a `[ResetBotLevel]` table works.
pub fn load_policy_file(path: &Path) -> Result<(PolicyConfig, Vec<ConfigIssue>)> {
    let content = std::fs::read_to_string(path)?;
    load_policy_str(&content)
}

/// Load a policy from TOML text
pub fn load_policy_str(content: &str) -> Result<(PolicyConfig, Vec<ConfigIssue>)> {
    let table: toml::Table = toml::from_str(content)?;
    Ok(PolicyConfig::from_source(&table))
}
