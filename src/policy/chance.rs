//! Effective reset chance

use crate::core::config::PolicyConfig;

/// Effective reset chance in percent for a bot at `level`
///
/// Unscaled policies return the base chance. Scaled policies return
/// `floor(level * chance / max_level)`; callers only reach this with
/// `level <= max_level`, so the result never exceeds the base chance.
/// A disabled ceiling (`max_level == 0`) yields 0.
pub fn compute_chance(level: u8, policy: &PolicyConfig) -> u32 {
    if !policy.scaled_chance {
        return policy.reset_chance_percent;
    }
    if policy.max_level == 0 {
        return 0;
    }
    u32::from(level) * policy.reset_chance_percent / u32::from(policy.max_level)
}
