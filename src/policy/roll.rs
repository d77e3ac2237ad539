//! Percent roll sources

use rand::Rng;

/// Source of uniform rolls in `0..100`
pub trait PercentRoll {
    fn roll_percent(&mut self) -> u32;
}

impl<R: Rng + ?Sized> PercentRoll for R {
    fn roll_percent(&mut self) -> u32 {
        self.gen_range(0..100)
    }
}

/// Always returns the same roll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedRoll(pub u32);

impl PercentRoll for FixedRoll {
    fn roll_percent(&mut self) -> u32 {
        self.0
    }
}
