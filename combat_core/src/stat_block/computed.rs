//! Computed/derived stat values for StatBlock

use crate::stat_block::StatBlock;

impl StatBlock {
    /// Max health after offsets
    pub fn derived_max_health(&self) -> i32 {
        self.max_health.compute()
    }

    /// Attack after offsets
    pub fn derived_attack(&self) -> i32 {
        self.attack.compute()
    }

    /// Defense after offsets
    ///
    /// Not clamped: a debuff can push this below zero.
    pub fn derived_defense(&self) -> i32 {
        self.defense.compute()
    }

    /// Calculate health percentage remaining
    pub fn health_percent(&self) -> f32 {
        let max = self.derived_max_health();
        if max <= 0 {
            return 0.0;
        }
        (self.current_health as f32 / max as f32 * 100.0).clamp(0.0, 100.0)
    }
}
