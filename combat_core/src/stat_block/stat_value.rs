//! StatValue - a base attribute with its additive and percentage offsets

use serde::{Deserialize, Serialize};

/// A stat following the Base → Percent → Flat model
///
/// Final value is calculated as:
/// `trunc(base × (1 + percent / 100) + flat)`
///
/// - `base`: set at creation and never changed afterwards
/// - `percent`: sum of all percentage increases (40.0 = +40%)
/// - `flat`: sum of all flat additions, applied after the percentage
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatValue {
    base: i32,
    /// Sum of all percentage increases
    pub percent: f32,
    /// Sum of all flat additions
    pub flat: i32,
}

impl StatValue {
    /// Create a new StatValue with the given base
    pub fn with_base(base: i32) -> Self {
        StatValue {
            base,
            percent: 0.0,
            flat: 0,
        }
    }

    pub fn base(&self) -> i32 {
        self.base
    }

    /// Calculate final value, truncated toward zero
    pub fn compute(&self) -> i32 {
        (self.base as f32 * (1.0 + self.percent / 100.0)) as i32 + self.flat
    }

    /// Add a flat bonus
    pub fn add_flat(&mut self, value: i32) {
        self.flat += value;
    }

    /// Add a percentage bonus (40.0 for +40%)
    pub fn add_percent(&mut self, value: f32) {
        self.percent += value;
    }

    /// Drop all offsets, keeping the base
    pub fn reset_to_base(&mut self) {
        self.flat = 0;
        self.percent = 0.0;
    }
}
