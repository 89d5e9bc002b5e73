//! Geometric cost curves and bulk-purchase integration.

use super::state::UpgradeDef;

/// Cost of the single level that takes an upgrade from `level` to `level + 1`.
pub fn level_cost(def: &UpgradeDef, level: u32) -> f64 {
    (def.base_cost * def.cost_growth.powi(level as i32)).floor()
}

/// Clamp a requested level count so `level + n` never exceeds `max_level`.
pub fn clamp_levels(level: u32, max_level: u32, n: u32) -> u32 {
    n.min(max_level.saturating_sub(level))
}

/// Cost of the next `n` levels starting at `level`, with `n` clamped to the
/// cap and `discount` (0..1) applied to every level.
pub fn bulk_cost(def: &UpgradeDef, level: u32, max_level: u32, n: u32, discount: f64) -> f64 {
    let n = clamp_levels(level, max_level, n);
    let raw = (0..n).fold(0.0, |acc, i| acc + level_cost(def, level + i));
    raw * (1.0 - discount)
}

/// Largest `n` whose bulk cost fits in `balance`. Greedy, one level at a
/// time, summing in the same order as `bulk_cost` so the two agree exactly.
pub fn max_affordable(
    def: &UpgradeDef,
    level: u32,
    max_level: u32,
    balance: f64,
    discount: f64,
) -> u32 {
    let factor = 1.0 - discount;
    let mut n = 0;
    let mut raw = 0.0;
    while level + n < max_level {
        let next = raw + level_cost(def, level + n);
        if next * factor > balance {
            break;
        }
        raw = next;
        n += 1;
    }
    n
}
