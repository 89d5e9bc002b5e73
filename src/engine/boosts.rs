//! Time-windowed multiplicative boosts.
//!
//! A boost multiplies either the click rate or the per-second rate until its
//! expiry. Boosts of the same category stack multiplicatively. Expired
//! boosts are ignored by every query whether or not `sweep` has physically
//! removed them yet.

/// Which production rate a boost multiplies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoostCategory {
    Click,
    PerSecond,
}

impl BoostCategory {
    pub fn name(&self) -> &'static str {
        match self {
            BoostCategory::Click => "click",
            BoostCategory::PerSecond => "per-second",
        }
    }
}

/// What granted a boost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoostSource {
    Milestone,
    GoldenPickup,
    Event,
    DailyReward,
    Challenge,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActiveBoost {
    pub id: u64,
    pub category: BoostCategory,
    /// Always greater than 1.
    pub multiplier: f64,
    /// Timestamp (ms) at which the boost stops applying.
    pub expires_at: u64,
    pub source: BoostSource,
}

impl ActiveBoost {
    pub fn is_active(&self, now: u64) -> bool {
        now < self.expires_at
    }

    /// Milliseconds left, 0 once expired.
    pub fn remaining_ms(&self, now: u64) -> u64 {
        self.expires_at.saturating_sub(now)
    }
}

/// Append-only boost list with a periodic sweep.
#[derive(Clone, Debug, Default)]
pub struct BoostRegistry {
    boosts: Vec<ActiveBoost>,
    next_id: u64,
    last_sweep: u64,
}

impl BoostRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a boost lasting `duration_ms` from `now`. Returns its id.
    pub fn grant(
        &mut self,
        category: BoostCategory,
        multiplier: f64,
        now: u64,
        duration_ms: u64,
        source: BoostSource,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.boosts.push(ActiveBoost {
            id,
            category,
            multiplier,
            expires_at: now.saturating_add(duration_ms),
            source,
        });
        id
    }

    /// Product of all unexpired multipliers in `category`; 1 when none.
    pub fn effective_multiplier(&self, category: BoostCategory, now: u64) -> f64 {
        self.boosts
            .iter()
            .filter(|b| b.category == category && b.is_active(now))
            .map(|b| b.multiplier)
            .product()
    }

    /// Physically drop expired boosts, at most once per `interval_ms`.
    /// Returns the removed boosts.
    pub fn sweep(&mut self, now: u64, interval_ms: u64) -> Vec<ActiveBoost> {
        if now.saturating_sub(self.last_sweep) < interval_ms {
            return Vec::new();
        }
        self.last_sweep = now;
        let (expired, kept): (Vec<_>, Vec<_>) =
            self.boosts.drain(..).partition(|b| !b.is_active(now));
        self.boosts = kept;
        expired
    }

    pub fn clear(&mut self) {
        self.boosts.clear();
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.boosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boosts.is_empty()
    }
}
