//! Essence engine state definitions.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::EngineConfig;
use crate::error::EngineError;

use super::boosts::{BoostCategory, BoostRegistry};
use super::catalog::Catalog;
use super::events::EventScheduler;
use super::notify::NotificationQueue;
use super::prestige;

// ── Upgrades ────────────────────────────────────────────────────

/// Which rate an upgrade feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpgradeKind {
    /// Adds to essence per click.
    Click,
    /// Adds to essence per second.
    Auto,
}

/// Static definition of a catalog upgrade.
#[derive(Debug)]
pub struct UpgradeDef {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: UpgradeKind,
    /// Index into `Catalog::tiers`.
    pub tier: usize,
    pub base_cost: f64,
    /// Cost multiplier per level, always > 1.
    pub cost_growth: f64,
    /// Level cap before prestige bonuses.
    pub max_level: u32,
    /// Output per level before prestige bonuses.
    pub power: f64,
}

/// A named group of upgrades that unlocks once the player owns enough levels.
#[derive(Debug)]
pub struct TierDef {
    pub name: &'static str,
    /// Total upgrade levels (across the whole catalog) needed to unlock.
    pub required_levels: u32,
}

/// Temporary purchase discount on one upgrade, granted by an upgrade surge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Surge {
    pub fraction: f64,
    pub expires_at: u64,
}

/// An owned catalog entry.
#[derive(Clone, Debug)]
pub struct Upgrade {
    pub def: &'static UpgradeDef,
    pub level: u32,
    /// Effective cap, re-derived by the prestige recompute.
    pub max_level: u32,
    /// Effective power per level, re-derived by the prestige recompute.
    pub power: f64,
    pub surge: Option<Surge>,
}

impl Upgrade {
    pub fn new(def: &'static UpgradeDef) -> Self {
        Self {
            def,
            level: 0,
            max_level: def.max_level,
            power: def.power,
            surge: None,
        }
    }

    pub fn id(&self) -> &'static str {
        self.def.id
    }

    pub fn is_maxed(&self) -> bool {
        self.level >= self.max_level
    }

    /// Discount fraction in effect at `now`.
    pub fn discount(&self, now: u64) -> f64 {
        match self.surge {
            Some(s) if now < s.expires_at => s.fraction,
            _ => 0.0,
        }
    }

    pub fn is_surged(&self, now: u64) -> bool {
        self.discount(now) > 0.0
    }

    /// Contribution to its rate: power × level.
    pub fn output(&self) -> f64 {
        self.power * self.level as f64
    }
}

// ── Prestige graph ──────────────────────────────────────────────

/// Prestige point cost of the next level of a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PrestigeCost {
    Flat(f64),
    Linear { base: f64, step: f64 },
    Geometric { base: f64, growth: f64 },
}

impl PrestigeCost {
    /// Cost of buying level `level + 1`.
    pub fn at(&self, level: u32) -> f64 {
        match *self {
            PrestigeCost::Flat(c) => c,
            PrestigeCost::Linear { base, step } => base + step * level as f64,
            PrestigeCost::Geometric { base, growth } => {
                (base * growth.powi(level as i32)).floor()
            }
        }
    }
}

/// Permanent bonus granted by a prestige node, applied once per node level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PrestigeBonus {
    /// Multiplies both rates.
    AllCyclesMultiplier(f64),
    /// Essence granted right after a prestige reset.
    StartingCycles(f64),
    /// Fraction of base per-second output added to each click.
    CpsToClickSynergy(f64),
    IncreaseMaxLevel {
        targets: &'static [&'static str],
        amount: u32,
    },
    IncreasePowerMultiplier {
        targets: &'static [&'static str],
        multiplier: f64,
    },
    /// Multiplies the golden pickup spawn delay (< 1 is faster).
    PickupFrequency(f64),
    /// Multiplies golden pickup boost durations.
    PickupDuration(f64),
    /// Multiplies golden pickup multipliers and lumps.
    PickupPotency(f64),
    /// Added to the random event fire chance.
    EventFrequency(f64),
    /// Multiplies random event strength.
    EventPotency(f64),
}

/// Static definition of a prestige node.
#[derive(Debug)]
pub struct PrestigeNodeDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// `None` means the node can be levelled forever.
    pub max_level: Option<u32>,
    /// Nodes that must own at least one level first. Empty for roots.
    pub requires: &'static [&'static str],
    pub cost: PrestigeCost,
    pub bonus: PrestigeBonus,
}

/// Highest level an open-ended node can hold. No cost curve in the
/// catalog lets a player get anywhere near it.
pub const UNBOUNDED_NODE_LEVEL_CEILING: u32 = 1_000;

#[derive(Clone, Debug)]
pub struct PrestigeNode {
    pub def: &'static PrestigeNodeDef,
    pub level: u32,
}

impl PrestigeNode {
    pub fn new(def: &'static PrestigeNodeDef) -> Self {
        Self { def, level: 0 }
    }

    pub fn id(&self) -> &'static str {
        self.def.id
    }

    /// Declared cap, or `UNBOUNDED_NODE_LEVEL_CEILING` for open-ended nodes.
    pub fn level_cap(&self) -> u32 {
        self.def.max_level.unwrap_or(UNBOUNDED_NODE_LEVEL_CEILING)
    }

    pub fn is_maxed(&self) -> bool {
        self.level >= self.level_cap()
    }

    pub fn next_cost(&self) -> f64 {
        self.def.cost.at(self.level)
    }
}

/// Purchase state of a prestige node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeStatus {
    Locked,
    Unlockable,
    Purchased(u32),
}

/// Scalars derived from the prestige graph by the recompute pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrestigeBonuses {
    pub global_multiplier: f64,
    pub starting_cycles: f64,
    pub click_synergy: f64,
    pub pickup_interval_factor: f64,
    pub pickup_duration_factor: f64,
    pub pickup_potency: f64,
    pub event_chance_bonus: f64,
    pub event_potency: f64,
}

impl Default for PrestigeBonuses {
    fn default() -> Self {
        Self {
            global_multiplier: 1.0,
            starting_cycles: 0.0,
            click_synergy: 0.0,
            pickup_interval_factor: 1.0,
            pickup_duration_factor: 1.0,
            pickup_potency: 1.0,
            event_chance_bonus: 0.0,
            event_potency: 1.0,
        }
    }
}

// ── Progression ─────────────────────────────────────────────────

/// One step of the sequential xp milestone track.
#[derive(Debug)]
pub struct MilestoneDef {
    pub name: &'static str,
    pub xp_threshold: u64,
    pub category: BoostCategory,
    pub multiplier: f64,
    pub duration_ms: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AchievementCondition {
    TotalClicks(u64),
    LifetimeEarned(f64),
    PerSecondReached(f64),
    UpgradeLevel {
        upgrade: &'static str,
        level: u32,
    },
    TotalUpgradeLevels(u32),
    Prestiges(u32),
    GoldenPicks(u32),
    ChallengesCompleted(usize),
    PrestigeNodesOwned(usize),
}

#[derive(Debug)]
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub condition: AchievementCondition,
}

/// What a challenge asks the player to gain within its time limit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChallengeObjective {
    /// Lifetime essence gained since the start.
    EarnEssence(f64),
    ClickCount(u64),
    /// Upgrade levels bought since the start.
    UpgradeLevels(u32),
}

impl ChallengeObjective {
    pub fn target(&self) -> f64 {
        match *self {
            ChallengeObjective::EarnEssence(v) => v,
            ChallengeObjective::ClickCount(v) => v as f64,
            ChallengeObjective::UpgradeLevels(v) => v as f64,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChallengeReward {
    PrestigePoints(f64),
    Essence(f64),
    Boost {
        category: BoostCategory,
        multiplier: f64,
        duration_ms: u64,
    },
}

#[derive(Debug)]
pub struct ChallengeDef {
    pub id: &'static str,
    pub name: &'static str,
    pub objective: ChallengeObjective,
    pub duration_ms: u64,
    pub reward: ChallengeReward,
}

#[derive(Clone, Debug)]
pub struct ActiveChallenge {
    pub def: &'static ChallengeDef,
    pub started_at: u64,
    /// Tracked quantity when the challenge started.
    pub baseline: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChallengeOutcome {
    Completed,
    Failed,
    Abandoned,
}

// ── Pickups ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickupKind {
    /// Spawns on its own timer; grants a random boost or lump.
    Golden,
    /// Spawned by a random event; always grants a lump.
    ShootingStar,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Pickup {
    pub id: u64,
    pub kind: PickupKind,
    pub expires_at: u64,
}

// ── Ledger and stats ────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ledger {
    /// Spendable essence.
    pub balance: f64,
    /// Essence earned across every run. Never decreases.
    pub lifetime_earned: f64,
}

/// Monotonic counters. The session counters (`total_clicks`,
/// `total_cycles_earned`, `xp`) restart on prestige.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerStats {
    pub total_clicks: u64,
    pub total_cycles_earned: f64,
    pub xp: u64,
    pub total_prestiges: u32,
    pub total_prestige_points_ever: f64,
    pub golden_picks_clicked: u32,
}

// ── Session ─────────────────────────────────────────────────────

/// The whole engine state for one player.
pub struct Session {
    pub config: EngineConfig,
    pub catalog: Catalog,
    pub ledger: Ledger,
    pub stats: PlayerStats,
    /// Unspent prestige currency.
    pub prestige_points: f64,
    pub upgrades: Vec<Upgrade>,
    pub prestige_nodes: Vec<PrestigeNode>,
    pub bonuses: PrestigeBonuses,
    pub boosts: BoostRegistry,
    pub milestone_index: usize,
    pub unlocked_achievements: BTreeSet<String>,
    pub completed_challenges: BTreeSet<String>,
    pub active_challenge: Option<ActiveChallenge>,
    pub pickups: Vec<Pickup>,
    /// When the next golden pickup appears. `None` until one is scheduled.
    pub next_pickup_at: Option<u64>,
    pub next_pickup_id: u64,
    pub scheduler: EventScheduler,
    pub login_streak: u32,
    pub last_login_date: Option<NaiveDate>,
    pub notifications: NotificationQueue,
    pub rng: ChaCha8Rng,
    pub total_ticks: u64,
}

impl Session {
    /// Start a fresh session. Fails only on an invalid catalog or config.
    pub fn new(config: EngineConfig, catalog: Catalog, now: u64) -> Result<Self, EngineError> {
        config.validate()?;
        catalog.validate()?;

        let upgrades = catalog.upgrades.iter().map(Upgrade::new).collect();
        let prestige_nodes = catalog.prestige_nodes.iter().map(PrestigeNode::new).collect();
        let rng = ChaCha8Rng::seed_from_u64(config.rng_seed.unwrap_or(now));
        let scheduler = EventScheduler::new(now, config.events.check_interval_ms);

        let mut session = Self {
            config,
            catalog,
            ledger: Ledger::default(),
            stats: PlayerStats::default(),
            prestige_points: 0.0,
            upgrades,
            prestige_nodes,
            bonuses: PrestigeBonuses::default(),
            boosts: BoostRegistry::new(),
            milestone_index: 0,
            unlocked_achievements: BTreeSet::new(),
            completed_challenges: BTreeSet::new(),
            active_challenge: None,
            pickups: Vec::new(),
            next_pickup_at: None,
            next_pickup_id: 0,
            scheduler,
            login_streak: 0,
            last_login_date: None,
            notifications: NotificationQueue::new(),
            rng,
            total_ticks: 0,
        };
        session.recompute();
        Ok(session)
    }

    /// Re-derive upgrade power/caps and global bonuses from the prestige graph.
    pub fn recompute(&mut self) {
        self.bonuses = prestige::recompute(&mut self.upgrades, &self.prestige_nodes);
    }

    pub fn upgrade_index(&self, id: &str) -> Option<usize> {
        self.upgrades.iter().position(|u| u.id() == id)
    }

    pub fn upgrade(&self, id: &str) -> Option<&Upgrade> {
        self.upgrades.iter().find(|u| u.id() == id)
    }

    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.prestige_nodes.iter().position(|n| n.id() == id)
    }

    pub fn node(&self, id: &str) -> Option<&PrestigeNode> {
        self.prestige_nodes.iter().find(|n| n.id() == id)
    }

    /// Sum of levels over every upgrade.
    pub fn total_levels(&self) -> u32 {
        self.upgrades.iter().map(|u| u.level).sum()
    }

    pub fn is_tier_unlocked(&self, tier: usize) -> bool {
        self.catalog
            .tiers
            .get(tier)
            .is_some_and(|t| self.total_levels() >= t.required_levels)
    }

    /// Auto-upgrade output before boosts and prestige multipliers.
    pub fn base_per_second(&self) -> f64 {
        self.upgrades
            .iter()
            .filter(|u| u.def.kind == UpgradeKind::Auto)
            .map(Upgrade::output)
            .sum()
    }

    pub fn per_second(&self, now: u64) -> f64 {
        self.base_per_second()
            * self.boosts.effective_multiplier(BoostCategory::PerSecond, now)
            * self.bonuses.global_multiplier
    }

    /// Click-upgrade output, floored at 1 while no click upgrade is owned.
    pub fn base_per_click(&self) -> f64 {
        let owned: f64 = self
            .upgrades
            .iter()
            .filter(|u| u.def.kind == UpgradeKind::Click)
            .map(Upgrade::output)
            .sum();
        if owned > 0.0 {
            owned
        } else {
            1.0
        }
    }

    pub fn per_click(&self, now: u64) -> f64 {
        let synergy = self.bonuses.click_synergy * self.base_per_second();
        (self.base_per_click() + synergy)
            * self.boosts.effective_multiplier(BoostCategory::Click, now)
            * self.bonuses.global_multiplier
    }

    /// Prestige points a reset right now would award.
    pub fn pending_prestige_points(&self) -> f64 {
        (self.stats.total_cycles_earned / self.config.prestige_divisor)
            .sqrt()
            .floor()
    }

    pub fn is_achievement_unlocked(&self, id: &str) -> bool {
        self.unlocked_achievements.contains(id)
    }

    pub fn is_challenge_completed(&self, id: &str) -> bool {
        self.completed_challenges.contains(id)
    }

    /// Add earned essence to the balance and every earned counter.
    pub(crate) fn earn(&mut self, amount: f64) {
        self.ledger.balance += amount;
        self.ledger.lifetime_earned += amount;
        self.stats.total_cycles_earned += amount;
    }
}
