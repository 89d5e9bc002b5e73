//! Static game content: upgrades, tiers, prestige nodes, milestones,
//! achievements and challenges.

use std::collections::HashSet;

use crate::error::CatalogError;

use super::boosts::BoostCategory;
use super::prestige;
use super::state::{
    AchievementCondition, AchievementDef, ChallengeDef, ChallengeObjective, ChallengeReward,
    MilestoneDef, PrestigeBonus, PrestigeCost, PrestigeNodeDef, TierDef, UpgradeDef, UpgradeKind,
};

/// Borrowed view over a full set of static tables.
#[derive(Clone, Copy, Debug)]
pub struct Catalog {
    pub upgrades: &'static [UpgradeDef],
    pub tiers: &'static [TierDef],
    pub prestige_nodes: &'static [PrestigeNodeDef],
    pub milestones: &'static [MilestoneDef],
    pub achievements: &'static [AchievementDef],
    pub challenges: &'static [ChallengeDef],
}

impl Catalog {
    /// The shipped game content.
    pub fn standard() -> Self {
        Self {
            upgrades: &UPGRADES,
            tiers: &TIERS,
            prestige_nodes: &PRESTIGE_NODES,
            milestones: &MILESTONES,
            achievements: &ACHIEVEMENTS,
            challenges: &CHALLENGES,
        }
    }

    /// Reject tables that could never be played correctly.
    pub fn validate(&self) -> Result<(), CatalogError> {
        unique_ids("upgrade", self.upgrades.iter().map(|u| u.id))?;
        unique_ids("prestige node", self.prestige_nodes.iter().map(|n| n.id))?;
        unique_ids("achievement", self.achievements.iter().map(|a| a.id))?;
        unique_ids("challenge", self.challenges.iter().map(|c| c.id))?;

        for u in self.upgrades {
            // base * (growth - 1) >= 1 keeps floored level costs strictly increasing.
            if u.base_cost <= 0.0 || u.cost_growth <= 1.0 || u.base_cost * (u.cost_growth - 1.0) < 1.0
            {
                return Err(CatalogError::InvalidCostCurve {
                    id: u.id.to_string(),
                    base_cost: u.base_cost,
                    growth: u.cost_growth,
                });
            }
            if u.tier >= self.tiers.len() {
                return Err(CatalogError::UnknownTier {
                    id: u.id.to_string(),
                    tier: u.tier,
                });
            }
        }

        let upgrade_ids: HashSet<&str> = self.upgrades.iter().map(|u| u.id).collect();
        for node in self.prestige_nodes {
            let targets: &[&str] = match node.bonus {
                PrestigeBonus::IncreaseMaxLevel { targets, .. }
                | PrestigeBonus::IncreasePowerMultiplier { targets, .. } => targets,
                _ => &[],
            };
            if let Some(missing) = targets.iter().find(|t| !upgrade_ids.contains(*t)) {
                return Err(CatalogError::UnknownTarget {
                    node: node.id.to_string(),
                    target: missing.to_string(),
                });
            }
        }

        for a in self.achievements {
            if let AchievementCondition::UpgradeLevel { upgrade, .. } = a.condition {
                if !upgrade_ids.contains(upgrade) {
                    return Err(CatalogError::UnknownUpgrade {
                        kind: "achievement",
                        id: a.id.to_string(),
                        upgrade: upgrade.to_string(),
                    });
                }
            }
        }

        prestige::validate_graph(self.prestige_nodes)
    }
}

fn unique_ids<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

// ── Tiers ───────────────────────────────────────────────────────

pub static TIERS: [TierDef; 4] = [
    TierDef { name: "Apprentice", required_levels: 0 },
    TierDef { name: "Adept", required_levels: 25 },
    TierDef { name: "Master", required_levels: 75 },
    TierDef { name: "Archon", required_levels: 150 },
];

// ── Upgrades ────────────────────────────────────────────────────

pub static UPGRADES: [UpgradeDef; 11] = [
    UpgradeDef {
        id: "focus",
        name: "Focused Tap",
        kind: UpgradeKind::Click,
        tier: 0,
        base_cost: 30.0,
        cost_growth: 1.22,
        max_level: 50,
        power: 1.0,
    },
    UpgradeDef {
        id: "drip",
        name: "Essence Drip",
        kind: UpgradeKind::Auto,
        tier: 0,
        base_cost: 15.0,
        cost_growth: 1.15,
        max_level: 100,
        power: 0.2,
    },
    UpgradeDef {
        id: "condenser",
        name: "Condenser",
        kind: UpgradeKind::Auto,
        tier: 0,
        base_cost: 120.0,
        cost_growth: 1.16,
        max_level: 100,
        power: 1.5,
    },
    UpgradeDef {
        id: "resonance",
        name: "Resonant Strike",
        kind: UpgradeKind::Click,
        tier: 1,
        base_cost: 2_000.0,
        cost_growth: 1.25,
        max_level: 50,
        power: 8.0,
    },
    UpgradeDef {
        id: "distiller",
        name: "Distiller",
        kind: UpgradeKind::Auto,
        tier: 1,
        base_cost: 1_500.0,
        cost_growth: 1.17,
        max_level: 100,
        power: 12.0,
    },
    UpgradeDef {
        id: "catalyst",
        name: "Catalyst",
        kind: UpgradeKind::Auto,
        tier: 1,
        base_cost: 14_000.0,
        cost_growth: 1.18,
        max_level: 100,
        power: 70.0,
    },
    UpgradeDef {
        id: "attunement",
        name: "Attunement",
        kind: UpgradeKind::Click,
        tier: 2,
        base_cost: 90_000.0,
        cost_growth: 1.28,
        max_level: 40,
        power: 120.0,
    },
    UpgradeDef {
        id: "crucible",
        name: "Crucible",
        kind: UpgradeKind::Auto,
        tier: 2,
        base_cost: 160_000.0,
        cost_growth: 1.19,
        max_level: 100,
        power: 400.0,
    },
    UpgradeDef {
        id: "conflux",
        name: "Conflux",
        kind: UpgradeKind::Auto,
        tier: 2,
        base_cost: 1_800_000.0,
        cost_growth: 1.2,
        max_level: 100,
        power: 2_600.0,
    },
    UpgradeDef {
        id: "epiphany",
        name: "Epiphany",
        kind: UpgradeKind::Click,
        tier: 3,
        base_cost: 12_000_000.0,
        cost_growth: 1.3,
        max_level: 30,
        power: 2_500.0,
    },
    UpgradeDef {
        id: "singularity",
        name: "Singularity",
        kind: UpgradeKind::Auto,
        tier: 3,
        base_cost: 25_000_000.0,
        cost_growth: 1.21,
        max_level: 75,
        power: 18_000.0,
    },
];

// ── Prestige graph ──────────────────────────────────────────────

pub static PRESTIGE_NODES: [PrestigeNodeDef; 12] = [
    PrestigeNodeDef {
        id: "essence_core",
        name: "Essence Core",
        description: "All production x1.1 per level",
        max_level: None,
        requires: &[],
        cost: PrestigeCost::Geometric { base: 1.0, growth: 1.5 },
        bonus: PrestigeBonus::AllCyclesMultiplier(1.1),
    },
    PrestigeNodeDef {
        id: "head_start",
        name: "Head Start",
        description: "Start each run with 1,000 essence per level",
        max_level: Some(10),
        requires: &["essence_core"],
        cost: PrestigeCost::Linear { base: 2.0, step: 2.0 },
        bonus: PrestigeBonus::StartingCycles(1_000.0),
    },
    PrestigeNodeDef {
        id: "tap_echo",
        name: "Tap Echo",
        description: "Clicks gain 1% of base production per level",
        max_level: Some(5),
        requires: &["essence_core"],
        cost: PrestigeCost::Linear { base: 3.0, step: 3.0 },
        bonus: PrestigeBonus::CpsToClickSynergy(0.01),
    },
    PrestigeNodeDef {
        id: "refined_drip",
        name: "Refined Drip",
        description: "Drip and Condenser power x2 per level",
        max_level: Some(3),
        requires: &["essence_core"],
        cost: PrestigeCost::Geometric { base: 3.0, growth: 2.0 },
        bonus: PrestigeBonus::IncreasePowerMultiplier {
            targets: &["drip", "condenser"],
            multiplier: 2.0,
        },
    },
    PrestigeNodeDef {
        id: "deep_wells",
        name: "Deep Wells",
        description: "+25 max level for early producers per level",
        max_level: Some(4),
        requires: &["head_start"],
        cost: PrestigeCost::Geometric { base: 5.0, growth: 2.0 },
        bonus: PrestigeBonus::IncreaseMaxLevel {
            targets: &["drip", "condenser", "distiller"],
            amount: 25,
        },
    },
    PrestigeNodeDef {
        // Target list intentionally left empty until the second-tier item is chosen.
        id: "tier_two_catalyst",
        name: "Tier Two Catalyst",
        description: "Doubles the second tier item",
        max_level: Some(1),
        requires: &["refined_drip", "deep_wells"],
        cost: PrestigeCost::Flat(25.0),
        bonus: PrestigeBonus::IncreasePowerMultiplier {
            targets: &[],
            multiplier: 2.0,
        },
    },
    PrestigeNodeDef {
        id: "golden_sense",
        name: "Golden Sense",
        description: "Golden pickups appear 10% sooner per level",
        max_level: Some(5),
        requires: &["tap_echo"],
        cost: PrestigeCost::Linear { base: 4.0, step: 2.0 },
        bonus: PrestigeBonus::PickupFrequency(0.9),
    },
    PrestigeNodeDef {
        id: "lasting_glow",
        name: "Lasting Glow",
        description: "Golden pickup boosts last 20% longer per level",
        max_level: Some(5),
        requires: &["golden_sense"],
        cost: PrestigeCost::Linear { base: 5.0, step: 3.0 },
        bonus: PrestigeBonus::PickupDuration(1.2),
    },
    PrestigeNodeDef {
        id: "rich_veins",
        name: "Rich Veins",
        description: "Golden pickups are 25% stronger per level",
        max_level: Some(5),
        requires: &["golden_sense"],
        cost: PrestigeCost::Linear { base: 5.0, step: 3.0 },
        bonus: PrestigeBonus::PickupPotency(1.25),
    },
    PrestigeNodeDef {
        id: "restless_skies",
        name: "Restless Skies",
        description: "+5% random event chance per level",
        max_level: Some(4),
        requires: &["essence_core"],
        cost: PrestigeCost::Linear { base: 4.0, step: 4.0 },
        bonus: PrestigeBonus::EventFrequency(0.05),
    },
    PrestigeNodeDef {
        id: "wild_surges",
        name: "Wild Surges",
        description: "Random events 20% stronger per level",
        max_level: Some(5),
        requires: &["restless_skies"],
        cost: PrestigeCost::Linear { base: 6.0, step: 3.0 },
        bonus: PrestigeBonus::EventPotency(1.2),
    },
    PrestigeNodeDef {
        id: "overflow",
        name: "Overflow",
        description: "+10 max level for click upgrades per level",
        max_level: Some(3),
        requires: &["deep_wells", "wild_surges"],
        cost: PrestigeCost::Geometric { base: 20.0, growth: 2.0 },
        bonus: PrestigeBonus::IncreaseMaxLevel {
            targets: &["focus", "resonance"],
            amount: 10,
        },
    },
];

// ── Milestones ──────────────────────────────────────────────────

pub static MILESTONES: [MilestoneDef; 7] = [
    MilestoneDef {
        name: "First Spark",
        xp_threshold: 10,
        category: BoostCategory::Click,
        multiplier: 2.0,
        duration_ms: 30_000,
    },
    MilestoneDef {
        name: "Warm Hands",
        xp_threshold: 50,
        category: BoostCategory::PerSecond,
        multiplier: 2.0,
        duration_ms: 45_000,
    },
    MilestoneDef {
        name: "Steady Rhythm",
        xp_threshold: 150,
        category: BoostCategory::Click,
        multiplier: 3.0,
        duration_ms: 45_000,
    },
    MilestoneDef {
        name: "Flowing Current",
        xp_threshold: 400,
        category: BoostCategory::PerSecond,
        multiplier: 2.5,
        duration_ms: 60_000,
    },
    MilestoneDef {
        name: "Deep Focus",
        xp_threshold: 1_000,
        category: BoostCategory::Click,
        multiplier: 4.0,
        duration_ms: 60_000,
    },
    MilestoneDef {
        name: "Wellspring",
        xp_threshold: 2_500,
        category: BoostCategory::PerSecond,
        multiplier: 3.0,
        duration_ms: 90_000,
    },
    MilestoneDef {
        name: "Transcendent Touch",
        xp_threshold: 6_000,
        category: BoostCategory::PerSecond,
        multiplier: 5.0,
        duration_ms: 120_000,
    },
];

// ── Achievements ────────────────────────────────────────────────

pub static ACHIEVEMENTS: [AchievementDef; 16] = [
    AchievementDef { id: "first_tap", name: "First Tap", condition: AchievementCondition::TotalClicks(1) },
    AchievementDef { id: "hundred_taps", name: "Hundred Taps", condition: AchievementCondition::TotalClicks(100) },
    AchievementDef { id: "thousand_taps", name: "Thousand Taps", condition: AchievementCondition::TotalClicks(1_000) },
    AchievementDef { id: "first_thousand", name: "Trickle", condition: AchievementCondition::LifetimeEarned(1e3) },
    AchievementDef { id: "millionaire", name: "Reservoir", condition: AchievementCondition::LifetimeEarned(1e6) },
    AchievementDef { id: "billionaire", name: "Ocean", condition: AchievementCondition::LifetimeEarned(1e9) },
    AchievementDef { id: "steady_flow", name: "Steady Flow", condition: AchievementCondition::PerSecondReached(10.0) },
    AchievementDef { id: "torrent", name: "Torrent", condition: AchievementCondition::PerSecondReached(1e4) },
    AchievementDef {
        id: "drip_master",
        name: "Drip Master",
        condition: AchievementCondition::UpgradeLevel { upgrade: "drip", level: 50 },
    },
    AchievementDef { id: "collector", name: "Collector", condition: AchievementCondition::TotalUpgradeLevels(100) },
    AchievementDef { id: "reborn", name: "Reborn", condition: AchievementCondition::Prestiges(1) },
    AchievementDef { id: "cycle_keeper", name: "Cycle Keeper", condition: AchievementCondition::Prestiges(10) },
    AchievementDef { id: "lucky", name: "Lucky", condition: AchievementCondition::GoldenPicks(1) },
    AchievementDef { id: "jackpot", name: "Jackpot", condition: AchievementCondition::GoldenPicks(25) },
    AchievementDef { id: "challenger", name: "Challenger", condition: AchievementCondition::ChallengesCompleted(1) },
    AchievementDef { id: "graph_walker", name: "Graph Walker", condition: AchievementCondition::PrestigeNodesOwned(5) },
];

// ── Challenges ──────────────────────────────────────────────────

pub static CHALLENGES: [ChallengeDef; 4] = [
    ChallengeDef {
        id: "sprint",
        name: "Essence Sprint",
        objective: ChallengeObjective::EarnEssence(5_000_000.0),
        duration_ms: 300_000,
        reward: ChallengeReward::PrestigePoints(2.0),
    },
    ChallengeDef {
        id: "frenzy_fingers",
        name: "Frenzy Fingers",
        objective: ChallengeObjective::ClickCount(200),
        duration_ms: 60_000,
        reward: ChallengeReward::Boost {
            category: BoostCategory::Click,
            multiplier: 5.0,
            duration_ms: 60_000,
        },
    },
    ChallengeDef {
        id: "shopping_spree",
        name: "Shopping Spree",
        objective: ChallengeObjective::UpgradeLevels(25),
        duration_ms: 120_000,
        reward: ChallengeReward::Essence(50_000.0),
    },
    ChallengeDef {
        id: "marathon",
        name: "Marathon",
        objective: ChallengeObjective::EarnEssence(1e9),
        duration_ms: 1_800_000,
        reward: ChallengeReward::PrestigePoints(10.0),
    },
];
