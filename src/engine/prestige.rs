//! Prestige graph: requirement checks, visibility, node purchases and the
//! full recompute of every derived bonus.
//!
//! The recompute always rebuilds from the static upgrade definitions and
//! re-applies every owned node. Bonuses that target the same upgrade
//! therefore never double-apply, whatever order nodes were bought in.
//! Cost is O(nodes × upgrades) per call, fine for catalogs of a few dozen
//! entries each.

use std::collections::{HashMap, HashSet};

use crate::error::CatalogError;

use super::progression;
use super::state::{
    NodeStatus, PrestigeBonus, PrestigeBonuses, PrestigeNode, PrestigeNodeDef, Session, Upgrade,
};

/// Check that every requirement exists and the graph has no cycle.
pub fn validate_graph(defs: &[PrestigeNodeDef]) -> Result<(), CatalogError> {
    let index: HashMap<&str, usize> = defs.iter().enumerate().map(|(i, d)| (d.id, i)).collect();

    for def in defs {
        if let Some(missing) = def.requires.iter().find(|r| !index.contains_key(*r)) {
            return Err(CatalogError::UnknownRequirement {
                node: def.id.to_string(),
                missing: missing.to_string(),
            });
        }
    }

    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        New,
        Active,
        Done,
    }

    // Iterative DFS; a back edge to an Active node is a cycle.
    let mut marks = vec![Mark::New; defs.len()];
    for start in 0..defs.len() {
        if marks[start] != Mark::New {
            continue;
        }
        let mut stack = vec![(start, 0usize)];
        marks[start] = Mark::Active;
        while let Some(top) = stack.last_mut() {
            let (node, next) = *top;
            if let Some(req) = defs[node].requires.get(next) {
                top.1 += 1;
                let child = index[req];
                match marks[child] {
                    Mark::Active => return Err(CatalogError::Cycle(defs[child].id.to_string())),
                    Mark::New => {
                        marks[child] = Mark::Active;
                        stack.push((child, 0));
                    }
                    Mark::Done => {}
                }
            } else {
                marks[node] = Mark::Done;
                stack.pop();
            }
        }
    }
    Ok(())
}

fn find(nodes: &[PrestigeNode], id: &str) -> Option<usize> {
    nodes.iter().position(|n| n.id() == id)
}

/// Every required node owns at least one level.
pub fn requirements_met(nodes: &[PrestigeNode], idx: usize) -> bool {
    nodes[idx]
        .def
        .requires
        .iter()
        .all(|r| find(nodes, r).is_some_and(|i| nodes[i].level > 0))
}

pub fn status(nodes: &[PrestigeNode], idx: usize) -> NodeStatus {
    let node = &nodes[idx];
    if node.level > 0 {
        NodeStatus::Purchased(node.level)
    } else if requirements_met(nodes, idx) {
        NodeStatus::Unlockable
    } else {
        NodeStatus::Locked
    }
}

/// Indices of nodes worth showing: owned nodes, roots, nodes whose
/// requirements are all owned, and every ancestor of an owned node.
pub fn visible_nodes(nodes: &[PrestigeNode]) -> Vec<usize> {
    let mut ancestors: HashSet<usize> = HashSet::new();
    let mut stack: Vec<usize> = (0..nodes.len()).filter(|&i| nodes[i].level > 0).collect();
    while let Some(i) = stack.pop() {
        for req in nodes[i].def.requires {
            if let Some(r) = find(nodes, req) {
                if ancestors.insert(r) {
                    stack.push(r);
                }
            }
        }
    }

    (0..nodes.len())
        .filter(|&i| {
            nodes[i].level > 0
                || nodes[i].def.requires.is_empty()
                || requirements_met(nodes, i)
                || ancestors.contains(&i)
        })
        .collect()
}

/// Rebuild upgrade power/caps from their static definitions, then apply
/// every owned node `level` times (at most its level cap). Levels are
/// preserved and clamped to the resulting cap.
pub fn recompute(upgrades: &mut [Upgrade], nodes: &[PrestigeNode]) -> PrestigeBonuses {
    for u in upgrades.iter_mut() {
        u.power = u.def.power;
        u.max_level = u.def.max_level;
    }
    let mut bonuses = PrestigeBonuses::default();

    for node in nodes.iter().filter(|n| n.level > 0) {
        for _ in 0..node.level.min(node.level_cap()) {
            apply_bonus(&node.def.bonus, upgrades, &mut bonuses);
        }
    }

    for u in upgrades.iter_mut() {
        u.level = u.level.min(u.max_level);
        if !u.power.is_finite() {
            log::warn!("power of `{}` overflowed; using its base", u.id());
            u.power = u.def.power;
        }
    }
    reset_non_finite(&mut bonuses);
    bonuses
}

/// An overflowed bonus would turn the balance into NaN on the next tick.
fn reset_non_finite(bonuses: &mut PrestigeBonuses) {
    let d = PrestigeBonuses::default();
    finite_or("global_multiplier", &mut bonuses.global_multiplier, d.global_multiplier);
    finite_or("starting_cycles", &mut bonuses.starting_cycles, d.starting_cycles);
    finite_or("click_synergy", &mut bonuses.click_synergy, d.click_synergy);
    finite_or("pickup_interval", &mut bonuses.pickup_interval_factor, d.pickup_interval_factor);
    finite_or("pickup_duration", &mut bonuses.pickup_duration_factor, d.pickup_duration_factor);
    finite_or("pickup_potency", &mut bonuses.pickup_potency, d.pickup_potency);
    finite_or("event_chance", &mut bonuses.event_chance_bonus, d.event_chance_bonus);
    finite_or("event_potency", &mut bonuses.event_potency, d.event_potency);
}

fn finite_or(name: &str, value: &mut f64, default: f64) {
    if !value.is_finite() {
        log::warn!("prestige bonus `{}` overflowed; using {}", name, default);
        *value = default;
    }
}

/// Buy one level of a prestige node. Returns true if successful.
pub fn buy_node(session: &mut Session, id: &str, now: u64) -> bool {
    let idx = match session.node_index(id) {
        Some(i) => i,
        None => return false,
    };
    if status(&session.prestige_nodes, idx) == NodeStatus::Locked {
        return false;
    }
    let node = &session.prestige_nodes[idx];
    if node.is_maxed() {
        return false;
    }
    let cost = node.next_cost();
    if session.prestige_points < cost {
        return false;
    }

    session.prestige_points -= cost;
    session.prestige_nodes[idx].level += 1;
    session.recompute();

    log::info!(
        "prestige node {} -> level {} (cost {})",
        id,
        session.prestige_nodes[idx].level,
        cost
    );
    progression::check_achievements(session, now);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::state::{
        PrestigeCost, UpgradeDef, UpgradeKind, UNBOUNDED_NODE_LEVEL_CEILING,
    };

    static X: UpgradeDef = UpgradeDef {
        id: "x",
        name: "X",
        kind: UpgradeKind::Auto,
        tier: 0,
        base_cost: 10.0,
        cost_growth: 1.5,
        max_level: 100,
        power: 2.0,
    };
    static Y: UpgradeDef = UpgradeDef {
        id: "y",
        name: "Y",
        kind: UpgradeKind::Click,
        tier: 0,
        base_cost: 10.0,
        cost_growth: 1.5,
        max_level: 20,
        power: 1.0,
    };

    static ROOT: PrestigeNodeDef = PrestigeNodeDef {
        id: "root",
        name: "Root",
        description: "",
        max_level: None,
        requires: &[],
        cost: PrestigeCost::Flat(1.0),
        bonus: PrestigeBonus::AllCyclesMultiplier(1.5),
    };
    static CAP: PrestigeNodeDef = PrestigeNodeDef {
        id: "cap",
        name: "Cap",
        description: "",
        max_level: Some(5),
        requires: &["root"],
        cost: PrestigeCost::Flat(1.0),
        bonus: PrestigeBonus::IncreaseMaxLevel {
            targets: &["x"],
            amount: 50,
        },
    };
    static POWER: PrestigeNodeDef = PrestigeNodeDef {
        id: "power",
        name: "Power",
        description: "",
        max_level: Some(3),
        requires: &["root"],
        cost: PrestigeCost::Flat(1.0),
        bonus: PrestigeBonus::IncreasePowerMultiplier {
            targets: &["x", "y"],
            multiplier: 2.0,
        },
    };
    static BOTH: PrestigeNodeDef = PrestigeNodeDef {
        id: "both",
        name: "Both",
        description: "",
        max_level: Some(1),
        requires: &["cap", "power"],
        cost: PrestigeCost::Flat(1.0),
        bonus: PrestigeBonus::IncreasePowerMultiplier {
            targets: &["x"],
            multiplier: 3.0,
        },
    };
    static INERT: PrestigeNodeDef = PrestigeNodeDef {
        id: "inert",
        name: "Inert",
        description: "",
        max_level: Some(1),
        requires: &[],
        cost: PrestigeCost::Flat(1.0),
        bonus: PrestigeBonus::IncreasePowerMultiplier {
            targets: &[],
            multiplier: 2.0,
        },
    };

    fn graph() -> (Vec<Upgrade>, Vec<PrestigeNode>) {
        (
            vec![Upgrade::new(&X), Upgrade::new(&Y)],
            vec![
                PrestigeNode::new(&ROOT),
                PrestigeNode::new(&CAP),
                PrestigeNode::new(&POWER),
                PrestigeNode::new(&BOTH),
            ],
        )
    }

    #[test]
    fn max_level_bonus_scales_with_node_level() {
        let (mut ups, mut nodes) = graph();
        nodes[0].level = 1;
        nodes[1].level = 2;
        recompute(&mut ups, &nodes);
        assert_eq!(ups[0].max_level, X.max_level + 100);
        assert_eq!(ups[1].max_level, Y.max_level);
    }

    #[test]
    fn power_bonus_composes_per_level() {
        let (mut ups, mut nodes) = graph();
        nodes[2].level = 3;
        recompute(&mut ups, &nodes);
        assert!((ups[0].power - 2.0 * 8.0).abs() < 0.001);
        assert!((ups[1].power - 1.0 * 8.0).abs() < 0.001);
    }

    #[test]
    fn multiple_sources_stack_on_same_target() {
        let (mut ups, mut nodes) = graph();
        nodes[2].level = 1;
        nodes[3].level = 1;
        recompute(&mut ups, &nodes);
        assert!((ups[0].power - 2.0 * 2.0 * 3.0).abs() < 0.001);
    }

    #[test]
    fn global_multiplier_compounds() {
        let (mut ups, mut nodes) = graph();
        nodes[0].level = 2;
        let bonuses = recompute(&mut ups, &nodes);
        assert!((bonuses.global_multiplier - 2.25).abs() < 0.001);
    }

    #[test]
    fn recompute_twice_is_identical() {
        let (mut ups, mut nodes) = graph();
        nodes[0].level = 1;
        nodes[1].level = 1;
        nodes[2].level = 2;
        let first = recompute(&mut ups, &nodes);
        let snapshot: Vec<(u32, f64)> = ups.iter().map(|u| (u.max_level, u.power)).collect();
        let second = recompute(&mut ups, &nodes);
        let again: Vec<(u32, f64)> = ups.iter().map(|u| (u.max_level, u.power)).collect();
        assert_eq!(first, second);
        assert_eq!(snapshot, again);
    }

    #[test]
    fn recompute_preserves_levels_and_clamps_to_cap() {
        let (mut ups, mut nodes) = graph();
        nodes[1].level = 1;
        recompute(&mut ups, &nodes);
        ups[0].level = 140;
        nodes[1].level = 0;
        recompute(&mut ups, &nodes);
        assert_eq!(ups[0].level, X.max_level);
    }

    #[test]
    fn open_ended_node_applies_at_most_its_ceiling() {
        let mut ups = vec![Upgrade::new(&X)];
        let mut nodes = vec![PrestigeNode::new(&ROOT)];
        nodes[0].level = u32::MAX;
        let bonuses = recompute(&mut ups, &nodes);
        let expected = 1.5f64.powi(UNBOUNDED_NODE_LEVEL_CEILING as i32);
        assert!(bonuses.global_multiplier.is_finite());
        assert!((bonuses.global_multiplier / expected - 1.0).abs() < 1e-9);
    }

    #[test]
    fn overflowing_bonus_falls_back_to_default() {
        static HUGE: PrestigeNodeDef = PrestigeNodeDef {
            id: "huge",
            name: "Huge",
            description: "",
            max_level: Some(10),
            requires: &[],
            cost: PrestigeCost::Flat(1.0),
            bonus: PrestigeBonus::AllCyclesMultiplier(1e300),
        };
        let mut ups = vec![Upgrade::new(&X)];
        let mut nodes = vec![PrestigeNode::new(&HUGE)];
        nodes[0].level = 2;
        let bonuses = recompute(&mut ups, &nodes);
        assert_eq!(bonuses.global_multiplier, 1.0);
    }

    #[test]
    fn empty_target_list_is_inert() {
        let mut ups = vec![Upgrade::new(&X), Upgrade::new(&Y)];
        let mut nodes = vec![PrestigeNode::new(&INERT)];
        nodes[0].level = 1;
        let bonuses = recompute(&mut ups, &nodes);
        assert!((ups[0].power - X.power).abs() < f64::EPSILON);
        assert!((ups[1].power - Y.power).abs() < f64::EPSILON);
        assert_eq!(bonuses, PrestigeBonuses::default());
    }

    #[test]
    fn status_transitions() {
        let (_, mut nodes) = graph();
        assert_eq!(status(&nodes, 0), NodeStatus::Unlockable);
        assert_eq!(status(&nodes, 1), NodeStatus::Locked);
        nodes[0].level = 1;
        assert_eq!(status(&nodes, 0), NodeStatus::Purchased(1));
        assert_eq!(status(&nodes, 1), NodeStatus::Unlockable);
        // needs both cap and power
        nodes[1].level = 1;
        assert_eq!(status(&nodes, 3), NodeStatus::Locked);
        nodes[2].level = 1;
        assert_eq!(status(&nodes, 3), NodeStatus::Unlockable);
    }

    #[test]
    fn visibility_roots_and_unlockables() {
        let (_, mut nodes) = graph();
        assert_eq!(visible_nodes(&nodes), vec![0]);
        nodes[0].level = 1;
        assert_eq!(visible_nodes(&nodes), vec![0, 1, 2]);
    }

    #[test]
    fn purchased_branch_keeps_ancestors_visible() {
        let (_, mut nodes) = graph();
        // A loaded save may own a deep node whose ancestors were since reset.
        nodes[3].level = 1;
        let visible = visible_nodes(&nodes);
        assert!(visible.contains(&0));
        assert!(visible.contains(&1));
        assert!(visible.contains(&2));
    }

    #[test]
    fn cycle_detected() {
        let defs = [
            PrestigeNodeDef {
                id: "a",
                name: "A",
                description: "",
                max_level: None,
                requires: &["b"],
                cost: PrestigeCost::Flat(1.0),
                bonus: PrestigeBonus::StartingCycles(1.0),
            },
            PrestigeNodeDef {
                id: "b",
                name: "B",
                description: "",
                max_level: None,
                requires: &["a"],
                cost: PrestigeCost::Flat(1.0),
                bonus: PrestigeBonus::StartingCycles(1.0),
            },
        ];
        assert!(matches!(validate_graph(&defs), Err(CatalogError::Cycle(_))));
    }

    #[test]
    fn self_requirement_is_a_cycle() {
        let defs = [PrestigeNodeDef {
            id: "loop",
            name: "Loop",
            description: "",
            max_level: None,
            requires: &["loop"],
            cost: PrestigeCost::Flat(1.0),
            bonus: PrestigeBonus::StartingCycles(1.0),
        }];
        assert!(matches!(validate_graph(&defs), Err(CatalogError::Cycle(_))));
    }

    #[test]
    fn unknown_requirement_detected() {
        let defs = [PrestigeNodeDef {
            id: "orphan",
            name: "Orphan",
            description: "",
            max_level: None,
            requires: &["ghost"],
            cost: PrestigeCost::Flat(1.0),
            bonus: PrestigeBonus::StartingCycles(1.0),
        }];
        assert!(matches!(
            validate_graph(&defs),
            Err(CatalogError::UnknownRequirement { .. })
        ));
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let defs = [ROOT_COPY, CAP_COPY, POWER_COPY, BOTH_COPY];
        assert_eq!(validate_graph(&defs), Ok(()));
    }

    const ROOT_COPY: PrestigeNodeDef = PrestigeNodeDef {
        id: "root",
        name: "Root",
        description: "",
        max_level: None,
        requires: &[],
        cost: PrestigeCost::Flat(1.0),
        bonus: PrestigeBonus::AllCyclesMultiplier(1.5),
    };
    const CAP_COPY: PrestigeNodeDef = PrestigeNodeDef {
        id: "cap",
        name: "Cap",
        description: "",
        max_level: Some(5),
        requires: &["root"],
        cost: PrestigeCost::Flat(1.0),
        bonus: PrestigeBonus::StartingCycles(1.0),
    };
    const POWER_COPY: PrestigeNodeDef = PrestigeNodeDef {
        id: "power",
        name: "Power",
        description: "",
        max_level: Some(3),
        requires: &["root"],
        cost: PrestigeCost::Flat(1.0),
        bonus: PrestigeBonus::StartingCycles(1.0),
    };
    const BOTH_COPY: PrestigeNodeDef = PrestigeNodeDef {
        id: "both",
        name: "Both",
        description: "",
        max_level: Some(1),
        requires: &["cap", "power"],
        cost: PrestigeCost::Flat(1.0),
        bonus: PrestigeBonus::StartingCycles(1.0),
    };
}
