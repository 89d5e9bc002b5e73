//! Fixed-interval random events.
//!
//! Every `check_interval_ms` one uniform draw decides both whether an event
//! fires and which one. Kinds are walked in a fixed order; an ineligible
//! kind is skipped without adding its weight, so the draw can fall past the
//! end of the walk and nothing fires.

use rand::Rng;

use super::boosts::{BoostCategory, BoostSource};
use super::notify::{Notice, Notification};
use super::pickups;
use super::state::{PickupKind, Session, Surge};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    EssenceFrenzy,
    UpgradeSurge,
    ShootingPickup,
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::EssenceFrenzy => "essence frenzy",
            EventKind::UpgradeSurge => "upgrade surge",
            EventKind::ShootingPickup => "shooting pickup",
        }
    }
}

/// When the next event check happens.
#[derive(Clone, Debug, PartialEq)]
pub struct EventScheduler {
    pub next_check_at: u64,
    pub interval_ms: u64,
}

impl EventScheduler {
    pub fn new(now: u64, interval_ms: u64) -> Self {
        Self {
            next_check_at: now.saturating_add(interval_ms),
            interval_ms,
        }
    }

    /// True (and the next check is scheduled) once `now` reaches the check time.
    pub fn due(&mut self, now: u64) -> bool {
        if now < self.next_check_at {
            return false;
        }
        self.next_check_at = now.saturating_add(self.interval_ms);
        true
    }
}

/// A kind in the weighted walk.
#[derive(Clone, Copy, Debug)]
pub struct Candidate {
    pub kind: EventKind,
    pub weight: f64,
    pub eligible: bool,
}

/// Map one draw `u ∈ [0, 1)` to an event. `None` when the draw misses the
/// fire chance or falls past every eligible kind.
pub fn pick_event(u: f64, chance: f64, candidates: &[Candidate]) -> Option<EventKind> {
    if chance <= 0.0 || u >= chance {
        return None;
    }
    let total: f64 = candidates.iter().map(|c| c.weight).sum();
    let point = u / chance * total;
    let mut acc = 0.0;
    for c in candidates.iter().filter(|c| c.eligible) {
        acc += c.weight;
        if point < acc {
            return Some(c.kind);
        }
    }
    None
}

/// Upgrades a surge could land on: owned, below cap, not already surged.
pub fn surge_targets(session: &Session, now: u64) -> Vec<usize> {
    session
        .upgrades
        .iter()
        .enumerate()
        .filter(|(_, u)| u.level > 0 && !u.is_maxed() && !u.is_surged(now))
        .map(|(i, _)| i)
        .collect()
}

fn candidates(session: &Session, now: u64) -> [Candidate; 3] {
    let cfg = &session.config.events;
    [
        Candidate {
            kind: EventKind::EssenceFrenzy,
            weight: cfg.frenzy_weight,
            eligible: true,
        },
        Candidate {
            kind: EventKind::UpgradeSurge,
            weight: cfg.surge_weight,
            eligible: !surge_targets(session, now).is_empty(),
        },
        Candidate {
            kind: EventKind::ShootingPickup,
            weight: cfg.shooting_weight,
            eligible: true,
        },
    ]
}

/// Run the scheduled check if due. Returns the event that fired, if any.
pub fn tick_events(session: &mut Session, now: u64) -> Option<EventKind> {
    if !session.scheduler.due(now) {
        return None;
    }
    let chance = (session.config.events.fire_chance + session.bonuses.event_chance_bonus).min(1.0);
    let u: f64 = session.rng.gen();
    let picked = pick_event(u, chance, &candidates(session, now));
    log::debug!(
        "event check: draw {:.3} chance {:.3} -> {}",
        u,
        chance,
        picked.map_or("nothing", |k| k.name())
    );

    let kind = picked?;
    apply_event(session, kind, now);
    Some(kind)
}

fn apply_event(session: &mut Session, kind: EventKind, now: u64) {
    let cfg = session.config.events.clone();
    let potency = session.bonuses.event_potency;
    match kind {
        EventKind::EssenceFrenzy => {
            let multiplier = 1.0 + (cfg.frenzy_multiplier - 1.0) * potency;
            session.boosts.grant(
                BoostCategory::PerSecond,
                multiplier,
                now,
                cfg.frenzy_duration_ms,
                BoostSource::Event,
            );
            session
                .notifications
                .push(Notification::Event(Notice::EssenceFrenzy {
                    multiplier,
                    duration_ms: cfg.frenzy_duration_ms,
                }));
        }
        EventKind::UpgradeSurge => {
            let targets = surge_targets(session, now);
            if targets.is_empty() {
                return;
            }
            let idx = targets[session.rng.gen_range(0..targets.len())];
            let fraction = (cfg.surge_discount * potency).min(0.9);
            let upgrade = &mut session.upgrades[idx];
            upgrade.surge = Some(Surge {
                fraction,
                expires_at: now.saturating_add(cfg.surge_duration_ms),
            });
            let name = upgrade.def.name;
            session
                .notifications
                .push(Notification::Event(Notice::UpgradeSurge {
                    upgrade: name,
                    fraction,
                }));
        }
        EventKind::ShootingPickup => {
            pickups::spawn(session, PickupKind::ShootingStar, now, cfg.shooting_visible_ms);
            session
                .notifications
                .push(Notification::Event(Notice::ShootingStar));
        }
    }
}
