//! Transient clickable pickups: golden sparks on their own timer and
//! shooting stars spawned by random events.

use rand::Rng;

use super::boosts::{BoostCategory, BoostSource};
use super::logic::format_number;
use super::notify::{Notice, Notification};
use super::progression;
use super::state::{Pickup, PickupKind, Session};

/// What a claimed pickup granted.
#[derive(Clone, Debug, PartialEq)]
pub enum PickupEffect {
    ClickFrenzy { multiplier: f64, duration_ms: u64 },
    ProductionFrenzy { multiplier: f64, duration_ms: u64 },
    Lump(f64),
}

impl PickupEffect {
    pub fn detail(&self) -> String {
        match self {
            PickupEffect::ClickFrenzy {
                multiplier,
                duration_ms,
            } => format!("Click frenzy x{:.1} for {}s", multiplier, duration_ms / 1000),
            PickupEffect::ProductionFrenzy {
                multiplier,
                duration_ms,
            } => format!(
                "Production frenzy x{:.1} for {}s",
                multiplier,
                duration_ms / 1000
            ),
            PickupEffect::Lump(amount) => format!("+{} essence", format_number(*amount)),
        }
    }
}

/// Put a pickup on screen. Returns its id.
pub fn spawn(session: &mut Session, kind: PickupKind, now: u64, visible_ms: u64) -> u64 {
    let id = session.next_pickup_id;
    session.next_pickup_id += 1;
    session.pickups.push(Pickup {
        id,
        kind,
        expires_at: now.saturating_add(visible_ms),
    });
    id
}

/// Drop expired pickups and run the golden spawn timer.
pub fn tick_pickups(session: &mut Session, now: u64) {
    session.pickups.retain(|p| now < p.expires_at);

    // Golden sparks only appear once there is some production.
    if session.per_second(now) <= 0.0 {
        return;
    }
    if session.pickups.iter().any(|p| p.kind == PickupKind::Golden) {
        return;
    }

    match session.next_pickup_at {
        None => {
            let delay = spawn_delay(session);
            session.next_pickup_at = Some(now.saturating_add(delay));
        }
        Some(at) if now >= at => {
            let visible = session.config.pickups.visible_ms;
            spawn(session, PickupKind::Golden, now, visible);
            session.next_pickup_at = None;
            session
                .notifications
                .push(Notification::Event(Notice::GoldenPickup));
        }
        Some(_) => {}
    }
}

/// Random delay in the configured window, shortened by frequency bonuses.
fn spawn_delay(session: &mut Session) -> u64 {
    let cfg = &session.config.pickups;
    let (min, max, floor) = (cfg.min_interval_ms, cfg.max_interval_ms, cfg.min_spawn_delay_ms);
    let base = session.rng.gen_range(min..=max);
    let scaled = (base as f64 * session.bonuses.pickup_interval_factor) as u64;
    scaled.max(floor)
}

fn pick_golden_effect(session: &mut Session, now: u64) -> PickupEffect {
    let cfg = &session.config.pickups;
    let potency = session.bonuses.pickup_potency;
    let duration = session.bonuses.pickup_duration_factor;
    let r = session.rng.gen_range(0..100);
    if r < 40 {
        PickupEffect::ProductionFrenzy {
            multiplier: 1.0 + (cfg.production_frenzy_multiplier - 1.0) * potency,
            duration_ms: (cfg.production_frenzy_ms as f64 * duration) as u64,
        }
    } else if r < 70 {
        PickupEffect::ClickFrenzy {
            multiplier: 1.0 + (cfg.click_frenzy_multiplier - 1.0) * potency,
            duration_ms: (cfg.click_frenzy_ms as f64 * duration) as u64,
        }
    } else {
        PickupEffect::Lump(session.per_second(now) * cfg.lump_seconds * potency)
    }
}

/// Claim a visible pickup. Returns true if successful.
pub fn claim_pickup(session: &mut Session, id: u64, now: u64) -> bool {
    let idx = match session
        .pickups
        .iter()
        .position(|p| p.id == id && now < p.expires_at)
    {
        Some(i) => i,
        None => return false,
    };
    let pickup = session.pickups.remove(idx);

    let effect = match pickup.kind {
        PickupKind::Golden => {
            session.stats.golden_picks_clicked += 1;
            pick_golden_effect(session, now)
        }
        PickupKind::ShootingStar => PickupEffect::Lump(
            session.per_second(now)
                * session.config.events.shooting_lump_seconds
                * session.bonuses.event_potency,
        ),
    };

    match effect {
        PickupEffect::ClickFrenzy {
            multiplier,
            duration_ms,
        } => {
            session.boosts.grant(
                BoostCategory::Click,
                multiplier,
                now,
                duration_ms,
                BoostSource::GoldenPickup,
            );
        }
        PickupEffect::ProductionFrenzy {
            multiplier,
            duration_ms,
        } => {
            session.boosts.grant(
                BoostCategory::PerSecond,
                multiplier,
                now,
                duration_ms,
                BoostSource::GoldenPickup,
            );
        }
        PickupEffect::Lump(amount) => session.earn(amount),
    }

    session
        .notifications
        .push(Notification::Event(Notice::PickupClaimed {
            detail: effect.detail(),
        }));
    progression::check_achievements(session, now);
    true
}
