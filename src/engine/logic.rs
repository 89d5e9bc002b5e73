//! Essence engine logic: pure functions over `Session`, fully testable.

use chrono::{DateTime, NaiveDate, Utc};

use super::boosts::{BoostCategory, BoostSource};
use super::cost;
use super::events;
use super::notify::{Notice, Notification};
use super::pickups;
use super::progression;
use super::state::Session;

/// How many levels a purchase asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PurchaseAmount {
    /// Exactly this many levels, or nothing.
    Levels(u32),
    /// As many levels as the balance covers.
    Max,
}

/// Advance the session by `delta_ticks` ticks ending at `now`.
pub fn tick(session: &mut Session, delta_ticks: u32, now: u64) {
    if delta_ticks == 0 {
        return;
    }
    // Accrual uses the rate as it stood when the batch began.
    let elapsed_ms = (delta_ticks as f64 * session.config.ms_per_tick()) as u64;
    let rate = session.per_second(now.saturating_sub(elapsed_ms));
    let seconds = delta_ticks as f64 / session.config.tick_rate_hz as f64;
    session.earn(rate * seconds);
    session.total_ticks += delta_ticks as u64;

    expire_surges(session, now);
    session.boosts.sweep(now, session.config.sweep_interval_ms);

    progression::evaluate_challenge(session, now);
    progression::check_milestone(session, now);
    progression::check_achievements(session, now);

    pickups::tick_pickups(session, now);
    events::tick_events(session, now);
}

fn expire_surges(session: &mut Session, now: u64) {
    for u in &mut session.upgrades {
        if matches!(u.surge, Some(s) if now >= s.expires_at) {
            u.surge = None;
        }
    }
}

/// Manual click. Returns the essence it produced.
pub fn click(session: &mut Session, now: u64) -> f64 {
    let power = session.per_click(now);
    session.earn(power);
    session.stats.total_clicks += 1;
    session.stats.xp += session.config.xp_per_click;

    progression::evaluate_challenge(session, now);
    progression::check_milestone(session, now);
    progression::check_achievements(session, now);
    power
}

/// Cost of the next `n` levels of `id` at `now`, clamped to the cap.
pub fn quote_cost(session: &Session, id: &str, n: u32, now: u64) -> Option<f64> {
    let u = session.upgrade(id)?;
    Some(cost::bulk_cost(u.def, u.level, u.max_level, n, u.discount(now)))
}

/// Levels of `id` the current balance covers.
pub fn affordable_levels(session: &Session, id: &str, now: u64) -> u32 {
    session.upgrade(id).map_or(0, |u| {
        cost::max_affordable(
            u.def,
            u.level,
            u.max_level,
            session.ledger.balance,
            u.discount(now),
        )
    })
}

/// Buy levels of an upgrade. Returns true if successful; on false nothing
/// changed.
pub fn buy_upgrade(session: &mut Session, id: &str, amount: PurchaseAmount, now: u64) -> bool {
    let idx = match session.upgrade_index(id) {
        Some(i) => i,
        None => return false,
    };
    if !session.is_tier_unlocked(session.upgrades[idx].def.tier) {
        return false;
    }

    let u = &session.upgrades[idx];
    let discount = u.discount(now);
    let n = match amount {
        PurchaseAmount::Levels(n) => {
            let past_cap = u.level.checked_add(n).map_or(true, |t| t > u.max_level);
            if n == 0 || past_cap {
                return false;
            }
            n
        }
        PurchaseAmount::Max => {
            cost::max_affordable(u.def, u.level, u.max_level, session.ledger.balance, discount)
        }
    };
    if n == 0 {
        return false;
    }
    let total = cost::bulk_cost(u.def, u.level, u.max_level, n, discount);
    if total > session.ledger.balance {
        return false;
    }

    session.ledger.balance -= total;
    session.upgrades[idx].level += n;
    log::debug!(
        "bought {} x{} for {} (level {})",
        id,
        n,
        total,
        session.upgrades[idx].level
    );

    progression::evaluate_challenge(session, now);
    progression::check_achievements(session, now);
    true
}

/// Prestige reset. Returns the prestige points earned, 0 when the run has
/// not earned a full point yet (nothing changes in that case).
pub fn perform_prestige(session: &mut Session, now: u64) -> f64 {
    let points = session.pending_prestige_points();
    if points < 1.0 {
        return 0.0;
    }
    let progress = progression::challenge_progress(session);

    session.prestige_points += points;
    session.stats.total_prestiges += 1;
    session.stats.total_prestige_points_ever += points;

    for u in &mut session.upgrades {
        u.level = 0;
        u.surge = None;
    }
    session.stats.total_clicks = 0;
    session.stats.total_cycles_earned = 0.0;
    session.stats.xp = 0;
    session.milestone_index = 0;
    session.boosts.clear();
    session.pickups.clear();
    session.next_pickup_at = None;

    session.recompute();
    session.ledger.balance = session.bonuses.starting_cycles;

    // Keep the running challenge's progress across the counter reset.
    if let Some(progress) = progress {
        if let Some(objective) = session.active_challenge.as_ref().map(|a| a.def.objective) {
            let current = progression::tracked_value(session, &objective);
            if let Some(active) = session.active_challenge.as_mut() {
                active.baseline = current - progress;
            }
        }
    }

    session
        .notifications
        .push(Notification::Event(Notice::Prestige { points }));
    log::info!(
        "prestige #{}: +{} points ({} unspent)",
        session.stats.total_prestiges,
        points,
        session.prestige_points
    );
    progression::check_achievements(session, now);
    points
}

/// UTC calendar date of a millisecond timestamp.
pub fn utc_date(now_ms: u64) -> Option<NaiveDate> {
    let secs = i64::try_from(now_ms / 1000).ok()?;
    DateTime::<Utc>::from_timestamp(secs, 0).map(|dt| dt.date_naive())
}

/// Claim today's login reward. Returns true if successful.
pub fn claim_daily_reward(session: &mut Session, now: u64) -> bool {
    let today = match utc_date(now) {
        Some(d) => d,
        None => return false,
    };
    if session.last_login_date == Some(today) {
        return false;
    }
    let streak = match session.last_login_date {
        Some(last) if last.succ_opt() == Some(today) => session.login_streak + 1,
        _ => 1,
    };
    session.login_streak = streak;
    session.last_login_date = Some(today);

    let cfg = &session.config.daily;
    let multiplier = 1.0 + cfg.step * streak.min(cfg.streak_cap) as f64;
    let duration = cfg.duration_ms;
    session.boosts.grant(
        BoostCategory::PerSecond,
        multiplier,
        now,
        duration,
        BoostSource::DailyReward,
    );
    session
        .notifications
        .push(Notification::Event(Notice::DailyReward { streak, multiplier }));
    true
}

/// Format a number for display: commas below a million (12345 → "12,345"),
/// short-scale suffixes from there up (1.5e6 → "1.50M").
pub fn format_number(n: f64) -> String {
    if n < 0.0 {
        return format!("-{}", format_number(-n));
    }
    const SUFFIXES: [(f64, &str); 5] = [
        (1e18, "Qi"),
        (1e15, "Qa"),
        (1e12, "T"),
        (1e9, "B"),
        (1e6, "M"),
    ];
    // Pick the suffix from the value as it will print, so 999,999.96 reads
    // 1.00M and 999.996M reads 1.00B.
    let n_rounded = (n * 10.0).round() / 10.0;
    if let Some(i) = SUFFIXES.iter().position(|(scale, _)| n_rounded >= *scale) {
        let i = if i > 0 && (n / SUFFIXES[i].0 * 100.0).round() >= 100_000.0 {
            i - 1
        } else {
            i
        };
        let (scale, suffix) = SUFFIXES[i];
        return format!("{:.2}{}", n / scale, suffix);
    }

    let n = n_rounded;
    let int_part = n.floor() as u64;
    let frac = n - int_part as f64;

    let s = int_part.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    let result: String = result.chars().rev().collect();

    if frac > 0.05 {
        format!("{}.{}", result, (frac * 10.0).round() as u8)
    } else {
        result
    }
}
