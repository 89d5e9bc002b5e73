//! Milestones, achievements and timed challenges.

use super::boosts::BoostSource;
use super::notify::Notification;
use super::state::{
    AchievementCondition, ActiveChallenge, ChallengeObjective, ChallengeOutcome, ChallengeReward,
    Session,
};

// ── Milestones ──────────────────────────────────────────────────

/// Unlock the current milestone if its xp threshold is reached. Only one
/// milestone advances per call; none advance while a challenge runs.
pub fn check_milestone(session: &mut Session, now: u64) -> bool {
    if session.active_challenge.is_some() {
        return false;
    }
    let milestones = session.catalog.milestones;
    let def = match milestones.get(session.milestone_index) {
        Some(d) => d,
        None => return false,
    };
    if session.stats.xp < def.xp_threshold {
        return false;
    }

    session.boosts.grant(
        def.category,
        def.multiplier,
        now,
        def.duration_ms,
        BoostSource::Milestone,
    );
    session.milestone_index += 1;
    session.notifications.push(Notification::Milestone {
        name: def.name,
        category: def.category,
        multiplier: def.multiplier,
    });
    true
}

// ── Achievements ────────────────────────────────────────────────

fn condition_met(session: &Session, condition: &AchievementCondition, now: u64) -> bool {
    match *condition {
        AchievementCondition::TotalClicks(n) => session.stats.total_clicks >= n,
        AchievementCondition::LifetimeEarned(v) => session.ledger.lifetime_earned >= v,
        AchievementCondition::PerSecondReached(v) => session.per_second(now) >= v,
        AchievementCondition::UpgradeLevel { upgrade, level } => {
            session.upgrade(upgrade).is_some_and(|u| u.level >= level)
        }
        AchievementCondition::TotalUpgradeLevels(n) => session.total_levels() >= n,
        AchievementCondition::Prestiges(n) => session.stats.total_prestiges >= n,
        AchievementCondition::GoldenPicks(n) => session.stats.golden_picks_clicked >= n,
        AchievementCondition::ChallengesCompleted(n) => session.completed_challenges.len() >= n,
        AchievementCondition::PrestigeNodesOwned(n) => {
            session.prestige_nodes.iter().filter(|p| p.level > 0).count() >= n
        }
    }
}

/// Unlock every achievement whose condition now holds. Returns how many
/// were newly unlocked.
pub fn check_achievements(session: &mut Session, now: u64) -> usize {
    let achievements = session.catalog.achievements;
    let newly: Vec<_> = achievements
        .iter()
        .filter(|a| !session.unlocked_achievements.contains(a.id))
        .filter(|a| condition_met(session, &a.condition, now))
        .collect();

    for def in &newly {
        session.unlocked_achievements.insert(def.id.to_string());
        session.notifications.push(Notification::Achievement {
            id: def.id,
            name: def.name,
        });
        log::info!("achievement unlocked: {}", def.id);
    }
    newly.len()
}

// ── Challenges ──────────────────────────────────────────────────

/// Current value of the quantity an objective tracks.
pub fn tracked_value(session: &Session, objective: &ChallengeObjective) -> f64 {
    match objective {
        ChallengeObjective::EarnEssence(_) => session.ledger.lifetime_earned,
        ChallengeObjective::ClickCount(_) => session.stats.total_clicks as f64,
        ChallengeObjective::UpgradeLevels(_) => session.total_levels() as f64,
    }
}

/// Progress of the active challenge toward its objective.
pub fn challenge_progress(session: &Session) -> Option<f64> {
    let active = session.active_challenge.as_ref()?;
    Some(tracked_value(session, &active.def.objective) - active.baseline)
}

/// Start a challenge. Rejected while another runs, for an unknown id, or
/// for one already completed.
pub fn start_challenge(session: &mut Session, id: &str, now: u64) -> bool {
    if session.active_challenge.is_some() || session.is_challenge_completed(id) {
        return false;
    }
    let challenges = session.catalog.challenges;
    let def = match challenges.iter().find(|c| c.id == id) {
        Some(d) => d,
        None => return false,
    };
    let baseline = tracked_value(session, &def.objective);
    session.active_challenge = Some(ActiveChallenge {
        def,
        started_at: now,
        baseline,
    });
    log::info!("challenge started: {}", id);
    true
}

/// Drop the active challenge without reward.
pub fn abandon_challenge(session: &mut Session) -> bool {
    let active = match session.active_challenge.take() {
        Some(a) => a,
        None => return false,
    };
    session.notifications.push(Notification::Challenge {
        id: active.def.id,
        name: active.def.name,
        outcome: ChallengeOutcome::Abandoned,
    });
    log::info!("challenge abandoned: {}", active.def.id);
    true
}

/// Resolve the active challenge if its objective is met or its time is up.
/// The objective is checked first, so meeting it on the final millisecond
/// still counts.
pub fn evaluate_challenge(session: &mut Session, now: u64) -> Option<ChallengeOutcome> {
    let active = session.active_challenge.as_ref()?;
    let def = active.def;
    let progress = tracked_value(session, &def.objective) - active.baseline;
    let elapsed = now.saturating_sub(active.started_at);

    let outcome = if progress >= def.objective.target() {
        ChallengeOutcome::Completed
    } else if elapsed >= def.duration_ms {
        ChallengeOutcome::Failed
    } else {
        return None;
    };

    session.active_challenge = None;
    if outcome == ChallengeOutcome::Completed && session.completed_challenges.insert(def.id.to_string())
    {
        grant_reward(session, &def.reward, now);
    }
    session.notifications.push(Notification::Challenge {
        id: def.id,
        name: def.name,
        outcome,
    });
    log::info!("challenge {}: {:?}", def.id, outcome);
    check_achievements(session, now);
    Some(outcome)
}

fn grant_reward(session: &mut Session, reward: &ChallengeReward, now: u64) {
    match *reward {
        ChallengeReward::PrestigePoints(p) => {
            session.prestige_points += p;
            session.stats.total_prestige_points_ever += p;
        }
        ChallengeReward::Essence(v) => session.earn(v),
        ChallengeReward::Boost {
            category,
            multiplier,
            duration_ms,
        } => {
            session
                .boosts
                .grant(category, multiplier, now, duration_ms, BoostSource::Challenge);
        }
    }
}
