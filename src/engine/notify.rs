//! Bounded queue of player-facing notices, drained one at a time by the
//! presentation layer.

use std::collections::VecDeque;

use super::boosts::BoostCategory;
use super::state::ChallengeOutcome;

/// Oldest entries are dropped past this length.
pub const QUEUE_CAP: usize = 50;

#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    EssenceFrenzy { multiplier: f64, duration_ms: u64 },
    UpgradeSurge { upgrade: &'static str, fraction: f64 },
    ShootingStar,
    GoldenPickup,
    PickupClaimed { detail: String },
    DailyReward { streak: u32, multiplier: f64 },
    Prestige { points: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Notification {
    Milestone {
        name: &'static str,
        category: BoostCategory,
        multiplier: f64,
    },
    Achievement {
        id: &'static str,
        name: &'static str,
    },
    Challenge {
        id: &'static str,
        name: &'static str,
        outcome: ChallengeOutcome,
    },
    Event(Notice),
}

impl Notification {
    /// One-line text for a toast or log line.
    pub fn message(&self) -> String {
        match self {
            Notification::Milestone {
                name,
                category,
                multiplier,
            } => format!("Milestone: {} ({} x{})", name, category.name(), multiplier),
            Notification::Achievement { name, .. } => format!("Achievement unlocked: {}", name),
            Notification::Challenge { name, outcome, .. } => match outcome {
                ChallengeOutcome::Completed => format!("Challenge complete: {}", name),
                ChallengeOutcome::Failed => format!("Challenge failed: {}", name),
                ChallengeOutcome::Abandoned => format!("Challenge abandoned: {}", name),
            },
            Notification::Event(notice) => match notice {
                Notice::EssenceFrenzy {
                    multiplier,
                    duration_ms,
                } => format!(
                    "Essence frenzy! Production x{} for {}s",
                    multiplier,
                    duration_ms / 1000
                ),
                Notice::UpgradeSurge { upgrade, fraction } => {
                    format!("Surge: {} is {:.0}% off", upgrade, fraction * 100.0)
                }
                Notice::ShootingStar => "A shooting star streaks past!".to_string(),
                Notice::GoldenPickup => "A golden spark appeared!".to_string(),
                Notice::PickupClaimed { detail } => detail.clone(),
                Notice::DailyReward { streak, multiplier } => format!(
                    "Daily reward: day {} streak, production x{:.2}",
                    streak, multiplier
                ),
                Notice::Prestige { points } => format!("Prestige! +{} points", points),
            },
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct NotificationQueue {
    items: VecDeque<Notification>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notification: Notification) {
        if self.items.len() >= QUEUE_CAP {
            self.items.pop_front();
        }
        self.items.push_back(notification);
    }

    pub fn pop_next(&mut self) -> Option<Notification> {
        self.items.pop_front()
    }

    pub fn peek(&self) -> Option<&Notification> {
        self.items.front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn achievement(id: &'static str) -> Notification {
        Notification::Achievement { id, name: id }
    }

    #[test]
    fn fifo_order() {
        let mut q = NotificationQueue::new();
        q.push(achievement("a"));
        q.push(achievement("b"));
        assert_eq!(q.pop_next(), Some(achievement("a")));
        assert_eq!(q.pop_next(), Some(achievement("b")));
        assert_eq!(q.pop_next(), None);
    }

    #[test]
    fn oldest_dropped_past_cap() {
        let mut q = NotificationQueue::new();
        q.push(achievement("first"));
        for _ in 0..QUEUE_CAP {
            q.push(achievement("filler"));
        }
        assert_eq!(q.len(), QUEUE_CAP);
        assert_eq!(q.peek(), Some(&achievement("filler")));
    }

    #[test]
    fn messages_are_readable() {
        let n = Notification::Challenge {
            id: "sprint",
            name: "Essence Sprint",
            outcome: ChallengeOutcome::Failed,
        };
        assert_eq!(n.message(), "Challenge failed: Essence Sprint");
        let e = Notification::Event(Notice::UpgradeSurge {
            upgrade: "Drip",
            fraction: 0.25,
        });
        assert_eq!(e.message(), "Surge: Drip is 25% off");
    }
}
