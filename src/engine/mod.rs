//! Essence engine: the economy core of an idle clicker.
//!
//! All state lives in one owned `Session`. The host drives it with
//! `tick` from a fixed-timestep clock and with discrete `Command`s, and
//! drains `Notification`s one at a time for display.

pub mod actions;
pub mod boosts;
pub mod catalog;
pub mod cost;
pub mod events;
pub mod logic;
pub mod notify;
pub mod pickups;
pub mod prestige;
pub mod progression;
pub mod save;
pub mod state;

mod simulator;

pub use actions::Command;
pub use catalog::Catalog;
pub use logic::PurchaseAmount;
pub use notify::Notification;
pub use state::Session;

impl Session {
    /// Apply one player command at `now`. Returns false when the command was
    /// rejected; a rejected command changes nothing.
    pub fn apply(&mut self, command: &Command, now: u64) -> bool {
        let accepted = match command {
            Command::Click => {
                logic::click(self, now);
                true
            }
            Command::BuyUpgrade { id, amount } => logic::buy_upgrade(self, id, *amount, now),
            Command::Prestige => logic::perform_prestige(self, now) > 0.0,
            Command::BuyPrestigeNode { id } => prestige::buy_node(self, id, now),
            Command::StartChallenge { id } => progression::start_challenge(self, id, now),
            Command::AbandonChallenge => progression::abandon_challenge(self),
            Command::ClaimPickup { id } => pickups::claim_pickup(self, *id, now),
            Command::ClaimDailyReward => logic::claim_daily_reward(self, now),
        };
        if !accepted {
            log::debug!("rejected command: {}", command.name());
        }
        accepted
    }

    /// Advance by `delta_ticks` fixed ticks ending at `now`.
    pub fn tick(&mut self, delta_ticks: u32, now: u64) {
        logic::tick(self, delta_ticks, now);
    }

    /// Next queued notification, oldest first.
    pub fn next_notification(&mut self) -> Option<Notification> {
        self.notifications.pop_next()
    }

    /// Indices of prestige nodes worth showing.
    pub fn visible_prestige_nodes(&self) -> Vec<usize> {
        prestige::visible_nodes(&self.prestige_nodes)
    }

    pub fn prestige_node_status(&self, idx: usize) -> Option<state::NodeStatus> {
        (idx < self.prestige_nodes.len()).then(|| prestige::status(&self.prestige_nodes, idx))
    }
}
