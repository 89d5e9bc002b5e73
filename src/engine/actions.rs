//! Discrete player commands accepted by `Session::apply`.
//!
//! The presentation layer maps its clicks and keys onto these; the engine
//! never sees raw input.

use super::logic::PurchaseAmount;

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    // ── Core ────────────────────────────────────────────────────
    Click,
    BuyUpgrade { id: String, amount: PurchaseAmount },

    // ── Prestige ────────────────────────────────────────────────
    Prestige,
    BuyPrestigeNode { id: String },

    // ── Challenges ──────────────────────────────────────────────
    StartChallenge { id: String },
    AbandonChallenge,

    // ── Pickups and rewards ─────────────────────────────────────
    ClaimPickup { id: u64 },
    ClaimDailyReward,
}

impl Command {
    pub fn buy(id: &str, levels: u32) -> Self {
        Command::BuyUpgrade {
            id: id.to_string(),
            amount: PurchaseAmount::Levels(levels),
        }
    }

    pub fn buy_max(id: &str) -> Self {
        Command::BuyUpgrade {
            id: id.to_string(),
            amount: PurchaseAmount::Max,
        }
    }

    /// Short label for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Click => "click",
            Command::BuyUpgrade { .. } => "buy upgrade",
            Command::Prestige => "prestige",
            Command::BuyPrestigeNode { .. } => "buy prestige node",
            Command::StartChallenge { .. } => "start challenge",
            Command::AbandonChallenge => "abandon challenge",
            Command::ClaimPickup { .. } => "claim pickup",
            Command::ClaimDailyReward => "claim daily reward",
        }
    }
}
