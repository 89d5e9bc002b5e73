//! Save/load for the essence engine.
//!
//! The record is versionless. Every field is optional and parsed on its
//! own: a field with the wrong shape falls back to its default and the rest
//! of the save still loads. Upgrades and prestige nodes are matched by id,
//! so catalog edits never invalidate old saves. Boosts, the active
//! challenge, pickups and surges are transient and never written.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StorageError;
use crate::storage::KeyValueStore;

use super::state::Session;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelSave {
    pub id: String,
    pub level: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsSave {
    pub total_clicks: u64,
    pub total_cycles_earned: f64,
    pub xp: u64,
    pub total_prestiges: u32,
    pub total_prestige_points_ever: f64,
    pub golden_picks_clicked: u32,
    pub lifetime_earned: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveData {
    pub balance: f64,
    pub upgrades: Vec<LevelSave>,
    pub milestone_index: usize,
    pub stats: StatsSave,
    pub unlocked_achievements: Vec<String>,
    pub completed_challenges: Vec<String>,
    pub prestige_points: f64,
    pub prestige_upgrades: Vec<LevelSave>,
    pub login_streak: u32,
    /// ISO `YYYY-MM-DD`.
    pub last_login_date: Option<String>,
}

/// Snapshot the persistent part of a session.
pub fn extract_save(session: &Session) -> SaveData {
    SaveData {
        balance: session.ledger.balance,
        upgrades: session
            .upgrades
            .iter()
            .map(|u| LevelSave {
                id: u.id().to_string(),
                level: u.level,
            })
            .collect(),
        milestone_index: session.milestone_index,
        stats: StatsSave {
            total_clicks: session.stats.total_clicks,
            total_cycles_earned: session.stats.total_cycles_earned,
            xp: session.stats.xp,
            total_prestiges: session.stats.total_prestiges,
            total_prestige_points_ever: session.stats.total_prestige_points_ever,
            golden_picks_clicked: session.stats.golden_picks_clicked,
            lifetime_earned: session.ledger.lifetime_earned,
        },
        unlocked_achievements: session.unlocked_achievements.iter().cloned().collect(),
        completed_challenges: session.completed_challenges.iter().cloned().collect(),
        prestige_points: session.prestige_points,
        prestige_upgrades: session
            .prestige_nodes
            .iter()
            .map(|n| LevelSave {
                id: n.id().to_string(),
                level: n.level,
            })
            .collect(),
        login_streak: session.login_streak,
        last_login_date: session.last_login_date.map(|d| d.to_string()),
    }
}

/// Negative, NaN and infinite amounts load as 0.
fn amount(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

/// Restore a save onto a fresh session, then run the prestige recompute
/// once. Unknown ids are dropped; levels are clamped to their caps.
pub fn apply_save(session: &mut Session, save: &SaveData) {
    session.ledger.balance = amount(save.balance);
    session.ledger.lifetime_earned = amount(save.stats.lifetime_earned);

    session.stats.total_clicks = save.stats.total_clicks;
    session.stats.total_cycles_earned = amount(save.stats.total_cycles_earned);
    session.stats.xp = save.stats.xp;
    session.stats.total_prestiges = save.stats.total_prestiges;
    session.stats.total_prestige_points_ever = amount(save.stats.total_prestige_points_ever);
    session.stats.golden_picks_clicked = save.stats.golden_picks_clicked;
    session.prestige_points = amount(save.prestige_points);

    for entry in &save.prestige_upgrades {
        match session.node_index(&entry.id) {
            Some(i) => {
                let node = &mut session.prestige_nodes[i];
                node.level = entry.level.min(node.level_cap());
            }
            None => log::debug!("dropping unknown prestige node `{}` from save", entry.id),
        }
    }

    // Caps depend on prestige bonuses; recompute clamps these levels.
    for entry in &save.upgrades {
        match session.upgrade_index(&entry.id) {
            Some(i) => session.upgrades[i].level = entry.level,
            None => log::debug!("dropping unknown upgrade `{}` from save", entry.id),
        }
    }

    session.milestone_index = save.milestone_index.min(session.catalog.milestones.len());

    let catalog = session.catalog;
    session.unlocked_achievements = save
        .unlocked_achievements
        .iter()
        .filter(|id| catalog.achievements.iter().any(|a| a.id == id.as_str()))
        .cloned()
        .collect();
    session.completed_challenges = save
        .completed_challenges
        .iter()
        .filter(|id| catalog.challenges.iter().any(|c| c.id == id.as_str()))
        .cloned()
        .collect();

    session.login_streak = save.login_streak;
    session.last_login_date = save
        .last_login_date
        .as_deref()
        .and_then(|s| s.parse::<NaiveDate>().ok());

    session.recompute();
}

// ── Lenient parsing ─────────────────────────────────────────────

fn field<T: DeserializeOwned + Default>(obj: &Map<String, Value>, key: &str) -> T {
    match obj.get(key) {
        None | Some(Value::Null) => T::default(),
        Some(v) => T::deserialize(v).unwrap_or_else(|e| {
            log::warn!("save field `{}` is malformed ({}); using default", key, e);
            T::default()
        }),
    }
}

/// A list field where each malformed entry is skipped on its own.
fn list<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Vec<T> {
    let items = match obj.get(key) {
        Some(Value::Array(items)) => items,
        None | Some(Value::Null) => return Vec::new(),
        Some(_) => {
            log::warn!("save field `{}` is not a list; using default", key);
            return Vec::new();
        }
    };
    items
        .iter()
        .filter_map(|v| match T::deserialize(v) {
            Ok(item) => Some(item),
            Err(e) => {
                log::warn!("skipping malformed entry in `{}` ({})", key, e);
                None
            }
        })
        .collect()
}

fn parse_stats(value: Option<&Value>) -> StatsSave {
    let obj = match value {
        Some(Value::Object(obj)) => obj,
        None | Some(Value::Null) => return StatsSave::default(),
        Some(_) => {
            log::warn!("save field `stats` is not an object; using default");
            return StatsSave::default();
        }
    };
    StatsSave {
        total_clicks: field(obj, "total_clicks"),
        total_cycles_earned: field(obj, "total_cycles_earned"),
        xp: field(obj, "xp"),
        total_prestiges: field(obj, "total_prestiges"),
        total_prestige_points_ever: field(obj, "total_prestige_points_ever"),
        golden_picks_clicked: field(obj, "golden_picks_clicked"),
        lifetime_earned: field(obj, "lifetime_earned"),
    }
}

/// Parse a save record field by field. `None` only when the text is not a
/// JSON object at all.
pub fn parse_save(json: &str) -> Option<SaveData> {
    let root: Value = match serde_json::from_str(json) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("save data is not valid JSON ({}); discarding", e);
            return None;
        }
    };
    let obj = match root {
        Value::Object(obj) => obj,
        _ => {
            log::warn!("save data is not a JSON object; discarding");
            return None;
        }
    };

    Some(SaveData {
        balance: field(&obj, "balance"),
        upgrades: list(&obj, "upgrades"),
        milestone_index: field(&obj, "milestone_index"),
        stats: parse_stats(obj.get("stats")),
        unlocked_achievements: list(&obj, "unlocked_achievements"),
        completed_challenges: list(&obj, "completed_challenges"),
        prestige_points: field(&obj, "prestige_points"),
        prestige_upgrades: list(&obj, "prestige_upgrades"),
        login_streak: field(&obj, "login_streak"),
        last_login_date: field(&obj, "last_login_date"),
    })
}

pub fn to_json(session: &Session) -> Result<String, StorageError> {
    Ok(serde_json::to_string(&extract_save(session))?)
}

/// Write the session under the configured key.
pub fn save_to_store<S: KeyValueStore>(session: &Session, store: &mut S) -> Result<(), StorageError> {
    let json = to_json(session)?;
    store.set(&session.config.storage_key, &json)
}

/// Load the configured key into `session`. `Ok(false)` when there is
/// nothing usable to load; an unreadable record is removed.
pub fn load_from_store<S: KeyValueStore>(
    session: &mut Session,
    store: &mut S,
) -> Result<bool, StorageError> {
    let key = session.config.storage_key.clone();
    let json = match store.get(&key)? {
        Some(j) => j,
        None => return Ok(false),
    };
    match parse_save(&json) {
        Some(save) => {
            apply_save(session, &save);
            Ok(true)
        }
        None => {
            store.remove(&key)?;
            Ok(false)
        }
    }
}
