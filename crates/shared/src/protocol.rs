use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{Difficulty, PlayerTag, UpgradeKind, Village};

/// Shape shared by heroes, troops and spells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeableUnit {
    pub name: String,
    pub level: u32,
    pub max_level: u32,
    pub village: Village,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeState {
    pub name: String,
    pub current_level: u32,
    pub max_level: u32,
    #[serde(rename = "type")]
    pub kind: UpgradeKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub tag: PlayerTag,
    pub name: String,
    pub town_hall_level: u32,
    pub exp_level: u32,
    pub trophies: u32,
    pub best_trophies: u32,
    pub war_stars: u32,
    pub attack_wins: u32,
    pub defense_wins: u32,
    #[serde(default)]
    pub clan_name: Option<String>,
    #[serde(default)]
    pub clan_tag: Option<String>,
    #[serde(default)]
    pub league: Option<String>,
    pub heroes: Vec<UpgradeableUnit>,
    pub troops: Vec<UpgradeableUnit>,
    pub spells: Vec<UpgradeableUnit>,
    pub available_upgrades: Vec<UpgradeState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradePriority {
    pub item_name: String,
    /// Lower is more urgent.
    pub priority: u32,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackStrategy {
    pub strategy_name: String,
    pub description: String,
    pub recommended_troops: Vec<String>,
    pub recommended_spells: Vec<String>,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAdvice {
    pub upgrade_priorities: Vec<UpgradePriority>,
    pub attack_strategies: Vec<AttackStrategy>,
    pub general_tips: Vec<String>,
    /// Only populated when war focus was requested.
    #[serde(default)]
    pub war_tips: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceRequest {
    pub tag: PlayerTag,
    pub war_focus: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerHistoryItem {
    pub id: i64,
    pub timestamp: NaiveDateTime,
    pub town_hall_level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
