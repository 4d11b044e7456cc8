//! Structural checks applied to every decoded snapshot before it is handed to
//! the controller. Typing alone cannot express these.

use std::collections::HashSet;

use shared::{
    domain::Village,
    protocol::{PlayerSnapshot, UpgradeableUnit},
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("player tag is empty")]
    EmptyTag,
    #[error("town hall level must be at least 1, got {0}")]
    TownHallLevel(u32),
    #[error("trophies ({trophies}) exceed best trophies ({best_trophies})")]
    TrophiesAboveBest { trophies: u32, best_trophies: u32 },
    #[error("clan name and clan tag must both be present or both be absent")]
    PartialClan,
    #[error("{collection} '{name}' has level {level} above max level {max_level}")]
    LevelAboveMax {
        collection: &'static str,
        name: String,
        level: u32,
        max_level: u32,
    },
    #[error("{collection} '{name}' appears more than once in the {village:?} village")]
    DuplicateUnit {
        collection: &'static str,
        name: String,
        village: Village,
    },
}

pub fn validate_snapshot(snapshot: &PlayerSnapshot) -> Result<(), SchemaViolation> {
    if snapshot.tag.as_str().trim().is_empty() {
        return Err(SchemaViolation::EmptyTag);
    }
    if snapshot.town_hall_level < 1 {
        return Err(SchemaViolation::TownHallLevel(snapshot.town_hall_level));
    }
    if snapshot.trophies > snapshot.best_trophies {
        return Err(SchemaViolation::TrophiesAboveBest {
            trophies: snapshot.trophies,
            best_trophies: snapshot.best_trophies,
        });
    }
    if snapshot.clan_name.is_some() != snapshot.clan_tag.is_some() {
        return Err(SchemaViolation::PartialClan);
    }

    validate_units("hero", &snapshot.heroes)?;
    validate_units("troop", &snapshot.troops)?;
    validate_units("spell", &snapshot.spells)?;

    for upgrade in &snapshot.available_upgrades {
        if upgrade.current_level > upgrade.max_level {
            return Err(SchemaViolation::LevelAboveMax {
                collection: "upgrade",
                name: upgrade.name.clone(),
                level: upgrade.current_level,
                max_level: upgrade.max_level,
            });
        }
    }

    Ok(())
}

fn validate_units(
    collection: &'static str,
    units: &[UpgradeableUnit],
) -> Result<(), SchemaViolation> {
    let mut seen = HashSet::with_capacity(units.len());
    for unit in units {
        if unit.level > unit.max_level {
            return Err(SchemaViolation::LevelAboveMax {
                collection,
                name: unit.name.clone(),
                level: unit.level,
                max_level: unit.max_level,
            });
        }
        // The same name legitimately exists once per village.
        if !seen.insert((unit.village, unit.name.as_str())) {
            return Err(SchemaViolation::DuplicateUnit {
                collection,
                name: unit.name.clone(),
                village: unit.village,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/schema_tests.rs"]
mod tests;
