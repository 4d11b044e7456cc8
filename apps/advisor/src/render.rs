//! Plain-text rendering of whatever the controller publishes.

use std::fmt;

use shared::{
    domain::Village,
    protocol::{PlayerAdvice, PlayerHistoryItem, PlayerSnapshot, UpgradeableUnit},
};

pub struct PlayerView<'a>(pub &'a PlayerSnapshot);

pub struct AdviceView<'a>(pub &'a PlayerAdvice);

pub struct HistoryView<'a>(pub &'a [PlayerHistoryItem]);

impl fmt::Display for PlayerView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.0;
        writeln!(f, "{} ({})", p.name, p.tag)?;
        writeln!(f, "  Town Hall {}  |  XP level {}", p.town_hall_level, p.exp_level)?;
        writeln!(f, "  Trophies {} (best {})", p.trophies, p.best_trophies)?;
        writeln!(
            f,
            "  War stars {}  |  Attacks won {}  |  Defenses won {}",
            p.war_stars, p.attack_wins, p.defense_wins
        )?;
        match (&p.clan_name, &p.clan_tag) {
            (Some(name), Some(tag)) => writeln!(f, "  Clan {name} ({tag})")?,
            _ => writeln!(f, "  No clan")?,
        }
        writeln!(f, "  League {}", p.league.as_deref().unwrap_or("unranked"))?;

        write_units(f, "Heroes", &p.heroes)?;
        write_units(f, "Troops", &p.troops)?;
        write_units(f, "Spells", &p.spells)?;

        if !p.available_upgrades.is_empty() {
            writeln!(f, "Available upgrades")?;
            for upgrade in &p.available_upgrades {
                writeln!(
                    f,
                    "  {} {}/{} ({:?})",
                    upgrade.name, upgrade.current_level, upgrade.max_level, upgrade.kind
                )?;
            }
        }
        Ok(())
    }
}

fn write_units(f: &mut fmt::Formatter<'_>, title: &str, units: &[UpgradeableUnit]) -> fmt::Result {
    if units.is_empty() {
        return Ok(());
    }
    writeln!(f, "{title}")?;
    for unit in units {
        let village = match unit.village {
            Village::Home => "home",
            Village::Builder => "builder",
        };
        let marker = if unit.level >= unit.max_level { " max" } else { "" };
        writeln!(
            f,
            "  {} {}/{} [{village}]{marker}",
            unit.name, unit.level, unit.max_level
        )?;
    }
    Ok(())
}

impl fmt::Display for AdviceView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = self.0;
        if !a.upgrade_priorities.is_empty() {
            writeln!(f, "Upgrades to prioritize")?;
            for item in &a.upgrade_priorities {
                writeln!(f, "  [priority {}] {}: {}", item.priority, item.item_name, item.reason)?;
            }
        }
        if !a.attack_strategies.is_empty() {
            writeln!(f, "Attack strategies")?;
            for strategy in &a.attack_strategies {
                writeln!(f, "  {} ({})", strategy.strategy_name, strategy.difficulty)?;
                writeln!(f, "    {}", strategy.description)?;
                if !strategy.recommended_troops.is_empty() {
                    writeln!(f, "    Troops: {}", strategy.recommended_troops.join(", "))?;
                }
                if !strategy.recommended_spells.is_empty() {
                    writeln!(f, "    Spells: {}", strategy.recommended_spells.join(", "))?;
                }
            }
        }
        write_tips(f, "General tips", &a.general_tips)?;
        if let Some(war_tips) = &a.war_tips {
            write_tips(f, "War tips", war_tips)?;
        }
        Ok(())
    }
}

fn write_tips(f: &mut fmt::Formatter<'_>, title: &str, tips: &[String]) -> fmt::Result {
    if tips.is_empty() {
        return Ok(());
    }
    writeln!(f, "{title}")?;
    for tip in tips {
        writeln!(f, "  - {tip}")?;
    }
    Ok(())
}

impl fmt::Display for HistoryView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No stored snapshots");
        }
        for item in self.0 {
            writeln!(
                f,
                "#{:<5} {}  Town Hall {}",
                item.id,
                item.timestamp.format("%Y-%m-%d %H:%M:%S"),
                item.town_hall_level
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use shared::{
        domain::{Difficulty, PlayerTag},
        protocol::AttackStrategy,
    };

    use super::*;

    #[test]
    fn player_view_marks_maxed_units_and_missing_clan() {
        let snapshot = PlayerSnapshot {
            tag: PlayerTag::new("#ABC123"),
            name: "Ash".into(),
            town_hall_level: 10,
            exp_level: 120,
            trophies: 3000,
            best_trophies: 3200,
            war_stars: 450,
            attack_wins: 80,
            defense_wins: 5,
            clan_name: None,
            clan_tag: None,
            league: None,
            heroes: vec![UpgradeableUnit {
                name: "Battle Machine".into(),
                level: 30,
                max_level: 30,
                village: Village::Builder,
            }],
            troops: Vec::new(),
            spells: Vec::new(),
            available_upgrades: Vec::new(),
        };

        let text = PlayerView(&snapshot).to_string();
        assert!(text.starts_with("Ash (#ABC123)\n"));
        assert!(text.contains("  No clan\n"));
        assert!(text.contains("  League unranked\n"));
        assert!(text.contains("  Battle Machine 30/30 [builder] max\n"));
        assert!(!text.contains("Available upgrades"));
    }

    #[test]
    fn advice_view_lists_war_tips_only_when_present() {
        let mut advice = PlayerAdvice {
            upgrade_priorities: Vec::new(),
            attack_strategies: Vec::new(),
            general_tips: vec!["Keep builders busy".into()],
            war_tips: None,
        };
        assert!(!AdviceView(&advice).to_string().contains("War tips"));

        advice.war_tips = Some(vec!["Deploy first".into()]);
        let text = AdviceView(&advice).to_string();
        assert!(text.contains("War tips\n  - Deploy first\n"));
    }

    #[test]
    fn advice_view_prints_unrecognized_difficulty_verbatim() {
        let advice = PlayerAdvice {
            upgrade_priorities: Vec::new(),
            attack_strategies: vec![AttackStrategy {
                strategy_name: "Queen Walk".into(),
                description: "Walk the queen around the edge".into(),
                recommended_troops: vec!["Healer".into()],
                recommended_spells: Vec::new(),
                difficulty: Difficulty::Other("Medium-Hard".into()),
            }],
            general_tips: Vec::new(),
            war_tips: None,
        };

        let text = AdviceView(&advice).to_string();
        assert!(text.contains("  Queen Walk (Medium-Hard)\n"));
        assert!(text.contains("    Troops: Healer\n"));
    }
}
