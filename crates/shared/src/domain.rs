use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque game account identifier, usually written with a leading `#`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerTag(pub String);

impl PlayerTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Village {
    #[serde(rename = "home")]
    Home,
    #[serde(rename = "builderBase", alias = "builder")]
    Builder,
}

/// Attack difficulty as rated by the advice service. The service fills this
/// in from generated text, so words outside the known scale are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Other(String),
}

impl Difficulty {
    pub fn parse(raw: &str) -> Self {
        let word = raw.trim();
        if word.eq_ignore_ascii_case("easy") {
            Difficulty::Easy
        } else if word.eq_ignore_ascii_case("medium") {
            Difficulty::Medium
        } else if word.eq_ignore_ascii_case("hard") {
            Difficulty::Hard
        } else {
            Difficulty::Other(word.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Other(word) => word,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Difficulty {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Difficulty::parse(&raw))
    }
}

/// What an entry in `available_upgrades` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeKind {
    Troop,
    Hero,
    Spell,
    Building,
}
