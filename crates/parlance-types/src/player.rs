//! The player handle commands are executed on behalf of.

use std::fmt;

use serde::Deserialize;

/// Numeric identifier the server assigned to a connected player.
pub type PlayerId = u32;

/// Privilege level of a player. Levels are ordered: a player at a given level
/// holds every privilege of the levels below it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerLevel {
    #[default]
    Player,
    Administrator,
    Management,
}

impl fmt::Display for PlayerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Player => "player",
            Self::Administrator => "administrator",
            Self::Management => "management",
        };
        f.write_str(name)
    }
}

/// A connected player, as seen by the command engine.
///
/// The embedding application owns the real player objects; this is the
/// lightweight handle passed to delegates and handlers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub level: PlayerLevel,
}

impl Player {
    /// Create a player at the default (lowest) level.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            level: PlayerLevel::default(),
        }
    }

    /// Return this player with the given privilege level.
    pub fn with_level(mut self, level: PlayerLevel) -> Self {
        self.level = level;
        self
    }

    /// Whether the player holds at least `level`.
    pub fn has_level(&self, level: PlayerLevel) -> bool {
        self.level >= level
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Id: {})", self.name, self.id)
    }
}
