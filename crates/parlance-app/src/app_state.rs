use std::collections::{HashMap, HashSet};

use parlance_types::player::{Player, PlayerId, PlayerLevel};

/// Radio channels players can pick from.
pub const RADIO_CHANNELS: [&str; 3] = ["LVP Radio", "Jazz", "Classic Rock"];

/// Money every player starts with.
const STARTING_BALANCE: i64 = 1_000;

/// World state the demo commands act on.
pub struct ConsoleState {
    pub roster: Vec<Player>,
    /// Index into `roster` of the player typing commands.
    pub acting: usize,
    pub listening: HashSet<PlayerId>,
    /// `None` means the player disabled the radio.
    pub preferred_channel: HashMap<PlayerId, Option<&'static str>>,
    pub balances: HashMap<PlayerId, i64>,
    /// Messages delivered to players other than the acting one.
    pub inbox: Vec<(PlayerId, String)>,
}

impl ConsoleState {
    pub fn new(mut roster: Vec<Player>) -> Self {
        if roster.is_empty() {
            roster = vec![
                Player::new(0, "Gunther").with_level(PlayerLevel::Management),
                Player::new(1, "Russell"),
                Player::new(2, "Lucy").with_level(PlayerLevel::Administrator),
            ];
        }
        let balances = roster.iter().map(|p| (p.id, STARTING_BALANCE)).collect();
        Self {
            roster,
            acting: 0,
            listening: HashSet::new(),
            preferred_channel: HashMap::new(),
            balances,
            inbox: Vec::new(),
        }
    }

    pub fn acting_player(&self) -> &Player {
        &self.roster[self.acting]
    }

    pub fn channel_for(&self, player: &Player) -> Option<&'static str> {
        self.preferred_channel
            .get(&player.id)
            .copied()
            .unwrap_or(Some(RADIO_CHANNELS[0]))
    }

    pub fn balance(&self, player: &Player) -> i64 {
        self.balances.get(&player.id).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_roster_is_seeded() {
        let state = ConsoleState::new(Vec::new());
        assert_eq!(state.roster.len(), 3);
        assert_eq!(state.acting_player().name, "Gunther");
        assert_eq!(state.balance(&state.roster[1]), STARTING_BALANCE);
    }

    #[test]
    fn default_channel_until_changed() {
        let mut state = ConsoleState::new(Vec::new());
        let russell = state.roster[1].clone();
        assert_eq!(state.channel_for(&russell), Some("LVP Radio"));
        state.preferred_channel.insert(russell.id, None);
        assert_eq!(state.channel_for(&russell), None);
    }
}
