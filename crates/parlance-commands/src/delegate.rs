//! Capability interfaces the embedding application supplies to the executor.

use parlance_types::player::Player;

use crate::description::CommandDescription;
use crate::parameter::CommandParameter;

/// Answers environment questions while arguments are being bound.
///
/// Every method has a safe fallback, so implementations only override what
/// they need.
pub trait CommandContextDelegate {
    /// Resolve `token` to a connected player on behalf of `invoker`.
    fn resolve_player(&self, _invoker: &Player, _token: &str) -> Option<Player> {
        None
    }

    /// Whether `token` is acceptable for the text `parameter`.
    fn validate_text(
        &self,
        _invoker: &Player,
        _parameter: &CommandParameter,
        _token: &str,
    ) -> bool {
        true
    }
}

/// Context delegate with only the fallback behaviour.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultContextDelegate;

impl CommandContextDelegate for DefaultContextDelegate {}

/// Decides whether a player may execute a resolved command.
pub trait CommandPermissionDelegate {
    /// Called once per invocation, after the command and its arguments have
    /// been resolved and before the handler runs.
    fn can_execute_command(
        &self,
        player: &Player,
        _context: &dyn CommandContextDelegate,
        command: &CommandDescription,
    ) -> bool {
        player.has_level(command.restrict_level())
    }
}

/// Permission delegate that only enforces restrict levels.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPermissionDelegate;

impl CommandPermissionDelegate for DefaultPermissionDelegate {}

/// Find the player `token` refers to.
///
/// Tries, in order: a numeric player id, an exact name, and finally a name
/// containing `token`. Names compare case-insensitively. A partial match only
/// counts when it is unique.
pub fn find_player<'a>(players: &'a [Player], token: &str) -> Option<&'a Player> {
    if let Ok(id) = token.parse::<u32>()
        && let Some(player) = players.iter().find(|p| p.id == id)
    {
        return Some(player);
    }

    if let Some(player) = players.iter().find(|p| p.name.eq_ignore_ascii_case(token)) {
        return Some(player);
    }

    let needle = token.to_ascii_lowercase();
    let mut matches = players
        .iter()
        .filter(|p| p.name.to_ascii_lowercase().contains(&needle));
    match (matches.next(), matches.next()) {
        (Some(player), None) => Some(player),
        _ => None,
    }
}
