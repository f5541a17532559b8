//! Registry of top-level commands, keyed by prefix and name.

use std::collections::HashMap;
use std::rc::Rc;

use parlance_types::config::DuplicatePolicy;

use crate::binding::split_first_token;
use crate::description::CommandDescription;
use crate::error::ConfigurationError;

/// Live top-level commands. Names are case-insensitive; prefixes are not.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: HashMap<(String, String), Rc<CommandDescription>>,
    policy: DuplicatePolicy,
}

fn registry_key(prefix: &str, name: &str) -> (String, String) {
    (prefix.to_string(), name.to_ascii_lowercase())
}

impl CommandRegistry {
    /// Create an empty registry applying `policy` to duplicate registrations.
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            commands: HashMap::new(),
            policy,
        }
    }

    /// Policy applied by `register` when a key is taken.
    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Register a command under its prefix and name, applying the
    /// duplicate policy if that key is taken.
    pub fn register(&mut self, command: CommandDescription) -> Result<(), ConfigurationError> {
        let key = registry_key(command.prefix(), command.name());
        if self.policy == DuplicatePolicy::Reject && self.commands.contains_key(&key) {
            log::warn!("Refusing to register {}{} twice", key.0, command.name());
            return Err(ConfigurationError::DuplicateCommand(format!(
                "{}{}",
                key.0,
                command.name()
            )));
        }
        self.replace(command);
        Ok(())
    }

    /// Register a command, superseding any command with the same key.
    /// Returns the superseded command.
    pub fn replace(&mut self, command: CommandDescription) -> Option<Rc<CommandDescription>> {
        let key = registry_key(command.prefix(), command.name());
        let usage = command.usage();
        let previous = self.commands.insert(key, Rc::new(command));
        if previous.is_some() {
            log::info!("Replaced command {usage}");
        } else {
            log::info!("Registered command {usage}");
        }
        previous
    }

    /// Remove the command `name` typed after `prefix`.
    pub fn remove(&mut self, prefix: &str, name: &str) -> Option<Rc<CommandDescription>> {
        let removed = self.commands.remove(&registry_key(prefix, name));
        if removed.is_some() {
            log::info!("Removed command {prefix}{name}");
        }
        removed
    }

    /// Look up a command by prefix and case-insensitive name.
    pub fn get(&self, prefix: &str, name: &str) -> Option<&Rc<CommandDescription>> {
        self.commands.get(&registry_key(prefix, name))
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All commands, ordered by usage text.
    pub fn commands(&self) -> Vec<&Rc<CommandDescription>> {
        let mut commands: Vec<_> = self.commands.values().collect();
        commands.sort_by_key(|command| command.usage());
        commands
    }

    /// Find the command an input line starts with, returning it together
    /// with the text following the command name.
    ///
    /// Longer prefixes are tried first, so `//` commands shadow `/` ones.
    pub fn find<'l>(&self, line: &'l str) -> Option<(&Rc<CommandDescription>, &'l str)> {
        let line = line.trim_start();
        let mut prefixes: Vec<&str> = self.commands.keys().map(|(p, _)| p.as_str()).collect();
        prefixes.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        prefixes.dedup();

        for prefix in prefixes {
            let Some(after) = line.strip_prefix(prefix) else {
                continue;
            };
            if after.starts_with(char::is_whitespace) {
                continue;
            }
            let (name, rest) = split_first_token(after);
            if let Some(command) = self.get(prefix, name) {
                return Some((command, rest));
            }
        }
        None
    }
}
