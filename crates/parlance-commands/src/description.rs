//! Immutable command descriptions produced by the builder.

use std::fmt;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use parlance_types::player::{Player, PlayerLevel};

use crate::arguments::Arguments;
use crate::key::CommandKey;
use crate::parameter::CommandParameter;

/// Output produced by a command handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// The handler did its work without anything to report.
    None,
    /// A single message for the invoking player.
    Text(String),
    /// Several messages, in order.
    Lines(Vec<String>),
}

/// Future returned by a command handler. Handlers run on the server's single
/// logical thread, so the future need not be `Send`.
pub type CommandFuture = LocalBoxFuture<'static, anyhow::Result<CommandOutput>>;

/// A type-erased command handler.
pub type CommandHandler = Rc<dyn Fn(Player, Arguments) -> CommandFuture>;

/// A registered command, or one of its sub-commands.
///
/// Built once by a `CommandBuilder` and never mutated afterwards. Replacing
/// a command means registering a new description.
pub struct CommandDescription {
    pub(crate) name: String,
    pub(crate) prefix: String,
    pub(crate) description: Option<String>,
    pub(crate) restrict_level: PlayerLevel,
    pub(crate) key: CommandKey,
    pub(crate) sub_commands: Vec<CommandDescription>,
    pub(crate) handler: CommandHandler,
}

impl CommandDescription {
    /// The literal the player types for this level (`radio`, `options`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Leading literal typed before the command name, e.g. `/`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Help text, if any was given.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Lowest level able to see and use this command. Sub-commands never
    /// have a lower level than their parent.
    pub fn restrict_level(&self) -> PlayerLevel {
        self.restrict_level
    }

    /// Signature key: the command path and parameter list.
    pub fn key(&self) -> &CommandKey {
        &self.key
    }

    /// Parameters bound at this level, in declaration order.
    pub fn parameters(&self) -> &[CommandParameter] {
        self.key.parameters()
    }

    /// Sub-commands in registration order. Overloads share a name.
    pub fn sub_commands(&self) -> &[CommandDescription] {
        &self.sub_commands
    }

    /// Handler invoked when this level is resolved.
    pub fn handler(&self) -> &CommandHandler {
        &self.handler
    }

    /// Usage text for this level, e.g. `/give [target] [amount=5]`.
    pub fn usage(&self) -> String {
        format!("{}{}", self.prefix, self.key)
    }

    /// Usage text for this level and every sub-command beneath it that a
    /// player at `level` can see, depth first.
    pub fn usages_for(&self, level: PlayerLevel) -> Vec<String> {
        let mut usages = Vec::new();
        self.collect_usages(level, &mut usages);
        usages
    }

    fn collect_usages(&self, level: PlayerLevel, usages: &mut Vec<String>) {
        if level < self.restrict_level {
            return;
        }
        usages.push(self.usage());
        for sub in &self.sub_commands {
            sub.collect_usages(level, usages);
        }
    }
}

impl fmt::Debug for CommandDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescription")
            .field("name", &self.name)
            .field("prefix", &self.prefix)
            .field("restrict_level", &self.restrict_level)
            .field("key", &self.key.to_string())
            .field("sub_commands", &self.sub_commands)
            .finish_non_exhaustive()
    }
}
