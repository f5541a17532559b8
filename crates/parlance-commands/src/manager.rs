//! Owns the registry and executor, and dispatches raw input lines.

use futures::FutureExt;
use futures::future::{self, LocalBoxFuture};
use parlance_types::config::CommandConfig;
use parlance_types::player::Player;

use crate::builder::{CommandBuilder, RootBuilder};
use crate::delegate::{CommandContextDelegate, CommandPermissionDelegate};
use crate::error::ExecutionError;
use crate::executor::{CommandExecutor, ExecutionOutcome};
use crate::registry::CommandRegistry;

/// Future returned by [`CommandManager::execute`]. Resolves to `None` when
/// the line does not start with a registered command.
pub type DispatchFuture =
    LocalBoxFuture<'static, Result<Option<ExecutionOutcome>, ExecutionError>>;

/// Entry point for feature modules and for the input path.
pub struct CommandManager {
    config: CommandConfig,
    registry: CommandRegistry,
    executor: CommandExecutor,
}

impl CommandManager {
    pub fn new(
        config: CommandConfig,
        context: impl CommandContextDelegate + 'static,
        permission: impl CommandPermissionDelegate + 'static,
    ) -> Self {
        let registry = CommandRegistry::new(config.duplicate_policy);
        Self {
            config,
            registry,
            executor: CommandExecutor::new(context, permission),
        }
    }

    /// Configuration the manager was created with.
    pub fn config(&self) -> &CommandConfig {
        &self.config
    }

    /// Commands registered so far.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn executor(&self) -> &CommandExecutor {
        &self.executor
    }

    /// Start building a command typed after the configured default prefix.
    /// Building the root level registers it.
    pub fn build_command(&mut self, name: impl Into<String>) -> RootBuilder<'_> {
        let prefix = self.config.default_prefix.clone();
        self.build_command_with_prefix(name, prefix)
    }

    /// Start building a command typed after `prefix`.
    pub fn build_command_with_prefix(
        &mut self,
        name: impl Into<String>,
        prefix: impl Into<String>,
    ) -> RootBuilder<'_> {
        let registry = &mut self.registry;
        CommandBuilder::new(name, prefix, move |command| registry.register(command))
    }

    /// Remove a command registered under the default prefix. Returns whether
    /// it existed.
    pub fn remove_command(&mut self, name: &str) -> bool {
        let prefix = self.config.default_prefix.clone();
        self.remove_command_with_prefix(name, &prefix)
    }

    pub fn remove_command_with_prefix(&mut self, name: &str, prefix: &str) -> bool {
        self.registry.remove(prefix, name).is_some()
    }

    /// Execute the command `line` starts with on behalf of `player`.
    pub fn execute(&self, player: &Player, line: &str) -> DispatchFuture {
        let Some((command, rest)) = self.registry.find(line) else {
            log::debug!("{} typed unknown command: {line}", player.name);
            return future::ready(Ok(None)).boxed_local();
        };
        self.executor
            .execute_command(player, command, rest)
            .map(|result| result.map(Some))
            .boxed_local()
    }

    /// Usage lines of every command level `player` is able to see.
    pub fn usage_for(&self, player: &Player) -> Vec<String> {
        let mut usages: Vec<String> = self
            .registry
            .commands()
            .into_iter()
            .flat_map(|command| command.usages_for(player.level))
            .collect();
        usages.sort();
        usages
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use futures::executor::block_on;
    use futures::future::Ready;
    use parlance_types::config::DuplicatePolicy;
    use parlance_types::player::PlayerLevel;

    use super::*;
    use crate::arguments::Arguments;
    use crate::delegate::{DefaultContextDelegate, DefaultPermissionDelegate};
    use crate::description::CommandOutput;
    use crate::error::ConfigurationError;
    use crate::executor::Rejection;

    fn manager() -> CommandManager {
        CommandManager::new(
            CommandConfig::default(),
            DefaultContextDelegate,
            DefaultPermissionDelegate,
        )
    }

    fn reply(text: &'static str) -> impl Fn(Player, Arguments) -> Ready<anyhow::Result<CommandOutput>> {
        move |_, _| future::ready(Ok(CommandOutput::Text(text.to_string())))
    }

    fn run(manager: &CommandManager, player: &Player, line: &str) -> Option<ExecutionOutcome> {
        block_on(manager.execute(player, line)).unwrap()
    }

    #[test]
    fn unknown_command_is_none() {
        let manager = manager();
        assert_eq!(run(&manager, &Player::new(0, "Gunther"), "/radio"), None);
    }

    #[test]
    fn dispatches_to_sub_commands() {
        let mut manager = manager();
        manager
            .build_command("radio")
            .sub("options")
            .build(reply("options"))
            .unwrap()
            .build(reply("toggle"))
            .unwrap();

        let gunther = Player::new(0, "Gunther");
        assert_eq!(
            run(&manager, &gunther, "/radio"),
            Some(ExecutionOutcome::Completed(CommandOutput::Text("toggle".into())))
        );
        assert_eq!(
            run(&manager, &gunther, "/radio options"),
            Some(ExecutionOutcome::Completed(CommandOutput::Text("options".into())))
        );
        assert!(matches!(
            run(&manager, &gunther, "/radio add jazz"),
            Some(ExecutionOutcome::Rejected(Rejection::Bind(_)))
        ));
    }

    #[test]
    fn duplicate_registration_is_rejected_by_default() {
        let mut manager = manager();
        manager.build_command("radio").build(reply("first")).unwrap();
        let err = manager.build_command("radio").build(reply("second")).unwrap_err();
        assert_eq!(err, ConfigurationError::DuplicateCommand("/radio".into()));

        let outcome = run(&manager, &Player::new(0, "Gunther"), "/radio");
        assert_eq!(
            outcome,
            Some(ExecutionOutcome::Completed(CommandOutput::Text("first".into())))
        );
    }

    #[test]
    fn replace_policy_from_config() {
        let config = CommandConfig {
            duplicate_policy: DuplicatePolicy::Replace,
            ..CommandConfig::default()
        };
        let mut manager =
            CommandManager::new(config, DefaultContextDelegate, DefaultPermissionDelegate);
        manager.build_command("radio").build(reply("first")).unwrap();
        manager.build_command("radio").build(reply("second")).unwrap();
        assert_eq!(
            run(&manager, &Player::new(0, "Gunther"), "/radio"),
            Some(ExecutionOutcome::Completed(CommandOutput::Text("second".into())))
        );
    }

    #[test]
    fn reregistration_after_removal_replaces_behaviour() {
        let mut manager = manager();
        let old_calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&old_calls);
        manager
            .build_command("radio")
            .build(move |_, _| {
                counter.set(counter.get() + 1);
                future::ready(Ok(CommandOutput::None))
            })
            .unwrap();

        let gunther = Player::new(0, "Gunther");
        run(&manager, &gunther, "/radio");
        assert_eq!(old_calls.get(), 1);

        assert!(manager.remove_command("radio"));
        assert!(!manager.remove_command("radio"));
        assert_eq!(run(&manager, &gunther, "/radio"), None);

        manager.build_command("radio").build(reply("new")).unwrap();
        assert_eq!(
            run(&manager, &gunther, "/radio"),
            Some(ExecutionOutcome::Completed(CommandOutput::Text("new".into())))
        );
        assert_eq!(old_calls.get(), 1);
    }

    #[test]
    fn failed_build_leaves_registry_untouched() {
        let mut manager = manager();
        let result = manager
            .build_command("radio")
            .sub("options")
            .build(reply("options"))
            .and_then(|parent| parent.sub("options").build(reply("again")))
            .and_then(|parent| parent.build(reply("root")));
        assert!(result.is_err());
        assert!(manager.registry().is_empty());
    }

    #[test]
    fn custom_prefix_commands() {
        let mut manager = manager();
        manager
            .build_command_with_prefix("announce", "!")
            .build(reply("announced"))
            .unwrap();
        let gunther = Player::new(0, "Gunther");
        assert!(run(&manager, &gunther, "!announce").is_some());
        assert_eq!(run(&manager, &gunther, "/announce"), None);
        assert!(manager.remove_command_with_prefix("announce", "!"));
    }

    #[test]
    fn usage_respects_restrict_level() {
        let mut manager = manager();
        manager
            .build_command("radio")
            .sub("options")
            .build(reply("options"))
            .unwrap()
            .build(reply("toggle"))
            .unwrap();
        manager
            .build_command("ban")
            .restrict(PlayerLevel::Administrator)
            .build(reply("banned"))
            .unwrap();

        let player = Player::new(0, "Russell");
        assert_eq!(manager.usage_for(&player), ["/radio", "/radio options"]);

        let admin = Player::new(1, "Gunther").with_level(PlayerLevel::Administrator);
        assert_eq!(manager.usage_for(&admin), ["/ban", "/radio", "/radio options"]);

        assert_eq!(
            run(&manager, &player, "/ban"),
            Some(ExecutionOutcome::Rejected(Rejection::PermissionDenied))
        );
    }
}
