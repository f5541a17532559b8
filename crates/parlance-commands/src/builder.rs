//! Fluent assembly of command descriptions.
//!
//! A builder accumulates the configuration of one nesting level. `sub()`
//! opens a nested builder that owns its parent; building the nested level
//! hands the parent back, so a whole tree reads as one chain:
//!
//! ```ignore
//! manager
//!     .build_command("radio")
//!     .sub("options")
//!     .build(on_radio_options)?
//!     .build(on_radio)?;
//! ```
//!
//! Configuration calls never fail. The first problem is recorded and
//! reported by `build`, and nothing reaches the listener unless the whole
//! tree is valid.

use std::future::Future;
use std::rc::Rc;

use futures::FutureExt;
use parlance_types::player::{Player, PlayerLevel};

use crate::arguments::Arguments;
use crate::description::{CommandDescription, CommandHandler, CommandOutput};
use crate::error::ConfigurationError;
use crate::key::CommandKey;
use crate::parameter::CommandParameter;

type Listener<'a> = Box<dyn FnOnce(CommandDescription) -> Result<(), ConfigurationError> + 'a>;

/// Where a finished level goes when `build` is called.
pub trait BuildTarget: Sized {
    /// What `build` returns to the caller.
    type Output;

    /// Accept a finished command description.
    fn finish(self, command: CommandDescription) -> Result<Self::Output, ConfigurationError>;
}

/// Parent of a root-level builder: delivers the finished tree to the listener.
pub struct Root<'a> {
    listener: Listener<'a>,
}

impl BuildTarget for Root<'_> {
    type Output = ();

    fn finish(self, mut command: CommandDescription) -> Result<(), ConfigurationError> {
        raise_restrict_levels(&mut command, PlayerLevel::Player);
        log::debug!("Built command {}", command.usage());
        (self.listener)(command)
    }
}

fn raise_restrict_levels(command: &mut CommandDescription, floor: PlayerLevel) {
    command.restrict_level = command.restrict_level.max(floor);
    let level = command.restrict_level;
    for sub in &mut command.sub_commands {
        raise_restrict_levels(sub, level);
    }
}

/// Accumulated configuration for one nesting level.
struct PendingCommand {
    path: Vec<String>,
    prefix: String,
    description: Option<String>,
    restrict_level: PlayerLevel,
    parameters: Vec<CommandParameter>,
    sub_commands: Vec<CommandDescription>,
    error: Option<ConfigurationError>,
}

impl PendingCommand {
    fn new(path: Vec<String>, prefix: String) -> Self {
        Self {
            path,
            prefix,
            description: None,
            restrict_level: PlayerLevel::default(),
            parameters: Vec::new(),
            sub_commands: Vec::new(),
            error: None,
        }
    }

    fn name(&self) -> &str {
        self.path.last().map_or("", String::as_str)
    }

    fn record(&mut self, result: Result<(), ConfigurationError>) {
        if let Err(err) = result
            && self.error.is_none()
        {
            self.error = Some(err);
        }
    }

    fn finish(mut self, handler: CommandHandler) -> Result<CommandDescription, ConfigurationError> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        validate_name(self.name())?;
        let name = self.name().to_string();
        Ok(CommandDescription {
            name,
            prefix: self.prefix,
            description: self.description,
            restrict_level: self.restrict_level,
            key: CommandKey::new(self.path, self.parameters),
            sub_commands: self.sub_commands,
            handler,
        })
    }
}

fn validate_name(name: &str) -> Result<(), ConfigurationError> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(ConfigurationError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn validate_parameters(parameters: &[CommandParameter]) -> Result<(), ConfigurationError> {
    let mut first_optional: Option<&CommandParameter> = None;
    for (index, parameter) in parameters.iter().enumerate() {
        validate_name(parameter.name())?;
        if parameters[..index]
            .iter()
            .any(|p| p.name() == parameter.name())
        {
            return Err(ConfigurationError::DuplicateParameter(
                parameter.name().to_string(),
            ));
        }
        match first_optional {
            Some(optional) if !parameter.is_optional() => {
                return Err(ConfigurationError::OptionalBeforeRequired {
                    optional: optional.name().to_string(),
                    required: parameter.name().to_string(),
                });
            },
            None if parameter.is_optional() => first_optional = Some(parameter),
            _ => {},
        }
    }
    Ok(())
}

/// Fluent builder for one level of a command tree.
pub struct CommandBuilder<P> {
    parent: P,
    pending: PendingCommand,
}

/// Builder for a top-level command.
pub type RootBuilder<'a> = CommandBuilder<Root<'a>>;

impl<'a> CommandBuilder<Root<'a>> {
    /// Start building the command `name` typed after `prefix`. The finished
    /// description is passed to `listener`, whose result `build` returns.
    pub fn new(
        name: impl Into<String>,
        prefix: impl Into<String>,
        listener: impl FnOnce(CommandDescription) -> Result<(), ConfigurationError> + 'a,
    ) -> Self {
        let prefix = prefix.into();
        let mut pending = PendingCommand::new(vec![name.into()], prefix.clone());
        if prefix.chars().any(char::is_whitespace) {
            pending.record(Err(ConfigurationError::InvalidPrefix(prefix)));
        }
        Self {
            parent: Root {
                listener: Box::new(listener),
            },
            pending,
        }
    }
}

impl<P: BuildTarget> CommandBuilder<P> {
    /// Attach help text to this level.
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.pending.description = Some(text.into());
        self
    }

    /// Require at least `level` to see and use this level.
    pub fn restrict(mut self, level: PlayerLevel) -> Self {
        self.pending.restrict_level = level;
        self
    }

    /// Set the ordered parameter list of this level.
    pub fn parameters(mut self, parameters: impl IntoIterator<Item = CommandParameter>) -> Self {
        let parameters: Vec<CommandParameter> = parameters.into_iter().collect();
        let result = validate_parameters(&parameters);
        self.pending.record(result);
        self.pending.parameters = parameters;
        self
    }

    /// Open a nested builder for the sub-command `name`. Its `build` returns
    /// this builder.
    pub fn sub(self, name: impl Into<String>) -> CommandBuilder<Self> {
        let mut path = self.pending.path.clone();
        path.push(name.into());
        let pending = PendingCommand::new(path, self.pending.prefix.clone());
        CommandBuilder {
            parent: self,
            pending,
        }
    }

    /// Finish this level with `handler`.
    pub fn build<F, Fut>(self, handler: F) -> Result<P::Output, ConfigurationError>
    where
        F: Fn(Player, Arguments) -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<CommandOutput>> + 'static,
    {
        let handler: CommandHandler = Rc::new(move |player: Player, arguments: Arguments| {
            handler(player, arguments).boxed_local()
        });
        self.build_with(handler)
    }

    /// Finish this level with an already type-erased handler.
    pub fn build_with(self, handler: CommandHandler) -> Result<P::Output, ConfigurationError> {
        let command = self.pending.finish(handler)?;
        self.parent.finish(command)
    }
}

impl<P: BuildTarget> BuildTarget for CommandBuilder<P> {
    type Output = Self;

    fn finish(mut self, command: CommandDescription) -> Result<Self, ConfigurationError> {
        if self
            .pending
            .sub_commands
            .iter()
            .any(|sibling| sibling.key() == command.key())
        {
            return Err(ConfigurationError::DuplicateSubCommand(
                command.name().to_string(),
            ));
        }
        self.pending.sub_commands.push(command);
        Ok(self)
    }
}
