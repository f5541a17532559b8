//! Resolution, binding, authorization and invocation of commands.
//!
//! Everything up to the permission check runs synchronously inside
//! `execute_command`. Only the handler's future can suspend, so an
//! invocation is never interrupted halfway through resolving.

use std::rc::Rc;

use futures::FutureExt;
use futures::future::{self, LocalBoxFuture};
use parlance_types::player::{Player, PlayerLevel};

use crate::arguments::Arguments;
use crate::binding::{bind_arguments, split_first_token};
use crate::delegate::{CommandContextDelegate, CommandPermissionDelegate};
use crate::description::{CommandDescription, CommandOutput};
use crate::error::{BindError, ExecutionError};

/// Why a command did not run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The permission delegate refused the resolved command.
    PermissionDenied,
    /// The arguments did not fit any candidate overload.
    Bind(BindError),
}

/// Result of executing a command that was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The handler ran to completion.
    Completed(CommandOutput),
    /// The handler was not invoked.
    Rejected(Rejection),
}

impl ExecutionOutcome {
    /// Whether the handler ran to completion.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Future yielded by the executor. Resolves once the handler has finished.
pub type ExecutionFuture = LocalBoxFuture<'static, Result<ExecutionOutcome, ExecutionError>>;

/// Per-invocation state used while resolving.
struct ExecutionContext<'a> {
    player: &'a Player,
    context: &'a dyn CommandContextDelegate,
}

/// Executes command descriptions on behalf of players.
pub struct CommandExecutor {
    context: Box<dyn CommandContextDelegate>,
    permission: Box<dyn CommandPermissionDelegate>,
}

impl CommandExecutor {
    /// Create an executor consulting the given delegates.
    pub fn new(
        context: impl CommandContextDelegate + 'static,
        permission: impl CommandPermissionDelegate + 'static,
    ) -> Self {
        Self {
            context: Box::new(context),
            permission: Box::new(permission),
        }
    }

    /// Delegate used to coerce player and text arguments.
    pub fn context_delegate(&self) -> &dyn CommandContextDelegate {
        self.context.as_ref()
    }

    /// Execute `command` for `player` with the text typed after the command
    /// name.
    ///
    /// Sub-command names are matched first. The permission delegate is
    /// consulted once, before any argument reaches the context delegate, for
    /// the first candidate in registration order. Overloads are then bound in
    /// registration order. Later overloads restricted above the authorized
    /// one are only tried when the player's level reaches them.
    pub fn execute_command(
        &self,
        player: &Player,
        command: &CommandDescription,
        text: &str,
    ) -> ExecutionFuture {
        let ctx = ExecutionContext {
            player,
            context: self.context.as_ref(),
        };

        let candidates = candidates(command, text);
        let authorized = candidates.first().map_or(command, |&(first, _)| first);
        if !self
            .permission
            .can_execute_command(player, ctx.context, authorized)
        {
            log::debug!("{} may not run {}", player.name, authorized.usage());
            return rejected(Rejection::PermissionDenied);
        }

        let (resolved, arguments) =
            match bind_overloads(&ctx, &candidates, authorized.restrict_level()) {
                Ok(resolved) => resolved,
                Err(Some(err)) => {
                    log::debug!("{} could not run {}: {err}", player.name, command.usage());
                    return rejected(Rejection::Bind(err));
                },
                Err(None) => return rejected(Rejection::PermissionDenied),
            };

        let usage = resolved.usage();
        log::debug!("{} runs {usage}", player.name);
        let handler = Rc::clone(resolved.handler());
        let invocation = handler(player.clone(), arguments);
        async move {
            match invocation.await {
                Ok(output) => Ok(ExecutionOutcome::Completed(output)),
                Err(source) => {
                    log::warn!("{usage} failed: {source:#}");
                    Err(ExecutionError::Handler {
                        command: usage,
                        source,
                    })
                },
            }
        }
        .boxed_local()
    }
}

fn rejected(rejection: Rejection) -> ExecutionFuture {
    future::ready(Ok(ExecutionOutcome::Rejected(rejection))).boxed_local()
}

/// Command levels `text` may address, in registration order, each with the
/// text left for its parameters. Never consults a delegate.
///
/// A token naming one or more sub-commands descends into all of them and
/// excludes the current level.
fn candidates<'c, 't>(
    command: &'c CommandDescription,
    text: &'t str,
) -> Vec<(&'c CommandDescription, &'t str)> {
    let (token, rest) = split_first_token(text);
    let found: Vec<_> = if token.is_empty() {
        Vec::new()
    } else {
        command
            .sub_commands()
            .iter()
            .filter(|sub| sub.name().eq_ignore_ascii_case(token))
            .flat_map(|sub| candidates(sub, rest))
            .collect()
    };
    if found.is_empty() {
        vec![(command, text)]
    } else {
        found
    }
}

/// Bind the first candidate that accepts its text. Candidates restricted
/// above `ceiling` are skipped unless the player reaches their level. Fails
/// with the last bind failure, or `None` when nothing was tried.
fn bind_overloads<'c>(
    ctx: &ExecutionContext<'_>,
    candidates: &[(&'c CommandDescription, &str)],
    ceiling: PlayerLevel,
) -> Result<(&'c CommandDescription, Arguments), Option<BindError>> {
    let mut last_failure = None;
    for &(candidate, text) in candidates {
        let level = candidate.restrict_level();
        if level > ceiling && !ctx.player.has_level(level) {
            log::debug!("Overload {} needs {level}", candidate.usage());
            continue;
        }
        match bind_arguments(ctx.player, ctx.context, candidate.parameters(), text) {
            Ok(arguments) => return Ok((candidate, arguments)),
            Err(err) => {
                log::debug!("Overload {} rejected: {err}", candidate.usage());
                last_failure = Some(err);
            },
        }
    }
    Err(last_failure)
}
