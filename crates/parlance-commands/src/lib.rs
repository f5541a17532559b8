//! Command registration, resolution and dispatch.
//!
//! Feature modules describe their commands through a fluent
//! [`CommandBuilder`]: a name, a prefix, an optional restrict level, an
//! ordered parameter list, nested sub-commands and a handler. Finished
//! descriptions live in a [`CommandRegistry`]. At runtime the
//! [`CommandExecutor`] matches the text a player typed against a description,
//! binds and coerces the arguments, asks the permission delegate, and runs
//! the handler.

mod arguments;
pub mod binding;
pub mod builder;
mod delegate;
mod description;
pub mod error;
mod executor;
mod key;
mod manager;
mod parameter;
mod registry;

/// Values bound to a command's parameters, handed to handlers.
pub use arguments::Arguments;
/// Fluent command builder.
pub use builder::{CommandBuilder, RootBuilder};
/// Capability interfaces supplied by the embedding application.
pub use delegate::{
    CommandContextDelegate, CommandPermissionDelegate, DefaultContextDelegate,
    DefaultPermissionDelegate, find_player,
};
/// Immutable command descriptions and handler types.
pub use description::{CommandDescription, CommandFuture, CommandHandler, CommandOutput};
/// Error taxonomy.
pub use error::{BindError, ConfigurationError, ExecutionError};
/// The runtime that resolves and invokes commands.
pub use executor::{CommandExecutor, ExecutionFuture, ExecutionOutcome, Rejection};
/// Signature keys identifying overloads.
pub use key::CommandKey;
/// Registry plus executor, dispatching whole input lines.
pub use manager::{CommandManager, DispatchFuture};
/// Parameter descriptors and bound values.
pub use parameter::{ArgumentValue, CommandParameter, DefaultValue, ParameterSpec, ParameterType};
/// Top-level command registry.
pub use registry::CommandRegistry;
