//! Error types for command registration and execution.

use crate::parameter::ParameterType;

/// A command could not be registered as described.
///
/// Raised synchronously by the builder and the registry. A failed
/// registration never leaves a partial command behind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("invalid name {0:?}: names must be non-empty and contain no whitespace")]
    InvalidName(String),

    #[error("invalid prefix {0:?}: prefixes must contain no whitespace")]
    InvalidPrefix(String),

    #[error("required parameter `{0}` cannot have a default value")]
    DefaultOnRequired(String),

    #[error("default value for {kind} parameter `{parameter}` has the wrong type")]
    DefaultTypeMismatch {
        parameter: String,
        kind: ParameterType,
    },

    #[error("unknown parameter type: {0}")]
    UnknownParameterType(String),

    #[error("parameter `{0}` is declared more than once")]
    DuplicateParameter(String),

    #[error("optional parameter `{optional}` precedes required parameter `{required}`")]
    OptionalBeforeRequired { optional: String, required: String },

    #[error("sub-command `{0}` is already defined with the same parameters")]
    DuplicateSubCommand(String),

    #[error("command `{0}` is already registered")]
    DuplicateCommand(String),
}

/// Arguments could not be bound to a parameter list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("missing required argument `{parameter}`")]
    MissingArgument { parameter: String },

    #[error("invalid {kind} `{token}` for argument `{parameter}`")]
    InvalidArgument {
        parameter: String,
        kind: ParameterType,
        token: String,
    },

    #[error("unexpected input: {remainder}")]
    UnexpectedInput { remainder: String },
}

/// A command handler failed after resolution, binding and the permission
/// check all succeeded.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("handler for `{command}` failed: {source}")]
    Handler {
        command: String,
        source: anyhow::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_display() {
        let e = ConfigurationError::OptionalBeforeRequired {
            optional: "amount".into(),
            required: "target".into(),
        };
        assert_eq!(
            format!("{e}"),
            "optional parameter `amount` precedes required parameter `target`"
        );
    }

    #[test]
    fn bind_error_display() {
        let e = BindError::InvalidArgument {
            parameter: "amount".into(),
            kind: ParameterType::Number,
            token: "lots".into(),
        };
        assert_eq!(format!("{e}"), "invalid number `lots` for argument `amount`");
    }

    #[test]
    fn handler_error_keeps_source() {
        let e = ExecutionError::Handler {
            command: "/radio".into(),
            source: anyhow::anyhow!("menu closed"),
        };
        assert_eq!(format!("{e}"), "handler for `/radio` failed: menu closed");
        assert!(std::error::Error::source(&e).is_some());
    }
}
