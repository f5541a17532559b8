//! Parameter descriptors and the values bound to them.

use std::fmt;
use std::str::FromStr;

use parlance_types::player::Player;
use serde::Deserialize;

use crate::error::ConfigurationError;

/// The kinds of value a parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    /// Free-form text. Consumes a single token, or the rest of the input when
    /// it is the last parameter in its list.
    Text,
    /// A finite decimal number.
    Number,
    /// A connected player, resolved through the context delegate.
    Player,
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Player => "player",
        };
        f.write_str(name)
    }
}

impl FromStr for ParameterType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "number" => Ok(Self::Number),
            "player" => Ok(Self::Player),
            _ => Err(ConfigurationError::UnknownParameterType(s.to_string())),
        }
    }
}

/// Value an optional parameter takes when the player leaves it out.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Number(f64),
    /// The invoking player. Only valid for player parameters.
    #[serde(skip)]
    Invoker,
    Text(String),
}

impl DefaultValue {
    fn fits(&self, kind: ParameterType) -> bool {
        matches!(
            (self, kind),
            (Self::Text(_), ParameterType::Text)
                | (Self::Number(_), ParameterType::Number)
                | (Self::Invoker, ParameterType::Player)
        )
    }

    /// Materialize the default for a particular invocation.
    pub fn resolve(&self, invoker: &Player) -> ArgumentValue {
        match self {
            Self::Text(text) => ArgumentValue::Text(text.clone()),
            Self::Number(number) => ArgumentValue::Number(*number),
            Self::Invoker => ArgumentValue::Player(invoker.clone()),
        }
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
            Self::Invoker => f.write_str("you"),
        }
    }
}

/// A value bound to a parameter during execution.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    Text(String),
    Number(f64),
    Player(Player),
}

impl ArgumentValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            _ => None,
        }
    }

    pub fn as_player(&self) -> Option<&Player> {
        match self {
            Self::Player(player) => Some(player),
            _ => None,
        }
    }
}

/// Immutable description of one formal argument of a command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandParameter {
    name: String,
    kind: ParameterType,
    optional: bool,
    default: Option<DefaultValue>,
}

impl CommandParameter {
    /// Create a parameter, validating the optional/default combination.
    pub fn new(
        name: impl Into<String>,
        kind: ParameterType,
        optional: bool,
        default: Option<DefaultValue>,
    ) -> Result<Self, ConfigurationError> {
        let name = name.into();
        if let Some(default) = &default {
            if !optional {
                return Err(ConfigurationError::DefaultOnRequired(name));
            }
            if !default.fits(kind) {
                return Err(ConfigurationError::DefaultTypeMismatch {
                    parameter: name,
                    kind,
                });
            }
        }
        Ok(Self {
            name,
            kind,
            optional,
            default,
        })
    }

    /// A parameter the player must supply.
    pub fn required(name: impl Into<String>, kind: ParameterType) -> Self {
        Self {
            name: name.into(),
            kind,
            optional: false,
            default: None,
        }
    }

    /// An optional parameter that is absent when left out.
    pub fn optional(name: impl Into<String>, kind: ParameterType) -> Self {
        Self {
            name: name.into(),
            kind,
            optional: true,
            default: None,
        }
    }

    /// An optional parameter that takes `default` when left out.
    pub fn with_default(
        name: impl Into<String>,
        kind: ParameterType,
        default: DefaultValue,
    ) -> Result<Self, ConfigurationError> {
        Self::new(name, kind, true, Some(default))
    }

    /// Name shown in usage text and used to look up the bound value.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type the argument is coerced to.
    pub fn kind(&self) -> ParameterType {
        self.kind
    }

    /// Whether the argument may be left out.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Value bound when an optional argument is left out.
    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }
}

impl fmt::Display for CommandParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.default, self.optional, self.kind) {
            (Some(default), _, _) => write!(f, "[{}={default}]", self.name),
            (None, true, _) => write!(f, "[{}]?", self.name),
            (None, false, ParameterType::Text) => f.write_str(&self.name),
            (None, false, _) => write!(f, "[{}]", self.name),
        }
    }
}

/// Data-driven form of a parameter, as found in configuration files.
#[derive(Debug, Clone, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub default: Option<DefaultValue>,
}

impl TryFrom<ParameterSpec> for CommandParameter {
    type Error = ConfigurationError;

    fn try_from(spec: ParameterSpec) -> Result<Self, Self::Error> {
        let kind = spec.kind.parse()?;
        Self::new(spec.name, kind, spec.optional, spec.default)
    }
}
