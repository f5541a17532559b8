//! Signature keys: the canonical identity of a command overload.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::parameter::CommandParameter;

/// Literal command path plus parameter list identifying one overload.
///
/// Equality considers the literal tokens (ASCII case-insensitive) and the
/// type and optionality of each parameter. Parameter names and defaults only
/// affect the rendered usage text.
#[derive(Debug, Clone, Default)]
pub struct CommandKey {
    tokens: Vec<String>,
    parameters: Vec<CommandParameter>,
}

impl CommandKey {
    pub fn new(tokens: Vec<String>, parameters: Vec<CommandParameter>) -> Self {
        Self { tokens, parameters }
    }

    /// Literal tokens of the command path, root name first.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn parameters(&self) -> &[CommandParameter] {
        &self.parameters
    }
}

impl fmt::Display for CommandKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .tokens
            .iter()
            .cloned()
            .chain(self.parameters.iter().map(ToString::to_string))
            .collect();
        f.write_str(&parts.join(" "))
    }
}

impl PartialEq for CommandKey {
    fn eq(&self, other: &Self) -> bool {
        self.tokens.len() == other.tokens.len()
            && self
                .tokens
                .iter()
                .zip(&other.tokens)
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
            && self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .zip(&other.parameters)
                .all(|(a, b)| a.kind() == b.kind() && a.is_optional() == b.is_optional())
    }
}

impl Eq for CommandKey {}

impl Hash for CommandKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tokens.len().hash(state);
        for token in &self.tokens {
            token.to_ascii_lowercase().hash(state);
        }
        self.parameters.len().hash(state);
        for parameter in &self.parameters {
            parameter.kind().hash(state);
            parameter.is_optional().hash(state);
        }
    }
}
