//! Bound argument lists handed to command handlers.

use parlance_types::player::Player;

use crate::parameter::ArgumentValue;

/// Values bound to a command's parameters, in declaration order.
///
/// Optional parameters without a default are present by name but hold no
/// value when the player left them out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: Vec<(String, Option<ArgumentValue>)>,
}

impl Arguments {
    pub(crate) fn push(&mut self, name: &str, value: Option<ArgumentValue>) {
        self.values.push((name.to_string(), value));
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `index`, if that parameter received one.
    pub fn at(&self, index: usize) -> Option<&ArgumentValue> {
        self.values.get(index).and_then(|(_, value)| value.as_ref())
    }

    /// Value of the parameter called `name`, if it received one.
    pub fn get(&self, name: &str) -> Option<&ArgumentValue> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, value)| value.as_ref())
    }

    /// Text bound to `name`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ArgumentValue::as_text)
    }

    /// Number bound to `name`.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ArgumentValue::as_number)
    }

    /// Player bound to `name`.
    pub fn player(&self, name: &str) -> Option<&Player> {
        self.get(name).and_then(ArgumentValue::as_player)
    }

    /// Iterate `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&ArgumentValue>)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name_and_index() {
        let mut args = Arguments::default();
        args.push("target", Some(ArgumentValue::Player(Player::new(3, "Lucy"))));
        args.push("amount", Some(ArgumentValue::Number(5.0)));
        args.push("reason", None);

        assert_eq!(args.len(), 3);
        assert_eq!(args.player("target").map(|p| p.id), Some(3));
        assert_eq!(args.number("amount"), Some(5.0));
        assert_eq!(args.at(1), Some(&ArgumentValue::Number(5.0)));
        assert!(args.get("reason").is_none());
        assert!(args.text("amount").is_none());

        let names: Vec<&str> = args.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["target", "amount", "reason"]);
    }
}
