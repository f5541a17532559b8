//! Binding argument text to parameter lists.

use parlance_types::player::Player;

use crate::arguments::Arguments;
use crate::delegate::CommandContextDelegate;
use crate::error::BindError;
use crate::parameter::{ArgumentValue, CommandParameter, ParameterType};

/// Split `text` into its first whitespace-delimited token and the rest.
///
/// Leading whitespace is skipped on both halves; the rest is otherwise
/// returned verbatim.
pub fn split_first_token(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(end) => (&text[..end], text[end..].trim_start()),
        None => (text, ""),
    }
}

/// Bind `text` to `parameters`, left to right.
///
/// A text parameter in the last position takes the remainder of the input;
/// every other parameter takes one token. The whole input must be consumed.
pub fn bind_arguments(
    invoker: &Player,
    context: &dyn CommandContextDelegate,
    parameters: &[CommandParameter],
    text: &str,
) -> Result<Arguments, BindError> {
    let mut arguments = Arguments::default();
    let mut remaining = text.trim_start();

    for (index, parameter) in parameters.iter().enumerate() {
        let greedy = parameter.kind() == ParameterType::Text && index + 1 == parameters.len();
        let token = if greedy {
            std::mem::take(&mut remaining)
        } else {
            let (token, rest) = split_first_token(remaining);
            remaining = rest;
            token
        };

        if token.is_empty() {
            if !parameter.is_optional() {
                return Err(BindError::MissingArgument {
                    parameter: parameter.name().to_string(),
                });
            }
            let value = parameter.default_value().map(|d| d.resolve(invoker));
            arguments.push(parameter.name(), value);
            continue;
        }

        let value = coerce(invoker, context, parameter, token)?;
        arguments.push(parameter.name(), Some(value));
    }

    if !remaining.is_empty() {
        return Err(BindError::UnexpectedInput {
            remainder: remaining.to_string(),
        });
    }
    Ok(arguments)
}

fn coerce(
    invoker: &Player,
    context: &dyn CommandContextDelegate,
    parameter: &CommandParameter,
    token: &str,
) -> Result<ArgumentValue, BindError> {
    let value = match parameter.kind() {
        ParameterType::Text => context
            .validate_text(invoker, parameter, token)
            .then(|| ArgumentValue::Text(token.to_string())),
        ParameterType::Number => token
            .parse::<f64>()
            .ok()
            .filter(|number| number.is_finite())
            .map(ArgumentValue::Number),
        ParameterType::Player => context
            .resolve_player(invoker, token)
            .map(ArgumentValue::Player),
    };
    value.ok_or_else(|| BindError::InvalidArgument {
        parameter: parameter.name().to_string(),
        kind: parameter.kind(),
        token: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::delegate::{DefaultContextDelegate, find_player};
    use crate::parameter::DefaultValue;

    struct Roster(Vec<Player>);

    impl CommandContextDelegate for Roster {
        fn resolve_player(&self, _invoker: &Player, token: &str) -> Option<Player> {
            find_player(&self.0, token).cloned()
        }

        fn validate_text(&self, _invoker: &Player, _parameter: &CommandParameter, token: &str) -> bool {
            !token.contains("badword")
        }
    }

    fn gunther() -> Player {
        Player::new(0, "Gunther")
    }

    fn bind(parameters: &[CommandParameter], text: &str) -> Result<Arguments, BindError> {
        bind_arguments(&gunther(), &DefaultContextDelegate, parameters, text)
    }

    fn a_and_b() -> Vec<CommandParameter> {
        vec![
            CommandParameter::required("a", ParameterType::Number),
            CommandParameter::with_default("b", ParameterType::Number, DefaultValue::Number(5.0))
                .unwrap(),
        ]
    }

    #[test]
    fn split_first_token_cases() {
        assert_eq!(split_first_token(""), ("", ""));
        assert_eq!(split_first_token("options"), ("options", ""));
        assert_eq!(split_first_token("  a   b c "), ("a", "b c "));
    }

    #[test]
    fn greedy_text_requires_input() {
        let parameters = [CommandParameter::required("message", ParameterType::Text)];
        assert_eq!(
            bind(&parameters, ""),
            Err(BindError::MissingArgument {
                parameter: "message".into()
            })
        );
        let args = bind(&parameters, "hello   there world").unwrap();
        assert_eq!(args.text("message"), Some("hello   there world"));
    }

    #[test]
    fn optional_number_takes_default() {
        let args = bind(&a_and_b(), "3").unwrap();
        assert_eq!(args.number("a"), Some(3.0));
        assert_eq!(args.number("b"), Some(5.0));

        let args = bind(&a_and_b(), "3 7").unwrap();
        assert_eq!(args.number("a"), Some(3.0));
        assert_eq!(args.number("b"), Some(7.0));

        assert_eq!(
            bind(&a_and_b(), ""),
            Err(BindError::MissingArgument { parameter: "a".into() })
        );
    }

    #[test]
    fn invalid_number_reports_token() {
        assert_eq!(
            bind(&a_and_b(), "three"),
            Err(BindError::InvalidArgument {
                parameter: "a".into(),
                kind: ParameterType::Number,
                token: "three".into(),
            })
        );
        assert!(bind(&a_and_b(), "inf").is_err());
        assert!(bind(&a_and_b(), "NaN").is_err());
    }

    #[test]
    fn trailing_input_is_rejected() {
        assert_eq!(
            bind(&a_and_b(), "1 2 3"),
            Err(BindError::UnexpectedInput { remainder: "3".into() })
        );
        assert_eq!(
            bind(&[], "surplus words"),
            Err(BindError::UnexpectedInput {
                remainder: "surplus words".into()
            })
        );
    }

    #[test]
    fn non_final_text_takes_one_token() {
        let parameters = [
            CommandParameter::required("channel", ParameterType::Text),
            CommandParameter::required("volume", ParameterType::Number),
        ];
        let args = bind(&parameters, "jazz 40").unwrap();
        assert_eq!(args.text("channel"), Some("jazz"));
        assert_eq!(args.number("volume"), Some(40.0));
    }

    #[test]
    fn optional_without_default_is_absent() {
        let parameters = [CommandParameter::optional("reason", ParameterType::Text)];
        let args = bind(&parameters, "").unwrap();
        assert_eq!(args.len(), 1);
        assert!(args.get("reason").is_none());
    }

    #[test]
    fn players_resolve_through_context() {
        let context = Roster(vec![gunther(), Player::new(1, "Russell")]);
        let parameters = [
            CommandParameter::required("target", ParameterType::Player),
            CommandParameter::required("message", ParameterType::Text),
        ];

        let args = bind_arguments(&gunther(), &context, &parameters, "russ hi there").unwrap();
        assert_eq!(args.player("target").map(|p| p.id), Some(1));
        assert_eq!(args.text("message"), Some("hi there"));

        let err = bind_arguments(&gunther(), &context, &parameters, "lucy hi").unwrap_err();
        assert_eq!(
            err,
            BindError::InvalidArgument {
                parameter: "target".into(),
                kind: ParameterType::Player,
                token: "lucy".into(),
            }
        );

        let err = bind_arguments(&gunther(), &context, &parameters, "russ a badword").unwrap_err();
        assert!(matches!(err, BindError::InvalidArgument { kind: ParameterType::Text, .. }));
    }

    #[test]
    fn player_default_is_invoker() {
        let parameters = [
            CommandParameter::with_default("target", ParameterType::Player, DefaultValue::Invoker)
                .unwrap(),
        ];
        let args = bind(&parameters, "").unwrap();
        assert_eq!(args.player("target"), Some(&gunther()));
    }

    proptest! {
        #[test]
        fn greedy_text_is_verbatim(text in "[a-z][a-z \\t]{0,40}") {
            let parameters = [CommandParameter::required("message", ParameterType::Text)];
            let args = bind(&parameters, &text).unwrap();
            prop_assert_eq!(args.text("message"), Some(text.as_str()));
        }

        #[test]
        fn integers_bind_as_numbers(a in -100_000i32..100_000, b in -100_000i32..100_000) {
            let args = bind(&a_and_b(), &format!("{a} {b}")).unwrap();
            prop_assert_eq!(args.number("a"), Some(f64::from(a)));
            prop_assert_eq!(args.number("b"), Some(f64::from(b)));
        }
    }
}
