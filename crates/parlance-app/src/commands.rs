//! Demo feature modules registering commands, and rendering of outcomes.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::anyhow;
use parlance_commands::{
    Arguments, CommandContextDelegate, CommandManager, CommandOutput, CommandParameter,
    ConfigurationError, DefaultValue, ExecutionError, ExecutionOutcome, ParameterType, Rejection,
    find_player,
};
use parlance_types::player::{Player, PlayerLevel};

use crate::app_state::{ConsoleState, RADIO_CHANNELS};

/// Resolves player arguments against the console roster.
pub struct RosterContext {
    state: Rc<RefCell<ConsoleState>>,
}

impl RosterContext {
    pub fn new(state: &Rc<RefCell<ConsoleState>>) -> Self {
        Self {
            state: Rc::clone(state),
        }
    }
}

impl CommandContextDelegate for RosterContext {
    fn resolve_player(&self, _invoker: &Player, token: &str) -> Option<Player> {
        find_player(&self.state.borrow().roster, token).cloned()
    }
}

/// Register every demo command module.
pub fn register_demo_commands(
    manager: &mut CommandManager,
    state: &Rc<RefCell<ConsoleState>>,
) -> Result<(), ConfigurationError> {
    register_radio_commands(manager, state)?;
    register_message_commands(manager, state)?;
    register_money_commands(manager, state)?;
    Ok(())
}

/// `/radio` toggles the radio; `/radio options [channel]?` lists or picks a
/// channel, where channel 0 disables the radio.
fn register_radio_commands(
    manager: &mut CommandManager,
    state: &Rc<RefCell<ConsoleState>>,
) -> Result<(), ConfigurationError> {
    let options_state = Rc::clone(state);
    let toggle_state = Rc::clone(state);
    manager
        .build_command("radio")
        .description("Start or stop the in-game radio")
        .sub("options")
        .description("Choose the radio channel you listen to")
        .parameters([CommandParameter::optional("channel", ParameterType::Number)])
        .build(move |player, args| {
            let state = Rc::clone(&options_state);
            async move { on_radio_options(&mut state.borrow_mut(), &player, &args) }
        })?
        .build(move |player, _| {
            let state = Rc::clone(&toggle_state);
            async move { on_radio(&mut state.borrow_mut(), &player) }
        })
}

fn on_radio_options(
    state: &mut ConsoleState,
    player: &Player,
    args: &Arguments,
) -> anyhow::Result<CommandOutput> {
    let Some(choice) = args.number("channel") else {
        let current = state.channel_for(player);
        let mut lines: Vec<String> = RADIO_CHANNELS
            .iter()
            .enumerate()
            .map(|(index, channel)| {
                let selected = if current == Some(*channel) { "X" } else { " " };
                format!("[{selected}] {}. {channel}", index + 1)
            })
            .collect();
        let disabled = if current.is_none() { "X" } else { " " };
        lines.push(format!("[{disabled}] 0. Disable the radio"));
        return Ok(CommandOutput::Lines(lines));
    };

    if choice == 0.0 {
        state.preferred_channel.insert(player.id, None);
        state.listening.remove(&player.id);
        return Ok(CommandOutput::Text("The radio has been disabled.".into()));
    }
    let channel = (choice.fract() == 0.0 && choice >= 1.0)
        .then(|| RADIO_CHANNELS.get(choice as usize - 1))
        .flatten()
        .ok_or_else(|| anyhow!("there is no radio channel {choice}"))?;
    state.preferred_channel.insert(player.id, Some(*channel));
    Ok(CommandOutput::Text(format!(
        "Your preferred radio channel is now {channel}."
    )))
}

fn on_radio(state: &mut ConsoleState, player: &Player) -> anyhow::Result<CommandOutput> {
    let Some(channel) = state.channel_for(player) else {
        return Ok(CommandOutput::Lines(vec![
            "You have disabled the radio.".into(),
            "Use /radio options to pick a channel.".into(),
        ]));
    };
    let operation = if state.listening.remove(&player.id) {
        "stopped"
    } else {
        state.listening.insert(player.id);
        "started"
    };
    Ok(CommandOutput::Lines(vec![
        format!("The radio has {operation} playing {channel}."),
        "Use /radio options to pick another channel.".into(),
    ]))
}

/// `/msg [target] message` delivers a private message.
fn register_message_commands(
    manager: &mut CommandManager,
    state: &Rc<RefCell<ConsoleState>>,
) -> Result<(), ConfigurationError> {
    let state = Rc::clone(state);
    manager
        .build_command("msg")
        .description("Send a private message to another player")
        .parameters([
            CommandParameter::required("target", ParameterType::Player),
            CommandParameter::required("message", ParameterType::Text),
        ])
        .build(move |player, args| {
            let state = Rc::clone(&state);
            async move {
                let target = args
                    .player("target")
                    .ok_or_else(|| anyhow!("target was not bound"))?;
                let message = args.text("message").unwrap_or_default();
                state
                    .borrow_mut()
                    .inbox
                    .push((target.id, format!("{}: {message}", player.name)));
                Ok(CommandOutput::Text(format!("Message sent to {}.", target.name)))
            }
        })
}

/// `/money` shows the balance. `/money give` has two overloads: an amount
/// alone credits the invoking administrator, a target and amount credit
/// someone else.
fn register_money_commands(
    manager: &mut CommandManager,
    state: &Rc<RefCell<ConsoleState>>,
) -> Result<(), ConfigurationError> {
    let self_state = Rc::clone(state);
    let other_state = Rc::clone(state);
    let balance_state = Rc::clone(state);
    let amount = || {
        CommandParameter::with_default("amount", ParameterType::Number, DefaultValue::Number(100.0))
    };

    manager
        .build_command("money")
        .description("Show your balance")
        .parameters([CommandParameter::with_default(
            "player",
            ParameterType::Player,
            DefaultValue::Invoker,
        )?])
        .sub("give")
        .restrict(PlayerLevel::Administrator)
        .parameters([amount()?])
        .build(move |player, args| {
            let state = Rc::clone(&self_state);
            async move { give_money(&mut state.borrow_mut(), &player, &args) }
        })?
        .sub("give")
        .restrict(PlayerLevel::Administrator)
        .parameters([
            CommandParameter::required("target", ParameterType::Player),
            amount()?,
        ])
        .build(move |player, args| {
            let state = Rc::clone(&other_state);
            async move { give_money(&mut state.borrow_mut(), &player, &args) }
        })?
        .build(move |_, args| {
            let state = Rc::clone(&balance_state);
            async move {
                let target = args
                    .player("player")
                    .ok_or_else(|| anyhow!("player was not bound"))?;
                let balance = state.borrow().balance(target);
                Ok(CommandOutput::Text(format!("{} has ${balance}.", target.name)))
            }
        })
}

/// Largest amount a single `/money give` may hand out.
const MAX_GRANT: i64 = 1_000_000_000;

fn give_money(
    state: &mut ConsoleState,
    invoker: &Player,
    args: &Arguments,
) -> anyhow::Result<CommandOutput> {
    let target = args.player("target").unwrap_or(invoker);
    let amount = args.number("amount").unwrap_or_default();
    if amount.fract() != 0.0 {
        return Err(anyhow!("amounts must be whole dollars"));
    }
    if amount.abs() > MAX_GRANT as f64 {
        return Err(anyhow!("at most ${MAX_GRANT} can be given at once"));
    }
    let amount = amount as i64;
    let balance = state.balances.entry(target.id).or_default();
    *balance = balance
        .checked_add(amount)
        .ok_or_else(|| anyhow!("{} cannot hold that much money", target.name))?;
    Ok(CommandOutput::Text(format!(
        "{} received ${amount}.",
        target.name
    )))
}

/// Turn the result of a dispatched line into the messages shown to the
/// player.
pub fn render_outcome(result: Result<Option<ExecutionOutcome>, ExecutionError>) -> Vec<String> {
    match result {
        Ok(None) => vec!["Unknown command. Type :help for a list.".into()],
        Ok(Some(ExecutionOutcome::Completed(CommandOutput::None))) => Vec::new(),
        Ok(Some(ExecutionOutcome::Completed(CommandOutput::Text(text)))) => vec![text],
        Ok(Some(ExecutionOutcome::Completed(CommandOutput::Lines(lines)))) => lines,
        Ok(Some(ExecutionOutcome::Rejected(Rejection::PermissionDenied))) => {
            vec!["Sorry, you don't have permission to use this command.".into()]
        },
        Ok(Some(ExecutionOutcome::Rejected(Rejection::Bind(err)))) => {
            vec![format!("Usage error: {err}")]
        },
        Err(e) => vec![format!("error: {e}")],
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use parlance_commands::DefaultPermissionDelegate;
    use parlance_types::config::CommandConfig;

    use super::*;

    fn setup() -> (CommandManager, Rc<RefCell<ConsoleState>>) {
        let state = Rc::new(RefCell::new(ConsoleState::new(Vec::new())));
        let mut manager = CommandManager::new(
            CommandConfig::default(),
            RosterContext::new(&state),
            DefaultPermissionDelegate,
        );
        register_demo_commands(&mut manager, &state).unwrap();
        (manager, state)
    }

    fn run(manager: &CommandManager, player: &Player, line: &str) -> Vec<String> {
        render_outcome(block_on(manager.execute(player, line)))
    }

    #[test]
    fn radio_toggles_and_changes_channel() {
        let (manager, state) = setup();
        let russell = state.borrow().roster[1].clone();

        let lines = run(&manager, &russell, "/radio");
        assert_eq!(lines[0], "The radio has started playing LVP Radio.");
        assert!(state.borrow().listening.contains(&russell.id));

        let lines = run(&manager, &russell, "/radio options 2");
        assert_eq!(lines, ["Your preferred radio channel is now Jazz."]);

        let lines = run(&manager, &russell, "/radio options");
        assert_eq!(lines[1], "[X] 2. Jazz");

        let lines = run(&manager, &russell, "/radio options 9");
        assert_eq!(
            lines,
            ["error: handler for `/radio options [channel]?` failed: there is no radio channel 9"]
        );

        run(&manager, &russell, "/radio options 0");
        let lines = run(&manager, &russell, "/radio");
        assert_eq!(lines[0], "You have disabled the radio.");
    }

    #[test]
    fn private_messages_resolve_partial_names() {
        let (manager, state) = setup();
        let gunther = state.borrow().roster[0].clone();

        let lines = run(&manager, &gunther, "/msg russ see you at  the ship");
        assert_eq!(lines, ["Message sent to Russell."]);
        assert_eq!(
            state.borrow().inbox,
            [(1, "Gunther: see you at  the ship".to_string())]
        );

        let lines = run(&manager, &gunther, "/msg nobody hi");
        assert_eq!(
            lines,
            ["Usage error: invalid player `nobody` for argument `target`"]
        );
    }

    #[test]
    fn money_overloads_and_restrictions() {
        let (manager, state) = setup();
        let gunther = state.borrow().roster[0].clone();
        let russell = state.borrow().roster[1].clone();

        assert_eq!(run(&manager, &russell, "/money"), ["Russell has $1000."]);
        assert_eq!(run(&manager, &russell, "/money gunther"), ["Gunther has $1000."]);

        assert_eq!(run(&manager, &gunther, "/money give 50"), ["Gunther received $50."]);
        assert_eq!(run(&manager, &gunther, "/money give russell 25"), ["Russell received $25."]);
        assert_eq!(run(&manager, &gunther, "/money give lucy"), ["Lucy received $100."]);
        assert_eq!(state.borrow().balance(&russell), 1025);

        assert_eq!(
            run(&manager, &russell, "/money give 50"),
            ["Sorry, you don't have permission to use this command."]
        );
    }

    #[test]
    fn oversized_grants_are_refused() {
        let (manager, state) = setup();
        let gunther = state.borrow().roster[0].clone();

        assert_eq!(
            run(&manager, &gunther, "/money give 1e19"),
            ["error: handler for `/money give [amount=100]` failed: at most $1000000000 can be given at once"]
        );
        assert_eq!(
            run(&manager, &gunther, "/money give 2.5"),
            ["error: handler for `/money give [amount=100]` failed: amounts must be whole dollars"]
        );
        assert_eq!(state.borrow().balance(&gunther), 1000);

        state.borrow_mut().balances.insert(gunther.id, i64::MAX - 10);
        assert_eq!(
            run(&manager, &gunther, "/money give 100"),
            ["error: handler for `/money give [amount=100]` failed: Gunther cannot hold that much money"]
        );
        assert_eq!(state.borrow().balance(&gunther), i64::MAX - 10);
    }

    #[test]
    fn unknown_commands_are_reported() {
        let (manager, state) = setup();
        let gunther = state.borrow().roster[0].clone();
        assert_eq!(
            run(&manager, &gunther, "/teleport"),
            ["Unknown command. Type :help for a list."]
        );
    }
}
