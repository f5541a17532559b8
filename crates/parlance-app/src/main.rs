//! Parlance console entry point.
//!
//! Reads lines from standard input and dispatches them as if typed by the
//! acting player. Lines starting with `:` control the console itself:
//! `:as <player>` switches the acting player, `:help` lists the commands
//! they can use, `:inbox` shows delivered messages and `:quit` exits.
//!
//! The first argument (or `PARLANCE_CONFIG`) names a TOML configuration file.

mod app_state;
mod commands;

use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use futures::executor::block_on;
use parlance_commands::{CommandManager, DefaultPermissionDelegate, find_player};
use parlance_types::config::CommandConfig;

use app_state::ConsoleState;
use commands::{RosterContext, register_demo_commands, render_outcome};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("PARLANCE_CONFIG").ok())
        .map(PathBuf::from);
    let config = match &config_path {
        Some(path) => CommandConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => CommandConfig::default(),
    };

    let state = Rc::new(RefCell::new(ConsoleState::new(config.players.clone())));
    let mut manager = CommandManager::new(
        config,
        RosterContext::new(&state),
        DefaultPermissionDelegate,
    );
    register_demo_commands(&mut manager, &state)?;
    log::info!(
        "Registered {} commands, acting as {}",
        manager.registry().len(),
        state.borrow().acting_player()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let output = match line.strip_prefix(':') {
            Some(control) => match console_command(control, &manager, &state) {
                Some(output) => output,
                None => break,
            },
            None => {
                let player = state.borrow().acting_player().clone();
                render_outcome(block_on(manager.execute(&player, line)))
            },
        };
        for message in output {
            writeln!(stdout, "{message}")?;
        }
        stdout.flush()?;
    }

    log::info!("Console closed");
    Ok(())
}

/// Handle a console control line. Returns `None` when the console should
/// exit.
fn console_command(
    line: &str,
    manager: &CommandManager,
    state: &Rc<RefCell<ConsoleState>>,
) -> Option<Vec<String>> {
    let (command, argument) = parlance_commands::binding::split_first_token(line);
    let output = match command {
        "quit" | "exit" => return None,
        "as" => {
            let mut state = state.borrow_mut();
            let found = find_player(&state.roster, argument)
                .and_then(|player| state.roster.iter().position(|p| p.id == player.id));
            match found {
                Some(index) => {
                    state.acting = index;
                    vec![format!("Now acting as {}.", state.acting_player())]
                },
                None => vec![format!("No single player matches {argument:?}.")],
            }
        },
        "help" => {
            let player = state.borrow().acting_player().clone();
            manager.usage_for(&player)
        },
        "inbox" => state
            .borrow()
            .inbox
            .iter()
            .map(|(id, message)| format!("to {id}: {message}"))
            .collect(),
        _ => vec![format!("Unknown console command :{command}")],
    };
    Some(output)
}
