use std::io::{self, BufRead, Write};
use std::sync::Arc;

use wordsync_core::Msg;
use wordsync_engine::{EngineEvent, FsVault, RonSettingsStore, SyncOutcome};

use super::console::{parse_line, ConsoleInput, HELP};
use super::plugin::WordCountPlugin;
use crate::Cli;

pub fn run_app(cli: &Cli) -> anyhow::Result<()> {
    let vault = Arc::new(FsVault::new(&cli.vault));
    let store = Arc::new(RonSettingsStore::new(&cli.settings));
    let mut plugin = WordCountPlugin::load(vault, store)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(stdout, "wordsync: vault {:?}, type `help` for commands", cli.vault)?;

    for line in stdin.lock().lines() {
        let line = line?;
        match parse_line(&line) {
            ConsoleInput::Focus(document) => plugin.dispatch(Msg::FocusChanged(Some(document))),
            ConsoleInput::Blur => plugin.dispatch(Msg::FocusChanged(None)),
            ConsoleInput::Invoke(id) => {
                if !plugin.invoke(&id) {
                    writeln!(stdout, "unknown command: {id}")?;
                }
            }
            ConsoleInput::Property(name) => plugin.dispatch(Msg::PropertyNameEdited(name)),
            ConsoleInput::Status => {
                let view = plugin.view();
                let active = view
                    .active_document
                    .map(|document| document.to_string())
                    .unwrap_or_else(|| "(none)".to_string());
                writeln!(stdout, "active: {active}, property: {}", view.property_name)?;
            }
            ConsoleInput::Commands => {
                for command in plugin.commands().iter() {
                    writeln!(stdout, "{:<26}{}", command.id, command.name)?;
                }
            }
            ConsoleInput::Help => writeln!(stdout, "{HELP}")?,
            ConsoleInput::Quit => break,
            ConsoleInput::Empty => {}
            ConsoleInput::Unknown(text) => writeln!(stdout, "unrecognised input: {text}")?,
        }
        report(&mut stdout, plugin.poll_events())?;
    }

    report(&mut stdout, plugin.unload())?;
    Ok(())
}

fn report(out: &mut impl Write, events: Vec<EngineEvent>) -> io::Result<()> {
    for EngineEvent::Completed { command, result } in events {
        match result {
            Ok(SyncOutcome::Updated { count, .. }) => {
                writeln!(out, "{}: {count} words", command.document())?
            }
            Ok(SyncOutcome::Removed) => {
                writeln!(out, "{}: tracked property removed", command.document())?
            }
            Ok(SyncOutcome::Skipped(_)) => {}
            Err(err) => writeln!(out, "{}: {err}", command.document())?,
        }
    }
    Ok(())
}
