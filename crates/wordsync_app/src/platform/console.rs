//! Line commands standing in for the editor host's events.

use wordsync_core::DocumentId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    Focus(DocumentId),
    Blur,
    Invoke(String),
    Property(String),
    Status,
    Commands,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub const HELP: &str = "\
focus <path>     switch the active document
blur             leave the active document without opening another
sync             run sync-word-count on the active document
remove           run remove-tracked-property on the active document
run <command-id> run any registered command
property <name>  change the tracked property name
status           show the active document and property name
commands         list registered commands
quit             unload and exit";

pub fn parse_line(line: &str) -> ConsoleInput {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    match (word, rest) {
        ("", _) => ConsoleInput::Empty,
        ("focus" | "open", path) if !path.is_empty() => ConsoleInput::Focus(DocumentId::new(path)),
        ("blur", "") => ConsoleInput::Blur,
        ("sync", "") => ConsoleInput::Invoke(super::commands::SYNC_WORD_COUNT.to_string()),
        ("remove", "") => {
            ConsoleInput::Invoke(super::commands::REMOVE_TRACKED_PROPERTY.to_string())
        }
        ("run", id) if !id.is_empty() => ConsoleInput::Invoke(id.to_string()),
        ("property", name) if !name.is_empty() => ConsoleInput::Property(name.to_string()),
        ("status", "") => ConsoleInput::Status,
        ("commands", "") => ConsoleInput::Commands,
        ("help" | "?", "") => ConsoleInput::Help,
        ("quit" | "exit", "") => ConsoleInput::Quit,
        _ => ConsoleInput::Unknown(line.to_string()),
    }
}
