use wordsync_core::Msg;

pub const SYNC_WORD_COUNT: &str = "sync-word-count";
pub const REMOVE_TRACKED_PROPERTY: &str = "remove-tracked-property";

/// A user-invokable action surfaced by the host.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub id: &'static str,
    pub name: &'static str,
    msg: Msg,
}

#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: Vec<CommandSpec>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The commands the word count plugin exposes.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(SYNC_WORD_COUNT, "Sync word count", Msg::SyncNowInvoked);
        registry.register(
            REMOVE_TRACKED_PROPERTY,
            "Remove tracked property",
            Msg::RemoveTrackedInvoked,
        );
        registry
    }

    /// Registers a command; a later registration with the same id replaces the earlier one.
    pub fn register(&mut self, id: &'static str, name: &'static str, msg: Msg) {
        self.commands.retain(|command| command.id != id);
        self.commands.push(CommandSpec { id, name, msg });
    }

    pub fn message(&self, id: &str) -> Option<Msg> {
        self.commands
            .iter()
            .find(|command| command.id == id)
            .map(|command| command.msg.clone())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.iter()
    }
}
