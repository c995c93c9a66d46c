use std::sync::Arc;

use sync_logging::sync_info;
use wordsync_core::{update, AppState, AppViewModel, Msg};
use wordsync_engine::{EngineEvent, SettingsStore, Vault};

use super::commands::CommandRegistry;
use super::effects::EffectRunner;
use super::persistence::load_settings;

/// The word count plugin as seen by its host: constructed by [`WordCountPlugin::load`],
/// fed host events through [`WordCountPlugin::dispatch`], torn down by
/// [`WordCountPlugin::unload`].
pub struct WordCountPlugin {
    state: AppState,
    effects: EffectRunner,
    commands: CommandRegistry,
}

impl WordCountPlugin {
    pub fn load(vault: Arc<dyn Vault>, store: Arc<dyn SettingsStore>) -> anyhow::Result<Self> {
        let settings = load_settings(store.as_ref());
        let (state, _) = update(AppState::new(), Msg::SettingsLoaded(settings));
        let effects = EffectRunner::new(vault, store)?;
        sync_info!(
            "Plugin loaded, tracking property {:?}",
            state.settings().property_name()
        );
        Ok(Self {
            state,
            effects,
            commands: CommandRegistry::with_defaults(),
        })
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (next, effects) = update(state, msg);
        self.state = next;
        self.effects.enqueue(effects);
    }

    /// Runs a registered command; returns `false` for an unknown id.
    pub fn invoke(&mut self, id: &str) -> bool {
        match self.commands.message(id) {
            Some(msg) => {
                self.dispatch(msg);
                true
            }
            None => false,
        }
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn poll_events(&self) -> Vec<EngineEvent> {
        self.effects.drain_events()
    }

    #[cfg(test)]
    pub fn wait_event(&self, timeout: std::time::Duration) -> Option<EngineEvent> {
        self.effects.next_event(timeout)
    }

    /// Forgets the focused document, lets in-flight syncs finish, and returns
    /// whatever completions were still unreported.
    pub fn unload(mut self) -> Vec<EngineEvent> {
        self.dispatch(Msg::Shutdown);
        self.effects.shutdown();
        sync_info!("Plugin unloaded");
        self.effects.drain_events()
    }
}
