use std::sync::Arc;

use sync_logging::{sync_info, sync_warn};
use wordsync_core::Effect;
use wordsync_engine::{
    EngineEvent, EngineHandle, SettingsStore, SyncCommand, SyncDriver, SyncOutcome, Vault,
};

use super::persistence::save_settings;

pub struct EffectRunner {
    engine: EngineHandle,
    store: Arc<dyn SettingsStore>,
}

impl EffectRunner {
    pub fn new(vault: Arc<dyn Vault>, store: Arc<dyn SettingsStore>) -> std::io::Result<Self> {
        let engine = EngineHandle::new(vault, SyncDriver::default())?;
        Ok(Self { engine, store })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SyncDocument {
                    document,
                    property_name,
                    trigger,
                } => {
                    sync_info!("SyncDocument {} trigger={:?}", document, trigger);
                    self.engine.enqueue(SyncCommand::Sync {
                        document,
                        property_name,
                        trigger,
                    });
                }
                Effect::RemoveProperty {
                    document,
                    property_name,
                } => {
                    sync_info!("RemoveProperty {} property={}", document, property_name);
                    self.engine.enqueue(SyncCommand::RemoveProperty {
                        document,
                        property_name,
                    });
                }
                Effect::PersistSettings(settings) => {
                    save_settings(self.store.as_ref(), &settings);
                }
            }
        }
    }

    /// Collects completions that are already available.
    pub fn drain_events(&self) -> Vec<EngineEvent> {
        std::iter::from_fn(|| self.engine.try_recv())
            .inspect(log_event)
            .collect()
    }

    #[cfg(test)]
    pub fn next_event(&self, timeout: std::time::Duration) -> Option<EngineEvent> {
        let event = self.engine.recv_timeout(timeout);
        if let Some(event) = &event {
            log_event(event);
        }
        event
    }

    pub fn shutdown(&mut self) {
        self.engine.shutdown();
    }
}

fn log_event(event: &EngineEvent) {
    match event {
        EngineEvent::Completed {
            command,
            result: Ok(SyncOutcome::Skipped(reason)),
        } => {
            sync_info!("{} skipped: {:?}", command.document(), reason);
        }
        EngineEvent::Completed {
            result: Ok(_), ..
        } => {}
        EngineEvent::Completed {
            command,
            result: Err(err),
        } => {
            sync_warn!("Sync of {} failed: {}", command.document(), err);
        }
    }
}
