use crate::{AppState, Effect, Msg, SyncTrigger};

/// Pure update function: applies a message to state and returns any effects.
///
/// The tracker swap for a focus change happens here, before any effect runs, so
/// a burst of focus changes is recorded in delivery order no matter how long the
/// resulting syncs take.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FocusChanged(next) => {
            let previous = state.tracker_mut().swap(next.clone());
            match previous {
                // Re-focusing the same document is not a transition away from it.
                Some(document) if Some(&document) != next.as_ref() => {
                    vec![Effect::SyncDocument {
                        document,
                        property_name: state.settings().property_name().to_string(),
                        trigger: SyncTrigger::FocusLost,
                    }]
                }
                _ => Vec::new(),
            }
        }
        Msg::SyncNowInvoked => match state.active_document() {
            Some(document) => vec![Effect::SyncDocument {
                document: document.clone(),
                property_name: state.settings().property_name().to_string(),
                trigger: SyncTrigger::Manual,
            }],
            None => Vec::new(),
        },
        Msg::RemoveTrackedInvoked => match state.active_document() {
            Some(document) => vec![Effect::RemoveProperty {
                document: document.clone(),
                property_name: state.settings().property_name().to_string(),
            }],
            None => Vec::new(),
        },
        Msg::PropertyNameEdited(name) => {
            if name.trim() == state.settings().property_name() {
                Vec::new()
            } else if state.settings_mut().set_property_name(&name).is_ok() {
                vec![Effect::PersistSettings(state.settings().clone())]
            } else {
                Vec::new()
            }
        }
        Msg::SettingsLoaded(settings) => {
            *state.settings_mut() = settings.sanitized();
            Vec::new()
        }
        Msg::Shutdown => {
            state.tracker_mut().clear();
            Vec::new()
        }
    };

    (state, effects)
}
