//! Wordsync core: word counting, the opt-in gate and the focus state machine.
mod counter;
mod document;
mod effect;
mod frontmatter;
mod gate;
mod msg;
mod settings;
mod state;
mod tracker;
mod update;
mod view_model;

pub use counter::{count_words, WordCharCounter, WordCounter};
pub use document::{DocumentId, Header};
pub use effect::{Effect, SyncTrigger};
pub use frontmatter::{frontmatter_span, strip_frontmatter, DELIMITER};
pub use gate::is_eligible;
pub use msg::Msg;
pub use settings::{Settings, SettingsError, DEFAULT_PROPERTY_NAME};
pub use state::AppState;
pub use tracker::ActiveDocumentTracker;
pub use update::update;
pub use view_model::AppViewModel;
