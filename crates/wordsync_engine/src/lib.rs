//! Wordsync engine: host collaborators, the sync driver and effect execution.
mod driver;
mod engine;
mod frontmatter;
mod host;
mod persist;
mod settings_store;
mod types;
mod vault;

pub use driver::SyncDriver;
pub use engine::EngineHandle;
pub use frontmatter::{render_document, split_document, FrontmatterBlock, FrontmatterError};
pub use host::{HeaderEdit, HeaderMutator, MetadataCache, TextReader, Vault};
pub use persist::{ensure_dir, write_atomic, PersistError};
pub use settings_store::{RonSettingsStore, SettingsStore, SettingsStoreError};
pub use types::{EngineEvent, HostError, SkipReason, SyncCommand, SyncError, SyncOutcome};
pub use vault::FsVault;
