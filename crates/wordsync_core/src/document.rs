use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Parsed frontmatter of a document: ordered keys mapped to scalar or structured values.
pub type Header = serde_json::Map<String, serde_json::Value>;

/// Host handle for a document, as a vault-relative path with `/` separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(path: impl Into<String>) -> Self {
        let raw: String = path.into();
        let normalized = raw.replace('\\', "/");
        Self(normalized.trim_start_matches("./").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
