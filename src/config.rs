//! Sous configuration.
//!
//! Loaded from `~/.sous/config.toml`. Every key is optional and a missing
//! file means defaults:
//!
//! ```toml
//! member = "ana"                        # who is cooking, unless overridden
//! database = "/path/to/sous.sqlite"     # default: ~/.sous/sous.sqlite
//! knowledge-file = "~/.sous/kitchen.toml"  # extra substitutions/techniques
//! log-level = "info"                    # default: warn
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::knowledge::KnowledgeBase;
use crate::storage::Storage;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// The member whose session commands act on.
    /// Overridden by `--member` and `SOUS_MEMBER`.
    pub member: Option<String>,

    pub database: Option<PathBuf>,

    /// A TOML knowledge file laid over the builtin tables.
    pub knowledge_file: Option<PathBuf>,

    pub log_level: Option<String>,
}

impl Config {
    /// Load config from `~/.sous/config.toml`, or defaults if it doesn't exist.
    pub fn load() -> Result<Self, String> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        toml::from_str(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    /// The config file path: `~/.sous/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".sous").join("config.toml"))
    }

    pub fn database_path(&self) -> Option<PathBuf> {
        self.database
            .as_deref()
            .map(expand_home)
            .or_else(Storage::default_path)
    }

    /// The builtin knowledge base, with the configured knowledge file merged over it.
    pub fn knowledge(&self) -> Result<KnowledgeBase, String> {
        let builtin = KnowledgeBase::builtin();
        let Some(path) = self.knowledge_file.as_deref().map(expand_home) else {
            return Ok(builtin);
        };
        let overrides = KnowledgeBase::load(&path)
            .map_err(|e| format!("failed to load knowledge file {}: {e}", path.display()))?;
        let knowledge = builtin.merge(overrides);
        tracing::debug!(
            path = %path.display(),
            substitutions = knowledge.substitution_count(),
            techniques = knowledge.technique_count(),
            "loaded knowledge file"
        );
        Ok(knowledge)
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}
