//! Store of replacement commit messages for reworded commits.
//!
//! The todo model only carries the new message inside the reword type; the
//! store keeps it on disk, keyed by the original subject, so the commit
//! message editor step of the rebase (and later attempts of the same
//! rebase) can find it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::rebase::{ElementType, KeepCommit, NonUnite, RebaseEntry, RebaseTodoModel};
use crate::utils::settings::{self, Settings};

/// Environment variable overriding the store location.
pub const MESSAGES_FILE_ENV: &str = "REBASE_TODO_MESSAGES_FILE";

const DEFAULT_FILE_NAME: &str = "reworded-messages.yaml";

/// Replacement messages keyed by original commit subject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewordedMessageStore {
    /// Original subject -> new full message.
    #[serde(default)]
    pub messages: BTreeMap<String, String>,
}

impl RewordedMessageStore {
    /// Resolves the store location: environment (or settings `env`), then
    /// `messagesFile` from settings, then the config directory.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = settings::get_env_var(MESSAGES_FILE_ENV) {
            return Ok(PathBuf::from(path));
        }

        let settings = Settings::load()?;
        if let Some(path) = settings.messages_file {
            return Ok(path);
        }

        Ok(Settings::get_config_dir()?.join(DEFAULT_FILE_NAME))
    }

    /// Loads the store; a missing file is an empty store.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No reword message store at {}", path.display());
            return Ok(Self::default());
        }

        crate::data::read_yaml_file(path)
    }

    /// Saves the store as YAML.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        crate::data::write_yaml_file(self, path)
    }

    /// Message stored for `subject`.
    pub fn get(&self, subject: &str) -> Option<&str> {
        self.messages.get(subject.trim()).map(String::as_str)
    }

    /// Stores `message` for `subject`, replacing any previous one.
    pub fn insert(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        let subject: String = subject.into();
        self.messages.insert(subject.trim().to_string(), message.into());
    }

    /// Records every reworded row of `model`. Returns how many were recorded.
    pub fn record_rewords<T: RebaseEntry>(&mut self, model: &RebaseTodoModel<T>) -> usize {
        let mut recorded = 0;
        for element in model.elements() {
            if let ElementType::NonUnite(NonUnite::KeepCommit(KeepCommit::Reword(message))) =
                element.element_type()
            {
                self.insert(element.entry().subject(), message);
                recorded += 1;
            }
        }
        recorded
    }

    /// Returns the replacement for a commit message being edited, if its
    /// subject (first non-comment line) has one.
    pub fn apply_to_message(&self, text: &str) -> Option<String> {
        let subject = text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && !line.starts_with('#'))?;

        self.get(subject).map(|message| {
            let mut replaced = message.trim_end().to_string();
            replaced.push('\n');
            replaced
        })
    }
}
