//! Message editor command — what git runs as `GIT_EDITOR` during a rebase.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use crate::data::RewordedMessageStore;

/// Message editor options.
#[derive(Parser)]
pub struct MessageEditorCommand {
    /// Reword message store (defaults to the configured location).
    #[arg(long, value_name = "FILE")]
    pub messages: Option<PathBuf>,

    /// Commit message file git asks to edit.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

impl MessageEditorCommand {
    /// Executes the message editor command.
    ///
    /// Messages without a stored replacement are left untouched, which
    /// keeps git's default message for squashes and plain edits.
    pub fn execute(self) -> Result<()> {
        let path = super::messages_path(self.messages.as_deref())?;
        let store = RewordedMessageStore::load_from_file(&path)?;

        // Look up the message git is asking about by its subject line
        let current = fs::read_to_string(&self.file)
            .with_context(|| format!("Failed to read message file: {}", self.file.display()))?;

        match store.apply_to_message(&current) {
            Some(message) => fs::write(&self.file, message).with_context(|| {
                format!("Failed to write message file: {}", self.file.display())
            }),
            None => {
                debug!("No stored message for {}", self.file.display());
                Ok(())
            }
        }
    }
}
