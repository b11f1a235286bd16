//! Apply command — edits a todo script in place from an edit plan.
//!
//! This is what git runs as `GIT_SEQUENCE_EDITOR`.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use crate::data::{EditPlan, RewordedMessageStore};
use crate::rebase::{format_script, parse_script, to_entries, to_model};

/// Apply command options.
#[derive(Parser)]
pub struct ApplyCommand {
    /// YAML edit plan.
    #[arg(long, value_name = "PLAN")]
    pub plan: PathBuf,

    /// Reword message store (defaults to the configured location).
    #[arg(long, value_name = "FILE")]
    pub messages: Option<PathBuf>,

    /// Todo script to rewrite.
    #[arg(value_name = "TODO_FILE")]
    pub todo_file: PathBuf,
}

impl ApplyCommand {
    /// Executes the apply command.
    pub fn execute(self) -> Result<()> {
        let plan = EditPlan::load_from_file(&self.plan)?;

        let script = fs::read_to_string(&self.todo_file)
            .with_context(|| format!("Failed to read todo file: {}", self.todo_file.display()))?;
        let rewritten = self.rewrite(&script, &plan)?;

        fs::write(&self.todo_file, rewritten).with_context(|| {
            format!("Failed to write todo file: {}", self.todo_file.display())
        })?;

        Ok(())
    }

    /// Applies `plan` to `script`, records rewords and returns the new script.
    pub fn rewrite(&self, script: &str, plan: &EditPlan) -> Result<String> {
        // Load the todo list and run the plan against it
        let entries = parse_script(script)?;
        let mut model = to_model(entries).context("Failed to build todo model")?;
        plan.apply(&mut model)?;

        // Merge new reword messages into the store for the message editor
        let mut store = RewordedMessageStore::default();
        if store.record_rewords(&model) > 0 {
            let path = super::messages_path(self.messages.as_deref())?;
            let mut saved = RewordedMessageStore::load_from_file(&path)?;
            saved.messages.append(&mut store.messages);
            saved.save_to_file(&path)?;
            debug!("Saved reword messages to {}", path.display());
        }

        // Write the edited list back in todo script form
        let entries = to_entries(&model);
        info!("Writing {} todo entries", entries.len());
        Ok(format_script(&entries))
    }
}
