//! Show command — prints the todo model of a todo script.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::data::TodoView;
use crate::rebase::{parse_script, to_model};

/// Show command options.
#[derive(Parser)]
pub struct ShowCommand {
    /// Todo script (e.g. `.git/rebase-merge/git-rebase-todo`).
    #[arg(value_name = "TODO_FILE")]
    pub todo_file: PathBuf,
}

impl ShowCommand {
    /// Executes the show command.
    pub fn execute(self) -> Result<()> {
        let yaml = self.render()?;
        print!("{yaml}");
        Ok(())
    }

    /// Renders the model view as YAML.
    pub fn render(&self) -> Result<String> {
        let script = fs::read_to_string(&self.todo_file)
            .with_context(|| format!("Failed to read todo file: {}", self.todo_file.display()))?;
        let entries = parse_script(&script)?;
        let model = to_model(entries).context("Failed to build todo model")?;

        crate::data::to_yaml(&TodoView::from_model(&model))
    }
}
