//! CLI interface for rebase-todo.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod apply;
pub mod message_editor;
pub mod run;
pub mod show;

/// rebase-todo: scripted editing of interactive rebase todo lists.
#[derive(Parser)]
#[command(name = "rebase-todo")]
#[command(about = "Edit interactive rebase todo lists from YAML plans", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Prints the todo model of a todo script as YAML.
    Show(show::ShowCommand),
    /// Applies an edit plan to a todo script in place (sequence editor mode).
    Apply(apply::ApplyCommand),
    /// Replaces a commit message from the reword store (commit editor mode).
    #[command(name = "message-editor")]
    MessageEditor(message_editor::MessageEditorCommand),
    /// Runs `git rebase -i` driven by an edit plan.
    Run(run::RunCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Show(cmd) => cmd.execute(),
            Commands::Apply(cmd) => cmd.execute(),
            Commands::MessageEditor(cmd) => cmd.execute(),
            Commands::Run(cmd) => cmd.execute(),
        }
    }
}

/// Resolves the reword store path from an optional command line override.
pub(crate) fn messages_path(
    messages: Option<&std::path::Path>,
) -> Result<std::path::PathBuf> {
    match messages {
        Some(path) => Ok(path.to_path_buf()),
        None => crate::data::RewordedMessageStore::default_path(),
    }
}
