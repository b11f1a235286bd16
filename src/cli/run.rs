//! Run command — drives a whole interactive rebase from an edit plan.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::data::EditPlan;
use crate::git::{RebaseOutcome, RebaseRunner};

/// Run command options.
#[derive(Parser)]
pub struct RunCommand {
    /// YAML edit plan applied to the generated todo list.
    #[arg(long, value_name = "PLAN")]
    pub plan: PathBuf,

    /// Reword message store (defaults to the configured location).
    #[arg(long, value_name = "FILE")]
    pub messages: Option<PathBuf>,

    /// Upstream revision to rebase onto (e.g. `HEAD~3`).
    #[arg(value_name = "BASE")]
    pub base: String,
}

impl RunCommand {
    /// Executes the run command.
    pub fn execute(self) -> Result<()> {
        // Fail on a broken plan before git starts anything.
        EditPlan::load_from_file(&self.plan)?;

        let mut runner = RebaseRunner::open(".").context("Failed to open repository")?;
        if let Some(messages) = self.messages {
            runner = runner.with_messages(messages);
        }
        runner.check_no_operation_in_progress()?;
        runner
            .check_working_directory_clean()
            .context("Cannot rebase with uncommitted changes")?;

        println!("🔄 Rebasing onto {}", self.base);
        match runner.run_interactive(&self.base, &self.plan)? {
            RebaseOutcome::Completed => println!("✅ Rebase completed successfully"),
            RebaseOutcome::Stopped => {
                println!("⏸️  Rebase stopped for editing; run `git rebase --continue` when done")
            }
        }

        Ok(())
    }
}
