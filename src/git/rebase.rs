//! Running `git rebase -i` with this tool as sequence and message editor.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use git2::{Repository, RepositoryState};
use tracing::{debug, info};

use crate::git::SHORT_HASH_LEN;

/// Outcome of an interactive rebase run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebaseOutcome {
    /// All todo lines were applied.
    Completed,
    /// Git stopped at an `edit` row; the user continues manually.
    Stopped,
}

/// Interactive rebase driver for one repository.
pub struct RebaseRunner {
    repo: Repository,
    workdir: PathBuf,
    editor: Option<PathBuf>,
    messages: Option<PathBuf>,
}

impl RebaseRunner {
    /// Opens the repository at (or above) `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Repository::discover(path)
            .with_context(|| format!("Not in a git repository: {}", path.display()))?;
        let workdir = repo
            .workdir()
            .context("Cannot rebase in a bare repository")?
            .to_path_buf();
        Ok(Self {
            repo,
            workdir,
            editor: None,
            messages: None,
        })
    }

    /// Uses `exe` as the sequence and commit editor instead of the running
    /// binary.
    pub fn with_editor(mut self, exe: impl Into<PathBuf>) -> Self {
        self.editor = Some(exe.into());
        self
    }

    /// Passes `--messages <path>` to both editor steps.
    pub fn with_messages(mut self, path: impl Into<PathBuf>) -> Self {
        self.messages = Some(path.into());
        self
    }

    /// Fails when there are uncommitted changes (ignored files excluded).
    pub fn check_working_directory_clean(&self) -> Result<()> {
        let statuses = self
            .repo
            .statuses(None)
            .context("Failed to get repository status")?;

        let dirty: Vec<String> = statuses
            .iter()
            .filter(|entry| !entry.status().is_ignored())
            .map(|entry| entry.path().unwrap_or("unknown").to_string())
            .collect();

        if !dirty.is_empty() {
            debug!("Uncommitted changes: {dirty:?}");
            anyhow::bail!(
                "Working directory is not clean ({} changed paths). Please commit or stash changes before rebasing.",
                dirty.len()
            );
        }

        Ok(())
    }

    /// Fails when another rebase, merge or cherry-pick is in progress.
    pub fn check_no_operation_in_progress(&self) -> Result<()> {
        let state = self.repo.state();
        if state != RepositoryState::Clean {
            anyhow::bail!("Repository is busy with another operation: {:?}", state);
        }
        Ok(())
    }

    /// Resolves `rev` to a full commit hash.
    pub fn resolve_base(&self, rev: &str) -> Result<String> {
        let commit = self
            .repo
            .revparse_single(rev)
            .and_then(|object| object.peel_to_commit())
            .with_context(|| format!("Cannot resolve rebase base: {}", rev))?;
        Ok(commit.id().to_string())
    }

    /// Runs `git rebase -i <base>` with `rebase-todo apply --plan <plan>` as
    /// sequence editor and `rebase-todo message-editor` as commit editor.
    pub fn run_interactive(&self, base: &str, plan: &Path) -> Result<RebaseOutcome> {
        let base = self.resolve_base(base)?;

        // git runs the editors from the work tree, so every path is absolute
        let exe = match &self.editor {
            Some(exe) => exe.clone(),
            None => std::env::current_exe().context("Failed to locate the rebase-todo binary")?,
        };
        let plan = plan
            .canonicalize()
            .with_context(|| format!("Edit plan not found: {}", plan.display()))?;
        let messages_arg = match &self.messages {
            Some(path) => format!(" --messages {}", shell_quote(&absolute(path)?.to_string_lossy())),
            None => String::new(),
        };

        // Build editor commands
        let exe = shell_quote(&exe.to_string_lossy());
        let sequence_editor = format!(
            "{exe} apply --plan {}{messages_arg}",
            shell_quote(&plan.to_string_lossy())
        );
        let message_editor = format!("{exe} message-editor{messages_arg}");
        debug!("Sequence editor: {sequence_editor}");

        info!(
            "Starting interactive rebase onto {}",
            &base[..SHORT_HASH_LEN]
        );
        // Execute rebase with this tool editing the todo and messages
        let output = Command::new("git")
            .args(["rebase", "-i", &base])
            .current_dir(&self.workdir)
            .env("GIT_SEQUENCE_EDITOR", &sequence_editor)
            .env("GIT_EDITOR", &message_editor)
            .output()
            .context("Failed to start interactive rebase")?;

        if !output.status.success() {
            let error_msg = String::from_utf8_lossy(&output.stderr).to_string();

            // Best-effort cleanup; the rebase may not have started.
            self.abort_rebase();
            anyhow::bail!("Interactive rebase failed: {}", error_msg.trim());
        }

        // An edit row leaves the rebase open
        match self.repo.state() {
            RepositoryState::Clean => Ok(RebaseOutcome::Completed),
            RepositoryState::RebaseInteractive | RepositoryState::RebaseMerge => {
                Ok(RebaseOutcome::Stopped)
            }
            state => anyhow::bail!("Repository in unexpected state after rebase: {:?}", state),
        }
    }

    /// Best-effort `git rebase --abort`; the rebase may not have started.
    fn abort_rebase(&self) {
        if self.repo.state() == RepositoryState::Clean {
            return;
        }
        if let Err(e) = Command::new("git")
            .args(["rebase", "--abort"])
            .current_dir(&self.workdir)
            .output()
        {
            debug!("Rebase abort during cleanup failed: {e}");
        }
    }
}

/// Makes `path` absolute against the current directory.
fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    Ok(cwd.join(path))
}

/// Quotes `value` for the shell git runs editors through.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
