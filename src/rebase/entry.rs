//! Flat rebase entries as produced and consumed by the todo script.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Action verb of a single todo script line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Use the commit as is.
    Pick,
    /// Use the commit but edit its message.
    Reword,
    /// Stop after applying the commit.
    Edit,
    /// Remove the commit.
    Drop,
    /// Meld into the previous commit, discarding this message.
    Fixup,
    /// Meld into the previous commit, keeping this message.
    Squash,
    /// Update a ref to point at the current position.
    UpdateRef,
    /// Any instruction the model does not understand (exec, break, label...).
    Other,
}

impl Action {
    /// Returns the verb written to the todo script.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Pick => "pick",
            Action::Reword => "reword",
            Action::Edit => "edit",
            Action::Drop => "drop",
            Action::Fixup => "fixup",
            Action::Squash => "squash",
            Action::UpdateRef => "update-ref",
            Action::Other => "other",
        }
    }

    /// Parses a full verb or its single letter abbreviation.
    pub fn from_verb(verb: &str) -> Option<Self> {
        match verb {
            "pick" | "p" => Some(Action::Pick),
            "reword" | "r" => Some(Action::Reword),
            "edit" | "e" => Some(Action::Edit),
            "drop" | "d" => Some(Action::Drop),
            "fixup" | "f" => Some(Action::Fixup),
            "squash" | "s" => Some(Action::Squash),
            "update-ref" | "u" => Some(Action::UpdateRef),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message option of a `fixup` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageFlag {
    /// `fixup -C`: use this commit's message for the melded commit.
    Use,
    /// `fixup -c`: same as `-C`, opening the editor.
    Edit,
}

impl MessageFlag {
    /// The option as written in the todo script.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageFlag::Use => "-C",
            MessageFlag::Edit => "-c",
        }
    }

    /// Parses `-C` or `-c`.
    pub fn from_option(option: &str) -> Option<Self> {
        match option {
            "-C" => Some(MessageFlag::Use),
            "-c" => Some(MessageFlag::Edit),
            _ => None,
        }
    }
}

/// Anything that can sit in the todo model.
///
/// The model never changes an entry; it only tracks what the user wants
/// to do with it. The current action is reported back through
/// [`CommitAction`] when the model is flattened.
pub trait RebaseEntry {
    /// Commit hash, or the ref name for update-ref entries.
    fn commit_id(&self) -> &str;

    /// First line of the commit message.
    fn subject(&self) -> &str;

    /// Action the entry had when it was loaded.
    fn action(&self) -> Action;

    /// Message option of a loaded `fixup` entry.
    fn message_flag(&self) -> Option<MessageFlag> {
        None
    }
}

/// A commit plus an action verb.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitAction {
    /// Commit hash (abbreviated or full) or ref name.
    pub commit_id: String,
    /// Commit subject line.
    pub subject: String,
    /// Requested action.
    pub action: Action,
    /// `-C`/`-c` option of a fixup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_flag: Option<MessageFlag>,
}

impl CommitAction {
    /// Creates a new commit action.
    pub fn new(commit_id: impl Into<String>, subject: impl Into<String>, action: Action) -> Self {
        Self {
            commit_id: commit_id.into(),
            subject: subject.into(),
            action,
            message_flag: None,
        }
    }

    /// Sets the `-C`/`-c` option.
    pub fn with_message_flag(mut self, flag: Option<MessageFlag>) -> Self {
        self.message_flag = flag;
        self
    }
}

impl RebaseEntry for CommitAction {
    fn commit_id(&self) -> &str {
        &self.commit_id
    }

    fn subject(&self) -> &str {
        &self.subject
    }

    fn action(&self) -> Action {
        self.action
    }

    fn message_flag(&self) -> Option<MessageFlag> {
        self.message_flag
    }
}
