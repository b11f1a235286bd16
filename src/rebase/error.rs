//! Errors raised while loading a todo list.

use thiserror::Error;

use super::entry::Action;

/// Failures turning todo script lines into a model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TodoError {
    /// The action is not one the model can represent.
    #[error("Unsupported rebase action for '{commit}': {subject}")]
    UnsupportedAction {
        /// Commit id or first word of the instruction.
        commit: String,
        /// Remaining text of the instruction.
        subject: String,
    },

    /// Fixup or squash at the very start of the list.
    #[error("'{action} {commit}' has no preceding commit to meld into")]
    NoPrecedingEntry {
        /// The fixup/squash action.
        action: Action,
        /// The commit that was to be melded.
        commit: String,
    },

    /// Fixup or squash following an entry that cannot start a unite group.
    #[error("'{action} {commit}' cannot be melded into '{target_action} {target}'")]
    InvalidUniteTarget {
        /// The fixup/squash action.
        action: Action,
        /// The commit that was to be melded.
        commit: String,
        /// Action of the preceding entry.
        target_action: Action,
        /// Commit id of the preceding entry.
        target: String,
    },

    /// A todo script line that could not be parsed.
    #[error("Malformed todo line {line}: '{content}'")]
    MalformedLine {
        /// 1-based line number.
        line: usize,
        /// Line text.
        content: String,
    },
}
