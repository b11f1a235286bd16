//! Conversion between flat rebase entries and the todo model.

use tracing::debug;

use super::element::{Element, ElementKind, ElementType, KeepCommit, Meld, NonUnite};
use super::entry::{Action, CommitAction, RebaseEntry};
use super::error::TodoError;
use super::model::RebaseTodoModel;

/// Builds a model from entries in todo script order.
///
/// Fixup and squash entries join the group of the entry before them and
/// remember their verb (and `-C`/`-c` option) for [`to_entries`].
/// Dropped entries are always moved to the end of the model, whatever
/// their original position.
pub fn to_model<T: RebaseEntry>(
    entries: impl IntoIterator<Item = T>,
) -> Result<RebaseTodoModel<T>, TodoError> {
    let mut elements: Vec<Element<T>> = Vec::new();
    let mut dropped = Vec::new();

    for entry in entries {
        match entry.action() {
            Action::Pick | Action::Reword => {
                elements.push(Element::simple(entry, NonUnite::KeepCommit(KeepCommit::Pick)));
            }
            Action::Edit => {
                elements.push(Element::simple(entry, NonUnite::KeepCommit(KeepCommit::Edit)));
            }
            Action::UpdateRef => elements.push(Element::simple(entry, NonUnite::UpdateRef)),
            Action::Drop => dropped.push(entry),
            Action::Fixup | Action::Squash => {
                let root = unite_target(&mut elements, &entry)?;
                let position = elements.len();
                if let ElementKind::UniteRoot { children, .. } = elements[root].kind_mut() {
                    children.push(position);
                }
                let meld = Meld::from_entry(entry.action(), entry.message_flag());
                elements.push(
                    Element::with_kind(entry, ElementKind::UniteChild { root }).with_meld(meld),
                );
            }
            Action::Other => {
                return Err(TodoError::UnsupportedAction {
                    commit: entry.commit_id().to_string(),
                    subject: entry.subject().to_string(),
                })
            }
        }
    }

    // Dropped entries always go last
    if !dropped.is_empty() {
        debug!("Moving {} dropped entries to the end", dropped.len());
    }
    elements.extend(
        dropped
            .into_iter()
            .map(|entry| Element::simple(entry, NonUnite::Drop)),
    );

    Ok(RebaseTodoModel::new(elements))
}

/// Finds (or creates) the group root a fixup/squash entry is melded into.
fn unite_target<T: RebaseEntry>(elements: &mut [Element<T>], entry: &T) -> Result<usize, TodoError> {
    let Some(last) = elements.len().checked_sub(1) else {
        return Err(TodoError::NoPrecedingEntry {
            action: entry.action(),
            commit: entry.commit_id().to_string(),
        });
    };

    let previous = &mut elements[last];
    match previous.kind() {
        ElementKind::UniteRoot { .. } => Ok(last),
        ElementKind::UniteChild { root } => Ok(*root),
        ElementKind::Simple(NonUnite::KeepCommit(kind)) => {
            let kind = kind.clone();
            *previous.kind_mut() = ElementKind::UniteRoot {
                kind,
                children: Vec::new(),
            };
            Ok(last)
        }
        ElementKind::Simple(other) => Err(TodoError::InvalidUniteTarget {
            action: entry.action(),
            commit: entry.commit_id().to_string(),
            target_action: ElementType::NonUnite(other.clone()).action(),
            target: previous.entry().commit_id().to_string(),
        }),
    }
}

/// Flattens the model into entries in row order, each carrying the action
/// of its row's current type. Unite children loaded from `squash` or
/// `fixup -C`/`-c` lines are written with that verb again.
pub fn to_entries<T: RebaseEntry>(model: &RebaseTodoModel<T>) -> Vec<CommitAction> {
    model
        .elements()
        .iter()
        .map(|element| {
            let entry = element.entry();
            let (action, flag) = element.script_action();
            CommitAction::new(entry.commit_id(), entry.subject(), action).with_message_flag(flag)
        })
        .collect()
}
