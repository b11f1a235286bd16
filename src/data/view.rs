//! Serializable rendering of the todo model.

use serde::{Deserialize, Serialize};

use crate::rebase::{Action, ElementType, KeepCommit, NonUnite, RebaseEntry, RebaseTodoModel};

/// Row-by-row view of a todo model, as printed by `rebase-todo show`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoView {
    /// Rows in model order.
    pub rows: Vec<TodoRow>,
}

/// One row of the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoRow {
    /// Position in the model.
    pub index: usize,
    /// Action the row will be written with.
    pub action: Action,
    /// Commit hash or ref name.
    pub commit: String,
    /// Original subject.
    pub subject: String,
    /// Group root position, for unite children.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<usize>,
    /// New message, for reworded rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TodoView {
    /// Builds the view of `model`.
    pub fn from_model<T: RebaseEntry>(model: &RebaseTodoModel<T>) -> Self {
        let rows = model
            .elements()
            .iter()
            .enumerate()
            .map(|(index, element)| {
                let element_type = element.element_type();
                let message = match &element_type {
                    ElementType::NonUnite(NonUnite::KeepCommit(KeepCommit::Reword(message))) => {
                        Some(message.clone())
                    }
                    _ => None,
                };
                TodoRow {
                    index,
                    action: element.script_action().0,
                    commit: element.entry().commit_id().to_string(),
                    subject: element.entry().subject().to_string(),
                    root: element.root(),
                    message,
                }
            })
            .collect();

        Self { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rebase::{to_model, CommitAction};

    #[test]
    fn view_lists_groups_and_messages() {
        let mut model = to_model(vec![
            CommitAction::new("a1", "Add parser", Action::Pick),
            CommitAction::new("b2", "Fix parser", Action::Fixup),
            CommitAction::new("c3", "Docs", Action::Pick),
        ])
        .unwrap();
        model.reword(2, "Document parser");

        let view = TodoView::from_model(&model);
        assert_eq!(view.rows.len(), 3);
        assert_eq!(view.rows[1].action, Action::Fixup);
        assert_eq!(view.rows[1].root, Some(0));
        assert_eq!(view.rows[0].root, None);
        assert_eq!(view.rows[2].action, Action::Reword);
        assert_eq!(view.rows[2].message.as_deref(), Some("Document parser"));

        let yaml = crate::data::to_yaml(&view).unwrap();
        assert!(yaml.contains("action: fixup"));
        assert!(!yaml.contains("message: ~"));
    }
}
