//! Edit plans: scripted sequences of todo model operations.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::rebase::{RebaseEntry, RebaseTodoModel};

/// A YAML document listing the edits to make to a todo list, in order.
///
/// ```yaml
/// operations:
///   - op: unite
///     indices: [0, 2]
///   - op: reword
///     index: 0
///     message: "Add parser"
///   - op: move
///     from: 3
///     to: 1
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditPlan {
    /// Operations applied one after another.
    #[serde(default)]
    pub operations: Vec<Operation>,
}

/// A single todo model operation. Indices are row positions at the time
/// the operation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Operation {
    /// Keep the commits as they are.
    Pick {
        /// Rows to pick.
        indices: Vec<usize>,
    },
    /// Stop at the commits.
    Edit {
        /// Rows to edit.
        indices: Vec<usize>,
    },
    /// Remove the commits.
    Drop {
        /// Rows to drop.
        indices: Vec<usize>,
    },
    /// Give a commit a new message.
    Reword {
        /// Row to reword.
        index: usize,
        /// New commit message.
        message: String,
    },
    /// Meld commits into the first one.
    Unite {
        /// Rows to unite; the lowest becomes the root.
        indices: Vec<usize>,
    },
    /// Drag a row (or a whole group) to a new position.
    Move {
        /// Current position.
        from: usize,
        /// Desired position.
        to: usize,
    },
}

impl Operation {
    /// Short name used in messages.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Pick { .. } => "pick",
            Operation::Edit { .. } => "edit",
            Operation::Drop { .. } => "drop",
            Operation::Reword { .. } => "reword",
            Operation::Unite { .. } => "unite",
            Operation::Move { .. } => "move",
        }
    }

    fn rows(&self) -> Vec<usize> {
        match self {
            Operation::Pick { indices }
            | Operation::Edit { indices }
            | Operation::Drop { indices }
            | Operation::Unite { indices } => indices.clone(),
            Operation::Reword { index, .. } => vec![*index],
            Operation::Move { from, to } => vec![*from, *to],
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Operation::Pick { indices } | Operation::Edit { indices } | Operation::Drop { indices }
                if indices.is_empty() =>
            {
                anyhow::bail!("At least one row index is required")
            }
            Operation::Unite { indices } if indices.len() < 2 => {
                anyhow::bail!("Unite needs at least two row indices, got {}", indices.len())
            }
            Operation::Reword { message, .. } if message.trim().is_empty() => {
                anyhow::bail!("Reword message cannot be empty")
            }
            _ => Ok(()),
        }
    }
}

impl EditPlan {
    /// Loads and validates a plan from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let plan: EditPlan = crate::data::read_yaml_file(&path).with_context(|| {
            format!("Failed to load edit plan: {}", path.as_ref().display())
        })?;

        plan.validate()?;

        Ok(plan)
    }

    /// Saves the plan as YAML.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        crate::data::write_yaml_file(self, path)
    }

    /// Checks every operation for structural problems.
    pub fn validate(&self) -> Result<()> {
        // An empty plan leaves the todo list untouched.
        for (i, operation) in self.operations.iter().enumerate() {
            operation
                .validate()
                .with_context(|| format!("Invalid operation {} ({})", i + 1, operation.name()))?;
        }

        Ok(())
    }

    /// Applies all operations to `model`.
    ///
    /// Row indices are checked against the model size before anything is
    /// changed. A unite that the model refuses stops the plan with an error.
    pub fn apply<T>(&self, model: &mut RebaseTodoModel<T>) -> Result<()>
    where
        T: RebaseEntry,
    {
        let len = model.len();
        for (i, operation) in self.operations.iter().enumerate() {
            if let Some(row) = operation.rows().into_iter().find(|&row| row >= len) {
                anyhow::bail!(
                    "Operation {} ({}) refers to row {}, but the todo list has {} rows",
                    i + 1,
                    operation.name(),
                    row,
                    len
                );
            }
        }

        for (i, operation) in self.operations.iter().enumerate() {
            match operation {
                Operation::Pick { indices } => model.pick(indices),
                Operation::Edit { indices } => model.edit(indices),
                Operation::Drop { indices } => model.drop(indices),
                Operation::Reword { index, message } => {
                    if !model.can_reword(*index) {
                        anyhow::bail!(
                            "Operation {} (reword): row {} is an update-ref or part of a unite group",
                            i + 1,
                            index
                        );
                    }
                    model.reword(*index, message.clone());
                }
                Operation::Unite { indices } => {
                    if !model.can_unite(indices) {
                        anyhow::bail!(
                            "Operation {} (unite): rows {:?} cannot be united",
                            i + 1,
                            indices
                        );
                    }
                    model.unite(indices);
                }
                Operation::Move { from, to } => model.exchange_indices(*from, *to),
            }
        }

        info!("Applied {} todo operations", self.operations.len());
        Ok(())
    }
}
