//! Rows of the todo model and their types.

use super::entry::{Action, MessageFlag};

/// Types that keep the commit in history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeepCommit {
    /// Use the commit.
    Pick,
    /// Stop at the commit.
    Edit,
    /// Use the commit with a new message.
    Reword(String),
}

/// Types of rows that are not part of a unite group as a child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NonUnite {
    /// Commit stays in history.
    KeepCommit(KeepCommit),
    /// Ref update marker. Never grouped.
    UpdateRef,
    /// Commit is removed.
    Drop,
}

/// Effective type of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementType {
    /// Standalone or group root type.
    NonUnite(NonUnite),
    /// Child of a unite group; melded into the root commit.
    Unite,
}

impl ElementType {
    /// Pick type.
    pub const PICK: ElementType = ElementType::NonUnite(NonUnite::KeepCommit(KeepCommit::Pick));
    /// Edit type.
    pub const EDIT: ElementType = ElementType::NonUnite(NonUnite::KeepCommit(KeepCommit::Edit));
    /// Drop type.
    pub const DROP: ElementType = ElementType::NonUnite(NonUnite::Drop);
    /// Update-ref type.
    pub const UPDATE_REF: ElementType = ElementType::NonUnite(NonUnite::UpdateRef);

    /// Returns the script action this type is written as.
    pub fn action(&self) -> Action {
        match self {
            ElementType::NonUnite(NonUnite::KeepCommit(KeepCommit::Pick)) => Action::Pick,
            ElementType::NonUnite(NonUnite::KeepCommit(KeepCommit::Edit)) => Action::Edit,
            ElementType::NonUnite(NonUnite::KeepCommit(KeepCommit::Reword(_))) => Action::Reword,
            ElementType::NonUnite(NonUnite::UpdateRef) => Action::UpdateRef,
            ElementType::NonUnite(NonUnite::Drop) => Action::Drop,
            ElementType::Unite => Action::Fixup,
        }
    }

    /// Whether this is the update-ref type.
    pub fn is_update_ref(&self) -> bool {
        matches!(self, ElementType::NonUnite(NonUnite::UpdateRef))
    }
}

/// How a unite child is written back to the todo script.
///
/// Rows loaded from `squash` or `fixup -C`/`-c` lines keep their verb while
/// they stay in a group; anything melded by the model is a plain `fixup`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Meld {
    /// `fixup`
    #[default]
    Fixup,
    /// `fixup -C` or `fixup -c`
    FixupWithMessage(MessageFlag),
    /// `squash`
    Squash,
}

impl Meld {
    /// Meld of a loaded fixup/squash entry.
    pub fn from_entry(action: Action, flag: Option<MessageFlag>) -> Self {
        match (action, flag) {
            (Action::Squash, _) => Meld::Squash,
            (Action::Fixup, Some(flag)) => Meld::FixupWithMessage(flag),
            _ => Meld::Fixup,
        }
    }

    /// Script action and option this meld is written with.
    pub fn script_action(self) -> (Action, Option<MessageFlag>) {
        match self {
            Meld::Fixup => (Action::Fixup, None),
            Meld::FixupWithMessage(flag) => (Action::Fixup, Some(flag)),
            Meld::Squash => (Action::Squash, None),
        }
    }
}

/// Variant of a row. Group bookkeeping is kept as positions in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// Row outside any unite group.
    Simple(NonUnite),
    /// First row of a unite group.
    UniteRoot {
        /// Type of the resulting commit.
        kind: KeepCommit,
        /// Positions of the children, ascending. Never empty.
        children: Vec<usize>,
    },
    /// Row melded into the root found at `root`.
    UniteChild {
        /// Position of the group root.
        root: usize,
    },
}

impl ElementKind {
    /// Rewrites every stored position through `map` and keeps children sorted.
    pub(crate) fn remap(&mut self, map: impl Fn(usize) -> usize) {
        match self {
            ElementKind::Simple(_) => {}
            ElementKind::UniteRoot { children, .. } => {
                for child in children.iter_mut() {
                    *child = map(*child);
                }
                children.sort_unstable();
            }
            ElementKind::UniteChild { root } => *root = map(*root),
        }
    }
}

/// A single row of the todo model: an immutable entry plus its current kind.
///
/// The position of an element is the slot it occupies in the model, so
/// there is no index to keep in sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element<T> {
    entry: T,
    kind: ElementKind,
    meld: Meld,
}

impl<T> Element<T> {
    /// Creates a standalone row.
    pub fn simple(entry: T, kind: NonUnite) -> Self {
        Self {
            entry,
            kind: ElementKind::Simple(kind),
            meld: Meld::default(),
        }
    }

    pub(crate) fn with_kind(entry: T, kind: ElementKind) -> Self {
        Self {
            entry,
            kind,
            meld: Meld::default(),
        }
    }

    pub(crate) fn with_meld(mut self, meld: Meld) -> Self {
        self.meld = meld;
        self
    }

    /// The wrapped entry.
    pub fn entry(&self) -> &T {
        &self.entry
    }

    /// The current variant.
    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut ElementKind {
        &mut self.kind
    }

    /// How the row is melded while it is a unite child.
    pub fn meld(&self) -> Meld {
        self.meld
    }

    pub(crate) fn set_meld(&mut self, meld: Meld) {
        self.meld = meld;
    }

    /// The effective type of this row.
    pub fn element_type(&self) -> ElementType {
        match &self.kind {
            ElementKind::Simple(kind) => ElementType::NonUnite(kind.clone()),
            ElementKind::UniteRoot { kind, .. } => {
                ElementType::NonUnite(NonUnite::KeepCommit(kind.clone()))
            }
            ElementKind::UniteChild { .. } => ElementType::Unite,
        }
    }

    /// Script action (and fixup option) this row is written with.
    pub fn script_action(&self) -> (Action, Option<MessageFlag>) {
        match &self.kind {
            ElementKind::UniteChild { .. } => self.meld.script_action(),
            _ => (self.element_type().action(), None),
        }
    }

    /// Whether the row is an update-ref marker.
    pub fn is_update_ref(&self) -> bool {
        matches!(self.kind, ElementKind::Simple(NonUnite::UpdateRef))
    }

    /// Whether the row starts a unite group.
    pub fn is_root(&self) -> bool {
        matches!(self.kind, ElementKind::UniteRoot { .. })
    }

    /// Group root position, if this row is a unite child.
    pub fn root(&self) -> Option<usize> {
        match self.kind {
            ElementKind::UniteChild { root } => Some(root),
            _ => None,
        }
    }

    /// Children positions, if this row is a unite root.
    pub fn children(&self) -> Option<&[usize]> {
        match &self.kind {
            ElementKind::UniteRoot { children, .. } => Some(children),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_reports_keep_commit_type() {
        let element = Element::with_kind(
            "a",
            ElementKind::UniteRoot {
                kind: KeepCommit::Edit,
                children: vec![1],
            },
        );
        assert_eq!(element.element_type(), ElementType::EDIT);
        assert_eq!(element.children(), Some(&[1][..]));
        assert!(element.root().is_none());
    }

    #[test]
    fn loaded_meld_is_kept_only_for_children() {
        let child = Element::with_kind("b", ElementKind::UniteChild { root: 0 })
            .with_meld(Meld::from_entry(Action::Fixup, Some(MessageFlag::Use)));
        assert_eq!(child.script_action(), (Action::Fixup, Some(MessageFlag::Use)));

        let squash = Element::with_kind("c", ElementKind::UniteChild { root: 0 })
            .with_meld(Meld::from_entry(Action::Squash, None));
        assert_eq!(squash.script_action(), (Action::Squash, None));

        let simple = Element::simple("d", NonUnite::Drop).with_meld(Meld::Squash);
        assert_eq!(simple.script_action(), (Action::Drop, None));
    }

    #[test]
    fn unite_is_written_as_fixup() {
        assert_eq!(ElementType::Unite.action(), Action::Fixup);
        assert_eq!(
            ElementType::NonUnite(NonUnite::KeepCommit(KeepCommit::Reword("x".into()))).action(),
            Action::Reword
        );
    }

    #[test]
    fn remap_sorts_children() {
        let mut kind = ElementKind::UniteRoot {
            kind: KeepCommit::Pick,
            children: vec![3, 4],
        };
        kind.remap(|i| if i == 3 { 5 } else { i });
        assert_eq!(
            kind,
            ElementKind::UniteRoot {
                kind: KeepCommit::Pick,
                children: vec![4, 5],
            }
        );
    }
}
