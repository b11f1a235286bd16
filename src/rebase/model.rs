//! Editing operations of the interactive rebase todo list.

use std::ops::Range;

use tracing::{debug, warn};

use super::element::{Element, ElementKind, ElementType, KeepCommit, NonUnite};
use super::element_list::ElementList;
use super::mutable_list::MutableElementList;

/// The todo list being edited: ordered rows, some of them grouped into
/// unite (fixup) groups.
///
/// All operations take row positions as shown to the user. Positions out
/// of bounds are a caller bug and panic. Update-ref rows are skipped by
/// every retyping operation.
#[derive(Debug, Clone)]
pub struct RebaseTodoModel<T> {
    rows: ElementList<T>,
}

impl<T> RebaseTodoModel<T> {
    /// Creates a model from already structured rows.
    ///
    /// # Panics
    ///
    /// Panics if the rows violate the unite group invariants.
    pub fn new(elements: Vec<Element<T>>) -> Self {
        Self {
            rows: ElementList::new(elements),
        }
    }

    /// Rows in their current order.
    pub fn elements(&self) -> &[Element<T>] {
        self.rows.elements()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.elements().len()
    }

    /// Whether the model has no rows.
    pub fn is_empty(&self) -> bool {
        self.elements().is_empty()
    }

    /// Whether `pick` would change any of `indices`.
    pub fn can_pick(&self, indices: &[usize]) -> bool {
        self.can_change_type(indices, &ElementType::PICK)
    }

    /// Whether `edit` would change any of `indices`.
    pub fn can_edit(&self, indices: &[usize]) -> bool {
        self.can_change_type(indices, &ElementType::EDIT)
    }

    /// Whether `drop` would change any of `indices`.
    pub fn can_drop(&self, indices: &[usize]) -> bool {
        self.can_change_type(indices, &ElementType::DROP)
    }

    /// Whether the row at `index` can be reworded.
    pub fn can_reword(&self, index: usize) -> bool {
        let element = &self.elements()[index];
        !element.is_update_ref() && element.root().is_none()
    }

    fn can_change_type(&self, indices: &[usize], target: &ElementType) -> bool {
        indices.iter().any(|&index| {
            let element = &self.elements()[index];
            !element.is_update_ref() && element.element_type() != *target
        })
    }

    /// Marks rows as picked. Unite children are taken out of their group.
    pub fn pick(&mut self, indices: &[usize]) {
        self.keep_commits(indices, &KeepCommit::Pick);
    }

    /// Marks rows to stop for editing. Unite children are taken out of
    /// their group.
    pub fn edit(&mut self, indices: &[usize]) {
        self.keep_commits(indices, &KeepCommit::Edit);
    }

    /// Gives the row at `index` a new commit message.
    ///
    /// Unite children and update-ref rows cannot be reworded; the request
    /// is ignored for them.
    pub fn reword(&mut self, index: usize, message: impl Into<String>) {
        if !self.can_reword(index) {
            warn!("Ignoring reword of row {index}: not a standalone commit or group root");
            return;
        }
        let kind = KeepCommit::Reword(message.into());
        self.rows
            .modify_list(|list| change_keep_commit(list, index, kind));
    }

    fn keep_commits(&mut self, indices: &[usize], kind: &KeepCommit) {
        let targets = self.descending_commits(indices);
        debug!("Setting {kind:?} on rows {targets:?}");
        self.rows.modify_list(|list| {
            for index in targets {
                change_keep_commit(list, index, kind.clone());
            }
        });
    }

    /// Marks rows as dropped.
    ///
    /// Selecting a group root drops the whole group; selecting a child only
    /// takes that child out of its group.
    pub fn drop(&mut self, indices: &[usize]) {
        let targets = self.descending_commits(indices);
        debug!("Dropping rows {targets:?}");
        self.rows.modify_list(|list| {
            for index in targets {
                drop_element(list, index);
            }
        });
    }

    /// Distinct non update-ref positions, highest first, so that taking a
    /// child out of its group never shifts a row that is still to be
    /// processed.
    fn descending_commits(&self, indices: &[usize]) -> Vec<usize> {
        let mut targets: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&index| {
                let skip = self.elements()[index].is_update_ref();
                if skip {
                    debug!("Skipping update-ref row {index}");
                }
                !skip
            })
            .collect();
        targets.sort_unstable_by(|a, b| b.cmp(a));
        targets.dedup();
        targets
    }

    /// Whether `unite` can be applied to `indices`.
    ///
    /// Needs two or more distinct rows, none of them update-refs, a first
    /// row that is not dropped, and at least one row not already in the
    /// first row's group.
    pub fn can_unite(&self, indices: &[usize]) -> bool {
        let selected = sorted_distinct(indices);
        if selected.len() < 2 {
            return false;
        }
        if selected
            .iter()
            .any(|&index| self.elements()[index].is_update_ref())
        {
            return false;
        }
        if self.elements()[selected[0]].element_type() == ElementType::DROP {
            return false;
        }

        let group_of = |index: usize| {
            let element = &self.elements()[index];
            if element.is_root() {
                Some(index)
            } else {
                element.root()
            }
        };
        let first_group = group_of(selected[0]);
        first_group.is_none() || selected.iter().any(|&index| group_of(index) != first_group)
    }

    /// Unites the selected rows into one group and returns the root position.
    ///
    /// The first selected row becomes the root (or, if it is already grouped,
    /// its group's root is used). The other rows, together with any group
    /// they lead, are moved right after the root's last child and attached
    /// to it. Update-ref rows are left out.
    ///
    /// # Panics
    ///
    /// Panics if fewer than two rows remain or the first row is dropped;
    /// check [`RebaseTodoModel::can_unite`] first.
    pub fn unite(&mut self, indices: &[usize]) -> usize {
        let selected: Vec<usize> = sorted_distinct(indices)
            .into_iter()
            .filter(|&index| !self.elements()[index].is_update_ref())
            .collect();
        assert!(
            selected.len() >= 2,
            "unite needs at least two commits, got {selected:?}"
        );
        debug!("Uniting rows {selected:?}");

        self.rows.modify_list(|list| {
            let root = convert_to_root(list, selected[0]);

            let mut members = Vec::new();
            for &index in &selected[1..] {
                match list.get(index).kind() {
                    ElementKind::UniteChild { root: owner } if *owner == root => {}
                    ElementKind::UniteRoot { children, .. } => {
                        members.push(index);
                        members.extend(children.iter().copied());
                    }
                    _ if index == root => {}
                    _ => members.push(index),
                }
            }
            members.sort_unstable();
            members.dedup();

            // Children leaving another group on their own.
            for &member in &members {
                if let Some(owner) = list.get(member).root() {
                    if !members.contains(&owner) {
                        detach_child(list, owner, member);
                    }
                }
            }

            let group_end = root + children_count(list, root);
            let target = (0..=group_end)
                .filter(|index| !members.contains(index))
                .count();
            let relocation = list.move_elements(&members, target);
            let root = relocation.position_of(root);
            attach_children(list, root, relocation.moved());
            root
        })
    }

    /// Drag-and-drop reorder: moves the row at `old_index` (with its whole
    /// group when it is a root) so that it ends up at `new_index`.
    ///
    /// A unite child is first taken out of its group; dragging it to the tail
    /// of its own group keeps it there. Rows dropped right before a unite
    /// child join that child's group.
    pub fn exchange_indices(&mut self, old_index: usize, new_index: usize) {
        if old_index == new_index {
            return;
        }
        debug!("Moving row {old_index} to {new_index}");

        self.rows.modify_list(|list| {
            let moved = match list.get(old_index).kind() {
                ElementKind::UniteRoot { children, .. } => {
                    let mut group = vec![old_index];
                    group.extend(children.iter().copied());
                    list.move_elements(&group, new_index).moved()
                }
                ElementKind::Simple(_) => list.move_elements(&[old_index], new_index).moved(),
                ElementKind::UniteChild { root } => {
                    let root = *root;
                    // Dragging a child to its own group tail puts it back
                    // exactly as it was.
                    let meld = list.get(old_index).meld();
                    let root_kind = match list.get(root).kind() {
                        ElementKind::UniteRoot { kind, .. } => kind.clone(),
                        _ => KeepCommit::Pick,
                    };
                    let position = remove_and_move_unite_child(
                        list,
                        old_index,
                        NonUnite::KeepCommit(KeepCommit::Pick),
                    );
                    if position == new_index {
                        let root = convert_to_root(list, root);
                        change_keep_commit(list, root, root_kind);
                        attach_children(list, root, position..position + 1);
                        list.set_meld(position, meld);
                        return;
                    }
                    list.move_elements(&[position], new_index).moved()
                }
            };
            add_to_unite_group_if_needed(list, moved);
        });
    }
}

fn sorted_distinct(indices: &[usize]) -> Vec<usize> {
    let mut sorted = indices.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted
}

fn children_count<T>(list: &MutableElementList<T>, root: usize) -> usize {
    list.get(root).children().map_or(0, <[usize]>::len)
}

/// Sets a keep-commit type, taking unite children out of their group.
fn change_keep_commit<T>(list: &mut MutableElementList<T>, index: usize, kind: KeepCommit) {
    match list.kind_mut(index) {
        ElementKind::UniteRoot { kind: root_kind, .. } => *root_kind = kind,
        ElementKind::Simple(_) => {
            list.force_change_element(index, ElementKind::Simple(NonUnite::KeepCommit(kind)));
        }
        ElementKind::UniteChild { .. } => {
            remove_and_move_unite_child(list, index, NonUnite::KeepCommit(kind));
        }
    }
}

fn drop_element<T>(list: &mut MutableElementList<T>, index: usize) {
    match list.get(index).kind() {
        ElementKind::Simple(_) => {
            list.force_change_element(index, ElementKind::Simple(NonUnite::Drop));
        }
        ElementKind::UniteRoot { children, .. } => {
            let children = children.clone();
            for child in children {
                list.force_change_element(child, ElementKind::Simple(NonUnite::Drop));
            }
            list.force_change_element(index, ElementKind::Simple(NonUnite::Drop));
        }
        ElementKind::UniteChild { .. } => {
            remove_and_move_unite_child(list, index, NonUnite::Drop);
        }
    }
}

/// Takes the child at `index` out of its group, moves it just past the
/// group's last child and turns it into a standalone row of type `kind`.
/// Returns its new position.
fn remove_and_move_unite_child<T>(
    list: &mut MutableElementList<T>,
    index: usize,
    kind: NonUnite,
) -> usize {
    let Some(root) = list.get(index).root() else {
        return index;
    };
    let group_end = root + children_count(list, root);
    detach_child(list, root, index);

    let position = list.move_elements(&[index], group_end).moved().start;
    list.force_change_element(position, ElementKind::Simple(kind));
    position
}

/// Removes `child` from the children of `root`; a root left without
/// children becomes a standalone pick.
fn detach_child<T>(list: &mut MutableElementList<T>, root: usize, child: usize) {
    let now_empty = match list.kind_mut(root) {
        ElementKind::UniteRoot { children, .. } => {
            children.retain(|&c| c != child);
            children.is_empty()
        }
        _ => false,
    };
    if !now_empty {
        return;
    }
    debug!("Unite group at {root} has no children left");
    list.force_change_element(root, ElementKind::Simple(NonUnite::KeepCommit(KeepCommit::Pick)));
}

/// Returns the root position of the group `index` leads or belongs to,
/// promoting a standalone commit to a root with no children yet.
///
/// # Panics
///
/// Panics for dropped and update-ref rows, which can never lead a group.
fn convert_to_root<T>(list: &mut MutableElementList<T>, index: usize) -> usize {
    match list.get(index).kind() {
        ElementKind::UniteRoot { .. } => index,
        ElementKind::UniteChild { root } => *root,
        ElementKind::Simple(NonUnite::KeepCommit(kind)) => {
            let kind = kind.clone();
            list.force_change_element(
                index,
                ElementKind::UniteRoot {
                    kind,
                    children: Vec::new(),
                },
            );
            index
        }
        ElementKind::Simple(other) => {
            panic!("row {index} of type {other:?} cannot become a unite root")
        }
    }
}

/// Turns every row in `rows` into a child of `root`.
fn attach_children<T>(list: &mut MutableElementList<T>, root: usize, rows: Range<usize>) {
    for row in rows.clone() {
        list.force_change_element(row, ElementKind::UniteChild { root });
    }
    if let ElementKind::UniteRoot { children, .. } = list.kind_mut(root) {
        children.extend(rows);
        children.sort_unstable();
        children.dedup();
    }
}

/// Joins `moved` to the group it was dropped into, if any.
fn add_to_unite_group_if_needed<T>(list: &mut MutableElementList<T>, moved: Range<usize>) {
    let Some(root) = list
        .elements()
        .get(moved.end)
        .and_then(Element::root)
    else {
        return;
    };
    debug!("Rows {moved:?} joined the unite group at {root}");
    attach_children(list, root, moved);
}
