//! Validated access to the todo rows.

use tracing::error;

use super::element::{Element, ElementKind};
use super::mutable_list::MutableElementList;

/// Rows of the todo model whose group invariants are re-checked after
/// every batch of mutations.
#[derive(Debug, Clone)]
pub struct ElementList<T> {
    list: MutableElementList<T>,
}

impl<T> ElementList<T> {
    /// Wraps the initial rows.
    ///
    /// # Panics
    ///
    /// Panics if the rows violate the unite group invariants.
    pub fn new(elements: Vec<Element<T>>) -> Self {
        let list = Self {
            list: MutableElementList::new(elements),
        };
        list.validate();
        list
    }

    /// All rows in order.
    pub fn elements(&self) -> &[Element<T>] {
        self.list.elements()
    }

    /// Runs `modify` against the underlying storage and validates the result.
    ///
    /// # Panics
    ///
    /// Panics if the mutation left the rows in an invalid state. That is a
    /// bug in the mutation, not bad input.
    pub fn modify_list<R>(&mut self, modify: impl FnOnce(&mut MutableElementList<T>) -> R) -> R {
        let result = modify(&mut self.list);
        self.validate();
        result
    }

    fn validate(&self) {
        if let Err(violation) = check_invariants(self.list.elements()) {
            error!("Todo model invariant violated: {violation}");
            panic!("todo model invariant violated: {violation}");
        }
    }
}

/// Checks the unite group invariants of `elements`.
///
/// A root at `r` with `k` children must be followed by exactly those
/// children at `r+1..=r+k`, and each child must point back at its root.
/// Positions are slots, so they always match; update-ref rows and non-keep
/// roots are ruled out by the element types.
pub fn check_invariants<T>(elements: &[Element<T>]) -> Result<(), String> {
    for (index, element) in elements.iter().enumerate() {
        match element.kind() {
            ElementKind::Simple(_) => {}
            ElementKind::UniteRoot { children, .. } => {
                if children.is_empty() {
                    return Err(format!("unite root at {index} has no children"));
                }
                let expected: Vec<usize> = (index + 1..=index + children.len()).collect();
                if *children != expected {
                    return Err(format!(
                        "unite root at {index} has children {children:?}, expected {expected:?}"
                    ));
                }
                for &child in children {
                    match elements.get(child).and_then(Element::root) {
                        Some(root) if root == index => {}
                        other => {
                            return Err(format!(
                                "row {child} listed under root {index} points at {other:?}"
                            ))
                        }
                    }
                }
            }
            ElementKind::UniteChild { root } => {
                let listed = elements
                    .get(*root)
                    .and_then(Element::children)
                    .is_some_and(|children| children.contains(&index));
                if *root >= index || !listed {
                    return Err(format!(
                        "unite child at {index} is not owned by a root at {root}"
                    ));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rebase::element::{KeepCommit, NonUnite};

    fn root(children: Vec<usize>) -> ElementKind {
        ElementKind::UniteRoot {
            kind: KeepCommit::Pick,
            children,
        }
    }

    #[test]
    fn valid_group_passes() {
        let elements = vec![
            Element::with_kind("a", root(vec![1, 2])),
            Element::with_kind("b", ElementKind::UniteChild { root: 0 }),
            Element::with_kind("c", ElementKind::UniteChild { root: 0 }),
            Element::simple("d", NonUnite::Drop),
        ];
        assert!(check_invariants(&elements).is_ok());
    }

    #[test]
    fn detached_child_is_rejected() {
        let elements = vec![
            Element::with_kind("a", root(vec![1])),
            Element::with_kind("b", ElementKind::UniteChild { root: 0 }),
            Element::simple("c", NonUnite::Drop),
            Element::with_kind("d", ElementKind::UniteChild { root: 0 }),
        ];
        assert!(check_invariants(&elements).is_err());
    }

    #[test]
    fn empty_root_is_rejected() {
        let elements = vec![Element::with_kind("a", root(vec![]))];
        assert!(check_invariants(&elements).is_err());
    }

    #[test]
    fn gap_in_group_is_rejected() {
        let elements = vec![
            Element::with_kind("a", root(vec![1, 3])),
            Element::with_kind("b", ElementKind::UniteChild { root: 0 }),
            Element::simple("c", NonUnite::Drop),
            Element::with_kind("d", ElementKind::UniteChild { root: 0 }),
        ];
        assert!(check_invariants(&elements).is_err());
    }

    #[test]
    #[should_panic(expected = "invariant violated")]
    fn invalid_mutation_panics() {
        let mut list = ElementList::new(vec![
            Element::simple("a", NonUnite::KeepCommit(KeepCommit::Pick)),
            Element::simple("b", NonUnite::KeepCommit(KeepCommit::Pick)),
        ]);
        list.modify_list(|list| {
            list.force_change_element(1, ElementKind::UniteChild { root: 0 });
        });
    }
}
