//! Low-level storage for todo rows: block moves and slot replacement.

use std::ops::Range;

use super::element::{Element, ElementKind, Meld};

/// Outcome of [`MutableElementList::move_elements`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    start: usize,
    new_positions: Vec<usize>,
    moved: Range<usize>,
}

impl Relocation {
    /// Position after the move of the row that was at `old`.
    pub fn position_of(&self, old: usize) -> usize {
        match old.checked_sub(self.start) {
            Some(offset) if offset < self.new_positions.len() => self.new_positions[offset],
            _ => old,
        }
    }

    /// Positions now occupied by the moved block.
    pub fn moved(&self) -> Range<usize> {
        self.moved.clone()
    }
}

/// Array-backed rows with atomic block moves.
///
/// Nothing here checks group invariants; callers go through
/// [`super::ElementList::modify_list`], which validates afterwards.
#[derive(Debug, Clone)]
pub struct MutableElementList<T> {
    elements: Vec<Element<T>>,
}

impl<T> MutableElementList<T> {
    /// Wraps existing rows.
    pub fn new(elements: Vec<Element<T>>) -> Self {
        Self { elements }
    }

    /// All rows in order.
    pub fn elements(&self) -> &[Element<T>] {
        &self.elements
    }

    /// Row at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn get(&self, index: usize) -> &Element<T> {
        &self.elements[index]
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub(crate) fn kind_mut(&mut self, index: usize) -> &mut ElementKind {
        self.elements[index].kind_mut()
    }

    /// Replaces the variant stored at `index` and returns the previous one.
    ///
    /// A row that stops being a unite child forgets how it was melded.
    pub fn force_change_element(&mut self, index: usize, kind: ElementKind) -> ElementKind {
        let element = &mut self.elements[index];
        if !matches!(kind, ElementKind::UniteChild { .. }) {
            element.set_meld(Meld::default());
        }
        std::mem::replace(element.kind_mut(), kind)
    }

    pub(crate) fn set_meld(&mut self, index: usize, meld: Meld) {
        self.elements[index].set_meld(meld);
    }

    /// Moves `move_group` so its first row ends up at `target_position`.
    ///
    /// The group keeps its given order and every other row keeps its
    /// relative order. The target is clamped to `[0, len - group len]`.
    /// A group carrying an update-ref is never dropped between a unite root
    /// and its children: it goes before the root when moving up and after
    /// the last child when moving down. Every stored root/children position
    /// is remapped to the new layout.
    ///
    /// # Panics
    ///
    /// Panics if any index of `move_group` is out of bounds.
    pub fn move_elements(&mut self, move_group: &[usize], target_position: usize) -> Relocation {
        let len = self.elements.len();
        let mut group = Vec::with_capacity(move_group.len());
        let mut in_group = vec![false; len];
        for &index in move_group {
            if !in_group[index] {
                in_group[index] = true;
                group.push(index);
            }
        }

        let (Some(&first), Some(&last)) = (group.iter().min(), group.iter().max()) else {
            return Relocation {
                start: 0,
                new_positions: Vec::new(),
                moved: target_position..target_position,
            };
        };

        let mut target = target_position.min(len - group.len());
        if group.iter().any(|&index| self.elements[index].is_update_ref()) {
            target = self.outside_unite_group(&in_group, target, target > first);
        }

        // Only the interval spanning the old and new block location changes.
        let start = first.min(target);
        let end = last.max(target + group.len() - 1);
        let others: Vec<usize> = (start..=end).filter(|&index| !in_group[index]).collect();
        let split = target - start;

        let mut order = Vec::with_capacity(end - start + 1);
        order.extend_from_slice(&others[..split]);
        order.extend_from_slice(&group);
        order.extend_from_slice(&others[split..]);

        let mut new_positions = vec![0; order.len()];
        for (offset, &old) in order.iter().enumerate() {
            new_positions[old - start] = start + offset;
        }

        let mut block: Vec<(usize, Element<T>)> = self
            .elements
            .drain(start..=end)
            .enumerate()
            .map(|(offset, element)| (new_positions[offset], element))
            .collect();
        block.sort_by_key(|(position, _)| *position);
        let tail = self.elements.split_off(start);
        self.elements
            .extend(block.into_iter().map(|(_, element)| element));
        self.elements.extend(tail);

        let relocation = Relocation {
            start,
            new_positions,
            moved: target..target + group.len(),
        };
        for element in &mut self.elements {
            element
                .kind_mut()
                .remap(|position| relocation.position_of(position));
        }

        relocation
    }

    /// Adjusts `target` (a position among the rows not being moved) so that
    /// it does not fall between a unite root and its children.
    fn outside_unite_group(&self, in_group: &[bool], target: usize, moving_down: bool) -> usize {
        let rest: Vec<usize> = (0..self.elements.len())
            .filter(|&index| !in_group[index])
            .collect();
        let is_child = |position: usize| {
            rest.get(position)
                .is_some_and(|&index| self.elements[index].root().is_some())
        };

        if !is_child(target) {
            return target;
        }

        let mut adjusted = target;
        if moving_down {
            while is_child(adjusted) {
                adjusted += 1;
            }
        } else {
            while adjusted > 0 && is_child(adjusted) {
                adjusted -= 1;
            }
        }
        adjusted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rebase::element::{KeepCommit, NonUnite};

    fn pick(name: &'static str) -> Element<&'static str> {
        Element::simple(name, NonUnite::KeepCommit(KeepCommit::Pick))
    }

    fn names(list: &MutableElementList<&'static str>) -> Vec<&'static str> {
        list.elements().iter().map(|e| *e.entry()).collect()
    }

    fn grouped() -> MutableElementList<&'static str> {
        // a, [b, c, d], e
        MutableElementList::new(vec![
            pick("a"),
            Element::with_kind(
                "b",
                ElementKind::UniteRoot {
                    kind: KeepCommit::Pick,
                    children: vec![2, 3],
                },
            ),
            Element::with_kind("c", ElementKind::UniteChild { root: 1 }),
            Element::with_kind("d", ElementKind::UniteChild { root: 1 }),
            Element::simple("e", NonUnite::UpdateRef),
        ])
    }

    #[test]
    fn move_single_element_down() {
        let mut list = MutableElementList::new(vec![pick("a"), pick("b"), pick("c"), pick("d")]);
        let relocation = list.move_elements(&[0], 2);
        assert_eq!(names(&list), ["b", "c", "a", "d"]);
        assert_eq!(relocation.moved(), 2..3);
        assert_eq!(relocation.position_of(0), 2);
        assert_eq!(relocation.position_of(1), 0);
        assert_eq!(relocation.position_of(3), 3);
    }

    #[test]
    fn move_single_element_up() {
        let mut list = MutableElementList::new(vec![pick("a"), pick("b"), pick("c"), pick("d")]);
        list.move_elements(&[3], 1);
        assert_eq!(names(&list), ["a", "d", "b", "c"]);
    }

    #[test]
    fn target_is_clamped() {
        let mut list = MutableElementList::new(vec![pick("a"), pick("b"), pick("c")]);
        let relocation = list.move_elements(&[0, 1], 10);
        assert_eq!(names(&list), ["c", "a", "b"]);
        assert_eq!(relocation.moved(), 1..3);
    }

    #[test]
    fn scattered_group_is_gathered() {
        let mut list =
            MutableElementList::new(vec![pick("a"), pick("b"), pick("c"), pick("d"), pick("e")]);
        list.move_elements(&[1, 4], 0);
        assert_eq!(names(&list), ["b", "e", "a", "c", "d"]);
    }

    #[test]
    fn group_bookkeeping_follows_the_move() {
        let mut list = grouped();
        list.move_elements(&[1, 2, 3], 0);
        assert_eq!(names(&list), ["b", "c", "d", "a", "e"]);
        assert_eq!(list.get(0).children(), Some(&[1, 2][..]));
        assert_eq!(list.get(1).root(), Some(0));
        assert_eq!(list.get(2).root(), Some(0));
    }

    #[test]
    fn update_ref_moving_up_stops_before_root() {
        let mut list = grouped();
        let relocation = list.move_elements(&[4], 2);
        assert_eq!(names(&list), ["a", "e", "b", "c", "d"]);
        assert_eq!(relocation.moved(), 1..2);
    }

    #[test]
    fn update_ref_moving_down_lands_after_group() {
        let mut list = MutableElementList::new(vec![
            Element::simple("u", NonUnite::UpdateRef),
            Element::with_kind(
                "b",
                ElementKind::UniteRoot {
                    kind: KeepCommit::Pick,
                    children: vec![2, 3],
                },
            ),
            Element::with_kind("c", ElementKind::UniteChild { root: 1 }),
            Element::with_kind("d", ElementKind::UniteChild { root: 1 }),
        ]);
        let relocation = list.move_elements(&[0], 1);
        assert_eq!(names(&list), ["b", "c", "d", "u"]);
        assert_eq!(relocation.moved(), 3..4);
        assert_eq!(list.get(0).children(), Some(&[1, 2][..]));
    }

    #[test]
    fn force_change_returns_previous_kind() {
        let mut list = MutableElementList::new(vec![pick("a")]);
        let old = list.force_change_element(0, ElementKind::Simple(NonUnite::Drop));
        assert_eq!(old, ElementKind::Simple(NonUnite::KeepCommit(KeepCommit::Pick)));
        assert_eq!(list.get(0).kind(), &ElementKind::Simple(NonUnite::Drop));
    }
}
