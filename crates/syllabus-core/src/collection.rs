//! Ordered section list and the drag-to-reorder move.
//!
//! [`SectionCollection`] keeps its sections sorted ascending by
//! [`Section::order`]. A move removes the source element and reinserts it at
//! the target's position (not a swap), then renumbers every element to
//! `index + 1`, so after any move the order values are exactly `1..=N`.

use crate::errors::OrderingError;
use crate::ids::SectionId;
use crate::section::Section;

/// New order value assigned to one section by a move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderChange {
    /// Section that was renumbered.
    pub id: SectionId,
    /// Order value before the move.
    pub previous: i64,
    /// Order value after the move.
    pub order: i64,
}

impl OrderChange {
    /// Whether the order value actually changed.
    pub fn is_changed(&self) -> bool {
        self.previous != self.order
    }
}

/// Result of [`SectionCollection::move_section`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Source and target were the same section; nothing changed.
    Unchanged,
    /// The section moved and every element was renumbered.
    Moved {
        /// Position of the source before the move.
        from: usize,
        /// Position of the source after the move.
        to: usize,
        /// One entry per section, in the new display order.
        changes: Vec<OrderChange>,
    },
}

impl MoveOutcome {
    /// Changes whose order value differs from before the move.
    pub fn changed(&self) -> impl Iterator<Item = &OrderChange> {
        let changes: &[OrderChange] = match self {
            Self::Unchanged => &[],
            Self::Moved { changes, .. } => changes,
        };
        changes.iter().filter(|c| c.is_changed())
    }
}

/// Sort sections ascending by `order`. Stable: ties keep their input order.
pub fn sort_by_order(sections: &mut [Section]) {
    sections.sort_by_key(|s| s.order);
}

/// Move the element at `from` so it ends up at index `to`.
///
/// Both indices must be in bounds.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    let item = items.remove(from);
    items.insert(to, item);
}

/// Sections of one classroom, sorted ascending by order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SectionCollection {
    sections: Vec<Section>,
}

impl SectionCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from sections in any order.
    pub fn from_unsorted(mut sections: Vec<Section>) -> Self {
        sort_by_order(&mut sections);
        Self { sections }
    }

    /// Sections in display order.
    pub fn as_slice(&self) -> &[Section] {
        &self.sections
    }

    /// Iterate sections in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, Section> {
        self.sections.iter()
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Zero-based display position of a section.
    pub fn position(&self, id: &SectionId) -> Option<usize> {
        self.sections.iter().position(|s| &s.id == id)
    }

    /// Look up a section by ID.
    pub fn get(&self, id: &SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| &s.id == id)
    }

    /// Section IDs in display order.
    pub fn ids(&self) -> Vec<SectionId> {
        self.sections.iter().map(|s| s.id.clone()).collect()
    }

    /// Move `source` onto `target`'s position and renumber all sections.
    ///
    /// Returns [`MoveOutcome::Unchanged`] without touching the collection when
    /// `source == target`. Fails, leaving the collection untouched, when
    /// either ID is unknown.
    pub fn move_section(
        &mut self,
        source: &SectionId,
        target: &SectionId,
    ) -> Result<MoveOutcome, OrderingError> {
        if source == target {
            return Ok(MoveOutcome::Unchanged);
        }
        let from = self
            .position(source)
            .ok_or_else(|| OrderingError::UnknownSection(source.clone()))?;
        let to = self
            .position(target)
            .ok_or_else(|| OrderingError::UnknownSection(target.clone()))?;

        move_item(&mut self.sections, from, to);
        let changes = self.renumber();
        Ok(MoveOutcome::Moved { from, to, changes })
    }

    /// Assign `index + 1` as every section's order.
    fn renumber(&mut self) -> Vec<OrderChange> {
        self.sections
            .iter_mut()
            .zip(1_i64..)
            .map(|(section, order)| {
                let previous = std::mem::replace(&mut section.order, order);
                OrderChange {
                    id: section.id.clone(),
                    previous,
                    order,
                }
            })
            .collect()
    }

    /// Consume the collection and return the sections in display order.
    pub fn into_vec(self) -> Vec<Section> {
        self.sections
    }
}

impl<'a> IntoIterator for &'a SectionCollection {
    type Item = &'a Section;
    type IntoIter = std::slice::Iter<'a, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn abc() -> SectionCollection {
        SectionCollection::from_unsorted(vec![
            Section::new("A", "Alpha", 1),
            Section::new("B", "Beta", 2),
            Section::new("C", "Gamma", 3),
        ])
    }

    fn ids(c: &SectionCollection) -> Vec<&str> {
        c.iter().map(|s| s.id.as_str()).collect()
    }

    fn orders(c: &SectionCollection) -> Vec<i64> {
        c.iter().map(|s| s.order).collect()
    }

    // ── sorting ──────────────────────────────────────────────────────

    #[test]
    fn from_unsorted_sorts_ascending() {
        let c = SectionCollection::from_unsorted(vec![
            Section::new("x", "X", 3),
            Section::new("y", "Y", 1),
            Section::new("z", "Z", 2),
        ]);
        assert_eq!(orders(&c), vec![1, 2, 3]);
        assert_eq!(ids(&c), vec!["y", "z", "x"]);
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let c = SectionCollection::from_unsorted(vec![
            Section::new("b", "B", 2),
            Section::new("a1", "A", 1),
            Section::new("a2", "A", 1),
        ]);
        assert_eq!(ids(&c), vec!["a1", "a2", "b"]);
    }

    // ── move_item ────────────────────────────────────────────────────

    #[test]
    fn move_item_forward_and_back() {
        let mut v = vec![1, 2, 3, 4];
        move_item(&mut v, 0, 2);
        assert_eq!(v, vec![2, 3, 1, 4]);
        move_item(&mut v, 3, 0);
        assert_eq!(v, vec![4, 2, 3, 1]);
    }

    // ── move_section ─────────────────────────────────────────────────

    #[test]
    fn drop_last_onto_first() {
        let mut c = abc();
        let outcome = c
            .move_section(&SectionId::from("C"), &SectionId::from("A"))
            .unwrap();
        assert_eq!(ids(&c), vec!["C", "A", "B"]);
        assert_eq!(orders(&c), vec![1, 2, 3]);
        assert_matches!(outcome, MoveOutcome::Moved { from: 2, to: 0, .. });
    }

    #[test]
    fn drop_first_onto_last() {
        let mut c = abc();
        let _ = c
            .move_section(&SectionId::from("A"), &SectionId::from("C"))
            .unwrap();
        assert_eq!(ids(&c), vec!["B", "C", "A"]);
    }

    #[test]
    fn same_source_and_target_is_noop() {
        let mut c = abc();
        let before = c.clone();
        let outcome = c
            .move_section(&SectionId::from("B"), &SectionId::from("B"))
            .unwrap();
        assert_eq!(outcome, MoveOutcome::Unchanged);
        assert_eq!(c, before);
        assert_eq!(outcome.changed().count(), 0);
    }

    #[test]
    fn unknown_ids_leave_collection_untouched() {
        let mut c = abc();
        let before = c.clone();
        let err = c
            .move_section(&SectionId::from("Z"), &SectionId::from("A"))
            .unwrap_err();
        assert_eq!(err, OrderingError::UnknownSection(SectionId::from("Z")));
        let err = c
            .move_section(&SectionId::from("A"), &SectionId::from("Z"))
            .unwrap_err();
        assert_eq!(err, OrderingError::UnknownSection(SectionId::from("Z")));
        assert_eq!(c, before);
    }

    #[test]
    fn changed_lists_only_renumbered_sections() {
        let mut c = abc();
        let outcome = c
            .move_section(&SectionId::from("B"), &SectionId::from("C"))
            .unwrap();
        let changed: Vec<&str> = outcome.changed().map(|c| c.id.as_str()).collect();
        assert_eq!(changed, vec!["C", "B"]);
    }

    #[test]
    fn sparse_orders_are_compacted() {
        let mut c = SectionCollection::from_unsorted(vec![
            Section::new("A", "A", 10),
            Section::new("B", "B", 20),
            Section::new("C", "C", 30),
        ]);
        let outcome = c
            .move_section(&SectionId::from("A"), &SectionId::from("B"))
            .unwrap();
        assert_eq!(orders(&c), vec![1, 2, 3]);
        assert_eq!(outcome.changed().count(), 3);
    }

    #[test]
    fn lookup_helpers() {
        let c = abc();
        assert_eq!(c.position(&SectionId::from("B")), Some(1));
        assert_eq!(c.get(&SectionId::from("C")).map(|s| s.title.as_str()), Some("Gamma"));
        assert!(c.get(&SectionId::from("nope")).is_none());
        assert_eq!(c.len(), 3);
        assert!(!c.is_empty());
        assert_eq!(c.ids().len(), 3);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn collection(orders: &[i64]) -> SectionCollection {
            SectionCollection::from_unsorted(
                orders
                    .iter()
                    .enumerate()
                    .map(|(i, o)| Section::new(format!("s{i}"), format!("S{i}"), *o))
                    .collect(),
            )
        }

        proptest! {
            #[test]
            fn move_renumbers_contiguously(
                orders in proptest::collection::vec(-50i64..50, 1..24),
                a in 0usize..24,
                b in 0usize..24,
            ) {
                let mut c = collection(&orders);
                let n = c.len();
                let source = c.as_slice()[a % n].id.clone();
                let target = c.as_slice()[b % n].id.clone();
                let before = c.clone();

                let outcome = c.move_section(&source, &target).unwrap();

                if source == target {
                    prop_assert_eq!(outcome, MoveOutcome::Unchanged);
                    prop_assert_eq!(c, before);
                } else {
                    let expected: Vec<i64> = (1..=i64::try_from(n).unwrap()).collect();
                    let got: Vec<i64> = c.iter().map(|s| s.order).collect();
                    prop_assert_eq!(got, expected);
                    prop_assert_eq!(c.position(&source), before.position(&target));
                }
            }

            #[test]
            fn move_preserves_membership(
                n in 2usize..16,
                a in 0usize..16,
                b in 0usize..16,
            ) {
                let orders: Vec<i64> = (1..=i64::try_from(n).unwrap()).collect();
                let mut c = collection(&orders);
                let source = c.as_slice()[a % n].id.clone();
                let target = c.as_slice()[b % n].id.clone();
                let _ = c.move_section(&source, &target).unwrap();

                let mut after = c.ids();
                after.sort();
                let mut original = collection(&orders).ids();
                original.sort();
                prop_assert_eq!(after, original);
            }
        }
    }
}
