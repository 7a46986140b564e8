//! Pareto set with a round marker.
//!
//! A Pareto set keeps only mutually non-dominated elements. Dominance is not
//! a total order, so the set is a dense vector and every insertion compares the
//! candidate against all current members.
//!
//! The set also carries a *marker*: a position separating elements present when
//! the marker was last set from elements added since. The search marks every
//! touched stop at the start of a round, so the round only rescans arrivals
//! created in the previous round.
//!
//! Instead of notifying listeners, [`ParetoSet::add`] returns an [`AddOutcome`]
//! which the caller consumes synchronously.

/// Decides dominance between two elements.
pub trait ParetoComparator<T> {
    /// Returns true if `left` is strictly better than `right` on at least one
    /// criterion.
    ///
    /// `left` dominates `right` when this holds for (`left`, `right`) but not
    /// for (`right`, `left`). When it holds both ways the elements are mutually
    /// non-dominated; when it holds neither way they are equivalent.
    fn left_dominance_exist(&self, left: &T, right: &T) -> bool;
}

impl<T, F> ParetoComparator<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    fn left_dominance_exist(&self, left: &T, right: &T) -> bool {
        self(left, right)
    }
}

/// Result of offering an element to a [`ParetoSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The element was added; `dropped` existing elements were evicted.
    Accepted { dropped: usize },
    /// The element was dominated by, or equivalent to, an existing element.
    Rejected,
}

impl AddOutcome {
    /// Returns true if the element made it into the set.
    pub fn is_accepted(self) -> bool {
        matches!(self, AddOutcome::Accepted { .. })
    }
}

/// A set of mutually non-dominated elements.
#[derive(Debug, Clone)]
pub struct ParetoSet<T, C> {
    elements: Vec<T>,
    comparator: C,
    marker: usize,
}

impl<T, C: ParetoComparator<T>> ParetoSet<T, C> {
    /// Create an empty set ordered by `comparator`.
    pub fn new(comparator: C) -> Self {
        Self {
            elements: Vec::new(),
            comparator,
            marker: 0,
        }
    }

    /// Offer an element to the set.
    ///
    /// An element equivalent to an existing one is rejected, so the first
    /// of several equal elements wins.
    pub fn add(&mut self, candidate: T) -> AddOutcome {
        let mut first_dominated = None;

        for (i, existing) in self.elements.iter().enumerate() {
            let left = self.comparator.left_dominance_exist(&candidate, existing);
            let right = self.comparator.left_dominance_exist(existing, &candidate);

            match (left, right) {
                (true, true) => {}
                (true, false) => {
                    first_dominated = Some(i);
                    break;
                }
                (false, _) => return AddOutcome::Rejected,
            }
        }

        let dropped = match first_dominated {
            Some(i) => self.remove_dominated_from(i, &candidate),
            None => 0,
        };
        self.elements.push(candidate);
        AddOutcome::Accepted { dropped }
    }

    /// Returns true if `candidate` would be accepted, without adding it.
    pub fn qualify(&self, candidate: &T) -> bool {
        self.elements.iter().all(|existing| {
            self.comparator.left_dominance_exist(candidate, existing)
        })
    }

    /// Remove every element from `start` on that `candidate` dominates.
    ///
    /// Elements before `start` have already been found mutually
    /// non-dominated with the candidate. The relative order of the survivors
    /// is kept and the marker is moved so that it still separates old from
    /// new elements.
    fn remove_dominated_from(&mut self, start: usize, candidate: &T) -> usize {
        let before = self.elements.len();
        let old_marker = self.marker;
        let mut marker = old_marker;
        let mut index = 0;
        let comparator = &self.comparator;

        self.elements.retain(|existing| {
            let i = index;
            index += 1;
            if i < start {
                return true;
            }
            let dominated = comparator.left_dominance_exist(candidate, existing)
                && !comparator.left_dominance_exist(existing, candidate);
            if dominated && i < old_marker {
                marker -= 1;
            }
            !dominated
        });

        self.marker = marker;
        before - self.elements.len()
    }

    /// Record the current end of the set; later additions are "after the
    /// marker".
    pub fn mark_at_end_of_set(&mut self) {
        self.marker = self.elements.len();
    }

    /// Elements added since the marker was last set (and not evicted since).
    pub fn elements_after_marker(&self) -> &[T] {
        &self.elements[self.marker..]
    }

    /// All elements, oldest first.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }

    /// Mutable access to the elements.
    ///
    /// Callers must not make an element worse on any criterion; improving an
    /// element may leave other, now dominated, elements in the set.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.elements.iter_mut()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Remove all elements and reset the marker.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.marker = 0;
    }
}

impl<'a, T, C> IntoIterator for &'a ParetoSet<T, C> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct V(&'static str, i32, i32);

    fn less_less(l: &V, r: &V) -> bool {
        l.1 < r.1 || l.2 < r.2
    }

    fn names<C: ParetoComparator<V>>(set: &ParetoSet<V, C>) -> Vec<&'static str> {
        set.iter().map(|v| v.0).collect()
    }

    #[test]
    fn initially_empty() {
        let set: ParetoSet<V, _> = ParetoSet::new(less_less);
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(set.elements_after_marker().is_empty());
    }

    #[test]
    fn single_criterion_less_than() {
        let mut set = ParetoSet::new(|l: &V, r: &V| l.1 < r.1);
        assert!(set.add(V("V0", 5, 0)).is_accepted());

        // Same value: the first one wins
        assert_eq!(set.add(V("same", 5, 0)), AddOutcome::Rejected);
        // Greater value
        assert_eq!(set.add(V("worse", 6, 0)), AddOutcome::Rejected);
        assert_eq!(names(&set), vec!["V0"]);

        // Lesser value replaces
        assert_eq!(set.add(V("V1", 4, 0)), AddOutcome::Accepted { dropped: 1 });
        assert_eq!(names(&set), vec!["V1"]);
    }

    #[test]
    fn different_criterion_keeps_all_distinct() {
        let mut set = ParetoSet::new(|l: &V, r: &V| l.1 != r.1);
        assert!(set.add(V("V0", 5, 0)).is_accepted());
        assert!(!set.add(V("dup", 5, 0)).is_accepted());
        assert!(set.add(V("D1", 6, 0)).is_accepted());
        assert!(set.add(V("D2", 3, 0)).is_accepted());
        assert_eq!(names(&set), vec!["V0", "D1", "D2"]);
    }

    #[test]
    fn two_criteria() {
        let v0 = V("V0", 5, 5);

        let cases = [
            (V("n", 6, 5), vec!["V0"]),
            (V("n", 5, 6), vec!["V0"]),
            (V("n", 5, 5), vec!["V0"]),
            (V("r", 4, 5), vec!["r"]),
            (V("r", 5, 4), vec!["r"]),
            (V("k", 4, 6), vec!["V0", "k"]),
            (V("k", 6, 4), vec!["V0", "k"]),
        ];

        for (candidate, expected) in cases {
            let mut set = ParetoSet::new(less_less);
            set.add(v0);
            set.add(candidate);
            assert_eq!(names(&set), expected, "adding {candidate:?}");
        }
    }

    #[test]
    fn one_vector_dominates_many() {
        let mut set = ParetoSet::new(less_less);
        set.add(V("A", 5, 1));
        set.add(V("B", 3, 3));
        set.add(V("C", 1, 5));
        set.add(V("D", 0, 9));
        assert_eq!(set.len(), 4);

        // Dominates A, B and C but not D
        assert_eq!(set.add(V("X", 1, 1)), AddOutcome::Accepted { dropped: 3 });
        assert_eq!(names(&set), vec!["D", "X"]);
    }

    #[test]
    fn marker_separates_new_elements() {
        let mut set = ParetoSet::new(less_less);
        set.add(V("A", 1, 9));
        set.add(V("B", 9, 1));
        set.mark_at_end_of_set();
        assert!(set.elements_after_marker().is_empty());

        set.add(V("C", 5, 5));
        let after: Vec<_> = set.elements_after_marker().iter().map(|v| v.0).collect();
        assert_eq!(after, vec!["C"]);
    }

    #[test]
    fn marker_moves_when_old_elements_are_evicted() {
        let mut set = ParetoSet::new(less_less);
        set.add(V("A", 1, 9));
        set.add(V("B", 5, 5));
        set.add(V("C", 9, 1));
        set.mark_at_end_of_set();

        // Evicts B, which is before the marker
        set.add(V("D", 4, 4));
        assert_eq!(names(&set), vec!["A", "C", "D"]);
        let after: Vec<_> = set.elements_after_marker().iter().map(|v| v.0).collect();
        assert_eq!(after, vec!["D"]);
    }

    #[test]
    fn eviction_after_marker_keeps_marker() {
        let mut set = ParetoSet::new(less_less);
        set.add(V("A", 1, 9));
        set.mark_at_end_of_set();
        set.add(V("B", 5, 5));
        set.add(V("C", 4, 4));
        assert_eq!(names(&set), vec!["A", "C"]);
        let after: Vec<_> = set.elements_after_marker().iter().map(|v| v.0).collect();
        assert_eq!(after, vec!["C"]);
    }

    #[test]
    fn qualify_does_not_modify() {
        let mut set = ParetoSet::new(less_less);
        set.add(V("A", 5, 5));
        assert!(set.qualify(&V("x", 4, 6)));
        assert!(!set.qualify(&V("x", 5, 5)));
        assert!(!set.qualify(&V("x", 6, 6)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn clear_resets_marker() {
        let mut set = ParetoSet::new(less_less);
        set.add(V("A", 5, 5));
        set.mark_at_end_of_set();
        set.clear();
        assert!(set.is_empty());
        set.add(V("B", 1, 1));
        assert_eq!(set.elements_after_marker().len(), 1);
    }
}
