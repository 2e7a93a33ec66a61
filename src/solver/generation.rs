use crate::expression::Term;

/// One pass's admitted expressions, split into one partition per
/// writer. Each worker holds `&mut` to exactly one partition, so
/// concurrent writes need no synchronisation; iteration concatenates
/// the partitions in id order.
pub struct Generation {
    parts: Vec<Vec<Term>>,
}

impl Generation {
    pub fn new(partitions: usize) -> Self {
        Self {
            parts: (0..partitions).map(|_| Vec::new()).collect(),
        }
    }

    /// Exclusive handles to every partition, one per worker.
    pub(crate) fn parts_mut(&mut self) -> std::slice::IterMut<'_, Vec<Term>> {
        self.parts.iter_mut()
    }

    pub(crate) fn part_mut(&mut self, id: usize) -> &mut Vec<Term> {
        &mut self.parts[id]
    }

    /// Deterministic iteration given the push order within each
    /// partition; empty partitions are skipped transparently.
    pub fn iter(&self) -> impl Iterator<Item = Term> + '_ {
        self.parts.iter().flatten().copied()
    }

    pub fn len(&self) -> usize {
        self.parts.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.iter().all(Vec::is_empty)
    }
}
