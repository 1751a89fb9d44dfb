//! The per-sequence position index.
//!
//! Every position of every sequence either belongs to an alignment set or sits
//! in a gap between two anchors (positions that do belong to a set). For
//! positions in a gap, the index keeps the nearest anchor on either side so
//! that any position resolves in constant time.

use crate::set::SetId;

/// How a single position resolves against the index.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Resolution {
    /// The position is a member of this set.
    Member(SetId),

    /// The position is not a member of any set.
    Gap {
        /// The set of the nearest anchor before the position, if any.
        preceding: Option<SetId>,

        /// The set of the nearest anchor after the position, if any.
        following: Option<SetId>,
    },
}

impl Resolution {
    /// Gets the set the position is a member of, if any.
    ///
    /// Neighboring anchors of a position in a gap are never returned here.
    pub fn member(&self) -> Option<SetId> {
        match self {
            Resolution::Member(set) => Some(*set),
            Resolution::Gap { .. } => None,
        }
    }
}

/// The index for a single sequence.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sequence {
    /// The set each position belongs to.
    assigned: Vec<Option<SetId>>,

    /// For positions in a gap, the position of the nearest anchor before.
    preceding: Vec<Option<usize>>,

    /// For positions in a gap, the position of the nearest anchor after.
    following: Vec<Option<usize>>,
}

impl Sequence {
    /// Creates a sequence of `length` positions, none of which are anchors.
    pub fn new(length: usize) -> Self {
        Self {
            assigned: vec![None; length],
            preceding: vec![None; length],
            following: vec![None; length],
        }
    }

    /// Gets the length of the sequence.
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    /// Returns whether the sequence has no positions.
    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }

    /// Gets the set that `position` belongs to, if any.
    pub fn assigned(&self, position: usize) -> Option<SetId> {
        self.assigned[position]
    }

    /// Resolves a position to its set or to its neighboring anchors.
    pub fn resolve(&self, position: usize) -> Resolution {
        match self.assigned[position] {
            Some(set) => Resolution::Member(set),
            None => Resolution::Gap {
                preceding: self.preceding[position].and_then(|p| self.assigned[p]),
                following: self.following[position].and_then(|p| self.assigned[p]),
            },
        }
    }

    /// Gets the position of the nearest anchor strictly before `position`.
    pub fn preceding_anchor(&self, position: usize) -> Option<usize> {
        let before = position.checked_sub(1)?;

        match self.assigned[before] {
            Some(_) => Some(before),
            None => self.preceding[before],
        }
    }

    /// Gets the position of the nearest anchor strictly after `position`.
    pub fn following_anchor(&self, position: usize) -> Option<usize> {
        let after = position + 1;

        if after >= self.len() {
            return None;
        }

        match self.assigned[after] {
            Some(_) => Some(after),
            None => self.following[after],
        }
    }

    /// Records that `position` is a member of `set`.
    ///
    /// When the position was previously in a gap, the gap is split in two so
    /// that the positions on either side now resolve to this anchor. Moving an
    /// anchor from one set id to another (as compaction does) only rewrites
    /// the membership.
    pub fn attach(&mut self, position: usize, set: SetId) {
        if self.assigned[position].is_none() {
            let (lo, hi) = (self.preceding[position], self.following[position]);
            self.link_gap(lo, Some(position));
            self.link_gap(Some(position), hi);
        }

        self.assigned[position] = Some(set);
    }

    /// Points every position strictly between two anchors at those anchors.
    ///
    /// [`None`] stands for the start (for `lo`) or the end (for `hi`) of the
    /// sequence. Every position in the range must be in a gap.
    pub fn link_gap(&mut self, lo: Option<usize>, hi: Option<usize>) {
        let start = lo.map(|p| p + 1).unwrap_or(0);
        let end = hi.unwrap_or(self.len());

        for position in start..end {
            self.preceding[position] = lo;
            self.following[position] = hi;
        }
    }

    /// Iterates over the anchors in the sequence in position order.
    pub fn anchors(&self) -> impl Iterator<Item = (usize, SetId)> + '_ {
        self.assigned
            .iter()
            .enumerate()
            .filter_map(|(position, set)| set.map(|set| (position, set)))
    }
}

/// The index over all sequences.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Index(Vec<Sequence>);

impl Index {
    /// Creates an index with one sequence per entry in `lengths`.
    pub fn new(lengths: impl IntoIterator<Item = usize>) -> Self {
        Self(lengths.into_iter().map(Sequence::new).collect())
    }

    /// Gets the number of sequences.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the index holds no sequences.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gets a sequence by reference.
    pub fn sequence(&self, sequence: usize) -> Option<&Sequence> {
        self.0.get(sequence)
    }

    /// Resolves `position` within `sequence`.
    pub fn resolve(&self, sequence: usize, position: usize) -> Resolution {
        self.0[sequence].resolve(position)
    }

    /// Records that `position` of `sequence` belongs to `set`.
    pub fn attach(&mut self, sequence: usize, position: usize, set: SetId) {
        self.0[sequence].attach(position, set)
    }

    /// Gets the set of the nearest anchor strictly before `position`.
    pub fn preceding_set(&self, sequence: usize, position: usize) -> Option<SetId> {
        let sequence = &self.0[sequence];
        sequence
            .preceding_anchor(position)
            .and_then(|p| sequence.assigned(p))
    }

    /// Gets the set of the nearest anchor strictly after `position`.
    pub fn following_set(&self, sequence: usize, position: usize) -> Option<SetId> {
        let sequence = &self.0[sequence];
        sequence
            .following_anchor(position)
            .and_then(|p| sequence.assigned(p))
    }

    /// Iterates over the sequences.
    pub fn iter(&self) -> impl Iterator<Item = &Sequence> {
        self.0.iter()
    }

    /// Iterates mutably over the sequences.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Sequence> {
        self.0.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn an_empty_sequence_resolves_to_open_gaps() {
        let sequence = Sequence::new(4);

        for position in 0..4 {
            assert_eq!(
                sequence.resolve(position),
                Resolution::Gap {
                    preceding: None,
                    following: None
                }
            );
        }

        assert_eq!(sequence.preceding_anchor(0), None);
        assert_eq!(sequence.following_anchor(3), None);
    }

    #[test]
    fn attaching_splits_the_gap() {
        let mut sequence = Sequence::new(10);
        sequence.attach(5, 0);

        assert_eq!(sequence.resolve(5), Resolution::Member(0));
        assert_eq!(
            sequence.resolve(2),
            Resolution::Gap {
                preceding: None,
                following: Some(0)
            }
        );
        assert_eq!(
            sequence.resolve(8),
            Resolution::Gap {
                preceding: Some(0),
                following: None
            }
        );

        sequence.attach(2, 1);
        sequence.attach(8, 2);

        assert_eq!(
            sequence.resolve(3),
            Resolution::Gap {
                preceding: Some(1),
                following: Some(0)
            }
        );
        assert_eq!(
            sequence.resolve(7),
            Resolution::Gap {
                preceding: Some(0),
                following: Some(2)
            }
        );
        assert_eq!(
            sequence.resolve(9),
            Resolution::Gap {
                preceding: Some(2),
                following: None
            }
        );

        assert_eq!(sequence.preceding_anchor(5), Some(2));
        assert_eq!(sequence.following_anchor(5), Some(8));
        assert_eq!(sequence.following_anchor(4), Some(5));
        assert_eq!(sequence.preceding_anchor(2), None);
        assert_eq!(
            sequence.anchors().collect::<Vec<_>>(),
            vec![(2, 1), (5, 0), (8, 2)]
        );
    }

    #[test]
    fn reattaching_only_renames_the_set() {
        let mut sequence = Sequence::new(6);
        sequence.attach(1, 0);
        sequence.attach(4, 1);

        sequence.attach(4, 0);

        assert_eq!(sequence.resolve(4), Resolution::Member(0));
        assert_eq!(
            sequence.resolve(2),
            Resolution::Gap {
                preceding: Some(0),
                following: Some(0)
            }
        );
    }

    #[test]
    fn adjacent_anchors() {
        let mut index = Index::new([3, 3]);
        index.attach(0, 0, 0);
        index.attach(0, 1, 1);

        assert_eq!(index.following_set(0, 0), Some(1));
        assert_eq!(index.preceding_set(0, 1), Some(0));
        assert_eq!(index.following_set(0, 1), None);
        assert_eq!(index.following_set(1, 0), None);
    }
}
