//! Alignment sets.
//!
//! An alignment set (sometimes called an anchor) holds at most one position
//! per sequence. All of its positions are asserted to be mutually aligned: the
//! set is one column of an implicit multiple alignment.

pub mod store;

pub use store::Store;

/// The dense identifier of a live alignment set.
///
/// Identifiers are only stable between insertions: merging two sets compacts
/// the store and may renumber the set with the highest identifier.
pub type SetId = usize;

/// An alignment set.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Set {
    /// The member position within each sequence, if any.
    members: Vec<Option<usize>>,

    /// The number of sequences with a member.
    count: usize,
}

impl Set {
    /// Creates a set with no members over `width` sequences.
    pub fn empty(width: usize) -> Self {
        Self {
            members: vec![None; width],
            count: 0,
        }
    }

    /// Creates a set from one optional position per sequence.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqclosure::set::Set;
    ///
    /// let set = Set::from_members(vec![Some(2), None, Some(4)]);
    /// assert_eq!(set.count(), 2);
    /// assert_eq!(set.member(1), None);
    /// assert_eq!(set.member(2), Some(4));
    /// ```
    pub fn from_members(members: Vec<Option<usize>>) -> Self {
        let count = members.iter().filter(|member| member.is_some()).count();
        Self { members, count }
    }

    /// Gets the member position within `sequence`, if any.
    pub fn member(&self, sequence: usize) -> Option<usize> {
        self.members.get(sequence).copied().flatten()
    }

    /// Gets the number of sequences with a member.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Gets the number of sequences the set spans.
    pub fn width(&self) -> usize {
        self.members.len()
    }

    /// Iterates over the `(sequence, position)` members of the set.
    pub fn members(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.members
            .iter()
            .enumerate()
            .filter_map(|(sequence, position)| position.map(|p| (sequence, p)))
    }

    /// Adds `position` of `sequence` to the set, replacing any existing member
    /// within that sequence.
    pub(crate) fn insert(&mut self, sequence: usize, position: usize) {
        if self.members[sequence].replace(position).is_none() {
            self.count += 1;
        }
    }

    /// Adds every member of `other` to the set.
    pub(crate) fn absorb(&mut self, other: &Set) {
        for (sequence, position) in other.members() {
            self.insert(sequence, position);
        }
    }
}

impl std::fmt::Display for Set {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let members = self
            .members()
            .map(|(sequence, position)| format!("{sequence}:{position}"))
            .collect::<Vec<_>>();

        write!(f, "{{{}}}", members.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorbing_counts_each_sequence_once() {
        let mut set = Set::empty(3);
        set.insert(0, 4);
        set.insert(0, 4);
        assert_eq!(set.count(), 1);

        let other = Set::from_members(vec![Some(4), Some(1), None]);
        set.absorb(&other);

        assert_eq!(set.count(), 2);
        assert_eq!(set.members().collect::<Vec<_>>(), vec![(0, 4), (1, 1)]);
        assert_eq!(set.to_string(), "{0:4, 1:1}");
    }
}
