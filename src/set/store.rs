//! The arena of alignment sets and their frontiers.
//!
//! Sets are addressed by dense identifiers `0..len`. Merging two sets writes
//! the union into the lower identifier and moves the top record into the
//! freed slot, so the store never holds holes. Every move keeps the
//! [`Index`]'s back-references in sync.

use std::collections::TryReserveError;

use tracing::trace;

use crate::frontier::Frontier;
use crate::sequence::Index;
use crate::set::Set;
use crate::set::SetId;

/// An error related to a [`Store`].
#[derive(Debug)]
pub enum Error {
    /// The arena could not grow.
    Allocation(TryReserveError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Allocation(err) => write!(f, "could not grow alignment set store: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A set together with its frontier in every sequence.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    /// The set.
    set: Set,

    /// The frontier of the set within each sequence.
    frontiers: Vec<Frontier>,
}

impl Record {
    /// Creates a new [`Record`].
    pub fn new(set: Set, frontiers: Vec<Frontier>) -> Self {
        debug_assert_eq!(set.width(), frontiers.len());
        Self { set, frontiers }
    }

    /// Creates a record whose frontier is pinned where the set has members and
    /// unbounded elsewhere. A rebuild fills in the rest.
    pub fn seeded(set: Set) -> Self {
        let frontiers = (0..set.width())
            .map(|sequence| match set.member(sequence) {
                Some(position) => Frontier::pinned(position),
                None => Frontier::unbounded(),
            })
            .collect();

        Self { set, frontiers }
    }

    /// Gets the set.
    pub fn set(&self) -> &Set {
        &self.set
    }

    /// Gets the frontiers.
    pub fn frontiers(&self) -> &[Frontier] {
        &self.frontiers
    }
}

/// The arena of alignment set records.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Store {
    /// The live records.
    records: Vec<Record>,
}

impl Store {
    /// Gets the number of live sets.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether there are no live sets.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Gets a record.
    pub fn get(&self, id: SetId) -> Option<&Record> {
        self.records.get(id)
    }

    /// Gets a set.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not live.
    pub fn set(&self, id: SetId) -> &Set {
        &self.records[id].set
    }

    /// Gets the frontiers of a set.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not live.
    pub fn frontiers(&self, id: SetId) -> &[Frontier] {
        &self.records[id].frontiers
    }

    /// Gets the frontiers of a set mutably.
    pub(crate) fn frontiers_mut(&mut self, id: SetId) -> &mut [Frontier] {
        &mut self.records[id].frontiers
    }

    /// Iterates over the live records in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Appends a record at the next free identifier and attaches its members.
    pub(crate) fn append(&mut self, record: Record, index: &mut Index) -> Result<SetId> {
        self.records.try_reserve(1).map_err(Error::Allocation)?;

        let id = self.records.len();
        self.records.push(record);
        self.attach(id, index);

        Ok(id)
    }

    /// Overwrites the record at `id` and attaches its members.
    pub(crate) fn replace(&mut self, id: SetId, record: Record, index: &mut Index) {
        self.records[id] = record;
        self.attach(id, index);
    }

    /// Writes a merged `record` in place of the two live sets `a` and `b`,
    /// returning the identifier the merged set ends up with.
    ///
    /// The merged set takes the lower of the two identifiers. The slot of the
    /// higher one is filled by the top record, and the store shrinks by one.
    pub(crate) fn merge(&mut self, a: SetId, b: SetId, record: Record, index: &mut Index) -> SetId {
        debug_assert_ne!(a, b);

        let (keep, free) = (a.min(b), a.max(b));
        self.replace(keep, record, index);

        let top = self.records.len() - 1;
        if free != top {
            self.relocate(free, top, index);
        }

        self.shrink();
        trace!(keep, free, top, "merged alignment sets");

        keep
    }

    /// Moves the record at `src` into `dst` and points its members at `dst`.
    ///
    /// The record previously at `dst` ends up at `src`.
    fn relocate(&mut self, dst: SetId, src: SetId, index: &mut Index) {
        self.records.swap(dst, src);
        self.attach(dst, index);
    }

    /// Drops the top record.
    fn shrink(&mut self) {
        self.records.pop();
    }

    /// Points every member of the record at `id` back at `id`.
    fn attach(&self, id: SetId, index: &mut Index) {
        for (sequence, position) in self.records[id].set.members() {
            index.attach(sequence, position, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::Resolution;

    fn record(members: Vec<Option<usize>>) -> Record {
        Record::seeded(Set::from_members(members))
    }

    #[test]
    fn appending_attaches_members() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut index = Index::new([5, 5]);
        let mut store = Store::default();

        let id = store.append(record(vec![Some(1), Some(3)]), &mut index)?;

        assert_eq!(id, 0);
        assert_eq!(store.len(), 1);
        assert_eq!(index.resolve(0, 1), Resolution::Member(0));
        assert_eq!(index.resolve(1, 3), Resolution::Member(0));
        assert_eq!(store.frontiers(0), &[Frontier::pinned(1), Frontier::pinned(3)]);

        Ok(())
    }

    #[test]
    fn merging_compacts_the_top_record() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut index = Index::new([10, 10, 10]);
        let mut store = Store::default();

        store.append(record(vec![Some(1), None, None]), &mut index)?;
        store.append(record(vec![None, Some(1), None]), &mut index)?;
        store.append(record(vec![None, None, Some(7)]), &mut index)?;

        let merged = record(vec![Some(1), Some(1), None]);
        let id = store.merge(1, 0, merged, &mut index);

        assert_eq!(id, 0);
        assert_eq!(store.len(), 2);
        assert_eq!(index.resolve(0, 1), Resolution::Member(0));
        assert_eq!(index.resolve(1, 1), Resolution::Member(0));

        // The top set moved into the freed slot.
        assert_eq!(store.set(1).member(2), Some(7));
        assert_eq!(index.resolve(2, 7), Resolution::Member(1));
        assert_eq!(
            index.resolve(2, 2),
            Resolution::Gap {
                preceding: None,
                following: Some(1)
            }
        );

        Ok(())
    }

    #[test]
    fn merging_the_top_record_only_shrinks() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let mut index = Index::new([4, 4]);
        let mut store = Store::default();

        store.append(record(vec![Some(0), None]), &mut index)?;
        store.append(record(vec![None, Some(0)]), &mut index)?;

        let id = store.merge(0, 1, record(vec![Some(0), Some(0)]), &mut index);

        assert_eq!(id, 0);
        assert_eq!(store.len(), 1);
        assert_eq!(index.resolve(1, 0), Resolution::Member(0));

        Ok(())
    }

    #[test]
    fn replacing_in_place() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut index = Index::new([4, 4]);
        let mut store = Store::default();

        store.append(record(vec![Some(2), None]), &mut index)?;
        store.replace(0, record(vec![Some(2), Some(3)]), &mut index);

        assert_eq!(store.len(), 1);
        assert_eq!(store.set(0).count(), 2);
        assert_eq!(index.resolve(1, 3), Resolution::Member(0));
        assert_eq!(
            index.resolve(1, 1),
            Resolution::Gap {
                preceding: None,
                following: Some(0)
            }
        );

        Ok(())
    }
}
