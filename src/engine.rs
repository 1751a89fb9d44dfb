//! The closure engine.
//!
//! An [`Engine`] accepts facts of the form "position `i` of sequence `x` is
//! aligned with position `j` of sequence `y`" and maintains, for every
//! alignment set, the tightest bounds that all facts so far force upon it in
//! every sequence. Those bounds answer the consistency and positional queries
//! in [`query`].
//!
//! Insertion is incremental: the merged set's bounds are derived from the bounds
//! of its two sides, and the change is propagated outward only for as long as it
//! tightens something. That walk is amortized rather than worst-case bounded. It
//! assumes, as real alignments bear out, that most proposed facts are already
//! nearly implied by earlier ones. A full [`Engine::rebuild()`] recomputes
//! everything from scratch and always reproduces the incrementally maintained
//! state.
//!
//! [`Engine::add()`] does **not** check that a fact is consistent. Adding a
//! fact for which [`Engine::alignable()`] is false corrupts the bounds and the
//! index, after which later calls may panic. Use [`Engine::try_add()`]
//! unless the check was already made.

use tracing::trace;

use crate::bound::Lower;
use crate::bound::Upper;
use crate::fact::Fact;
use crate::frontier::Frontier;
use crate::sequence::Index;
use crate::sequence::Resolution;
use crate::set;
use crate::set::Set;
use crate::set::SetId;
use crate::set::Store;
use crate::set::store::Record;
use crate::topology;
use crate::topology::Topology;

pub mod builder;
pub mod query;

pub use builder::Builder;

/// An error related to an [`Engine`].
#[derive(Debug)]
pub enum Error {
    /// A sequence that does not exist.
    InvalidSequence {
        /// The offending sequence.
        sequence: usize,

        /// The number of sequences.
        count: usize,
    },

    /// A position beyond the end of its sequence.
    InvalidPosition {
        /// The sequence.
        sequence: usize,

        /// The offending position.
        position: usize,

        /// The length of the sequence.
        length: usize,
    },

    /// Two different positions of the same sequence cannot be aligned.
    SelfAlignment {
        /// The sequence.
        sequence: usize,

        /// The first position.
        first: usize,

        /// The second position.
        second: usize,
    },

    /// The alignment set store failed.
    Store(set::store::Error),

    /// The alignment sets could not be ordered.
    Topology(topology::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidSequence { sequence, count } => write!(
                f,
                "invalid sequence: {sequence} (there are {count} sequences)"
            ),
            Error::InvalidPosition {
                sequence,
                position,
                length,
            } => write!(
                f,
                "invalid position: {position} in sequence {sequence} (length {length})"
            ),
            Error::SelfAlignment {
                sequence,
                first,
                second,
            } => write!(
                f,
                "cannot align positions {first} and {second} of the same sequence {sequence}"
            ),
            Error::Store(err) => write!(f, "store error: {err}"),
            Error::Topology(err) => write!(f, "topology error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// The closure engine.
///
/// Generally, you will want to use a [`Builder`] to construct one of these.
///
/// # Examples
///
/// ```
/// use seqclosure::engine::Builder;
///
/// let mut engine = Builder::default().lengths([10, 10, 10])?.try_build()?;
///
/// engine.add(0, 4, 1, 4)?;
/// engine.add(1, 4, 2, 4)?;
///
/// // Aligned through the second sequence, though never stated directly.
/// assert!(engine.already_aligned(0, 4, 2, 4)?);
///
/// // Position 4 of the first sequence is pinned to position 4 of the second.
/// assert!(!engine.alignable(0, 4, 1, 2)?);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Engine {
    /// The length of each sequence.
    lengths: Vec<usize>,

    /// The per-sequence position index.
    index: Index,

    /// The alignment sets and their frontiers.
    store: Store,
}

impl Engine {
    /// Creates an engine with no alignment sets.
    pub(crate) fn empty(lengths: Vec<usize>) -> Self {
        Self {
            index: Index::new(lengths.iter().copied()),
            lengths,
            store: Store::default(),
        }
    }

    /// Gets the number of sequences.
    pub fn sequence_count(&self) -> usize {
        self.lengths.len()
    }

    /// Gets the length of a sequence.
    pub fn length(&self, sequence: usize) -> Option<usize> {
        self.lengths.get(sequence).copied()
    }

    /// Gets the lengths of all sequences.
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// Gets the number of live alignment sets.
    pub fn set_count(&self) -> usize {
        self.store.len()
    }

    /// Gets an alignment set.
    pub fn set(&self, id: SetId) -> Option<&Set> {
        self.store.get(id).map(Record::set)
    }

    /// Gets the frontier of an alignment set within every sequence.
    pub fn frontiers(&self, id: SetId) -> Option<&[Frontier]> {
        self.store.get(id).map(Record::frontiers)
    }

    /// Resolves a position to its alignment set or to its neighboring anchors.
    pub fn resolve(&self, sequence: usize, position: usize) -> Result<Resolution> {
        self.check(sequence, position)?;
        Ok(self.index.resolve(sequence, position))
    }

    /// Computes a topological order over the live alignment sets.
    ///
    /// Identifiers in the order are only valid until the next insertion.
    pub fn topological_order(&mut self) -> Result<Vec<SetId>> {
        Topology::try_build(&mut self.index, &self.store)
            .map(Topology::into_order)
            .map_err(Error::Topology)
    }

    /// Recomputes the order of the sets and the whole frontier table from
    /// scratch.
    ///
    /// This is the batch alternative to incremental insertion. After any
    /// sequence of consistent insertions, it leaves the frontier table exactly
    /// as it was.
    pub fn rebuild(&mut self) -> Result<()> {
        let topology = Topology::try_build(&mut self.index, &self.store).map_err(Error::Topology)?;
        topology.sweep(&mut self.store);
        Ok(())
    }

    /// Adds the fact that position `i` of sequence `x` is aligned with position
    /// `j` of sequence `y`.
    ///
    /// The fact must be [alignable](Engine::alignable): that is **not**
    /// checked here. After an inconsistent fact the engine's state is
    /// undefined, and later calls may panic. Errors are only returned for
    /// coordinates that do not exist and when the store cannot grow.
    ///
    /// Adding a fact is idempotent and symmetric.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqclosure::bound::Bounds;
    /// use seqclosure::engine::Builder;
    ///
    /// let mut engine = Builder::default().lengths([5, 5])?.try_build()?;
    /// engine.add(0, 2, 1, 2)?;
    ///
    /// assert_eq!(engine.bounds(0, 2, 1)?, Bounds::Exact(2));
    /// assert_eq!(engine.bounds(0, 1, 1)?, Bounds::Within(0..2));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn add(&mut self, x: usize, i: usize, y: usize, j: usize) -> Result<()> {
        self.check(x, i)?;
        self.check(y, j)?;

        if x == y {
            if i == j {
                return Ok(());
            }

            return Err(Error::SelfAlignment {
                sequence: x,
                first: i,
                second: j,
            });
        }

        let first = self.index.resolve(x, i);
        let second = self.index.resolve(y, j);

        let (n1, n2) = (first.member(), second.member());

        if n1.is_some() && n1 == n2 {
            return Ok(());
        }

        // (1) Build the merged set and derive its frontier from both sides.
        let width = self.sequence_count();
        let mut set = Set::empty(width);

        for id in [n1, n2].into_iter().flatten() {
            set.absorb(self.store.set(id));
        }

        set.insert(x, i);
        set.insert(y, j);

        let frontiers = (0..width)
            .map(|z| match set.member(z) {
                Some(position) => Frontier::pinned(position),
                None => Frontier::new(
                    self.floor(first, z).max(self.floor(second, z)),
                    self.ceiling(first, z).min(self.ceiling(second, z)),
                ),
            })
            .collect::<Vec<_>>();

        let record = Record::new(set, frontiers);

        // (2) Put it in the store.
        let id = match (n1, n2) {
            (None, None) => self
                .store
                .append(record, &mut self.index)
                .map_err(Error::Store)?,
            (Some(id), None) | (None, Some(id)) => {
                self.store.replace(id, record, &mut self.index);
                id
            }
            (Some(a), Some(b)) => self.store.merge(a, b, record, &mut self.index),
        };

        // (3) Push the new bounds outward.
        let visited = self.propagate(id);

        trace!(
            x,
            i,
            y,
            j,
            set = id,
            sets = self.store.len(),
            visited,
            "added fact"
        );

        Ok(())
    }

    /// Adds a [`Fact`] without checking it.
    ///
    /// See [`Engine::add()`].
    pub fn add_fact(&mut self, fact: &Fact) -> Result<()> {
        let ((x, i), (y, j)) = fact.pair();
        self.add(x, i, y, j)
    }

    /// Adds the fact that position `i` of sequence `x` is aligned with position
    /// `j` of sequence `y` if it is consistent with everything added so far.
    ///
    /// Returns whether the fact was added.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqclosure::engine::Builder;
    ///
    /// let mut engine = Builder::default().lengths([10, 10])?.try_build()?;
    ///
    /// assert!(engine.try_add(0, 4, 1, 4)?);
    /// assert!(!engine.try_add(0, 5, 1, 3)?);
    /// assert!(engine.try_add(0, 5, 1, 5)?);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_add(&mut self, x: usize, i: usize, y: usize, j: usize) -> Result<bool> {
        if !self.alignable(x, i, y, j)? {
            return Ok(false);
        }

        self.add(x, i, y, j)?;
        Ok(true)
    }

    /// Adds a [`Fact`] if it is consistent with everything added so far.
    ///
    /// See [`Engine::try_add()`].
    pub fn try_add_fact(&mut self, fact: &Fact) -> Result<bool> {
        let ((x, i), (y, j)) = fact.pair();
        self.try_add(x, i, y, j)
    }

    /// Adds the ungapped run of `len` facts `(x, i + k) ~ (y, j + k)` one pair
    /// at a time, stopping at the first pair that is not consistent.
    ///
    /// Returns the number of pairs added.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqclosure::engine::Builder;
    ///
    /// let mut engine = Builder::default().lengths([10, 10])?.try_build()?;
    /// engine.add(0, 6, 1, 7)?;
    ///
    /// // The third pair, (0, 6) ~ (1, 6), contradicts the first fact.
    /// assert_eq!(engine.try_add_run(0, 4, 1, 4, 4)?, 2);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_add_run(
        &mut self,
        x: usize,
        i: usize,
        y: usize,
        j: usize,
        len: usize,
    ) -> Result<usize> {
        self.check_run(x, i, len)?;
        self.check_run(y, j, len)?;

        for k in 0..len {
            if !self.try_add(x, i + k, y, j + k)? {
                return Ok(k);
            }
        }

        Ok(len)
    }

    /// Ensures that `sequence` exists, returning its length.
    pub(crate) fn check_sequence(&self, sequence: usize) -> Result<usize> {
        self.length(sequence).ok_or(Error::InvalidSequence {
            sequence,
            count: self.sequence_count(),
        })
    }

    /// Ensures that `position` of `sequence` exists.
    pub(crate) fn check(&self, sequence: usize, position: usize) -> Result<()> {
        let length = self.check_sequence(sequence)?;

        if position >= length {
            return Err(Error::InvalidPosition {
                sequence,
                position,
                length,
            });
        }

        Ok(())
    }

    /// Ensures that the `len` positions of `sequence` starting at `position`
    /// exist. An empty run may start one past the end.
    pub(crate) fn check_run(&self, sequence: usize, position: usize, len: usize) -> Result<()> {
        let length = self.check_sequence(sequence)?;

        match position.checked_add(len) {
            Some(end) if end <= length => Ok(()),
            _ => Err(Error::InvalidPosition {
                sequence,
                position: position.max(length),
                length,
            }),
        }
    }

    /// Gets the lower bound within sequence `z` implied by a resolved position.
    ///
    /// For a member, this is its set's frontier. For a position in a gap, it is
    /// the frontier of the preceding anchor, which the position must follow.
    fn floor(&self, resolution: Resolution, z: usize) -> Lower {
        match resolution {
            Resolution::Member(set)
            | Resolution::Gap {
                preceding: Some(set),
                ..
            } => self.store.frontiers(set)[z].pred(),
            Resolution::Gap {
                preceding: None, ..
            } => Lower::Unbounded,
        }
    }

    /// Gets the upper bound within sequence `z` implied by a resolved position.
    fn ceiling(&self, resolution: Resolution, z: usize) -> Upper {
        match resolution {
            Resolution::Member(set)
            | Resolution::Gap {
                following: Some(set),
                ..
            } => self.store.frontiers(set)[z].succ(),
            Resolution::Gap {
                following: None, ..
            } => Upper::Unbounded,
        }
    }

    /// The immediate successors of a set: the next anchor after each of its
    /// members.
    fn successors(&self, id: SetId) -> impl Iterator<Item = SetId> + '_ {
        self.store
            .set(id)
            .members()
            .filter_map(|(sequence, position)| self.index.following_set(sequence, position))
    }

    /// The immediate predecessors of a set.
    fn predecessors(&self, id: SetId) -> impl Iterator<Item = SetId> + '_ {
        self.store
            .set(id)
            .members()
            .filter_map(|(sequence, position)| self.index.preceding_set(sequence, position))
    }

    /// Pushes the bounds of a freshly merged set to every set whose bounds it
    /// tightens, returning the number of sets visited.
    ///
    /// Lower bounds flow to descendants and upper bounds to ancestors. A walk
    /// stops at any set whose bound is already at least as tight: everything
    /// beyond it is then at least as tight too.
    fn propagate(&mut self, id: SetId) -> usize {
        let mut stack = Vec::new();
        let mut visited = 0;

        for z in 0..self.sequence_count() {
            let frontier = self.store.frontiers(id)[z];

            if let pred @ Lower::At(_) = frontier.pred() {
                stack.extend(self.successors(id));

                while let Some(set) = stack.pop() {
                    visited += 1;

                    if self.store.frontiers_mut(set)[z].raise_pred(pred) {
                        stack.extend(self.successors(set));
                    }
                }
            }

            if let succ @ Upper::At(_) = frontier.succ() {
                stack.extend(self.predecessors(id));

                while let Some(set) = stack.pop() {
                    visited += 1;

                    if self.store.frontiers_mut(set)[z].lower_succ(succ) {
                        stack.extend(self.predecessors(set));
                    }
                }
            }
        }

        visited
    }
}
