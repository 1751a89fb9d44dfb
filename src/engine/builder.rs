//! A builder for an [`Engine`].

use nonempty::NonEmpty;
use tracing::debug;

use crate::anchor::Anchor;
use crate::engine::Engine;
use crate::set;
use crate::set::Set;
use crate::set::store::Record;
use crate::topology;
use crate::topology::Topology;

/// An error that occurs when a required field was never provided to the
/// [`Builder`].
#[derive(Debug)]
pub enum MissingError {
    /// No sequence lengths were provided to the [`Builder`].
    Lengths,
}

impl std::fmt::Display for MissingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingError::Lengths => write!(f, "lengths"),
        }
    }
}

impl std::error::Error for MissingError {}

/// An error that occurs when a singular field was provided multiple times to
/// the [`Builder`].
#[derive(Debug)]
pub enum MultipleError {
    /// The sequence lengths were provided multiple times to the [`Builder`].
    Lengths,
}

impl std::fmt::Display for MultipleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MultipleError::Lengths => write!(f, "lengths"),
        }
    }
}

impl std::error::Error for MultipleError {}

/// An error that occurs when a value provided to the [`Builder`] does not fit
/// with the rest.
#[derive(Debug, Eq, PartialEq)]
pub enum InvalidError {
    /// The list of sequence lengths was empty.
    NoSequences,

    /// A seed anchor does not have one entry per sequence.
    AnchorWidth {
        /// The number of sequences.
        expected: usize,

        /// The number of entries in the anchor.
        found: usize,
    },

    /// A seed anchor names a position beyond the end of its sequence.
    AnchorPosition {
        /// The sequence.
        sequence: usize,

        /// The offending position.
        position: usize,

        /// The length of the sequence.
        length: usize,
    },

    /// Two seed anchors claim the same position.
    AnchorConflict {
        /// The sequence.
        sequence: usize,

        /// The position claimed twice.
        position: usize,
    },
}

impl std::fmt::Display for InvalidError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidError::NoSequences => write!(f, "at least one sequence is required"),
            InvalidError::AnchorWidth { expected, found } => write!(
                f,
                "anchor width: expected {expected} entries (one per sequence), found {found} \
                 entries"
            ),
            InvalidError::AnchorPosition {
                sequence,
                position,
                length,
            } => write!(
                f,
                "anchor position: {position} in sequence {sequence} (length {length})"
            ),
            InvalidError::AnchorConflict { sequence, position } => write!(
                f,
                "anchor conflict: position {position} of sequence {sequence} is claimed by more \
                 than one anchor"
            ),
        }
    }
}

impl std::error::Error for InvalidError {}

/// An error related to a [`Builder`].
#[derive(Debug)]
pub enum Error {
    /// An error where a required field was never provided to the [`Builder`].
    Missing(MissingError),

    /// An error where a singular field was provided to the [`Builder`] more
    /// than once.
    Multiple(MultipleError),

    /// An error where a provided value is invalid.
    Invalid(InvalidError),

    /// The alignment set store failed.
    Store(set::store::Error),

    /// The seed anchors contradict each other.
    Topology(topology::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Missing(err) => write!(f, "missing required field: {err}"),
            Error::Multiple(err) => write!(f, "singular field set multiple times: {err}"),
            Error::Invalid(err) => write!(f, "invalid value: {err}"),
            Error::Store(err) => write!(f, "store error: {err}"),
            Error::Topology(err) => write!(f, "topology error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A builder for an [`Engine`].
#[derive(Debug, Default)]
pub struct Builder {
    /// The length of each sequence.
    lengths: Option<NonEmpty<usize>>,

    /// The seed anchors.
    anchors: Vec<Anchor>,
}

impl Builder {
    /// Sets the sequence lengths for the [`Builder`].
    ///
    /// The number of lengths fixes the number of sequences.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqclosure::engine::Builder;
    ///
    /// let builder = Builder::default().lengths([10, 12, 8])?;
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn lengths(mut self, lengths: impl IntoIterator<Item = usize>) -> Result<Self> {
        if self.lengths.is_some() {
            return Err(Error::Multiple(MultipleError::Lengths));
        }

        let lengths = NonEmpty::from_vec(lengths.into_iter().collect())
            .ok_or(Error::Invalid(InvalidError::NoSequences))?;

        self.lengths = Some(lengths);
        Ok(self)
    }

    /// Pushes a seed [`Anchor`] into the [`Builder`].
    ///
    /// # Examples
    ///
    /// ```
    /// use seqclosure::anchor::Anchor;
    /// use seqclosure::engine::Builder;
    ///
    /// let anchor = Anchor::new(vec![Some(2), None, Some(4)]);
    /// let builder = Builder::default().lengths([10, 12, 8])?.push_anchor(anchor);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn push_anchor(mut self, anchor: Anchor) -> Self {
        self.anchors.push(anchor);
        self
    }

    /// Pushes a seed anchor given as 1-based positions, where `0` marks a
    /// sequence with no member.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqclosure::engine::Builder;
    ///
    /// let engine = Builder::default()
    ///     .lengths([10, 12, 8])?
    ///     .push_one_based_anchor(&[3, 0, 5])
    ///     .try_build()?;
    ///
    /// assert!(engine.already_aligned(0, 2, 2, 4)?);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn push_one_based_anchor(self, positions: &[usize]) -> Self {
        self.push_anchor(Anchor::from_one_based(positions))
    }

    /// Consumes `self` and attempts to build an [`Engine`].
    ///
    /// Every seed anchor becomes an alignment set, after which the sets are
    /// ordered and the frontier table is computed from scratch. Anchors with
    /// no members are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqclosure::bound::Bounds;
    /// use seqclosure::engine::Builder;
    ///
    /// let engine = Builder::default()
    ///     .lengths([10, 10])?
    ///     .push_one_based_anchor(&[3, 5])
    ///     .try_build()?;
    ///
    /// assert_eq!(engine.set_count(), 1);
    /// assert_eq!(engine.bounds(0, 2, 1)?, Bounds::Exact(4));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_build(self) -> Result<Engine> {
        let lengths = self.lengths.ok_or(Error::Missing(MissingError::Lengths))?;
        let mut engine = Engine::empty(lengths.into_iter().collect());

        for anchor in self.anchors {
            if anchor.width() != engine.sequence_count() {
                return Err(Error::Invalid(InvalidError::AnchorWidth {
                    expected: engine.sequence_count(),
                    found: anchor.width(),
                }));
            }

            for (sequence, position) in anchor.members() {
                let length = engine.lengths[sequence];

                if position >= length {
                    return Err(Error::Invalid(InvalidError::AnchorPosition {
                        sequence,
                        position,
                        length,
                    }));
                }

                if engine.index.resolve(sequence, position).member().is_some() {
                    return Err(Error::Invalid(InvalidError::AnchorConflict {
                        sequence,
                        position,
                    }));
                }
            }

            if anchor.is_empty() {
                continue;
            }

            let record = Record::seeded(Set::from_members(anchor.into_positions()));
            engine
                .store
                .append(record, &mut engine.index)
                .map_err(Error::Store)?;
        }

        let topology =
            Topology::try_build(&mut engine.index, &engine.store).map_err(Error::Topology)?;
        topology.sweep(&mut engine.store);

        debug!(
            sequences = engine.sequence_count(),
            sets = engine.set_count(),
            "built closure engine"
        );

        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bound::Lower;
    use crate::bound::Upper;
    use crate::frontier::Frontier;

    #[test]
    fn a_seeded_row_is_pinned_everywhere() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let engine = Builder::default()
            .lengths([10, 10, 10])?
            .push_anchor(Anchor::new(vec![Some(3), Some(5), Some(7)]))
            .try_build()?;

        assert_eq!(
            engine.frontiers(0).unwrap(),
            &[
                Frontier::pinned(3),
                Frontier::pinned(5),
                Frontier::pinned(7)
            ]
        );

        Ok(())
    }

    #[test]
    fn seeds_bound_each_other() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let engine = Builder::default()
            .lengths([10, 10, 10])?
            .push_anchor(Anchor::new(vec![Some(2), Some(3), None]))
            .push_anchor(Anchor::new(vec![None, Some(6), Some(4)]))
            .push_anchor(Anchor::new(vec![None, None, None]))
            .try_build()?;

        assert_eq!(engine.set_count(), 2);
        assert_eq!(
            engine.frontiers(0).unwrap()[2],
            Frontier::new(Lower::Unbounded, Upper::At(4))
        );
        assert_eq!(
            engine.frontiers(1).unwrap()[0],
            Frontier::new(Lower::At(2), Upper::Unbounded)
        );

        Ok(())
    }

    #[test]
    fn missing_lengths() {
        let err = Builder::default().try_build().unwrap_err();
        assert!(matches!(err, Error::Missing(MissingError::Lengths)));
        assert_eq!(err.to_string(), "missing required field: lengths");
    }

    #[test]
    fn multiple_lengths() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = Builder::default().lengths([1])?.lengths([2]).unwrap_err();
        assert!(matches!(err, Error::Multiple(MultipleError::Lengths)));
        assert_eq!(err.to_string(), "singular field set multiple times: lengths");
        Ok(())
    }

    #[test]
    fn no_sequences() {
        let err = Builder::default().lengths(Vec::new()).unwrap_err();
        assert!(matches!(err, Error::Invalid(InvalidError::NoSequences)));
    }

    #[test]
    fn invalid_anchors() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = Builder::default()
            .lengths([5, 5])?
            .push_one_based_anchor(&[1, 2, 3])
            .try_build()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Invalid(InvalidError::AnchorWidth {
                expected: 2,
                found: 3
            })
        ));
        assert_eq!(
            err.to_string(),
            "invalid value: anchor width: expected 2 entries (one per sequence), found 3 entries"
        );

        let err = Builder::default()
            .lengths([5, 5])?
            .push_one_based_anchor(&[1, 6])
            .try_build()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Invalid(InvalidError::AnchorPosition {
                sequence: 1,
                position: 5,
                length: 5
            })
        ));

        let err = Builder::default()
            .lengths([5, 5])?
            .push_one_based_anchor(&[1, 0])
            .push_one_based_anchor(&[1, 2])
            .try_build()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Invalid(InvalidError::AnchorConflict {
                sequence: 0,
                position: 0
            })
        ));

        Ok(())
    }

    #[test]
    fn crossing_seeds_are_rejected() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = Builder::default()
            .lengths([10, 10])?
            .push_anchor(Anchor::new(vec![Some(1), Some(5)]))
            .push_anchor(Anchor::new(vec![Some(2), Some(3)]))
            .try_build()
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Topology(topology::Error::Cycle { unordered: 2 })
        ));

        Ok(())
    }
}
