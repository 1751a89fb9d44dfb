//! Positional bounds and the coordinate conventions at the crate boundary.
//!
//! Everything inside this crate is 0-based. A bound that does not exist is
//! represented explicitly ([`Lower::Unbounded`] and [`Upper::Unbounded`])
//! rather than with sentinel positions. The derived orderings are chosen so
//! that tightening a lower bound is [`Ord::max`] and tightening an upper bound
//! is [`Ord::min`].
//!
//! Some upstream tools still speak the legacy convention of 1-based positions
//! where `0` means "before the first position" and `length + 1` means "after
//! the last position". The conversions in this module are the only place that
//! convention exists.

use std::ops::Range;

/// A lower bound on where a position may map within a sequence.
///
/// [`Lower::Unbounded`] orders before every [`Lower::At`].
///
/// # Examples
///
/// ```
/// use seqclosure::bound::Lower;
///
/// assert!(Lower::Unbounded < Lower::At(0));
/// assert_eq!(Lower::At(3).max(Lower::At(5)), Lower::At(5));
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Lower {
    /// Nothing constrains the position from below.
    Unbounded,

    /// The greatest 0-based position known to come at or before.
    At(usize),
}

/// An upper bound on where a position may map within a sequence.
///
/// [`Upper::Unbounded`] orders after every [`Upper::At`].
///
/// # Examples
///
/// ```
/// use seqclosure::bound::Upper;
///
/// assert!(Upper::At(usize::MAX) < Upper::Unbounded);
/// assert_eq!(Upper::At(3).min(Upper::Unbounded), Upper::At(3));
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Upper {
    /// The least 0-based position known to come at or after.
    At(usize),

    /// Nothing constrains the position from above.
    Unbounded,
}

impl Lower {
    /// Gets the bounding position, if there is one.
    pub fn get(&self) -> Option<usize> {
        match self {
            Lower::Unbounded => None,
            Lower::At(position) => Some(*position),
        }
    }

    /// Converts the bound to the legacy 1-based form, where `0` stands for
    /// "unbounded".
    ///
    /// # Examples
    ///
    /// ```
    /// use seqclosure::bound::Lower;
    ///
    /// assert_eq!(Lower::Unbounded.to_one_based(), 0);
    /// assert_eq!(Lower::At(0).to_one_based(), 1);
    /// ```
    pub fn to_one_based(&self) -> usize {
        match self {
            Lower::Unbounded => 0,
            Lower::At(position) => to_one_based(*position),
        }
    }
}

impl Upper {
    /// Gets the bounding position, if there is one.
    pub fn get(&self) -> Option<usize> {
        match self {
            Upper::At(position) => Some(*position),
            Upper::Unbounded => None,
        }
    }

    /// Converts the bound to the legacy 1-based form, where `length + 1`
    /// stands for "unbounded".
    ///
    /// # Examples
    ///
    /// ```
    /// use seqclosure::bound::Upper;
    ///
    /// assert_eq!(Upper::Unbounded.to_one_based(10), 11);
    /// assert_eq!(Upper::At(9).to_one_based(10), 10);
    /// ```
    pub fn to_one_based(&self, length: usize) -> usize {
        match self {
            Upper::At(position) => to_one_based(*position),
            Upper::Unbounded => length + 1,
        }
    }
}

impl std::fmt::Display for Lower {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lower::Unbounded => write!(f, "-"),
            Lower::At(position) => write!(f, "{position}"),
        }
    }
}

impl std::fmt::Display for Upper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Upper::At(position) => write!(f, "{position}"),
            Upper::Unbounded => write!(f, "-"),
        }
    }
}

/// Where a position may map within another sequence.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Bounds {
    /// The position is pinned to exactly this 0-based position.
    Exact(usize),

    /// The position may map to any position within this half-open range. The
    /// range may be empty, in which case the position can only fall into a gap
    /// of the other sequence.
    Within(Range<usize>),
}

impl Bounds {
    /// Creates [`Bounds`] from a raw lower and upper bound within a sequence
    /// of the given `length`.
    ///
    /// Equal bounds pin the position. Otherwise, both bounds are exclusive: a
    /// position strictly after the lower bound and strictly before the upper
    /// bound is admissible.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqclosure::bound::Bounds;
    /// use seqclosure::bound::Lower;
    /// use seqclosure::bound::Upper;
    ///
    /// let bounds = Bounds::from_frontier(Lower::At(2), Upper::At(2), 10);
    /// assert_eq!(bounds, Bounds::Exact(2));
    ///
    /// let bounds = Bounds::from_frontier(Lower::At(2), Upper::At(6), 10);
    /// assert_eq!(bounds, Bounds::Within(3..6));
    ///
    /// let bounds = Bounds::from_frontier(Lower::Unbounded, Upper::Unbounded, 10);
    /// assert_eq!(bounds, Bounds::Within(0..10));
    /// ```
    pub fn from_frontier(lower: Lower, upper: Upper, length: usize) -> Self {
        if let (Lower::At(a), Upper::At(b)) = (lower, upper) {
            if a == b {
                return Bounds::Exact(a);
            }
        }

        let start = match lower {
            Lower::Unbounded => 0,
            Lower::At(position) => position + 1,
        };

        let end = match upper {
            Upper::At(position) => position,
            Upper::Unbounded => length,
        };

        Bounds::Within(start..end.max(start))
    }

    /// Returns whether the bounds pin the position to a single place.
    pub fn is_exact(&self) -> bool {
        matches!(self, Bounds::Exact(_))
    }

    /// Returns whether `position` is admissible under these bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqclosure::bound::Bounds;
    ///
    /// assert!(Bounds::Exact(4).contains(4));
    /// assert!(!Bounds::Exact(4).contains(5));
    /// assert!(Bounds::Within(3..6).contains(5));
    /// assert!(!Bounds::Within(3..6).contains(6));
    /// ```
    pub fn contains(&self, position: usize) -> bool {
        match self {
            Bounds::Exact(p) => *p == position,
            Bounds::Within(range) => range.contains(&position),
        }
    }

    /// Gets the bounds as an inclusive pair of 0-based positions.
    ///
    /// [`None`] is returned when no position is admissible.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqclosure::bound::Bounds;
    ///
    /// assert_eq!(Bounds::Exact(4).inclusive(), Some((4, 4)));
    /// assert_eq!(Bounds::Within(3..6).inclusive(), Some((3, 5)));
    /// assert_eq!(Bounds::Within(3..3).inclusive(), None);
    /// ```
    pub fn inclusive(&self) -> Option<(usize, usize)> {
        match self {
            Bounds::Exact(p) => Some((*p, *p)),
            Bounds::Within(range) if range.is_empty() => None,
            Bounds::Within(range) => Some((range.start, range.end - 1)),
        }
    }
}

impl std::fmt::Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bounds::Exact(position) => write!(f, "={position}"),
            Bounds::Within(range) => write!(f, "[{}, {})", range.start, range.end),
        }
    }
}

/// Converts a legacy 1-based position (where `0` means absent) to a 0-based
/// position.
///
/// # Examples
///
/// ```
/// use seqclosure::bound::from_one_based;
///
/// assert_eq!(from_one_based(0), None);
/// assert_eq!(from_one_based(1), Some(0));
/// ```
pub fn from_one_based(position: usize) -> Option<usize> {
    position.checked_sub(1)
}

/// Converts a 0-based position to the legacy 1-based form.
pub fn to_one_based(position: usize) -> usize {
    position + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_bounds_tighten_with_max() {
        assert_eq!(Lower::Unbounded.max(Lower::At(0)), Lower::At(0));
        assert_eq!(Lower::At(7).max(Lower::Unbounded), Lower::At(7));
        assert_eq!(
            [Lower::At(1), Lower::Unbounded, Lower::At(4)]
                .into_iter()
                .max(),
            Some(Lower::At(4))
        );
    }

    #[test]
    fn upper_bounds_tighten_with_min() {
        assert_eq!(Upper::Unbounded.min(Upper::At(9)), Upper::At(9));
        assert_eq!(
            [Upper::Unbounded, Upper::At(8), Upper::At(3)]
                .into_iter()
                .min(),
            Some(Upper::At(3))
        );
    }

    #[test]
    fn adjacent_bounds_leave_no_room() {
        let bounds = Bounds::from_frontier(Lower::At(2), Upper::At(3), 10);
        assert_eq!(bounds, Bounds::Within(3..3));
        assert_eq!(bounds.inclusive(), None);
        assert!(!bounds.is_exact());
    }

    #[test]
    fn legacy_conversion_matches_sentinels() {
        let length = 5;

        assert_eq!(Lower::Unbounded.to_one_based(), 0);
        assert_eq!(Upper::Unbounded.to_one_based(length), 6);
        assert_eq!(Lower::At(2).to_one_based(), 3);
        assert_eq!(Upper::At(2).to_one_based(length), 3);

        for position in 0..length {
            assert_eq!(from_one_based(to_one_based(position)), Some(position));
        }
    }

    #[test]
    fn display() {
        assert_eq!(Lower::Unbounded.to_string(), "-");
        assert_eq!(Upper::At(3).to_string(), "3");
        assert_eq!(Bounds::Exact(3).to_string(), "=3");
        assert_eq!(Bounds::Within(0..2).to_string(), "[0, 2)");
    }
}
