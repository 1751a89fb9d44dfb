//! Queries against the closure.
//!
//! Every query is answered in constant time from the frontier table: a
//! position is resolved either to its own set or, when it sits in a gap, to the
//! nearest anchors on either side, and the frontier of that set bounds where
//! the position may map in the other sequence.

use crate::bound::Bounds;
use crate::bound::Lower;
use crate::bound::Upper;
use crate::engine::Engine;
use crate::engine::Result;
use crate::sequence::Resolution;

impl Engine {
    /// Gets the raw lower and upper bounds of position `i` of sequence `x`
    /// within sequence `y`.
    ///
    /// Both bounds are exclusive unless they are equal, in which case the
    /// position is pinned there. Within its own sequence, a position is pinned
    /// to itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqclosure::bound::Lower;
    /// use seqclosure::bound::Upper;
    /// use seqclosure::engine::Builder;
    ///
    /// let mut engine = Builder::default().lengths([5, 5])?.try_build()?;
    /// engine.add(0, 2, 1, 2)?;
    ///
    /// assert_eq!(engine.frontier(0, 1, 1)?, (Lower::Unbounded, Upper::At(2)));
    /// assert_eq!(engine.frontier(0, 2, 1)?, (Lower::At(2), Upper::At(2)));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn frontier(&self, x: usize, i: usize, y: usize) -> Result<(Lower, Upper)> {
        self.check(x, i)?;
        self.check_sequence(y)?;

        if x == y {
            return Ok((Lower::At(i), Upper::At(i)));
        }

        let resolution = self.index.resolve(x, i);
        Ok((self.floor(resolution, y), self.ceiling(resolution, y)))
    }

    /// Gets where position `i` of sequence `x` may map within sequence `y`.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqclosure::bound::Bounds;
    /// use seqclosure::engine::Builder;
    ///
    /// let mut engine = Builder::default().lengths([10, 10])?.try_build()?;
    /// engine.add(0, 2, 1, 3)?;
    /// engine.add(0, 6, 1, 8)?;
    ///
    /// assert_eq!(engine.bounds(0, 6, 1)?, Bounds::Exact(8));
    /// assert_eq!(engine.bounds(0, 4, 1)?, Bounds::Within(4..8));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn bounds(&self, x: usize, i: usize, y: usize) -> Result<Bounds> {
        let (lower, upper) = self.frontier(x, i, y)?;

        // SAFETY: `frontier()` checked that `y` exists.
        let length = self.lengths[y];

        Ok(Bounds::from_frontier(lower, upper, length))
    }

    /// Returns whether position `i` of sequence `x` is forced at or before
    /// position `j` of sequence `y` by the facts added so far.
    pub fn is_reachable(&self, x: usize, i: usize, y: usize, j: usize) -> Result<bool> {
        self.check(x, i)?;
        self.check(y, j)?;

        if x == y {
            return Ok(i <= j);
        }

        // The greatest position of `x` forced at or before (y, j).
        let floor = self.floor(self.index.resolve(y, j), x);

        Ok(match floor {
            Lower::At(position) => position >= i,
            Lower::Unbounded => false,
        })
    }

    /// Returns whether aligning position `i` of sequence `x` with position `j`
    /// of sequence `y` is consistent with the facts added so far.
    ///
    /// Exactly one of the two positions being forced before the other means
    /// they cannot be aligned. Neither being forced means they are
    /// independent, and both being forced means they are already aligned.
    ///
    /// This check must pass before calling [`Engine::add()`].
    pub fn alignable(&self, x: usize, i: usize, y: usize, j: usize) -> Result<bool> {
        let forward = self.is_reachable(x, i, y, j)?;
        let backward = self.is_reachable(y, j, x, i)?;
        Ok(forward == backward)
    }

    /// Returns whether every pair of the ungapped run `(x, i + k) ~ (y, j + k)`
    /// for `k` in `0..len` is alignable, stopping at the first pair that is
    /// not.
    ///
    /// Runs that extend past the end of either sequence are an error.
    pub fn alignable_run(
        &self,
        x: usize,
        i: usize,
        y: usize,
        j: usize,
        len: usize,
    ) -> Result<bool> {
        self.check_run(x, i, len)?;
        self.check_run(y, j, len)?;

        for k in 0..len {
            if !self.alignable(x, i + k, y, j + k)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Returns whether position `i` of sequence `x` and position `j` of
    /// sequence `y` belong to the same alignment set.
    pub fn already_aligned(&self, x: usize, i: usize, y: usize, j: usize) -> Result<bool> {
        self.check(x, i)?;
        self.check(y, j)?;

        if x == y && i == j {
            return Ok(true);
        }

        Ok(match (self.index.resolve(x, i), self.index.resolve(y, j)) {
            (Resolution::Member(a), Resolution::Member(b)) => a == b,
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::bound::Bounds;
    use crate::engine::Builder;

    #[test]
    fn positions_in_one_sequence_are_ordered() -> Result<(), Box<dyn std::error::Error>> {
        let engine = Builder::default().lengths([6, 6])?.try_build()?;

        assert!(engine.is_reachable(0, 1, 0, 4)?);
        assert!(engine.is_reachable(0, 4, 0, 4)?);
        assert!(!engine.is_reachable(0, 4, 0, 1)?);

        assert!(!engine.alignable(0, 1, 0, 4)?);
        assert!(engine.alignable(0, 4, 0, 4)?);
        assert_eq!(engine.bounds(1, 3, 1)?, Bounds::Exact(3));

        Ok(())
    }

    #[test]
    fn an_empty_engine_constrains_nothing() -> Result<(), Box<dyn std::error::Error>> {
        let engine = Builder::default().lengths([6, 9])?.try_build()?;

        assert!(!engine.is_reachable(0, 0, 1, 8)?);
        assert!(engine.alignable(0, 5, 1, 0)?);
        assert!(!engine.already_aligned(0, 5, 1, 0)?);
        assert_eq!(engine.bounds(0, 3, 1)?, Bounds::Within(0..9));

        Ok(())
    }

    #[test]
    fn queries_check_coordinates() -> Result<(), Box<dyn std::error::Error>> {
        let engine = Builder::default().lengths([6, 9])?.try_build()?;

        assert!(engine.bounds(0, 6, 1).is_err());
        assert!(engine.bounds(0, 0, 2).is_err());
        assert!(engine.alignable(1, 9, 0, 0).is_err());
        assert!(engine.already_aligned(3, 0, 0, 0).is_err());

        Ok(())
    }

    #[test]
    fn points_between_two_pinned_neighbors() -> Result<(), Box<dyn std::error::Error>> {
        let mut engine = Builder::default().lengths([10, 10])?.try_build()?;
        engine.add(0, 3, 1, 3)?;
        engine.add(0, 5, 1, 4)?;

        // Nothing in the second sequence is left for the first's position 4.
        assert_eq!(engine.bounds(0, 4, 1)?, Bounds::Within(4..4));
        assert_eq!(engine.bounds(0, 4, 1)?.inclusive(), None);

        Ok(())
    }
}
