//! Frontier entries: the tightest known bounds of a set within one sequence.

use crate::bound::Lower;
use crate::bound::Upper;

/// The bounds of an alignment set's occurrence within one sequence.
///
/// `pred` is the greatest position of that sequence forced at or before the
/// set, and `succ` is the least position forced at or after it. When the set
/// has a member in the sequence, both are that member's position.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Frontier {
    /// The lower bound.
    pred: Lower,

    /// The upper bound.
    succ: Upper,
}

impl Frontier {
    /// Creates a new [`Frontier`].
    pub fn new(pred: Lower, succ: Upper) -> Self {
        Self { pred, succ }
    }

    /// A frontier that constrains nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqclosure::bound::Lower;
    /// use seqclosure::bound::Upper;
    /// use seqclosure::frontier::Frontier;
    ///
    /// let frontier = Frontier::unbounded();
    /// assert_eq!(frontier.pred(), Lower::Unbounded);
    /// assert_eq!(frontier.succ(), Upper::Unbounded);
    /// ```
    pub fn unbounded() -> Self {
        Self::new(Lower::Unbounded, Upper::Unbounded)
    }

    /// A frontier pinned to a member position.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqclosure::frontier::Frontier;
    ///
    /// let frontier = Frontier::pinned(4);
    /// assert_eq!(frontier.pinned_position(), Some(4));
    /// ```
    pub fn pinned(position: usize) -> Self {
        Self::new(Lower::At(position), Upper::At(position))
    }

    /// Gets the lower bound.
    pub fn pred(&self) -> Lower {
        self.pred
    }

    /// Gets the upper bound.
    pub fn succ(&self) -> Upper {
        self.succ
    }

    /// Gets the position both bounds agree on, if they do.
    pub fn pinned_position(&self) -> Option<usize> {
        match (self.pred, self.succ) {
            (Lower::At(a), Upper::At(b)) if a == b => Some(a),
            _ => None,
        }
    }

    /// Overwrites the lower bound.
    pub(crate) fn set_pred(&mut self, pred: Lower) {
        self.pred = pred;
    }

    /// Overwrites the upper bound.
    pub(crate) fn set_succ(&mut self, succ: Upper) {
        self.succ = succ;
    }

    /// Raises the lower bound to `pred` if that tightens it, returning whether
    /// it did.
    pub(crate) fn raise_pred(&mut self, pred: Lower) -> bool {
        if pred > self.pred {
            self.pred = pred;
            return true;
        }

        false
    }

    /// Lowers the upper bound to `succ` if that tightens it, returning whether
    /// it did.
    pub(crate) fn lower_succ(&mut self, succ: Upper) -> bool {
        if succ < self.succ {
            self.succ = succ;
            return true;
        }

        false
    }
}

impl Default for Frontier {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tightening_only_moves_inward() {
        let mut frontier = Frontier::unbounded();

        assert!(frontier.raise_pred(Lower::At(3)));
        assert!(!frontier.raise_pred(Lower::At(2)));
        assert!(!frontier.raise_pred(Lower::At(3)));
        assert!(!frontier.raise_pred(Lower::Unbounded));
        assert_eq!(frontier.pred(), Lower::At(3));

        assert!(frontier.lower_succ(Upper::At(9)));
        assert!(!frontier.lower_succ(Upper::Unbounded));
        assert!(frontier.lower_succ(Upper::At(7)));
        assert_eq!(frontier.succ(), Upper::At(7));

        assert_eq!(frontier.pinned_position(), None);
    }
}
