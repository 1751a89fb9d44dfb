//! A seed anchor record.

use std::num::ParseIntError;
use std::str::FromStr;

use crate::bound::from_one_based;

/// The prefix for an anchor record.
pub const ANCHOR_PREFIX: &str = "anchor";

/// The delimiter for an anchor record.
pub const DELIMITER: char = '\t';

/// The placeholder for a sequence with no member.
pub const ABSENT: &str = ".";

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error associated with parsing an anchor record.
#[derive(Debug)]
pub enum ParseError {
    /// An invalid prefix.
    InvalidPrefix(String),

    /// A record with no positions.
    Empty,

    /// An invalid position.
    InvalidPosition(usize, ParseIntError),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidPrefix(prefix) => write!(
                f,
                "invalid prefix: expected \"{ANCHOR_PREFIX}\", found \"{prefix}\""
            ),
            ParseError::Empty => write!(f, "expected at least one position, found none"),
            ParseError::InvalidPosition(sequence, err) => {
                write!(f, "invalid position for sequence {sequence}: {err}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

////////////////////////////////////////////////////////////////////////////////////////
// Anchor
////////////////////////////////////////////////////////////////////////////////////////

/// A seed anchor: at most one 0-based position per sequence, all asserted to
/// be mutually aligned.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Anchor(Vec<Option<usize>>);

impl Anchor {
    /// Creates a new [`Anchor`] from one optional position per sequence.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqclosure::anchor::Anchor;
    ///
    /// let anchor = Anchor::new(vec![Some(2), None, Some(4)]);
    /// assert_eq!(anchor.width(), 3);
    /// assert_eq!(anchor.members().collect::<Vec<_>>(), vec![(0, 2), (2, 4)]);
    /// ```
    pub fn new(positions: Vec<Option<usize>>) -> Self {
        Self(positions)
    }

    /// Creates a new [`Anchor`] from 1-based positions, where `0` marks a
    /// sequence with no member.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqclosure::anchor::Anchor;
    ///
    /// let anchor = Anchor::from_one_based(&[3, 0, 1]);
    /// assert_eq!(anchor.positions(), &[Some(2), None, Some(0)]);
    /// ```
    pub fn from_one_based(positions: &[usize]) -> Self {
        Self(positions.iter().copied().map(from_one_based).collect())
    }

    /// Gets the optional position within each sequence.
    pub fn positions(&self) -> &[Option<usize>] {
        &self.0
    }

    /// Gets the number of sequences the anchor spans.
    pub fn width(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the anchor has no members at all.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    /// Iterates over the `(sequence, position)` members of the anchor.
    pub fn members(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(sequence, position)| position.map(|p| (sequence, p)))
    }

    /// Consumes self and returns the positions.
    pub fn into_positions(self) -> Vec<Option<usize>> {
        self.0
    }
}

impl FromStr for Anchor {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(DELIMITER);

        let prefix = parts.next().unwrap_or_default();
        if prefix != ANCHOR_PREFIX {
            return Err(ParseError::InvalidPrefix(prefix.into()));
        }

        let positions = parts
            .enumerate()
            .map(|(sequence, part)| match part {
                ABSENT => Ok(None),
                _ => part
                    .parse()
                    .map(Some)
                    .map_err(|err| ParseError::InvalidPosition(sequence, err)),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if positions.is_empty() {
            return Err(ParseError::Empty);
        }

        Ok(Self(positions))
    }
}

impl std::fmt::Display for Anchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{ANCHOR_PREFIX}")?;

        for position in &self.0 {
            match position {
                Some(position) => write!(f, "{DELIMITER}{position}")?,
                None => write!(f, "{DELIMITER}{ABSENT}")?,
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_anchor() -> Result<(), Box<dyn std::error::Error>> {
        let anchor = "anchor\t2\t.\t4".parse::<Anchor>()?;

        assert_eq!(anchor.positions(), &[Some(2), None, Some(4)]);
        assert!(!anchor.is_empty());
        assert_eq!(anchor.to_string(), "anchor\t2\t.\t4");

        Ok(())
    }

    #[test]
    fn an_anchor_of_placeholders_is_empty() -> Result<(), Box<dyn std::error::Error>> {
        let anchor = "anchor\t.\t.".parse::<Anchor>()?;
        assert!(anchor.is_empty());
        assert_eq!(anchor.width(), 2);
        Ok(())
    }

    #[test]
    fn invalid_prefix() {
        let err = "anchors\t2".parse::<Anchor>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid prefix: expected \"anchor\", found \"anchors\""
        );
    }

    #[test]
    fn invalid_position() {
        let err = "anchor\t2\t-1".parse::<Anchor>().unwrap_err();
        assert!(matches!(err, ParseError::InvalidPosition(1, _)));
        assert_eq!(
            err.to_string(),
            "invalid position for sequence 1: invalid digit found in string"
        );

        let err = "anchor".parse::<Anchor>().unwrap_err();
        assert!(matches!(err, ParseError::Empty));
    }
}
