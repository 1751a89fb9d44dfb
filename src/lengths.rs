//! A sequence lengths record.

use std::num::ParseIntError;
use std::str::FromStr;

use nonempty::NonEmpty;

/// The prefix for a lengths record.
pub const LENGTHS_PREFIX: &str = "lengths";

/// The delimiter for a lengths record.
pub const DELIMITER: char = '\t';

/// An error associated with parsing a lengths record.
#[derive(Debug)]
pub enum ParseError {
    /// An invalid prefix.
    InvalidPrefix(String),

    /// A record with no lengths.
    Empty,

    /// An invalid length.
    InvalidLength(usize, ParseIntError),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidPrefix(prefix) => write!(
                f,
                "invalid prefix: expected \"{LENGTHS_PREFIX}\", found \"{prefix}\""
            ),
            ParseError::Empty => write!(f, "expected at least one length, found none"),
            ParseError::InvalidLength(sequence, err) => {
                write!(f, "invalid length for sequence {sequence}: {err}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// The lengths of the sequences in a problem, which also fixes their number.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Lengths(NonEmpty<usize>);

impl Lengths {
    /// Creates a new [`Lengths`].
    ///
    /// # Examples
    ///
    /// ```
    /// use nonempty::NonEmpty;
    /// use seqclosure::lengths::Lengths;
    ///
    /// let mut lengths = NonEmpty::new(5);
    /// lengths.push(8);
    ///
    /// let lengths = Lengths::new(lengths);
    /// assert_eq!(lengths.to_string(), "lengths\t5\t8");
    /// ```
    pub fn new(lengths: NonEmpty<usize>) -> Self {
        Self(lengths)
    }

    /// Gets the number of sequences.
    pub fn count(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the lengths.
    pub fn iter(&self) -> impl Iterator<Item = &usize> {
        self.0.iter()
    }

    /// Consumes self and returns the inner lengths.
    pub fn into_inner(self) -> NonEmpty<usize> {
        self.0
    }
}

impl FromStr for Lengths {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(DELIMITER);

        let prefix = parts.next().unwrap_or_default();
        if prefix != LENGTHS_PREFIX {
            return Err(ParseError::InvalidPrefix(prefix.into()));
        }

        let lengths = parts
            .enumerate()
            .map(|(sequence, part)| {
                part.parse()
                    .map_err(|err| ParseError::InvalidLength(sequence, err))
            })
            .collect::<Result<Vec<_>, _>>()?;

        NonEmpty::from_vec(lengths)
            .map(Self)
            .ok_or(ParseError::Empty)
    }
}

impl std::fmt::Display for Lengths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{LENGTHS_PREFIX}")?;

        for length in self.0.iter() {
            write!(f, "{DELIMITER}{length}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_lengths() -> Result<(), Box<dyn std::error::Error>> {
        let lengths = "lengths\t5\t12\t0".parse::<Lengths>()?;

        assert_eq!(lengths.count(), 3);
        assert_eq!(lengths.iter().copied().collect::<Vec<_>>(), vec![5, 12, 0]);
        assert_eq!(lengths.to_string(), "lengths\t5\t12\t0");

        Ok(())
    }

    #[test]
    fn invalid_lengths() {
        let err = "lengths".parse::<Lengths>().unwrap_err();
        assert!(matches!(err, ParseError::Empty));

        let err = "lengths\t5\tx".parse::<Lengths>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid length for sequence 1: invalid digit found in string"
        );

        let err = "length\t5".parse::<Lengths>().unwrap_err();
        assert!(matches!(err, ParseError::InvalidPrefix(_)));
    }
}
