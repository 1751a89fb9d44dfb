//! An alignment fact record.

use std::num::ParseIntError;
use std::str::FromStr;

/// The prefix for a fact record.
pub const FACT_PREFIX: &str = "align";

/// The delimiter for a fact record.
pub const DELIMITER: char = '\t';

/// The number of expected fields in a fact record, including the prefix.
pub const NUM_FACT_FIELDS: usize = 5;

/// An error associated with parsing a fact record.
#[derive(Debug)]
pub enum ParseError {
    /// An incorrect number of fields in the fact line.
    IncorrectNumberOfFields(usize),

    /// An invalid prefix.
    InvalidPrefix(String),

    /// An invalid sequence.
    InvalidSequence(ParseIntError),

    /// An invalid position.
    InvalidPosition(ParseIntError),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncorrectNumberOfFields(fields) => write!(
                f,
                "invalid number of fields in fact: expected {NUM_FACT_FIELDS} fields, found \
                 {fields} fields"
            ),
            ParseError::InvalidPrefix(prefix) => write!(
                f,
                "invalid prefix: expected \"{FACT_PREFIX}\", found \"{prefix}\""
            ),
            ParseError::InvalidSequence(err) => write!(f, "invalid sequence: {err}"),
            ParseError::InvalidPosition(err) => write!(f, "invalid position: {err}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// The fact that position `pos_a` of sequence `seq_a` is aligned with position
/// `pos_b` of sequence `seq_b` (all 0-based).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Fact {
    /// The first sequence.
    seq_a: usize,

    /// The position within the first sequence.
    pos_a: usize,

    /// The second sequence.
    seq_b: usize,

    /// The position within the second sequence.
    pos_b: usize,
}

impl Fact {
    /// Creates a new [`Fact`].
    ///
    /// # Examples
    ///
    /// ```
    /// use seqclosure::fact::Fact;
    ///
    /// let fact = Fact::new(0, 3, 1, 4);
    /// assert_eq!(fact.to_string(), "align\t0\t3\t1\t4");
    /// ```
    pub fn new(seq_a: usize, pos_a: usize, seq_b: usize, pos_b: usize) -> Self {
        Self {
            seq_a,
            pos_a,
            seq_b,
            pos_b,
        }
    }

    /// Gets the first sequence.
    pub fn seq_a(&self) -> usize {
        self.seq_a
    }

    /// Gets the position within the first sequence.
    pub fn pos_a(&self) -> usize {
        self.pos_a
    }

    /// Gets the second sequence.
    pub fn seq_b(&self) -> usize {
        self.seq_b
    }

    /// Gets the position within the second sequence.
    pub fn pos_b(&self) -> usize {
        self.pos_b
    }

    /// Gets both sides as `(sequence, position)` pairs.
    pub fn pair(&self) -> ((usize, usize), (usize, usize)) {
        ((self.seq_a, self.pos_a), (self.seq_b, self.pos_b))
    }
}

impl FromStr for Fact {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s.split(DELIMITER).collect::<Vec<_>>();

        if parts.len() != NUM_FACT_FIELDS {
            return Err(ParseError::IncorrectNumberOfFields(parts.len()));
        }

        if parts[0] != FACT_PREFIX {
            return Err(ParseError::InvalidPrefix(parts[0].into()));
        }

        let seq_a = parts[1].parse().map_err(ParseError::InvalidSequence)?;
        let pos_a = parts[2].parse().map_err(ParseError::InvalidPosition)?;
        let seq_b = parts[3].parse().map_err(ParseError::InvalidSequence)?;
        let pos_b = parts[4].parse().map_err(ParseError::InvalidPosition)?;

        Ok(Self::new(seq_a, pos_a, seq_b, pos_b))
    }
}

impl std::fmt::Display for Fact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{FACT_PREFIX}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}",
            self.seq_a, self.pos_a, self.seq_b, self.pos_b
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_fact() -> Result<(), Box<dyn std::error::Error>> {
        let fact = "align\t0\t3\t2\t7".parse::<Fact>()?;

        assert_eq!(fact.seq_a(), 0);
        assert_eq!(fact.pos_a(), 3);
        assert_eq!(fact.seq_b(), 2);
        assert_eq!(fact.pos_b(), 7);
        assert_eq!(fact.pair(), ((0, 3), (2, 7)));

        Ok(())
    }

    #[test]
    fn invalid_number_of_fields() {
        let err = "align\t0\t3\t2".parse::<Fact>().unwrap_err();
        assert!(matches!(err, ParseError::IncorrectNumberOfFields(4)));
        assert_eq!(
            err.to_string(),
            "invalid number of fields in fact: expected 5 fields, found 4 fields"
        );
    }

    #[test]
    fn invalid_fields() {
        let err = "aligned\t0\t3\t2\t7".parse::<Fact>().unwrap_err();
        assert!(matches!(err, ParseError::InvalidPrefix(_)));

        let err = "align\tA\t3\t2\t7".parse::<Fact>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid sequence: invalid digit found in string"
        );

        let err = "align\t0\t3\t2\t?".parse::<Fact>().unwrap_err();
        assert!(matches!(err, ParseError::InvalidPosition(_)));
    }
}
