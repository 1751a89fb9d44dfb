//! A line within a problem file.

use std::str::FromStr;

use crate::anchor;
use crate::anchor::ANCHOR_PREFIX;
use crate::anchor::Anchor;
use crate::fact;
use crate::fact::FACT_PREFIX;
use crate::fact::Fact;
use crate::lengths;
use crate::lengths::LENGTHS_PREFIX;
use crate::lengths::Lengths;

/// The prefix for a comment line.
pub const COMMENT_PREFIX: char = '#';

/// An error associated with parsing a line.
#[derive(Debug)]
pub enum ParseError {
    /// An invalid lengths record.
    InvalidLengths(lengths::ParseError, String),

    /// An invalid anchor record.
    InvalidAnchor(anchor::ParseError, String),

    /// An invalid fact record.
    InvalidFact(fact::ParseError, String),

    /// A line that starts with no known prefix.
    UnknownRecord(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidLengths(err, line) => {
                write!(f, "invalid lengths record: {err}\n\nline: {line}")
            }
            ParseError::InvalidAnchor(err, line) => {
                write!(f, "invalid anchor record: {err}\n\nline: {line}")
            }
            ParseError::InvalidFact(err, line) => {
                write!(f, "invalid fact record: {err}\n\nline: {line}")
            }
            ParseError::UnknownRecord(line) => write!(f, "unknown record\n\nline: {line}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// A line within a problem file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Line {
    /// An empty line.
    Empty,

    /// A comment line, without its prefix.
    Comment(String),

    /// A sequence lengths line.
    Lengths(Lengths),

    /// A seed anchor line.
    Anchor(Anchor),

    /// A fact line.
    Fact(Fact),
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Line::Empty => write!(f, ""),
            Line::Comment(comment) => write!(f, "{COMMENT_PREFIX}{comment}"),
            Line::Lengths(record) => write!(f, "{record}"),
            Line::Anchor(record) => write!(f, "{record}"),
            Line::Fact(record) => write!(f, "{record}"),
        }
    }
}

/// Gets the first field of a tab-delimited line.
fn prefix(s: &str) -> &str {
    s.split('\t').next().unwrap_or_default()
}

impl FromStr for Line {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Self::Empty);
        }

        if let Some(comment) = s.strip_prefix(COMMENT_PREFIX) {
            return Ok(Self::Comment(comment.into()));
        }

        match prefix(s) {
            LENGTHS_PREFIX => s
                .parse()
                .map(Line::Lengths)
                .map_err(|err| ParseError::InvalidLengths(err, s.into())),
            ANCHOR_PREFIX => s
                .parse()
                .map(Line::Anchor)
                .map_err(|err| ParseError::InvalidAnchor(err, s.into())),
            FACT_PREFIX => s
                .parse()
                .map(Line::Fact)
                .map_err(|err| ParseError::InvalidFact(err, s.into())),
            _ => Err(ParseError::UnknownRecord(s.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_lines() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!("".parse::<Line>()?, Line::Empty);
        assert_eq!(
            "# two sequences".parse::<Line>()?,
            Line::Comment(String::from(" two sequences"))
        );
        assert!(matches!("lengths\t5\t5".parse::<Line>()?, Line::Lengths(_)));
        assert!(matches!("anchor\t1\t.".parse::<Line>()?, Line::Anchor(_)));
        assert_eq!(
            "align\t0\t3\t1\t3".parse::<Line>()?,
            Line::Fact(Fact::new(0, 3, 1, 3))
        );

        Ok(())
    }

    #[test]
    fn lines_print_as_they_parse() -> Result<(), Box<dyn std::error::Error>> {
        for s in ["#x", "lengths\t4\t9", "anchor\t.\t2", "align\t1\t0\t0\t2"] {
            assert_eq!(s.parse::<Line>()?.to_string(), s);
        }

        Ok(())
    }

    #[test]
    fn invalid_fact_line() {
        let err = "align\t0\t3\t1".parse::<Line>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid fact record: invalid number of fields in fact: expected 5 fields, found 4 \
             fields\n\nline: align\t0\t3\t1"
        );
    }

    #[test]
    fn unknown_line() {
        let err = "chain\t0".parse::<Line>().unwrap_err();
        assert!(matches!(err, ParseError::UnknownRecord(_)));
    }
}
