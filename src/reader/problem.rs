//! A whole alignment problem read from a problem file.

use std::io::BufRead;

use crate::Line;
use crate::Reader;
use crate::anchor::Anchor;
use crate::engine;
use crate::fact::Fact;
use crate::lengths::Lengths;
use crate::reader;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to reading a [`Problem`].
#[derive(Debug)]
pub enum Error {
    /// The file ended without a lengths record.
    MissingLengths,

    /// A record other than a comment came before the lengths record.
    RecordBeforeLengths(usize),

    /// A second lengths record.
    MultipleLengths(usize),

    /// An anchor record after the first fact record.
    AnchorAfterFact(usize),

    /// There was an issue reading from the underlying reader.
    Reader(usize, reader::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MissingLengths => write!(f, "the file has no lengths record"),
            Error::RecordBeforeLengths(line_no) => {
                write!(f, "found a record before the lengths record: line {line_no}")
            }
            Error::MultipleLengths(line_no) => {
                write!(f, "found a second lengths record: line {line_no}")
            }
            Error::AnchorAfterFact(line_no) => {
                write!(f, "found an anchor record after a fact record: line {line_no}")
            }
            Error::Reader(line_no, err) => write!(f, "reader error: line {line_no}: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Problem
////////////////////////////////////////////////////////////////////////////////////////

/// The state of the reader.
#[derive(Debug)]
enum State {
    /// No lengths record has been read.
    ExpectingLengths,

    /// The lengths record has been read, and anchors may follow.
    ReadingAnchors,

    /// At least one fact has been read.
    ReadingFacts,
}

/// An alignment problem: the sequence lengths, the seed anchors, and the facts
/// to add afterwards, in order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Problem {
    /// The sequence lengths.
    lengths: Lengths,

    /// The seed anchors.
    anchors: Vec<Anchor>,

    /// The facts.
    facts: Vec<Fact>,
}

impl Problem {
    /// Creates a new [`Problem`].
    pub fn new(lengths: Lengths, anchors: Vec<Anchor>, facts: Vec<Fact>) -> Self {
        Self {
            lengths,
            anchors,
            facts,
        }
    }

    /// Reads a [`Problem`] from a [`Reader`].
    pub(crate) fn read_from<T>(reader: &mut Reader<T>) -> Result<Self>
    where
        T: BufRead,
    {
        let mut state = State::ExpectingLengths;
        let mut lengths = None;
        let mut anchors = Vec::new();
        let mut facts = Vec::new();

        loop {
            let line = match reader.read_line() {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(err) => return Err(Error::Reader(reader.line_no(), err)),
            };

            state = get_state(&state, &line, reader.line_no())?;

            match line {
                Line::Empty | Line::Comment(_) => {}
                Line::Lengths(record) => lengths = Some(record),
                Line::Anchor(record) => anchors.push(record),
                Line::Fact(record) => facts.push(record),
            }
        }

        let lengths = lengths.ok_or(Error::MissingLengths)?;

        Ok(Self {
            lengths,
            anchors,
            facts,
        })
    }

    /// Gets the sequence lengths.
    pub fn lengths(&self) -> &Lengths {
        &self.lengths
    }

    /// Gets the seed anchors.
    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// Gets the facts.
    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    /// Gets an [`engine::Builder`] loaded with the lengths and seed anchors.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"lengths\t10\t10\nanchor\t2\t3\nalign\t0\t6\t1\t5\n";
    /// let mut reader = seqclosure::Reader::new(&data[..]);
    ///
    /// let problem = reader.read_problem()?;
    /// let mut engine = problem.builder()?.try_build()?;
    ///
    /// for fact in problem.facts() {
    ///     assert!(engine.try_add_fact(fact)?);
    /// }
    ///
    /// assert_eq!(engine.set_count(), 2);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn builder(&self) -> std::result::Result<engine::Builder, engine::builder::Error> {
        let builder = engine::Builder::default().lengths(self.lengths.iter().copied())?;

        Ok(self
            .anchors
            .iter()
            .cloned()
            .fold(builder, engine::Builder::push_anchor))
    }
}

impl std::fmt::Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.lengths)?;

        for anchor in &self.anchors {
            writeln!(f, "{anchor}")?;
        }

        for fact in &self.facts {
            writeln!(f, "{fact}")?;
        }

        Ok(())
    }
}

/// Gets the current state given the previous state and the line that was just
/// read in from the [`Reader`].
fn get_state(last: &State, line: &Line, line_no: usize) -> Result<State> {
    match (last, line) {
        // Empty lines and comments are allowed anywhere.
        (State::ExpectingLengths, Line::Empty | Line::Comment(_)) => Ok(State::ExpectingLengths),
        (State::ReadingAnchors, Line::Empty | Line::Comment(_)) => Ok(State::ReadingAnchors),
        (State::ReadingFacts, Line::Empty | Line::Comment(_)) => Ok(State::ReadingFacts),

        (State::ExpectingLengths, Line::Lengths(_)) => Ok(State::ReadingAnchors),
        (State::ExpectingLengths, Line::Anchor(_) | Line::Fact(_)) => {
            Err(Error::RecordBeforeLengths(line_no))
        }

        (State::ReadingAnchors | State::ReadingFacts, Line::Lengths(_)) => {
            Err(Error::MultipleLengths(line_no))
        }

        (State::ReadingAnchors, Line::Anchor(_)) => Ok(State::ReadingAnchors),
        (State::ReadingFacts, Line::Anchor(_)) => Err(Error::AnchorAfterFact(line_no)),

        (State::ReadingAnchors | State::ReadingFacts, Line::Fact(_)) => Ok(State::ReadingFacts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(data: &[u8]) -> Result<Problem> {
        Reader::new(data).read_problem()
    }

    #[test]
    fn valid_problem() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let data = b"# a comment\n\nlengths\t5\t5\t5\nanchor\t2\t.\t4\n\nalign\t0\t3\t1\t3\n";
        let problem = read(data)?;

        assert_eq!(problem.lengths().count(), 3);
        assert_eq!(problem.anchors(), &[Anchor::new(vec![Some(2), None, Some(4)])]);
        assert_eq!(problem.facts(), &[Fact::new(0, 3, 1, 3)]);

        let engine = problem.builder()?.try_build()?;
        assert_eq!(engine.set_count(), 1);

        Ok(())
    }

    #[test]
    fn problems_print_as_they_parse() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let data = "lengths\t5\t5\nanchor\t2\t.\nalign\t0\t3\t1\t3\nalign\t1\t4\t0\t4\n";
        let problem = read(data.as_bytes())?;

        assert_eq!(problem.to_string(), data);
        assert_eq!(read(problem.to_string().as_bytes())?, problem);

        Ok(())
    }

    #[test]
    fn missing_lengths() {
        let err = read(b"# nothing here\n").unwrap_err();
        assert!(matches!(err, Error::MissingLengths));

        let err = read(b"anchor\t1\t2\nlengths\t5\t5\n").unwrap_err();
        assert!(matches!(err, Error::RecordBeforeLengths(1)));
        assert_eq!(
            err.to_string(),
            "found a record before the lengths record: line 1"
        );
    }

    #[test]
    fn multiple_lengths() {
        let err = read(b"lengths\t5\n\nlengths\t5\n").unwrap_err();
        assert!(matches!(err, Error::MultipleLengths(3)));
    }

    #[test]
    fn anchor_after_fact() {
        let err = read(b"lengths\t5\t5\nalign\t0\t1\t1\t1\nanchor\t2\t2\n").unwrap_err();
        assert!(matches!(err, Error::AnchorAfterFact(3)));
    }

    #[test]
    fn invalid_record() {
        let err = read(b"lengths\t5\t5\nalign\t0\t1\n").unwrap_err();
        assert!(matches!(err, Error::Reader(2, _)));
    }
}
