//! A problem file reader.

use std::io;
use std::io::BufRead;

use crate::Line;
use crate::line;

pub mod problem;

pub use problem::Problem;

/// The characters that may end a line (`\n` or `\r\n`).
const LINE_ENDINGS: [char; 2] = ['\n', '\r'];

/// An error related to a [`Reader`].
#[derive(Debug)]
pub enum Error {
    /// An I/O error.
    Io(io::Error),

    /// A line that could not be parsed.
    Line(line::ParseError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::Line(err) => write!(f, "line error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A problem file reader.
///
/// The reader owns its line buffer and counts the lines it has consumed, so
/// errors further up can point at the offending line.
#[derive(Debug)]
pub struct Reader<T>
where
    T: BufRead,
{
    /// The underlying reader.
    inner: T,

    /// The buffer for the current line.
    buffer: String,

    /// The number of the line most recently read (1-based).
    line_no: usize,
}

impl<T> Reader<T>
where
    T: BufRead,
{
    /// Creates a problem file reader.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"lengths\t5\t5\n# facts\nalign\t0\t3\t1\t3";
    /// let reader = seqclosure::Reader::new(&data[..]);
    ///
    /// assert_eq!(reader.line_no(), 0);
    /// ```
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buffer: String::new(),
            line_no: 0,
        }
    }

    /// Gets the number of the line most recently read.
    ///
    /// This is `0` before anything has been read. After an error, it is the
    /// number of the line that caused it.
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// Attempts to read the next [`Line`].
    ///
    /// A trailing `\n` or `\r\n` is not part of the line, and the last line of
    /// the file does not need one. [`None`] is returned at the end of the file.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqclosure::Line;
    ///
    /// let data = b"lengths\t5\t5\r\n# facts\r\nalign\t0\t3\t1\t3";
    /// let mut reader = seqclosure::Reader::new(&data[..]);
    ///
    /// assert!(matches!(reader.read_line()?, Some(Line::Lengths(_))));
    /// assert_eq!(reader.read_line()?, Some(Line::Comment(String::from(" facts"))));
    /// assert!(matches!(reader.read_line()?, Some(Line::Fact(_))));
    /// assert!(reader.read_line()?.is_none());
    ///
    /// assert_eq!(reader.line_no(), 3);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn read_line(&mut self) -> Result<Option<Line>, Error> {
        self.buffer.clear();

        match self.inner.read_line(&mut self.buffer) {
            Ok(0) => return Ok(None),
            Ok(_) => self.line_no += 1,
            Err(err) => {
                self.line_no += 1;
                return Err(Error::Io(err));
            }
        }

        let line = self.buffer.trim_end_matches(LINE_ENDINGS);
        line.parse::<Line>().map(Some).map_err(Error::Line)
    }

    /// Reads a whole [`Problem`] from the underlying reader.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqclosure::fact::Fact;
    ///
    /// let data = b"lengths\t5\t5\n# facts\nalign\t0\t3\t1\t3";
    /// let mut reader = seqclosure::Reader::new(&data[..]);
    ///
    /// let problem = reader.read_problem()?;
    /// assert_eq!(problem.lengths().count(), 2);
    /// assert_eq!(problem.facts(), &[Fact::new(0, 3, 1, 3)]);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn read_problem(&mut self) -> Result<Problem, problem::Error> {
        Problem::read_from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact::Fact;

    #[test]
    fn crlf_problem_files() -> Result<(), Box<dyn std::error::Error>> {
        let unix = b"lengths\t5\t5\nanchor\t1\t.\n\nalign\t0\t3\t1\t3\n";
        let dos = b"lengths\t5\t5\r\nanchor\t1\t.\r\n\r\nalign\t0\t3\t1\t3\r\n";

        let expected = Reader::new(&unix[..]).read_problem()?;
        assert_eq!(Reader::new(&dos[..]).read_problem()?, expected);
        assert_eq!(expected.facts(), &[Fact::new(0, 3, 1, 3)]);

        Ok(())
    }

    #[test]
    fn last_line_without_a_newline() -> Result<(), Box<dyn std::error::Error>> {
        let mut reader = Reader::new(&b"lengths\t5\t5\nalign\t0\t4\t1\t4"[..]);

        assert!(matches!(reader.read_line()?, Some(Line::Lengths(_))));
        assert_eq!(reader.read_line()?, Some(Line::Fact(Fact::new(0, 4, 1, 4))));
        assert!(reader.read_line()?.is_none());
        assert!(reader.read_line()?.is_none());
        assert_eq!(reader.line_no(), 2);

        Ok(())
    }

    #[test]
    fn blank_lines_are_counted() -> Result<(), Box<dyn std::error::Error>> {
        let mut reader = Reader::new(&b"\r\n\nlengths\t5\n"[..]);

        assert_eq!(reader.read_line()?, Some(Line::Empty));
        assert_eq!(reader.read_line()?, Some(Line::Empty));
        assert!(matches!(reader.read_line()?, Some(Line::Lengths(_))));
        assert_eq!(reader.line_no(), 3);

        Ok(())
    }

    #[test]
    fn unparseable_lines_keep_their_number() {
        let mut reader = Reader::new(&b"lengths\t5\t5\r\nmystery\t1\r\n"[..]);

        assert!(reader.read_line().is_ok());

        let err = reader.read_line().unwrap_err();
        assert!(matches!(
            err,
            Error::Line(line::ParseError::UnknownRecord(ref line)) if line == "mystery\t1"
        ));
        assert_eq!(reader.line_no(), 2);
    }
}
