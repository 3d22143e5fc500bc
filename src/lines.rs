//! File and line helpers for reading text inputs (par files, tim files, clock
//! corrections).
//!
//! * [`open_or_use`] accepts either a path, which is opened and owned for the
//!   lifetime of the returned [`Handle`], or a stream the caller already manages,
//!   which is borrowed and left untouched.
//! * [`lines_of`] iterates over the lines of a path, an open reader or a plain
//!   iterator of strings.
//! * [`interesting_lines`] strips lines and skips blanks and comments.
//!
//! ```rust,no_run
//! use camino::Utf8Path;
//! use pulsar_utils::lines::{interesting_lines_of, LineInput};
//!
//! let path = Utf8Path::new("J1234+5678.par");
//! for line in interesting_lines_of(LineInput::Path(path), &["#", "C "]).unwrap() {
//!     println!("{}", line.unwrap());
//! }
//! ```
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Write};

use camino::Utf8Path;
use tracing::debug;

use crate::pulsar_errors::PulsarError;

/// How a path given to [`open_or_use`] is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenMode {
    #[default]
    Read,
    /// Create or truncate.
    Write,
    /// Create if missing, write at the end.
    Append,
}

/// Either a path to open or an already open stream.
pub enum FileSource<'a, S: ?Sized> {
    Path(&'a Utf8Path),
    Stream(&'a mut S),
}

/// Stream returned by [`open_or_use`].
///
/// An owned file is closed when the handle is dropped; a borrowed stream is
/// never closed.
#[derive(Debug)]
pub enum Handle<'a, S: ?Sized> {
    Owned(File),
    Borrowed(&'a mut S),
}

impl<S: Read + ?Sized> Read for Handle<'_, S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Handle::Owned(f) => f.read(buf),
            Handle::Borrowed(s) => s.read(buf),
        }
    }
}

impl<S: Write + ?Sized> Write for Handle<'_, S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Handle::Owned(f) => f.write(buf),
            Handle::Borrowed(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Handle::Owned(f) => f.flush(),
            Handle::Borrowed(s) => s.flush(),
        }
    }
}

fn open_path(path: &Utf8Path, mode: OpenMode) -> Result<File, PulsarError> {
    debug!(%path, ?mode, "opening file");
    let mut options = OpenOptions::new();
    match mode {
        OpenMode::Read => options.read(true),
        OpenMode::Write => options.write(true).create(true).truncate(true),
        OpenMode::Append => options.append(true).create(true),
    };
    Ok(options.open(path)?)
}

/// Open a path or use an open stream.
///
/// Arguments
/// ---------
/// * `source`: a path to open with `mode`, or a stream passed through as is
/// * `mode`: ignored for streams
///
/// Return
/// ------
/// * a [`Handle`] reading from or writing to the source, or
///   [`PulsarError::IoError`] if the path cannot be opened
pub fn open_or_use<'a, S: ?Sized>(
    source: FileSource<'a, S>,
    mode: OpenMode,
) -> Result<Handle<'a, S>, PulsarError> {
    match source {
        FileSource::Path(path) => Ok(Handle::Owned(open_path(path, mode)?)),
        FileSource::Stream(stream) => Ok(Handle::Borrowed(stream)),
    }
}

/// Anything [`lines_of`] can iterate over.
pub enum LineInput<'a> {
    Path(&'a Utf8Path),
    Reader(&'a mut dyn BufRead),
    Iter(Box<dyn Iterator<Item = String> + 'a>),
}

impl<'a> From<&'a Utf8Path> for LineInput<'a> {
    fn from(path: &'a Utf8Path) -> Self {
        LineInput::Path(path)
    }
}

/// Lazily iterate over the lines of a file, an open reader or an iterator.
///
/// Lines from files and readers come without their line terminator. Strings
/// from an iterator are passed through unchanged.
pub fn lines_of<'a>(
    input: LineInput<'a>,
) -> Result<Box<dyn Iterator<Item = io::Result<String>> + 'a>, PulsarError> {
    let lines: Box<dyn Iterator<Item = io::Result<String>> + 'a> = match input {
        LineInput::Path(path) => Box::new(BufReader::new(open_path(path, OpenMode::Read)?).lines()),
        LineInput::Reader(reader) => Box::new(BufRead::lines(reader)),
        LineInput::Iter(iter) => Box::new(iter.map(Ok)),
    };
    Ok(lines)
}

/// Comment markers must start with a non-blank character.
fn validate_comments(comments: &[&str]) -> Result<Vec<String>, PulsarError> {
    comments
        .iter()
        .map(|&c| {
            let cs = c.trim();
            if cs.is_empty() || !c.starts_with(cs) {
                Err(PulsarError::InvalidCommentMarker(c.to_string()))
            } else {
                Ok(c.to_string())
            }
        })
        .collect()
}

fn keep_line(line: &str, comments: &[String]) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || comments.iter().any(|c| line.starts_with(c.as_str())) {
        None
    } else {
        Some(line.to_string())
    }
}

/// Iterate over lines, skipping blank lines and comments.
///
/// Each line is stripped of surrounding whitespace, then dropped if empty or
/// if it starts with any of `comments`. Markers may carry trailing whitespace
/// (`"C "`) but not leading whitespace.
///
/// Return
/// ------
/// * [`PulsarError::InvalidCommentMarker`] before any line is read if a marker
///   is blank or starts with whitespace
///
/// ```rust
/// use pulsar_utils::lines::interesting_lines;
///
/// let kept: Vec<String> = interesting_lines(["  ", "# comment", " data "], &["#"])
///     .unwrap()
///     .collect();
/// assert_eq!(kept, ["data"]);
/// ```
pub fn interesting_lines<I, L>(
    lines: I,
    comments: &[&str],
) -> Result<impl Iterator<Item = String>, PulsarError>
where
    I: IntoIterator<Item = L>,
    L: AsRef<str>,
{
    let comments = validate_comments(comments)?;
    Ok(lines
        .into_iter()
        .filter_map(move |line| keep_line(line.as_ref(), &comments)))
}

/// [`interesting_lines`] over [`lines_of`], passing read errors through.
pub fn interesting_lines_of<'a>(
    input: LineInput<'a>,
    comments: &[&str],
) -> Result<impl Iterator<Item = io::Result<String>> + 'a, PulsarError> {
    let comments = validate_comments(comments)?;
    Ok(lines_of(input)?.filter_map(move |line| match line {
        Ok(l) => keep_line(&l, &comments).map(Ok),
        Err(e) => Some(Err(e)),
    }))
}
