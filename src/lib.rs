//!A small library to read windows of lines from text files which may change on disk, e.g. logs.
//!
//! A [`LineFile`] counts the lines of a file once when attached and remembers the file's
//! modification time. Windows of lines are read on demand by streaming the file from its start,
//! without keeping the content or a file handle around. Callers poll [`LineFile::has_changed`]
//! and call [`LineFile::reload`] to refresh the count.

/// Async handle running the blocking operations on `async_std`'s thread pool
pub mod async_file;
pub mod error;
/// The blocking line-indexed file
pub mod file;
pub mod options;
/// Iterating and counting line records of a reader
pub mod records;
/// The cached result of a scan
pub mod snapshot;

pub use async_file::AsyncLineFile;
pub use file::LineFile;
pub use options::Options;

pub type Result<T> = std::result::Result<T, error::Error>;

/// A trait defining behavior for reading windows of lines from a line oriented source.
pub trait LineSource {
    /// Reads up to `count` lines starting at `start`. Hitting the end of the source early is not
    /// an error, fewer lines are returned instead.
    fn read_lines(&self, start: usize, count: usize) -> Result<Vec<String>>;

    /// Returns the amount of lines known to the source.
    fn line_count(&self) -> usize;

    /// Reads the given line. `None` if the source has no such line.
    #[inline]
    fn read_line(&self, line: usize) -> Result<Option<String>> {
        Ok(self.read_lines(line, 1)?.pop())
    }

    /// Reads every line of the source.
    #[inline]
    fn read_all(&self) -> Result<Vec<String>> {
        self.read_lines(0, usize::MAX)
    }
}
