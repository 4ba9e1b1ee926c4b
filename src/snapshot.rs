use std::{fs, io::BufReader, path::Path, time::SystemTime};

use crate::{error::Error, options::Options, records::count_records, Result};

/// The state captured by one scan of a file. Line count, size and modification time always come
/// from the same pass and are only ever replaced together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// Amount of line records in the file, counting a final line without `\n`
    pub(crate) lines: usize,
    /// Bytes consumed while counting
    pub(crate) len: u64,
    /// Modification time reported by the metadata read right before counting
    pub(crate) modified: SystemTime,
}

impl Snapshot {
    /// Stat `path`, then stream through it counting line records.
    ///
    /// Fails with `Error::NotFound` if the path is missing or not a regular file and with
    /// `Error::Io` if it can't be read.
    pub(crate) fn scan(path: &Path, options: &Options) -> Result<Self> {
        let modified = modified_time(path)?;

        let file = fs::File::open(path).map_err(|e| Error::at(path, e))?;
        let mut reader = BufReader::with_capacity(options.buffer_capacity, file);

        let (lines, len) = count_records(&mut reader).map_err(|e| Error::at(path, e))?;

        Ok(Self {
            lines,
            len,
            modified,
        })
    }

    #[inline]
    pub fn lines(&self) -> usize {
        self.lines
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn modified(&self) -> SystemTime {
        self.modified
    }
}

/// Reads the modification time of `path` from its metadata.
pub(crate) fn modified_time(path: &Path) -> Result<SystemTime> {
    let metadata = fs::metadata(path).map_err(|e| Error::at(path, e))?;

    if !metadata.is_file() {
        return Err(Error::not_found(path));
    }

    Ok(metadata.modified()?)
}
