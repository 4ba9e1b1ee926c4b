use std::{
    fs,
    io::BufReader,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
    time::SystemTime,
};

use itertools::process_results;
use log::{debug, trace, warn};

use crate::{
    error::Error,
    options::Options,
    records::{decode, skip_records, LineRecords},
    snapshot::{modified_time, Snapshot},
    LineSource, Result,
};

/// A text file whose lines can be read in windows. Keeps the line count and modification time of
/// the last scan but no file handle: every operation opens the file on its own.
#[derive(Debug)]
pub struct LineFile {
    path: PathBuf,
    options: Options,
    snapshot: Mutex<Snapshot>,
}

impl LineFile {
    /// Attach to the file at `path` and count its lines.
    ///
    /// Returns `Error::NotFound` if the path doesn't name an accessible file and `Error::Io` if
    /// it can't be read.
    #[inline]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<LineFile> {
        Self::open_with(path, Options::default())
    }

    /// Like `open` but with custom `options`.
    pub fn open_with<P: AsRef<Path>>(path: P, options: Options) -> Result<LineFile> {
        let path = path.as_ref().to_path_buf();
        let snapshot = Snapshot::scan(&path, &options)?;

        debug!(
            "attached to {}: {} lines, {} bytes",
            path.display(),
            snapshot.lines,
            snapshot.len
        );

        Ok(Self {
            path,
            options,
            snapshot: Mutex::new(snapshot),
        })
    }

    /// Reads up to `count` lines starting at line `start` (zero based). Returns fewer lines, or
    /// none at all, if the file ends before. Never touches the cached line count.
    pub fn read_lines(&self, start: usize, count: usize) -> Result<Vec<String>> {
        let file = fs::File::open(&self.path).map_err(|e| Error::at(&self.path, e))?;
        let mut reader = BufReader::with_capacity(self.options.buffer_capacity, file);

        let skipped = skip_records(&mut reader, start)?;
        if skipped < start || count == 0 {
            trace!("window {}+{} of {} is empty", start, count, self.path.display());
            return Ok(Vec::new());
        }

        let records = LineRecords::new(reader)
            .strip_carriage_return(self.options.strip_carriage_return)
            .take(count);
        let lines = process_results(records, |iter| iter.map(decode).collect::<Vec<_>>())?;

        trace!(
            "read {} lines at {} of {}",
            lines.len(),
            start,
            self.path.display()
        );
        Ok(lines)
    }

    /// Line count of the last scan. Might be stale, see `has_changed`.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.snapshot().lines
    }

    /// Size in bytes of the file as of the last scan.
    #[inline]
    pub fn file_size(&self) -> u64 {
        self.snapshot().len
    }

    /// Modification time of the file as of the last scan.
    #[inline]
    pub fn last_modified(&self) -> SystemTime {
        self.snapshot().modified
    }

    /// Returns `true` if the file's modification time differs from the one of the last scan.
    /// A file that can't be stat'ed anymore counts as changed.
    pub fn has_changed(&self) -> bool {
        match modified_time(&self.path) {
            Ok(modified) => modified != self.snapshot().modified,
            Err(e) => {
                warn!("can't stat {}: {}", self.path.display(), e);
                true
            }
        }
    }

    /// Scans the file again and replaces line count and modification time. On error the
    /// previous values are kept.
    pub fn reload(&self) -> Result<()> {
        let new = Snapshot::scan(&self.path, &self.options)?;

        let mut snapshot = self.snapshot.lock().unwrap_or_else(PoisonError::into_inner);
        debug!(
            "reloaded {}: {} -> {} lines",
            self.path.display(),
            snapshot.lines,
            new.lines
        );
        *snapshot = new;

        Ok(())
    }

    /// Reloads only if `has_changed` says so. Returns whether a reload happened.
    pub fn reload_if_changed(&self) -> Result<bool> {
        if !self.has_changed() {
            return Ok(false);
        }

        self.reload()?;
        Ok(true)
    }

    /// The state of the last scan as a whole.
    #[inline]
    pub fn snapshot(&self) -> Snapshot {
        *self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn options(&self) -> &Options {
        &self.options
    }
}

impl LineSource for LineFile {
    #[inline]
    fn read_lines(&self, start: usize, count: usize) -> Result<Vec<String>> {
        LineFile::read_lines(self, start, count)
    }

    #[inline]
    fn line_count(&self) -> usize {
        LineFile::line_count(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        fs::OpenOptions,
        io::Write,
        sync::Arc,
        thread,
        time::{Duration, UNIX_EPOCH},
    };
    use tempfile::TempDir;

    /// Creates `name` in a fresh directory holding `content`, with a fixed modification time so
    /// tests don't depend on timestamp resolution.
    fn setup(name: &str, content: &[u8]) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        set_mtime(&path, 1_000_000);
        (dir, path)
    }

    fn set_mtime(path: &Path, secs: u64) {
        let file = OpenOptions::new().write(true).open(path).unwrap();
        file.set_modified(UNIX_EPOCH + Duration::from_secs(secs)).unwrap();
    }

    fn append(path: &Path, data: &[u8], mtime: u64) {
        let mut file = OpenOptions::new().append(true).open(path).unwrap();
        file.write_all(data).unwrap();
        drop(file);
        set_mtime(path, mtime);
    }

    #[test]
    fn test_open_missing() {
        let dir = tempfile::tempdir().unwrap();
        let res = LineFile::open(dir.path().join("nope.log"));
        assert!(matches!(res, Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_open_empty_path() {
        let res = LineFile::open("");
        assert!(res.unwrap_err().is_not_found());
    }

    #[test]
    fn test_scenario() {
        let (_dir, path) = setup("app.log", b"alpha\nbeta\ngamma\n");

        let file = LineFile::open(&path).unwrap();
        assert_eq!(file.line_count(), 3);
        assert!(!file.has_changed());

        assert_eq!(file.read_lines(1, 2).unwrap(), vec!["beta", "gamma"]);
        assert_eq!(file.read_lines(2, 5).unwrap(), vec!["gamma"]);
        assert!(file.read_lines(5, 2).unwrap().is_empty());

        append(&path, b"delta\n", 2_000_000);
        assert!(file.has_changed());
        // Stays stale until reloaded
        assert_eq!(file.line_count(), 3);

        file.reload().unwrap();
        assert_eq!(file.line_count(), 4);
        assert!(!file.has_changed());
        assert_eq!(file.read_lines(3, 1).unwrap(), vec!["delta"]);
    }

    #[test]
    fn test_read_does_not_update_count() {
        let (_dir, path) = setup("grow.log", b"a\nb\n");
        let file = LineFile::open(&path).unwrap();

        append(&path, b"c\nd\n", 2_000_000);
        assert_eq!(file.read_lines(0, 10).unwrap(), vec!["a", "b", "c", "d"]);
        assert_eq!(file.line_count(), 2);
        assert_eq!(file.line_count(), 2);
        assert!(file.has_changed());
    }

    #[test]
    fn test_zero_count() {
        let (_dir, path) = setup("zero.log", b"a\nb\nc\n");
        let file = LineFile::open(&path).unwrap();

        for start in 0..6 {
            assert!(file.read_lines(start, 0).unwrap().is_empty());
        }
    }

    #[test]
    fn test_partial_last_line() {
        let (_dir, path) = setup("partial.log", b"one\ntwo\nthree");
        let file = LineFile::open(&path).unwrap();

        assert_eq!(file.line_count(), 3);
        assert_eq!(file.file_size(), 13);
        assert_eq!(file.read_lines(0, 10).unwrap(), vec!["one", "two", "three"]);
        assert_eq!(file.read_lines(2, 1).unwrap(), vec!["three"]);
    }

    #[test]
    fn test_empty_lines() {
        let (_dir, path) = setup("blank.log", b"\n\nx\n");
        let file = LineFile::open(&path).unwrap();

        assert_eq!(file.line_count(), 3);
        assert_eq!(file.read_lines(0, 3).unwrap(), vec!["", "", "x"]);
    }

    #[test]
    fn test_empty_file() {
        let (_dir, path) = setup("empty.log", b"");
        let file = LineFile::open(&path).unwrap();

        assert_eq!(file.line_count(), 0);
        assert!(file.read_lines(0, 5).unwrap().is_empty());
    }

    #[test]
    fn test_crlf_option() {
        let (_dir, path) = setup("win.log", b"one\r\ntwo\r\n");

        let raw = LineFile::open(&path).unwrap();
        assert_eq!(raw.read_lines(0, 2).unwrap(), vec!["one\r", "two\r"]);

        let opts = Options::new().strip_carriage_return(true);
        let stripped = LineFile::open_with(&path, opts).unwrap();
        assert_eq!(stripped.line_count(), 2);
        assert_eq!(stripped.read_lines(0, 2).unwrap(), vec!["one", "two"]);
    }

    #[test]
    fn test_small_buffer() {
        let content: String = (0..200).map(|i| format!("line number {}\n", i)).collect();
        let (_dir, path) = setup("small.log", content.as_bytes());

        let file = LineFile::open_with(&path, Options::new().buffer_capacity(7)).unwrap();
        assert_eq!(file.line_count(), 200);
        assert_eq!(
            file.read_lines(150, 2).unwrap(),
            vec!["line number 150", "line number 151"]
        );
    }

    #[test]
    fn test_deleted() {
        let (_dir, path) = setup("gone.log", b"a\nb\n");
        let file = LineFile::open(&path).unwrap();

        fs::remove_file(&path).unwrap();
        assert!(file.has_changed());
        assert!(file.read_lines(0, 1).unwrap_err().is_not_found());

        let before = file.snapshot();
        assert!(file.reload().unwrap_err().is_not_found());
        assert_eq!(file.snapshot(), before);
        assert_eq!(file.line_count(), 2);
    }

    #[test]
    fn test_reload_if_changed() {
        let (_dir, path) = setup("cond.log", b"a\n");
        let file = LineFile::open(&path).unwrap();

        assert!(!file.reload_if_changed().unwrap());

        append(&path, b"b\n", 2_000_000);
        assert!(file.reload_if_changed().unwrap());
        assert_eq!(file.line_count(), 2);
        assert_eq!(file.last_modified(), UNIX_EPOCH + Duration::from_secs(2_000_000));
        assert!(!file.reload_if_changed().unwrap());
    }

    #[test]
    fn test_truncate() {
        let (_dir, path) = setup("trunc.log", b"a\nb\nc\n");
        let file = LineFile::open(&path).unwrap();

        fs::write(&path, b"x\n").unwrap();
        set_mtime(&path, 3_000_000);

        assert!(file.read_lines(1, 2).unwrap().is_empty());
        file.reload().unwrap();
        assert_eq!(file.line_count(), 1);
        assert_eq!(file.file_size(), 2);
    }

    #[test]
    fn test_shared_between_threads() {
        let content: String = (0..100).map(|i| format!("{}\n", i)).collect();
        let (_dir, path) = setup("shared.log", content.as_bytes());
        let file = Arc::new(LineFile::open(&path).unwrap());

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let file = Arc::clone(&file);
                thread::spawn(move || {
                    for i in 0..25 {
                        let line = t * 25 + i;
                        assert_eq!(file.read_lines(line, 1).unwrap(), vec![line.to_string()]);
                        file.reload().unwrap();
                        assert_eq!(file.line_count(), 100);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
