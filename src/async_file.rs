use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use async_std::task;

use crate::{file::LineFile, options::Options, Result};

/// An async handle to a `LineFile`. Every operation touching the filesystem runs on the blocking
/// thread pool of `async_std`, so an async host can poll without stalling its executor.
///
/// Cloning is cheap and all clones share the same cached state.
#[derive(Debug, Clone)]
pub struct AsyncLineFile {
    inner: Arc<LineFile>,
}

impl AsyncLineFile {
    /// Attach to the file at `path` and count its lines.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<AsyncLineFile> {
        Self::open_with(path, Options::default()).await
    }

    /// Like `open` but with custom `options`.
    pub async fn open_with<P: AsRef<Path>>(path: P, options: Options) -> Result<AsyncLineFile> {
        let path: PathBuf = path.as_ref().to_path_buf();
        let file = task::spawn_blocking(move || LineFile::open_with(path, options)).await?;
        Ok(file.into())
    }

    pub async fn read_lines(&self, start: usize, count: usize) -> Result<Vec<String>> {
        let inner = Arc::clone(&self.inner);
        task::spawn_blocking(move || inner.read_lines(start, count)).await
    }

    /// Cached line count, doesn't touch the filesystem.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.inner.line_count()
    }

    pub async fn has_changed(&self) -> bool {
        let inner = Arc::clone(&self.inner);
        task::spawn_blocking(move || inner.has_changed()).await
    }

    pub async fn reload(&self) -> Result<()> {
        let inner = Arc::clone(&self.inner);
        task::spawn_blocking(move || inner.reload()).await
    }

    pub async fn reload_if_changed(&self) -> Result<bool> {
        let inner = Arc::clone(&self.inner);
        task::spawn_blocking(move || inner.reload_if_changed()).await
    }

    /// The underlying blocking `LineFile`.
    #[inline]
    pub fn get_ref(&self) -> &LineFile {
        &self.inner
    }
}

impl From<LineFile> for AsyncLineFile {
    #[inline]
    fn from(file: LineFile) -> Self {
        Self {
            inner: Arc::new(file),
        }
    }
}

impl From<Arc<LineFile>> for AsyncLineFile {
    #[inline]
    fn from(inner: Arc<LineFile>) -> Self {
        Self { inner }
    }
}
