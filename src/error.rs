use std::{
    fmt::Display,
    io,
    path::{Path, PathBuf},
};

#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    /// The path does not resolve to an accessible regular file
    NotFound { path: PathBuf },
}

impl Error {
    /// Attaches `path` to an io error, turning `ErrorKind::NotFound` into `Error::NotFound`.
    pub(crate) fn at<P: AsRef<Path>>(path: P, e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::NotFound {
            Self::not_found(path)
        } else {
            Self::Io(e)
        }
    }

    #[inline]
    pub(crate) fn not_found<P: AsRef<Path>>(path: P) -> Self {
        Self::NotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns `true` if the error means the file is gone or was never there.
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::NotFound { .. } => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::NotFound { path } => write!(f, "file not found: {}", path.display()),
        }
    }
}
