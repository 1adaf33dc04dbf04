//! Document sources

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where a document is read from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    /// File on disk
    Path(PathBuf),
    /// In-memory bytes with a display name for diagnostics
    Bytes { name: String, data: Vec<u8> },
}

impl Source {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn from_bytes(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self::Bytes {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Create from string content
    pub fn from_str(name: impl Into<String>, content: &str) -> Self {
        Self::from_bytes(name, content.as_bytes())
    }

    /// Name used in logs and error messages
    pub fn name(&self) -> Cow<'_, str> {
        match self {
            Self::Path(path) => path.to_string_lossy(),
            Self::Bytes { name, .. } => Cow::Borrowed(name.as_str()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Path(path) => Some(path),
            Self::Bytes { .. } => None,
        }
    }

    /// Read the full contents of the source
    pub fn read(&self) -> std::io::Result<Cow<'_, [u8]>> {
        match self {
            Self::Path(path) => std::fs::read(path).map(Cow::Owned),
            Self::Bytes { data, .. } => Ok(Cow::Borrowed(data.as_slice())),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_source() -> std::io::Result<()> {
        let source = Source::from_str("inline.xml", "<Project/>");
        assert_eq!(source.name(), "inline.xml");
        assert_eq!(source.path(), None);
        assert_eq!(source.read()?.as_ref(), b"<Project/>");
        Ok(())
    }

    #[test]
    fn test_path_source_name() {
        let source: Source = Path::new("dir/project.xml").into();
        assert_eq!(source.to_string(), "dir/project.xml");
        assert_eq!(source.path(), Some(Path::new("dir/project.xml")));
    }

    #[test]
    fn test_missing_path_fails_to_read() {
        let source = Source::from_path("does/not/exist.xml");
        assert!(source.read().is_err());
    }
}
