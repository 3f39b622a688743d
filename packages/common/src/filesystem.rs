use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;
use std::path::{Component, Path, PathBuf};

/// File system abstraction for reading sources, writing artifacts and testing
pub trait FileSystem {
    /// Check if a file exists
    fn exists(&self, path: &Path) -> bool;

    /// Canonicalize a path (resolve symlinks, make absolute)
    fn canonicalize(&self, path: &Path) -> Result<PathBuf, io::Error>;

    /// Read a whole file as UTF-8 text
    fn read_to_string(&self, path: &Path) -> Result<String, io::Error>;

    /// Write a file, creating parent directories as needed
    fn write(&self, path: &Path, contents: &str) -> Result<(), io::Error>;

    /// Replace a file so readers never observe a partially written version.
    fn write_atomic(&self, path: &Path, contents: &str) -> Result<(), io::Error> {
        self.write(path, contents)
    }
}

/// Real file system implementation
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf, io::Error> {
        std::fs::canonicalize(path)
    }

    fn read_to_string(&self, path: &Path) -> Result<String, io::Error> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), io::Error> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, contents)
    }

    fn write_atomic(&self, path: &Path, contents: &str) -> Result<(), io::Error> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let tmp = path.with_file_name(format!(".{}.tmp", file_name));
        self.write(&tmp, contents)?;
        std::fs::rename(&tmp, path)
    }
}

/// Mock file system for testing
///
/// Files live in memory; writes are visible to later reads.
pub struct MockFileSystem {
    files: RefCell<BTreeMap<PathBuf, String>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self {
            files: RefCell::new(BTreeMap::new()),
        }
    }

    pub fn add_file(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files
            .borrow_mut()
            .insert(normalize_path(&path.into()), contents.into());
    }

    /// Contents of a file, if present
    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .borrow()
            .get(&normalize_path(path.as_ref()))
            .cloned()
    }

    /// All paths currently stored, sorted
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.borrow().keys().cloned().collect()
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(&normalize_path(path))
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf, io::Error> {
        // For mock, only normalize lexically
        Ok(normalize_path(path))
    }

    fn read_to_string(&self, path: &Path) -> Result<String, io::Error> {
        self.get(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )
        })
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), io::Error> {
        self.add_file(path, contents);
        Ok(())
    }
}

/// Resolve `.` and `..` segments without touching the disk.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        let path = Path::new("/a/b/./c/../d.tsx");
        assert_eq!(normalize_path(path), PathBuf::from("/a/b/d.tsx"));
    }

    #[test]
    fn test_mock_roundtrip_uses_normalized_keys() {
        let fs = MockFileSystem::new();
        fs.add_file("/src/./button/template.tsx", "export const Button = () => <button />;");

        assert!(fs.exists(Path::new("/src/button/template.tsx")));
        assert!(fs.exists(Path::new("/src/link/../button/template.tsx")));

        fs.write(Path::new("/out/button.html.j2"), "<button></button>")
            .unwrap();
        assert_eq!(
            fs.read_to_string(Path::new("/out/button.html.j2")).unwrap(),
            "<button></button>"
        );
    }

    #[test]
    fn test_mock_missing_file_is_not_found() {
        let fs = MockFileSystem::new();
        let err = fs.read_to_string(Path::new("/nope.ts")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
