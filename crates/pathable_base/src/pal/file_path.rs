use relative_path::{Component, RelativePath, RelativePathBuf};
use std::path::{Path, PathBuf};

/* 📖 # Why use RelativePathBuf for FilePath?

FilePath wraps RelativePathBuf to enforce that all paths are relative to the PAL's
base directory, not absolute system paths. The filesystem accessor builds one
FilePath per traversal step with `join_entry`, which only accepts a single plain entry
name. Names like `..`, `.` or `a/b` are refused, so an entry handle can never point
outside the directory tree it was rooted at.
*/

/// Type-safe wrapper for file paths relative to the PAL base directory.
///
/// # Examples
///
/// ```
/// use pathable_base::FilePath;
///
/// let path = FilePath::from("src/main.rs");
/// assert_eq!(path.join("mod.rs").to_string(), "src/main.rs/mod.rs");
/// assert_eq!(FilePath::root().to_string(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FilePath(RelativePathBuf);

impl FilePath {
    /// The base directory itself.
    pub fn root() -> Self {
        Self(RelativePathBuf::new())
    }

    /// Builds a path from individual entry names.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut path = RelativePathBuf::new();
        for segment in segments {
            path.push(segment.as_ref());
        }
        Self(path)
    }

    /// Returns a new path with `name` appended as one more component.
    pub fn join(&self, name: &str) -> Self {
        Self(self.0.join(name))
    }

    /// Appends `name` only if it is exactly one plain entry name.
    ///
    /// Returns `None` for empty names, `.`, `..` and anything containing a separator.
    pub fn join_entry(&self, name: &str) -> Option<Self> {
        if name.contains('\\') {
            return None;
        }
        let mut components = RelativePath::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(entry)), None) if entry == name => Some(self.join(name)),
            _ => None,
        }
    }

    /// Returns true when this is the base directory itself.
    pub fn is_root(&self) -> bool {
        self.0.as_str().is_empty()
    }

    /// Returns the underlying RelativePath as a reference.
    pub fn as_relative(&self) -> &RelativePath {
        &self.0
    }

    /// Converts to a regular Path for use with std::fs operations.
    /// This returns the relative path portion without a base directory.
    pub fn as_path(&self) -> &Path {
        Path::new(self.as_relative().as_str())
    }

    /// Resolves against a base directory.
    pub fn to_path(&self, base: &Path) -> PathBuf {
        self.0.to_path(base)
    }
}

impl From<&str> for FilePath {
    fn from(s: &str) -> Self {
        Self(RelativePathBuf::from(s))
    }
}

impl From<String> for FilePath {
    fn from(s: String) -> Self {
        Self(RelativePathBuf::from(s))
    }
}

impl From<RelativePathBuf> for FilePath {
    fn from(p: RelativePathBuf) -> Self {
        Self(p)
    }
}

impl std::fmt::Display for FilePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<RelativePath> for FilePath {
    fn as_ref(&self) -> &RelativePath {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_path_from_str() {
        let path = FilePath::from("src/main.rs");
        assert_eq!(path.as_path(), Path::new("src/main.rs"));
    }

    #[test]
    fn test_file_path_from_segments() {
        let path = FilePath::from_segments(["dir1", "dir2", "test.txt"]);
        assert_eq!(path, FilePath::from("dir1/dir2/test.txt"));
        assert!(FilePath::from_segments(Vec::<String>::new()).is_root());
    }

    #[test]
    fn test_file_path_join() {
        let path = FilePath::root().join("a").join("b.txt");
        assert_eq!(path.to_string(), "a/b.txt");
        assert!(!path.is_root());
    }

    #[test]
    fn test_join_entry_accepts_only_plain_names() {
        let base = FilePath::from("docs");
        assert_eq!(base.join_entry("a.txt"), Some(FilePath::from("docs/a.txt")));
        assert_eq!(base.join_entry(".hidden"), Some(FilePath::from("docs/.hidden")));
        for name in ["", ".", "..", "../secret.txt", "a/b", "a/", "/etc", "a\\b"] {
            assert_eq!(base.join_entry(name), None, "{:?} should be refused", name);
        }
    }

    #[test]
    fn test_file_path_to_path() {
        let path = FilePath::from("a/b.txt");
        assert_eq!(
            path.to_path(Path::new("/base")),
            PathBuf::from("/base").join("a").join("b.txt")
        );
    }

    #[test]
    fn test_file_path_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(FilePath::from("test1.txt"));
        set.insert(FilePath::from("test2.txt"));
        assert!(set.contains(&FilePath::from("test1.txt")));
        assert!(!set.contains(&FilePath::from("test3.txt")));
    }
}
