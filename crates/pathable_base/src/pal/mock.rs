use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::PathableError;
use crate::error::Result;

use super::FilePath;
use super::traits::{FileStat, FileType, Pal};

/* 📖 # Why use HashMap for MockPal storage?

MockPal keeps the tree in memory so traversal tests are fast, deterministic and free
of side effects. It also records how often each operation ran, which is how the
result cache is shown to skip the backing store, and it can fail chosen paths with
"permission denied" to exercise the soft-failure paths that a real filesystem
cannot reliably reproduce in a test.
*/

/// In-memory PAL implementation for testing.
///
/// # Examples
///
/// ```
/// use pathable_base::{FilePath, MockPal, Pal};
///
/// let mock = MockPal::new();
/// mock.add_file(FilePath::from("docs/test.txt"), b"content".to_vec());
/// assert!(mock.entry_exists(&FilePath::from("docs")).unwrap());
/// assert_eq!(mock.read_file(&FilePath::from("docs/test.txt")).unwrap(), b"content");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockPal {
    files: Arc<Mutex<HashMap<FilePath, Vec<u8>>>>,
    directories: Arc<Mutex<HashSet<FilePath>>>,
    denied: Arc<Mutex<HashSet<FilePath>>>,
    counters: Arc<MockCounters>,
}

#[derive(Debug, Default)]
struct MockCounters {
    exists: AtomicUsize,
    list: AtomicUsize,
    read: AtomicUsize,
    stat: AtomicUsize,
}

impl MockPal {
    /// Create a new MockPal containing only the (empty) base directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, creating its parent directories.
    pub fn add_file(&self, path: FilePath, content: Vec<u8>) {
        self.add_parents(&path);
        self.files.lock().insert(path, content);
    }

    /// Add a directory, creating its parent directories.
    pub fn add_directory(&self, path: FilePath) {
        self.add_parents(&path);
        self.directories.lock().insert(path);
    }

    /// Remove a file or directory entry. Its children are left in place.
    pub fn remove(&self, path: &FilePath) {
        self.files.lock().remove(path);
        self.directories.lock().remove(path);
    }

    /// Make every operation on `path` fail with "permission denied".
    pub fn deny(&self, path: FilePath) {
        self.denied.lock().insert(path);
    }

    pub fn exists_count(&self) -> usize {
        self.counters.exists.load(Ordering::SeqCst)
    }

    pub fn list_count(&self) -> usize {
        self.counters.list.load(Ordering::SeqCst)
    }

    pub fn read_count(&self) -> usize {
        self.counters.read.load(Ordering::SeqCst)
    }

    pub fn stat_count(&self) -> usize {
        self.counters.stat.load(Ordering::SeqCst)
    }

    fn add_parents(&self, path: &FilePath) {
        let mut directories = self.directories.lock();
        let mut current = path.as_relative().parent();
        while let Some(parent) = current {
            if parent.as_str().is_empty() {
                break;
            }
            directories.insert(FilePath::from(parent.to_relative_path_buf()));
            current = parent.parent();
        }
    }

    fn check_access(&self, path: &FilePath) -> Result<()> {
        if self.denied.lock().contains(path) {
            return Err(Box::new(PathableError::file(
                path.as_path(),
                io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
            )));
        }
        Ok(())
    }

    fn not_found(path: &FilePath, what: &str) -> Box<PathableError> {
        Box::new(PathableError::file(
            path.as_path(),
            io::Error::new(io::ErrorKind::NotFound, format!("{} not found: {}", what, path)),
        ))
    }

    fn is_dir(&self, path: &FilePath) -> bool {
        path.is_root() || self.directories.lock().contains(path)
    }
}

impl Pal for MockPal {
    fn entry_exists(&self, path: &FilePath) -> Result<bool> {
        self.counters.exists.fetch_add(1, Ordering::SeqCst);
        self.check_access(path)?;
        Ok(self.is_dir(path) || self.files.lock().contains_key(path))
    }

    fn list_directory(&self, path: &FilePath) -> Result<Vec<String>> {
        self.counters.list.fetch_add(1, Ordering::SeqCst);
        self.check_access(path)?;
        if !self.is_dir(path) {
            return Err(Self::not_found(path, "Directory"));
        }
        let is_child = |candidate: &FilePath| {
            candidate
                .as_relative()
                .parent()
                .is_some_and(|parent| parent == path.as_relative())
        };
        let mut names: Vec<String> = self
            .files
            .lock()
            .keys()
            .chain(self.directories.lock().iter())
            .filter(|candidate| is_child(*candidate))
            .filter_map(|candidate| candidate.as_relative().file_name().map(str::to_string))
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    fn read_file(&self, path: &FilePath) -> Result<Vec<u8>> {
        self.counters.read.fetch_add(1, Ordering::SeqCst);
        self.check_access(path)?;
        self.files
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| Self::not_found(path, "File"))
    }

    fn symlink_metadata(&self, path: &FilePath) -> Result<FileStat> {
        self.counters.stat.fetch_add(1, Ordering::SeqCst);
        self.check_access(path)?;
        if self.is_dir(path) {
            return Ok(FileStat::new(FileType::Directory, 0));
        }
        let files = self.files.lock();
        let content = files.get(path).ok_or_else(|| Self::not_found(path, "Entry"))?;
        Ok(FileStat::new(FileType::File, content.len() as u64))
    }
}
