use std::sync::Arc;

use crate::error::Result;

use super::file_path::FilePath;

/// Kind of a directory entry, as reported without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    File,
    Directory,
    Symlink,
    Other,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::File => "file",
            FileType::Directory => "directory",
            FileType::Symlink => "symlink",
            FileType::Other => "other",
        }
    }
}

/// OS attribute fields of an entry, named after the classic `stat` fields.
///
/// Fields the platform cannot provide are zero.
#[derive(Debug, Clone, PartialEq)]
pub struct FileStat {
    pub file_type: FileType,
    pub st_mode: u32,
    pub st_ino: u64,
    pub st_dev: u64,
    pub st_nlink: u64,
    pub st_uid: u32,
    pub st_gid: u32,
    pub st_size: u64,
    /// Seconds since the epoch, with sub-second precision.
    pub st_atime: f64,
    pub st_mtime: f64,
    pub st_ctime: f64,
}

impl FileStat {
    /// A stat record with only the type and size filled in.
    pub fn new(file_type: FileType, st_size: u64) -> Self {
        Self {
            file_type,
            st_mode: 0,
            st_ino: 0,
            st_dev: 0,
            st_nlink: 1,
            st_uid: 0,
            st_gid: 0,
            st_size,
            st_atime: 0.0,
            st_mtime: 0.0,
            st_ctime: 0.0,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.file_type == FileType::Directory
    }
}

/* 📖 # Why is Pal a trait instead of a struct?

The filesystem accessor only needs four questions answered: does an entry exist,
what does a directory contain, what bytes does a file hold, and what are an entry's
attributes. Putting exactly those behind a trait lets the traversal code run
unchanged against the real filesystem (RealPal) and against an in-memory tree with
operation counters and injected failures (MockPal).
*/

/// Platform Abstraction Layer (PAL) trait providing read-only filesystem operations.
///
/// Two implementations are provided:
/// - `RealPal`: Uses the real filesystem via `std::fs`
/// - `MockPal`: In-memory implementation for testing
pub trait Pal: std::fmt::Debug + Send + Sync + 'static {
    /// Check if an entry (file or directory) exists at the given path.
    fn entry_exists(&self, path: &FilePath) -> Result<bool>;

    /// List the names of the entries of a directory.
    ///
    /// Fails with a `FileError` if the path is not a directory or does not exist.
    fn list_directory(&self, path: &FilePath) -> Result<Vec<String>>;

    /// Read the entire contents of a file.
    fn read_file(&self, path: &FilePath) -> Result<Vec<u8>>;

    /// Get entry attributes without following symlinks.
    fn symlink_metadata(&self, path: &FilePath) -> Result<FileStat>;

    /// Get entry attributes, following symlinks.
    ///
    /// Backends without symlinks can rely on the default.
    fn metadata(&self, path: &FilePath) -> Result<FileStat> {
        self.symlink_metadata(path)
    }

    /// Check whether the entry can be listed as a directory (symlinks are followed).
    fn is_directory(&self, path: &FilePath) -> Result<bool> {
        Ok(self.metadata(path)?.is_directory())
    }
}

/// Handle to a PAL implementation, enabling shared ownership.
///
/// Internally wraps `Arc<dyn Pal>` for cheap cloning.
///
/// # Examples
///
/// ```no_run
/// use pathable_base::{RealPal, PalHandle};
///
/// let pal = PalHandle::new(RealPal::new(".".into()));
/// let pal_clone = pal.clone(); // Cheap clone, shares the same implementation
/// ```
#[derive(Debug, Clone)]
pub struct PalHandle(Arc<dyn Pal>);

impl PalHandle {
    /// Create a new PalHandle from a Pal implementation.
    pub fn new(pal: impl Pal + 'static) -> Self {
        Self(Arc::new(pal))
    }
}

impl std::ops::Deref for PalHandle {
    type Target = dyn Pal;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}
