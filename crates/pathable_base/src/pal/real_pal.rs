use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::{debug, instrument};

use crate::PathableError;
use crate::error::Result;

use super::FilePath;
use super::traits::{FileStat, FileType, Pal};

/* 📖 # Why use std::fs instead of async or other crates?

Traversal is synchronous by contract: every accessor operation is a blocking call
that completes before the caller proceeds. std::fs gives exactly that, with no
runtime to set up and no extra dependencies.
*/

/// Concrete PAL implementation using the real filesystem via std::fs.
///
/// All file paths are resolved relative to a configured base directory.
#[derive(Debug)]
pub struct RealPal {
    base_dir: PathBuf,
}

impl RealPal {
    /// Create a new RealPal with the given base directory.
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Resolve a FilePath to an absolute filesystem path.
    fn resolve_path(&self, path: &FilePath) -> PathBuf {
        path.to_path(&self.base_dir)
    }
}

fn file_type_of(metadata: &fs::Metadata) -> FileType {
    let file_type = metadata.file_type();
    if file_type.is_symlink() {
        FileType::Symlink
    } else if file_type.is_dir() {
        FileType::Directory
    } else if file_type.is_file() {
        FileType::File
    } else {
        FileType::Other
    }
}

#[cfg(unix)]
fn stat_from_metadata(metadata: &fs::Metadata) -> FileStat {
    use std::os::unix::fs::MetadataExt;
    FileStat {
        file_type: file_type_of(metadata),
        st_mode: metadata.mode(),
        st_ino: metadata.ino(),
        st_dev: metadata.dev(),
        st_nlink: metadata.nlink(),
        st_uid: metadata.uid(),
        st_gid: metadata.gid(),
        st_size: metadata.size(),
        st_atime: metadata.atime() as f64 + metadata.atime_nsec() as f64 / 1e9,
        st_mtime: metadata.mtime() as f64 + metadata.mtime_nsec() as f64 / 1e9,
        st_ctime: metadata.ctime() as f64 + metadata.ctime_nsec() as f64 / 1e9,
    }
}

#[cfg(not(unix))]
fn stat_from_metadata(metadata: &fs::Metadata) -> FileStat {
    use std::time::{SystemTime, UNIX_EPOCH};

    fn epoch_seconds(time: std::io::Result<SystemTime>) -> f64 {
        time.ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }

    FileStat {
        st_size: metadata.len(),
        st_atime: epoch_seconds(metadata.accessed()),
        st_mtime: epoch_seconds(metadata.modified()),
        st_ctime: epoch_seconds(metadata.created()),
        ..FileStat::new(file_type_of(metadata), metadata.len())
    }
}

impl Pal for RealPal {
    #[instrument(skip(self), fields(path = %path))]
    fn entry_exists(&self, path: &FilePath) -> Result<bool> {
        let resolved = self.resolve_path(path);
        let exists = match resolved.try_exists() {
            Ok(exists) => exists,
            // a file in the middle of the path means nothing exists below it
            Err(e) if e.kind() == io::ErrorKind::NotADirectory => false,
            Err(e) => {
                debug!(error = %e, "failed to check entry existence");
                return Err(Box::new(PathableError::file(resolved, e)));
            }
        };
        debug!(exists, resolved = %resolved.display(), "checked entry existence");
        Ok(exists)
    }

    #[instrument(skip(self), fields(path = %path))]
    fn list_directory(&self, path: &FilePath) -> Result<Vec<String>> {
        let resolved = self.resolve_path(path);
        let entries = fs::read_dir(&resolved).map_err(|e| {
            debug!(error = %e, "failed to open directory");
            Box::new(PathableError::file(resolved.clone(), e))
        })?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                debug!(error = %e, "failed to read directory entry");
                Box::new(PathableError::file(resolved.clone(), e))
            })?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        debug!(count = names.len(), "listed directory");
        Ok(names)
    }

    #[instrument(skip(self), fields(path = %path))]
    fn read_file(&self, path: &FilePath) -> Result<Vec<u8>> {
        let resolved = self.resolve_path(path);
        let content = fs::read(&resolved).map_err(|e| {
            debug!(error = %e, "failed to read file");
            Box::new(PathableError::file(resolved.clone(), e))
        })?;
        debug!(bytes = content.len(), "file read successfully");
        Ok(content)
    }

    #[instrument(skip(self), fields(path = %path))]
    fn symlink_metadata(&self, path: &FilePath) -> Result<FileStat> {
        let resolved = self.resolve_path(path);
        let metadata = fs::symlink_metadata(&resolved).map_err(|e| {
            debug!(error = %e, "failed to stat entry");
            Box::new(PathableError::file(resolved.clone(), e))
        })?;
        Ok(stat_from_metadata(&metadata))
    }

    #[instrument(skip(self), fields(path = %path))]
    fn metadata(&self, path: &FilePath) -> Result<FileStat> {
        let resolved = self.resolve_path(path);
        let metadata = fs::metadata(&resolved).map_err(|e| {
            debug!(error = %e, "failed to stat symlink target");
            Box::new(PathableError::file(resolved.clone(), e))
        })?;
        Ok(stat_from_metadata(&metadata))
    }
}
