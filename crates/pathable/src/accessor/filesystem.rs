use std::io;
use std::path::PathBuf;

use pathable_base::{FilePath, PalHandle, PathableError, PathableResult, RealPal, Segment};
use serde_json::json;
use tracing::{debug, instrument};

use crate::cache::ResultCache;
use crate::config::CacheConfig;

use super::{Metadata, NodeAccessor};

/* 📖 # Why do filesystem nodes hold only a FilePath?

A directory entry can appear or vanish between two calls, so a node is just the
relative path that resolution reached. Every question about it (list, read, stat) goes
back to the PAL. Listing failures are classified after the fact: if the entry is
gone it is a NotFound miss, if it is not a directory it is NotTraversable, and
anything else (permission denied, ...) is a real I/O error and propagates.

Each segment must be a single entry name. Keys such as `..` or `a/b` never match a
listed entry, so they are misses rather than a way out of the root directory.
Traversability follows symlinks, the same way listing does.
*/

/// Accessor over a directory tree reached through the PAL. Reads return file bytes.
#[derive(Debug)]
pub struct FilesystemAccessor {
    pal: PalHandle,
    cache: ResultCache<Vec<u8>>,
}

impl FilesystemAccessor {
    pub fn new(pal: PalHandle) -> Self {
        Self::with_cache_config(pal, &CacheConfig::default())
    }

    pub fn with_cache_config(pal: PalHandle, config: &CacheConfig) -> Self {
        Self {
            pal,
            cache: ResultCache::new(config),
        }
    }

    /// Accessor over the real filesystem below `root`.
    pub fn from_directory(root: impl Into<PathBuf>) -> Self {
        Self::new(PalHandle::new(RealPal::new(root.into())))
    }

    pub fn pal(&self) -> &PalHandle {
        &self.pal
    }
}

fn is_io_not_found(err: &PathableError) -> bool {
    err.io_kind() == Some(io::ErrorKind::NotFound)
}

/// The entry is missing, or a file sits where a directory was expected.
fn is_io_miss(err: &PathableError) -> bool {
    matches!(
        err.io_kind(),
        Some(io::ErrorKind::NotFound | io::ErrorKind::NotADirectory)
    )
}

impl NodeAccessor for FilesystemAccessor {
    type Node<'a>
        = FilePath
    where
        Self: 'a;
    type Value = Vec<u8>;

    fn root<'a>(&'a self) -> FilePath {
        FilePath::root()
    }

    fn child<'a>(&'a self, node: &FilePath, segment: &Segment) -> PathableResult<FilePath> {
        let Segment::Key(name) = segment else {
            return Err(Box::new(PathableError::type_mismatch(
                segment.clone(),
                "entry name",
            )));
        };
        let missing = || Box::new(PathableError::not_found(Some(segment.clone())));
        // "..", "." and names with separators are never listed entries
        let Some(path) = node.join_entry(name) else {
            debug!(name = name.as_str(), "refusing non-entry name");
            return Err(missing());
        };
        match self.pal.entry_exists(&path) {
            Ok(true) => Ok(path),
            Ok(false) => Err(missing()),
            Err(err) if is_io_miss(&err) => Err(missing()),
            Err(err) => Err(err),
        }
    }

    #[instrument(skip(self, node), fields(path = %node))]
    fn node_keys<'a>(&'a self, node: &FilePath, last: Option<&Segment>) -> PathableResult<Vec<Segment>> {
        match self.pal.list_directory(node) {
            Ok(names) => Ok(names.into_iter().map(Segment::from).collect()),
            Err(list_err) => match self.pal.symlink_metadata(node) {
                Ok(stat) if !stat.is_directory() => {
                    debug!(file_type = stat.file_type.as_str(), "entry is not a directory");
                    Err(Box::new(PathableError::not_traversable(last.cloned())))
                }
                Err(stat_err) if is_io_not_found(&stat_err) => {
                    debug!("entry vanished before it could be listed");
                    Err(Box::new(PathableError::not_found(last.cloned())))
                }
                _ => Err(list_err),
            },
        }
    }

    fn node_is_traversable<'a>(&'a self, node: &FilePath) -> Option<PathableResult<bool>> {
        let outcome = match self.pal.is_directory(node) {
            Err(err) if is_io_miss(&err) => Ok(false),
            other => other,
        };
        Some(outcome)
    }

    fn materialize<'a>(&'a self, node: &FilePath) -> PathableResult<Vec<u8>> {
        self.pal.read_file(node)
    }

    fn node_stat<'a>(&'a self, node: &FilePath) -> PathableResult<Metadata> {
        let stat = self.pal.symlink_metadata(node)?;
        let mut metadata = Metadata::new();
        metadata.insert("type".to_string(), json!(stat.file_type.as_str()));
        metadata.insert("st_mode".to_string(), json!(stat.st_mode));
        metadata.insert("st_ino".to_string(), json!(stat.st_ino));
        metadata.insert("st_dev".to_string(), json!(stat.st_dev));
        metadata.insert("st_nlink".to_string(), json!(stat.st_nlink));
        metadata.insert("st_uid".to_string(), json!(stat.st_uid));
        metadata.insert("st_gid".to_string(), json!(stat.st_gid));
        metadata.insert("st_size".to_string(), json!(stat.st_size));
        metadata.insert("st_atime".to_string(), json!(stat.st_atime));
        metadata.insert("st_mtime".to_string(), json!(stat.st_mtime));
        metadata.insert("st_ctime".to_string(), json!(stat.st_ctime));
        Ok(metadata)
    }

    fn cache(&self) -> &ResultCache<Vec<u8>> {
        &self.cache
    }
}
