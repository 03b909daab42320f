/* 📖 # Why does Path share its accessor through an Arc?

A Path is a PathValue plus the accessor that knows how to dereference it. Every path
derived from another one (child, parent, join, iteration) points at the same
accessor, so they all see the same backing root and the same read cache. Cloning a
Path or deriving a child is two refcount bumps plus the new segment list; the
accessor and its cache are never copied.

Equality, hashing and ordering look at the PathValue only. Two paths that name the
same location compare equal even when they were built over different accessors.
*/

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Div;
use std::path::PathBuf;
use std::sync::Arc;

use pathable_base::{PalHandle, PathableError, PathableResult, RealPal, Segment};
use tracing::{debug, instrument};

use crate::accessor::{FilesystemAccessor, LookupAccessor, LookupNode, Metadata, NodeAccessor};
use crate::config::PathableConfig;
use crate::parser::{PathArg, SEPARATOR, canonicalize};
use crate::path_value::{InfallibleArg, PathValue};

/// A location bound to the accessor that can dereference it.
///
/// # Examples
///
/// ```
/// use pathable::LookupPath;
/// use serde_json::json;
///
/// let root = LookupPath::from_lookup(json!({"a": {"b": {"c": 5}}}), ["a/b"]).unwrap();
/// assert_eq!((&root / "c").read_value().unwrap(), json!(5));
/// assert_eq!(format!("{:?}", root), "Path(\"a/b\")");
/// ```
pub struct Path<A: NodeAccessor> {
    value: PathValue,
    accessor: Arc<A>,
}

/// Path over an in-memory lookup tree.
pub type LookupPath<N = serde_json::Value> = Path<LookupAccessor<N>>;

/// Path over a directory tree.
pub type FilesystemPath = Path<FilesystemAccessor>;

impl<A: NodeAccessor> Path<A> {
    /// Parse `args` with the default separator and bind them to `accessor`.
    pub fn new<I, T>(accessor: A, args: I) -> PathableResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<PathArg>,
    {
        Self::with_separator(accessor, args, SEPARATOR)
    }

    pub fn with_separator<I, T>(accessor: A, args: I, separator: char) -> PathableResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<PathArg>,
    {
        let value = PathValue::with_separator(args, separator)?;
        Ok(Self::from_shared(Arc::new(accessor), value))
    }

    /// Bind an existing value to an accessor that other paths may already share.
    pub fn from_shared(accessor: Arc<A>, value: PathValue) -> Self {
        Self { value, accessor }
    }

    fn derive(&self, value: PathValue) -> Self {
        Self {
            value,
            accessor: Arc::clone(&self.accessor),
        }
    }

    pub fn value(&self) -> &PathValue {
        &self.value
    }

    pub fn segments(&self) -> &[Segment] {
        self.value.segments()
    }

    pub fn separator(&self) -> char {
        self.value.separator()
    }

    /// The accessor shared by this path and everything derived from it.
    ///
    /// Cache controls live here:
    ///
    /// ```
    /// use pathable::{LookupPath, NodeAccessor};
    /// use serde_json::json;
    ///
    /// let path = LookupPath::from_lookup(json!({"a": 1}), ["a"]).unwrap();
    /// path.accessor().disable_cache();
    /// assert_eq!(path.read_value().unwrap(), json!(1));
    /// ```
    pub fn accessor(&self) -> &Arc<A> {
        &self.accessor
    }

    /// Append canonicalized arguments, without checking that the result exists.
    pub fn join<I, T>(&self, args: I) -> PathableResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<PathArg>,
    {
        Ok(self.derive(self.value.join(args)?))
    }

    /// Append one segment as-is. Callers pass keys that are already canonical.
    pub(crate) fn child(&self, segment: Segment) -> Self {
        self.derive(self.value.join_segment(segment))
    }

    /// Append `key`, failing with `NotFound` unless each new segment exists.
    ///
    /// A key that names no segment at all (`""`, `"."`) is not a child.
    pub fn try_join(&self, key: impl Into<PathArg>) -> PathableResult<Self> {
        let key = key.into();
        let segments = canonicalize([key.clone()], self.separator())?;
        if segments.is_empty() {
            return Err(Box::new(PathableError::not_found(Some(empty_key_segment(key)))));
        }
        let mut current = self.clone();
        for segment in segments {
            self.accessor.require_child(current.segments(), &segment)?;
            current = current.child(segment);
        }
        Ok(current)
    }

    pub fn parent(&self) -> Self {
        self.derive(self.value.parent())
    }

    /// Ancestors, nearest first, ending with the root path.
    pub fn parents(&self) -> Vec<Self> {
        self.value
            .parents()
            .into_iter()
            .map(|value| self.derive(value))
            .collect()
    }

    pub fn name(&self) -> String {
        self.value.name()
    }

    pub fn suffix(&self) -> String {
        self.value.suffix()
    }

    pub fn suffixes(&self) -> Vec<String> {
        self.value.suffixes()
    }

    pub fn stem(&self) -> String {
        self.value.stem()
    }

    pub fn with_name(&self, name: &str) -> PathableResult<Self> {
        Ok(self.derive(self.value.with_name(name)?))
    }

    pub fn with_suffix(&self, suffix: &str) -> PathableResult<Self> {
        Ok(self.derive(self.value.with_suffix(suffix)?))
    }

    pub fn is_relative_to<I, T>(&self, prefix: I) -> bool
    where
        I: IntoIterator<Item = T>,
        T: Into<PathArg>,
    {
        self.value.is_relative_to(prefix)
    }

    /// The part of this path below `prefix`, as an unbound value.
    pub fn relative_to<I, T>(&self, prefix: I) -> PathableResult<PathValue>
    where
        I: IntoIterator<Item = T>,
        T: Into<PathArg>,
    {
        self.value.relative_to(prefix)
    }

    /// Resolve and materialize this path, through the accessor's cache.
    #[instrument(skip(self), fields(path = %self.value))]
    pub fn read_value(&self) -> PathableResult<A::Value> {
        self.accessor.read(self.segments())
    }

    /// Subscript: read the child named by `key`, which must exist.
    pub fn read_child(&self, key: impl Into<PathArg>) -> PathableResult<A::Value> {
        self.try_join(key)?.read_value()
    }

    /// Child path for `key` if it exists.
    pub fn get(&self, key: impl Into<PathArg>) -> Option<Self> {
        let segments = match canonicalize([key], self.separator()) {
            Ok(segments) => segments,
            Err(err) => {
                debug!(error = %err, "invalid key");
                return None;
            }
        };
        if segments.is_empty() {
            return None;
        }
        let mut current = self.clone();
        for segment in segments {
            if !self.accessor.contains(current.segments(), &segment) {
                return None;
            }
            current = current.child(segment);
        }
        Some(current)
    }

    /// Child path for `key`, or `default` when it does not exist.
    pub fn get_or(&self, key: impl Into<PathArg>, default: Self) -> Self {
        self.get(key).unwrap_or(default)
    }

    /// Membership check for `key`. Never fails.
    pub fn contains(&self, key: impl Into<PathArg>) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> PathableResult<Vec<Segment>> {
        self.accessor.keys(self.segments())
    }

    /// `(key, child path)` pairs over a snapshot of the current keys.
    pub fn items(&self) -> PathableResult<impl Iterator<Item = (Segment, Self)>> {
        let keys = self.keys()?;
        let base = self.clone();
        Ok(keys.into_iter().map(move |key| {
            let child = base.child(key.clone());
            (key, child)
        }))
    }

    /// Child paths over a snapshot of the current keys.
    pub fn children(&self) -> PathableResult<impl Iterator<Item = Self>> {
        Ok(self.items()?.map(|(_, child)| child))
    }

    pub fn len(&self) -> PathableResult<usize> {
        self.accessor.len(self.segments())
    }

    pub fn is_empty(&self) -> PathableResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Whether the path resolves and its metadata can be read.
    pub fn exists(&self) -> bool {
        self.stat().is_some()
    }

    /// Whether the path names something with children. I/O failures propagate.
    pub fn is_traversable(&self) -> PathableResult<bool> {
        self.accessor.is_traversable(self.segments())
    }

    pub fn stat(&self) -> Option<Metadata> {
        self.accessor.stat(self.segments())
    }

    /// Fail unless the path resolves.
    pub fn validate(&self) -> PathableResult<()> {
        self.accessor.validate(self.segments())
    }
}

/// The segment cited when a key canonicalizes to nothing.
fn empty_key_segment(key: PathArg) -> Segment {
    match key {
        PathArg::Text(text) => Segment::from(text.as_str()),
        _ => Segment::from(""),
    }
}

impl<N: LookupNode> Path<LookupAccessor<N>> {
    /// Path over an in-memory tree with a fresh accessor.
    pub fn from_lookup<I, T>(root: N, args: I) -> PathableResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<PathArg>,
    {
        Self::new(LookupAccessor::new(root), args)
    }

    pub fn from_lookup_with_config<I, T>(
        root: N,
        args: I,
        config: &PathableConfig,
    ) -> PathableResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<PathArg>,
    {
        let accessor = LookupAccessor::with_cache_config(root, &config.cache);
        Self::with_separator(accessor, args, config.separator)
    }
}

impl Path<FilesystemAccessor> {
    /// Path over the real directory tree below `root`.
    pub fn from_directory<I, T>(root: impl Into<PathBuf>, args: I) -> PathableResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<PathArg>,
    {
        Self::new(FilesystemAccessor::from_directory(root), args)
    }

    pub fn from_directory_with_config<I, T>(
        root: impl Into<PathBuf>,
        args: I,
        config: &PathableConfig,
    ) -> PathableResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<PathArg>,
    {
        let pal = PalHandle::new(RealPal::new(root.into()));
        let accessor = FilesystemAccessor::with_cache_config(pal, &config.cache);
        Self::with_separator(accessor, args, config.separator)
    }
}

impl<A: NodeAccessor> Clone for Path<A> {
    fn clone(&self) -> Self {
        self.derive(self.value.clone())
    }
}

impl<A: NodeAccessor> PartialEq for Path<A> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<A: NodeAccessor> Eq for Path<A> {}

impl<A: NodeAccessor> Hash for Path<A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<A: NodeAccessor> Ord for Path<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<A: NodeAccessor> PartialOrd for Path<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A: NodeAccessor> fmt::Display for Path<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl<A: NodeAccessor> fmt::Debug for Path<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({:?})", self.value.to_string())
    }
}

impl<A: NodeAccessor> From<&Path<A>> for PathArg {
    fn from(path: &Path<A>) -> Self {
        PathArg::from(&path.value)
    }
}

impl<A: NodeAccessor, T: InfallibleArg> Div<T> for &Path<A> {
    type Output = Path<A>;

    fn div(self, rhs: T) -> Path<A> {
        self.derive(&self.value / rhs)
    }
}

impl<A: NodeAccessor, T: InfallibleArg> Div<T> for Path<A> {
    type Output = Path<A>;

    fn div(self, rhs: T) -> Path<A> {
        &self / rhs
    }
}
