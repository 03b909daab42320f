/* 📖 # Why is NodeAccessor a trait with provided traversal methods?

The backing stores differ only in how one step works: how to get from a node to its
child by one segment, how to list a node's children, how to turn a node into a
value, and what metadata describes it. Everything built on top of that (walking a
whole segment sequence, caching reads, boolean membership checks, error attribution)
is identical for every store.

So each accessor implements the small set of required node primitives, and the
traversal operations are provided methods written once against them:

1. **LookupAccessor**: nested mappings, sequences and scalars held in memory
2. **FilesystemAccessor**: a directory tree reached through the PAL

`Node<'a>` is a generic associated type so that a lookup accessor can hand out
borrowed `&'a N` references into its root while a filesystem accessor hands out
owned `FilePath` handles.
*/

use std::fmt::Debug;

use pathable_base::{PathableError, PathableResult, Segment};
use tracing::{debug, instrument};

use crate::cache::ResultCache;

pub mod filesystem;
pub mod lookup;

pub use filesystem::FilesystemAccessor;
pub use lookup::{LookupAccessor, LookupNode, NodeKind};

/// Backend-defined metadata returned by `stat`.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Segment-by-segment traversal over a backing store.
///
/// Implementors provide the node primitives; the traversal operations (`resolve`,
/// `read`, `keys`, `contains`, ...) are provided and take a segment sequence
/// relative to the accessor's root.
pub trait NodeAccessor: Debug {
    /// Handle to a resolved node.
    type Node<'a>
    where
        Self: 'a;

    /// Terminal value produced by `read`.
    type Value: Clone;

    /// The node every traversal starts from.
    fn root<'a>(&'a self) -> Self::Node<'a>;

    /// Step from `node` into its child named by `segment`.
    ///
    /// # Returns
    /// * `Err(NotFound)` - If the child does not exist, citing `segment`
    /// * `Err(TypeMismatch)` - If the segment type cannot address this node kind
    fn child<'a>(
        &'a self,
        node: &Self::Node<'a>,
        segment: &Segment,
    ) -> PathableResult<Self::Node<'a>>;

    /// Enumerate the children of `node`.
    ///
    /// # Arguments
    /// * `node` - The resolved node
    /// * `last` - The segment that led to `node`, cited in errors (`None` at the root)
    fn node_keys<'a>(
        &'a self,
        node: &Self::Node<'a>,
        last: Option<&Segment>,
    ) -> PathableResult<Vec<Segment>>;

    /// Count the children of `node`. Defaults to counting `node_keys`.
    fn node_len<'a>(&'a self, node: &Self::Node<'a>, last: Option<&Segment>) -> PathableResult<usize> {
        Ok(self.node_keys(node, last)?.len())
    }

    /// Cheap traversability check, if the backend has one.
    ///
    /// `None` makes `is_traversable` fall back to attempting `node_keys`.
    fn node_is_traversable<'a>(&'a self, _node: &Self::Node<'a>) -> Option<PathableResult<bool>> {
        None
    }

    /// Turn a resolved node into its terminal value.
    fn materialize<'a>(&'a self, node: &Self::Node<'a>) -> PathableResult<Self::Value>;

    /// Backend-defined metadata for a resolved node.
    fn node_stat<'a>(&'a self, node: &Self::Node<'a>) -> PathableResult<Metadata>;

    /// The read cache owned by this accessor.
    fn cache(&self) -> &ResultCache<Self::Value>;

    /// Walk `segments` from the root, failing at the first segment that does not resolve.
    fn resolve<'a>(&'a self, segments: &[Segment]) -> PathableResult<Self::Node<'a>> {
        let mut node = self.root();
        for (depth, segment) in segments.iter().enumerate() {
            node = self.child(&node, segment).map_err(|err| {
                debug!(depth, %segment, error = %err, "resolution stopped");
                err
            })?;
        }
        Ok(node)
    }

    /// Resolve and materialize, memoized in the accessor's cache.
    #[instrument(level = "trace", skip_all, fields(depth = segments.len()))]
    fn read(&self, segments: &[Segment]) -> PathableResult<Self::Value> {
        self.cache().get_or_compute(segments, || {
            let node = self.resolve(segments)?;
            self.materialize(&node)
        })
    }

    /// Child keys of the resolved node.
    fn keys(&self, segments: &[Segment]) -> PathableResult<Vec<Segment>> {
        let node = self.resolve(segments)?;
        self.node_keys(&node, segments.last())
    }

    fn len(&self, segments: &[Segment]) -> PathableResult<usize> {
        let node = self.resolve(segments)?;
        self.node_len(&node, segments.last())
    }

    /// Single-step membership check. Never fails.
    fn contains(&self, segments: &[Segment], key: &Segment) -> bool {
        let outcome = self
            .resolve(segments)
            .and_then(|node| self.child(&node, key).map(|_| ()));
        match outcome {
            Ok(()) => true,
            Err(err) => {
                if !err.is_traversal_miss() {
                    debug!(%key, error = %err, "membership check failed");
                }
                false
            }
        }
    }

    /// Like `contains`, but a miss is a `NotFound` error citing `key`.
    ///
    /// Errors other than traversal misses (such as I/O failures) propagate as-is.
    fn require_child(&self, segments: &[Segment], key: &Segment) -> PathableResult<()> {
        let outcome = self
            .resolve(segments)
            .and_then(|node| self.child(&node, key).map(|_| ()));
        match outcome {
            Err(err) if err.is_traversal_miss() => {
                Err(Box::new(PathableError::not_found(Some(key.clone()))))
            }
            other => other,
        }
    }

    /// Whether the resolved node can enumerate children.
    ///
    /// Missing and non-traversable paths are `Ok(false)`. I/O failures propagate.
    fn is_traversable(&self, segments: &[Segment]) -> PathableResult<bool> {
        let outcome = self.resolve(segments).and_then(|node| {
            match self.node_is_traversable(&node) {
                Some(result) => result,
                None => self.node_keys(&node, segments.last()).map(|_| true),
            }
        });
        match outcome {
            Err(err) if err.is_traversal_miss() => Ok(false),
            other => other,
        }
    }

    /// Metadata of the resolved node, or `None` if it cannot be resolved or inspected.
    fn stat(&self, segments: &[Segment]) -> Option<Metadata> {
        let outcome = self
            .resolve(segments)
            .and_then(|node| self.node_stat(&node));
        match outcome {
            Ok(metadata) => Some(metadata),
            Err(err) => {
                if !err.is_traversal_miss() {
                    debug!(depth = segments.len(), error = %err, "stat failed");
                }
                None
            }
        }
    }

    /// Resolve only, failing if the path does not exist.
    fn validate(&self, segments: &[Segment]) -> PathableResult<()> {
        self.resolve(segments).map(|_| ())
    }

    /// Start caching reads with the given bound (`None` for unbounded).
    fn enable_cache(&self, max_entries: Option<usize>) {
        self.cache().enable(max_entries);
    }

    fn disable_cache(&self) {
        self.cache().disable();
    }

    fn clear_cache(&self) {
        self.cache().clear();
    }
}
