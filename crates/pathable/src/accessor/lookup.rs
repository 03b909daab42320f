use std::fmt::Debug;

use pathable_base::{PathableError, PathableResult, Segment};
use serde_json::{Value, json};
use tracing::trace;

use crate::cache::ResultCache;
use crate::config::CacheConfig;

use super::{Metadata, NodeAccessor};

/// Shape of an in-memory node, decided once per node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Mapping,
    Sequence,
    Scalar,
}

/// An in-memory tree node with mapping/sequence/scalar semantics.
///
/// Mapping keys are addressed by key segments, sequence elements by index
/// segments. Index segments never address a mapping entry.
pub trait LookupNode: Clone + Debug {
    fn kind(&self) -> NodeKind;

    /// Mapping entry for `key`; `None` for missing keys and non-mappings.
    fn get_key(&self, key: &str) -> Option<&Self>;

    /// Sequence element at `index`; `None` when out of bounds or not a sequence.
    fn get_index(&self, index: usize) -> Option<&Self>;

    /// Mapping keys in insertion order; empty for non-mappings.
    fn mapping_keys(&self) -> Vec<Segment>;

    /// Number of entries of a mapping or sequence; zero for scalars.
    fn child_count(&self) -> usize;

    /// Type name reported by `stat` for scalars.
    fn scalar_type(&self) -> &'static str {
        "scalar"
    }
}

impl LookupNode for Value {
    fn kind(&self) -> NodeKind {
        match self {
            Value::Object(_) => NodeKind::Mapping,
            Value::Array(_) => NodeKind::Sequence,
            _ => NodeKind::Scalar,
        }
    }

    fn get_key(&self, key: &str) -> Option<&Self> {
        self.as_object().and_then(|map| map.get(key))
    }

    fn get_index(&self, index: usize) -> Option<&Self> {
        self.as_array().and_then(|items| items.get(index))
    }

    fn mapping_keys(&self) -> Vec<Segment> {
        self.as_object()
            .map(|map| map.keys().map(|key| Segment::from(key.as_str())).collect())
            .unwrap_or_default()
    }

    fn child_count(&self) -> usize {
        match self {
            Value::Object(map) => map.len(),
            Value::Array(items) => items.len(),
            _ => 0,
        }
    }

    fn scalar_type(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            _ => "null",
        }
    }
}

/// Accessor over an in-memory lookup tree. Reads return clones of the resolved node.
///
/// # Examples
///
/// ```
/// use pathable::{LookupAccessor, NodeAccessor, Segment};
/// use serde_json::json;
///
/// let accessor = LookupAccessor::new(json!({"a": {"b": [1, 2]}}));
/// let segments = [Segment::from("a"), Segment::from("b"), Segment::from(1)];
/// assert_eq!(accessor.read(&segments).unwrap(), json!(2));
/// ```
#[derive(Debug)]
pub struct LookupAccessor<N: LookupNode = Value> {
    root: N,
    cache: ResultCache<N>,
}

impl<N: LookupNode> LookupAccessor<N> {
    pub fn new(root: N) -> Self {
        Self::with_cache_config(root, &CacheConfig::default())
    }

    pub fn with_cache_config(root: N, config: &CacheConfig) -> Self {
        Self {
            root,
            cache: ResultCache::new(config),
        }
    }

    pub fn root_node(&self) -> &N {
        &self.root
    }
}

impl<N: LookupNode> NodeAccessor for LookupAccessor<N> {
    type Node<'a>
        = &'a N
    where
        Self: 'a;
    type Value = N;

    fn root<'a>(&'a self) -> &'a N {
        &self.root
    }

    fn child<'a>(&'a self, node: &&'a N, segment: &Segment) -> PathableResult<&'a N> {
        let node: &'a N = *node;
        trace!(%segment, kind = ?node.kind(), "lookup step");
        let found = match (node.kind(), segment) {
            (NodeKind::Mapping, Segment::Key(key)) => node.get_key(key),
            (NodeKind::Sequence, Segment::Index(index)) => {
                usize::try_from(*index).ok().and_then(|i| node.get_index(i))
            }
            (NodeKind::Sequence, Segment::Key(_)) => {
                return Err(Box::new(PathableError::type_mismatch(
                    segment.clone(),
                    "integer index",
                )));
            }
            _ => None,
        };
        found.ok_or_else(|| Box::new(PathableError::not_found(Some(segment.clone()))))
    }

    fn node_keys<'a>(&'a self, node: &&'a N, last: Option<&Segment>) -> PathableResult<Vec<Segment>> {
        match node.kind() {
            NodeKind::Mapping => Ok(node.mapping_keys()),
            NodeKind::Sequence => Ok((0..node.child_count()).map(Segment::from).collect()),
            NodeKind::Scalar => Err(Box::new(PathableError::not_traversable(last.cloned()))),
        }
    }

    fn node_len<'a>(&'a self, node: &&'a N, last: Option<&Segment>) -> PathableResult<usize> {
        match node.kind() {
            NodeKind::Scalar => Err(Box::new(PathableError::not_traversable(last.cloned()))),
            _ => Ok(node.child_count()),
        }
    }

    fn node_is_traversable<'a>(&'a self, node: &&'a N) -> Option<PathableResult<bool>> {
        Some(Ok(node.kind() != NodeKind::Scalar))
    }

    fn materialize<'a>(&'a self, node: &&'a N) -> PathableResult<N> {
        Ok((*node).clone())
    }

    fn node_stat<'a>(&'a self, node: &&'a N) -> PathableResult<Metadata> {
        let (kind, length) = match node.kind() {
            NodeKind::Mapping => ("mapping", json!(node.child_count())),
            NodeKind::Sequence => ("list", json!(node.child_count())),
            NodeKind::Scalar => (node.scalar_type(), Value::Null),
        };
        let mut metadata = Metadata::new();
        metadata.insert("type".to_string(), json!(kind));
        metadata.insert("length".to_string(), length);
        Ok(metadata)
    }

    fn cache(&self) -> &ResultCache<N> {
        &self.cache
    }
}
