/* 📖 # Traversal contract tests

These run the provided NodeAccessor operations against a lookup tree whose nodes
count every child step and every key listing. The counts show what the cache saves,
that membership checks take a single step instead of listing keys, and where a miss
turns into `false` versus an error.
*/

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use expect_test::expect;
    use serde_json::json;

    use crate::accessor::{LookupAccessor, LookupNode, Metadata, NodeAccessor, NodeKind};
    use crate::cache::ResultCache;
    use crate::config::CacheConfig;
    use crate::{PathableResult, Segment};

    #[derive(Debug, Default)]
    struct Counters {
        steps: AtomicUsize,
        listings: AtomicUsize,
    }

    #[derive(Debug, Clone)]
    enum Shape {
        Map(Vec<(String, CountingNode)>),
        List(Vec<CountingNode>),
        Leaf(i64),
    }

    #[derive(Debug, Clone)]
    struct CountingNode {
        shape: Shape,
        counters: Arc<Counters>,
    }

    impl CountingNode {
        fn build(value: &serde_json::Value, counters: &Arc<Counters>) -> Self {
            let shape = match value {
                serde_json::Value::Object(map) => Shape::Map(
                    map.iter()
                        .map(|(key, child)| (key.clone(), Self::build(child, counters)))
                        .collect(),
                ),
                serde_json::Value::Array(items) => {
                    Shape::List(items.iter().map(|child| Self::build(child, counters)).collect())
                }
                other => Shape::Leaf(other.as_i64().unwrap_or_default()),
            };
            Self {
                shape,
                counters: Arc::clone(counters),
            }
        }

        fn leaf(&self) -> Option<i64> {
            match self.shape {
                Shape::Leaf(value) => Some(value),
                _ => None,
            }
        }
    }

    impl LookupNode for CountingNode {
        fn kind(&self) -> NodeKind {
            match self.shape {
                Shape::Map(_) => NodeKind::Mapping,
                Shape::List(_) => NodeKind::Sequence,
                Shape::Leaf(_) => NodeKind::Scalar,
            }
        }

        fn get_key(&self, key: &str) -> Option<&Self> {
            self.counters.steps.fetch_add(1, Ordering::SeqCst);
            match &self.shape {
                Shape::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
                _ => None,
            }
        }

        fn get_index(&self, index: usize) -> Option<&Self> {
            self.counters.steps.fetch_add(1, Ordering::SeqCst);
            match &self.shape {
                Shape::List(items) => items.get(index),
                _ => None,
            }
        }

        fn mapping_keys(&self) -> Vec<Segment> {
            self.counters.listings.fetch_add(1, Ordering::SeqCst);
            match &self.shape {
                Shape::Map(entries) => entries.iter().map(|(k, _)| Segment::from(k.as_str())).collect(),
                _ => Vec::new(),
            }
        }

        fn child_count(&self) -> usize {
            match &self.shape {
                Shape::Map(entries) => entries.len(),
                Shape::List(items) => items.len(),
                Shape::Leaf(_) => 0,
            }
        }
    }

    fn counting(value: serde_json::Value, cache: &CacheConfig) -> (Arc<Counters>, LookupAccessor<CountingNode>) {
        let counters = Arc::new(Counters::default());
        let root = CountingNode::build(&value, &counters);
        (counters, LookupAccessor::with_cache_config(root, cache))
    }

    fn segs(text: &str) -> Vec<Segment> {
        text.split('/')
            .map(|s| match s.parse::<i64>() {
                Ok(i) => Segment::Index(i),
                Err(_) => Segment::from(s),
            })
            .collect()
    }

    fn resource() -> serde_json::Value {
        json!({
            "a": {"b": {"c": 5}, "d": {"e": 6}},
            "list": [10, 20]
        })
    }

    #[test]
    fn test_cached_reads_hit_store_once() {
        let (counters, acc) = counting(resource(), &CacheConfig::default());
        for _ in 0..5 {
            assert_eq!(acc.read(&segs("a/b/c")).unwrap().leaf(), Some(5));
        }
        assert_eq!(counters.steps.load(Ordering::SeqCst), 3);
        assert_eq!(acc.cache().stats().hits, 4);
    }

    #[test]
    fn test_uncached_reads_hit_store_every_time() {
        let config = CacheConfig {
            enabled: false,
            ..CacheConfig::default()
        };
        let (counters, acc) = counting(resource(), &config);
        for _ in 0..5 {
            acc.read(&segs("a/b/c")).unwrap();
        }
        assert_eq!(counters.steps.load(Ordering::SeqCst), 15);
    }

    #[test]
    fn test_single_entry_cache_alternating_reads_always_miss() {
        let (counters, acc) = counting(resource(), &CacheConfig::default());
        acc.enable_cache(Some(1));
        for _ in 0..3 {
            acc.read(&segs("a/b/c")).unwrap();
            acc.read(&segs("a/d/e")).unwrap();
        }
        assert_eq!(counters.steps.load(Ordering::SeqCst), 18);
        assert_eq!(acc.cache().stats().hits, 0);
    }

    #[test]
    fn test_clear_and_disable_cache() {
        let (counters, acc) = counting(resource(), &CacheConfig::default());
        acc.read(&segs("list/0")).unwrap();
        acc.clear_cache();
        acc.read(&segs("list/0")).unwrap();
        assert_eq!(counters.steps.load(Ordering::SeqCst), 4);

        acc.disable_cache();
        acc.read(&segs("list/0")).unwrap();
        acc.read(&segs("list/0")).unwrap();
        assert_eq!(counters.steps.load(Ordering::SeqCst), 8);
    }

    #[test]
    fn test_only_reads_are_cached() {
        let (counters, acc) = counting(resource(), &CacheConfig::default());
        acc.keys(&segs("a")).unwrap();
        acc.keys(&segs("a")).unwrap();
        assert_eq!(counters.listings.load(Ordering::SeqCst), 2);
        assert!(acc.stat(&segs("a")).is_some());
        assert!(acc.contains(&segs("a"), &Segment::from("b")));
        assert!(acc.cache().is_empty());
    }

    #[test]
    fn test_independent_accessors_do_not_share_cache() {
        let (_, first) = counting(resource(), &CacheConfig::default());
        let (second_counters, second) = counting(resource(), &CacheConfig::default());
        first.read(&segs("a/b/c")).unwrap();
        second.read(&segs("a/b/c")).unwrap();
        assert_eq!(second_counters.steps.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_contains_takes_one_step_without_listing() {
        let (counters, acc) = counting(resource(), &CacheConfig::default());
        assert!(acc.contains(&segs("a"), &Segment::from("d")));
        assert!(!acc.contains(&segs("a"), &Segment::from("zzz")));
        assert_eq!(counters.listings.load(Ordering::SeqCst), 0);
        assert_eq!(counters.steps.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_contains_swallows_every_miss_kind() {
        let acc = LookupAccessor::new(resource());
        // missing parent
        assert!(!acc.contains(&segs("nope"), &Segment::from("x")));
        // out of bounds index
        assert!(!acc.contains(&segs("list"), &Segment::Index(7)));
        // text key against a sequence is a type mismatch, still reported as false
        assert!(!acc.contains(&segs("list"), &Segment::from("first")));
        // scalar parent
        assert!(!acc.contains(&segs("a/b/c"), &Segment::from("x")));
        assert!(acc.contains(&segs("list"), &Segment::Index(1)));
    }

    #[test]
    fn test_require_child() {
        let acc = LookupAccessor::new(resource());
        acc.require_child(&segs("a"), &Segment::from("b")).unwrap();

        let err = acc.require_child(&segs("list"), &Segment::from("first")).unwrap_err();
        expect!["segment not found: first"].assert_eq(&err.to_string());

        let err = acc.require_child(&segs("missing/deeper"), &Segment::from("x")).unwrap_err();
        assert_eq!(err.segment(), Some(&Segment::from("x")));
    }

    #[test]
    fn test_is_traversable_swallows_type_mismatch() {
        let acc = LookupAccessor::new(resource());
        assert!(!acc.is_traversable(&segs("list/first")).unwrap());
    }

    #[test]
    fn test_validate() {
        let acc = LookupAccessor::new(resource());
        acc.validate(&segs("a/d/e")).unwrap();
        let err = acc.validate(&segs("a/x/e")).unwrap_err();
        expect!["segment not found: x"].assert_eq(&err.to_string());
    }

    /// Delegates to a lookup accessor but offers no cheap traversability check.
    #[derive(Debug)]
    struct KeysOnly(LookupAccessor<CountingNode>);

    impl NodeAccessor for KeysOnly {
        type Node<'a>
            = &'a CountingNode
        where
            Self: 'a;
        type Value = CountingNode;

        fn root<'a>(&'a self) -> &'a CountingNode {
            self.0.root()
        }

        fn child<'a>(&'a self, node: &&'a CountingNode, segment: &Segment) -> PathableResult<&'a CountingNode> {
            self.0.child(node, segment)
        }

        fn node_keys<'a>(
            &'a self,
            node: &&'a CountingNode,
            last: Option<&Segment>,
        ) -> PathableResult<Vec<Segment>> {
            self.0.node_keys(node, last)
        }

        fn materialize<'a>(&'a self, node: &&'a CountingNode) -> PathableResult<CountingNode> {
            self.0.materialize(node)
        }

        fn node_stat<'a>(&'a self, node: &&'a CountingNode) -> PathableResult<Metadata> {
            self.0.node_stat(node)
        }

        fn cache(&self) -> &ResultCache<CountingNode> {
            self.0.cache()
        }
    }

    #[test]
    fn test_is_traversable_falls_back_to_keys() {
        let (counters, inner) = counting(resource(), &CacheConfig::default());
        let acc = KeysOnly(inner);
        assert!(acc.is_traversable(&segs("a")).unwrap());
        assert_eq!(counters.listings.load(Ordering::SeqCst), 1);
        assert!(!acc.is_traversable(&segs("a/b/c")).unwrap());
        assert!(!acc.is_traversable(&segs("a/zzz")).unwrap());
        // default length counts the listed keys
        assert_eq!(acc.len(&segs("a")).unwrap(), 2);
    }
}
