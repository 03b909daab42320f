use std::cmp::Ordering;
use std::fmt;

use arcstr::ArcStr;

/* 📖 # Why is Segment a closed enum?

A path addresses nodes in very different stores: string keys in mappings, integer
indices in sequences, entry names in directories. Modelling the segment as a closed
enum keeps every accessor honest about which kinds it accepts, and makes equality
type-sensitive for free: `Index(0)` and `Key("0")` are different segments.

Keys use ArcStr so that cloning a segment sequence (which happens on every child
derivation) is a refcount bump rather than a string copy.
*/

/// One atomic key in a path address.
///
/// After parsing, a `Key` never contains the separator and is never empty or `"."`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A textual key (mapping key, directory entry name).
    Key(ArcStr),
    /// An integer key, typically a sequence index.
    Index(i64),
}

impl Segment {
    /// Returns the text of a `Key` segment.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Segment::Key(key) => Some(key.as_str()),
            Segment::Index(_) => None,
        }
    }

    /// Returns the value of an `Index` segment.
    pub fn as_index(&self) -> Option<i64> {
        match self {
            Segment::Key(_) => None,
            Segment::Index(index) => Some(*index),
        }
    }

    /// Stable, type-qualified string projection used for ordering.
    ///
    /// Distinct segments always have distinct projections, so ordering by
    /// projection is consistent with equality.
    pub fn projection(&self) -> String {
        match self {
            Segment::Key(key) => format!("str:{key}"),
            Segment::Index(index) => format!("int:{index}"),
        }
    }
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        self.projection().cmp(&other.projection())
    }
}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "{}", key),
            Segment::Index(index) => write!(f, "{}", index),
        }
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "{:?}", key.as_str()),
            Segment::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(ArcStr::from(key))
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(ArcStr::from(key))
    }
}

impl From<ArcStr> for Segment {
    fn from(key: ArcStr) -> Self {
        Segment::Key(key)
    }
}

impl From<i64> for Segment {
    fn from(index: i64) -> Self {
        Segment::Index(index)
    }
}

impl From<i32> for Segment {
    fn from(index: i32) -> Self {
        Segment::Index(i64::from(index))
    }
}

impl From<usize> for Segment {
    /// Indices above `i64::MAX` saturate; no real sequence is that long.
    fn from(index: usize) -> Self {
        Segment::Index(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equality_is_type_sensitive() {
        assert_ne!(Segment::from(0), Segment::from("0"));
        assert_eq!(Segment::from("a"), Segment::from(String::from("a")));
        assert_eq!(Segment::from(3usize), Segment::from(3i64));
    }

    #[test]
    fn test_projection() {
        assert_eq!(Segment::from("abc").projection(), "str:abc");
        assert_eq!(Segment::from(-2).projection(), "int:-2");
    }

    #[test]
    fn test_cross_type_ordering_is_deterministic() {
        let mut segments = vec![Segment::from("b"), Segment::from(1), Segment::from("a")];
        segments.sort();
        assert_eq!(
            segments,
            vec![Segment::from(1), Segment::from("a"), Segment::from("b")]
        );
    }

    #[test]
    fn test_display_and_debug() {
        assert_eq!(Segment::from("x.txt").to_string(), "x.txt");
        assert_eq!(Segment::from(7).to_string(), "7");
        assert_eq!(format!("{:?}", Segment::from("x")), "\"x\"");
        assert_eq!(format!("{:?}", Segment::from(7)), "7");
    }

    #[test]
    fn test_hash_distinguishes_types() {
        let mut set = HashSet::new();
        set.insert(Segment::from(0));
        set.insert(Segment::from("0"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Segment::from("k").as_key(), Some("k"));
        assert_eq!(Segment::from("k").as_index(), None);
        assert_eq!(Segment::from(4).as_index(), Some(4));
    }
}
